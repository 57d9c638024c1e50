use clap::Parser;
use env_logger::Env;

use learngl::settings::Settings;

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    let settings = match &args.settings {
        Some(path) => match Settings::load_path(path) {
            Ok(s) => {
                log::info!("Read settings from {}", path.display());
                s
            }
            Err(e) => {
                log::error!("{e}");
                std::process::exit(-1);
            }
        },
        None => Settings::default(),
    };

    let app = match App::new(&args, settings) {
        Ok(app) => app,
        Err(e) => {
            log::error!("Could not start: {e}");
            std::process::exit(-1);
        }
    };

    app.run();
}
