use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use learngl::exercise::Exercise;

#[derive(Debug, Parser)]
pub struct Args {
    /// Exercise to start with, switch later with the 1, 2 and 3 keys
    #[arg(value_enum, default_value_t = ExerciseArg::Triangles)]
    pub exercise: ExerciseArg,
    /// Window width
    #[arg(long, default_value_t = 800)]
    pub width: u32,
    /// Window height
    #[arg(long, default_value_t = 600)]
    pub height: u32,
    /// JSON5 file with camera and color settings
    #[arg(short, long)]
    pub settings: Option<PathBuf>,
    /// PNG used as the base texture
    #[arg(long)]
    pub texture: Option<PathBuf>,
    /// PNG blended over the base texture
    #[arg(long)]
    pub overlay: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum ExerciseArg {
    Triangles,
    Quad,
    Camera,
}

impl From<ExerciseArg> for Exercise {
    fn from(e: ExerciseArg) -> Self {
        match e {
            ExerciseArg::Triangles => Self::Triangles,
            ExerciseArg::Quad => Self::TexturedQuad,
            ExerciseArg::Camera => Self::Camera,
        }
    }
}
