use glutin::config::{Config, ConfigTemplateBuilder};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContextSurfaceAccessor,
    PossiblyCurrentContext, Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, SurfaceAttributesBuilder, WindowSurface};

use glutin_winit::DisplayBuilder;

use raw_window_handle::HasRawWindowHandle;

use std::ffi::{c_char, CStr, CString};
use std::num::NonZeroU32;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use thiserror::Error;

use winit::dpi::{PhysicalSize, Size};
use winit::event::{
    ElementState, Event, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use gl_wrapper::geometry::{GBError, Geometry, GeometryBuilder, VertexAttribute};
use gl_wrapper::program::{Program, ProgramBuilder, ProgramError};
use gl_wrapper::renderer::GlRenderer;
use gl_wrapper::texture::{Texture2D, TextureError, TextureFilter, TextureFormats};

use learngl::camera::{Camera, CameraMovement};
use learngl::controls::{HeldMovements, Mixer, MouseLook, Toggle};
use learngl::exercise::{
    self, Exercise, LEFT_TRIANGLE, QUAD_INDICES, QUAD_POSITIONS, RIGHT_TRIANGLE, TEXTURED_QUAD,
};
use learngl::image::{Image, ImageError};
use learngl::settings::Settings;

use crate::args::Args;

/// Mix change per second while the arrow key is held.
const MIX_SPEED: f32 = 1.0;
/// Scroll pixels per zoom degree on touchpads.
const PIXELS_PER_ZOOM_STEP: f64 = 10.0;

pub struct App {
    event_loop: EventLoop<()>,
    gl_context: PossiblyCurrentContext,
    gl_window: GlWindow,
    scene: Scene,
    state: State,
}

impl App {
    pub fn new(args: &Args, settings: Settings) -> Result<Self, AppError> {
        let event_loop = EventLoop::new();
        let window_builder = WindowBuilder::new()
            .with_inner_size(Size::Physical(PhysicalSize::new(args.width, args.height)))
            .with_min_inner_size(Size::Physical(PhysicalSize::new(32, 32)))
            .with_title("LearnOpenGL");
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = catch_no_config(|| {
            display_builder.build(&event_loop, template, |configs| first_config(configs))
        })?
        .map_err(|e| AppError::Window(e.to_string()))?;

        let window = window.ok_or_else(|| AppError::Window("no window was created".into()))?;

        let handle = window.raw_window_handle();
        let gl_display = gl_config.display();

        let context_attr = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 5))))
            .with_profile(GlProfile::Core)
            .build(Some(handle));

        let gl_window = GlWindow::new(window, &gl_config)?;

        let gl_context = unsafe { gl_display.create_context(&gl_config, &context_attr)? }
            .make_current(&gl_window.surface)?;

        gl::load_with(|s| match CString::new(s) {
            Ok(name) => gl_display.get_proc_address(name.as_c_str()).cast(),
            Err(_) => std::ptr::null(),
        });

        log_gl_version();

        let scene = Scene::new(args)?;

        let (width, height): (u32, u32) = gl_window.window.inner_size().into();

        let state = State {
            exercise: args.exercise.into(),
            camera: Camera::from_settings(&settings.camera),
            wireframe: Toggle::new(false),
            mixer: Mixer::new(settings.mix, MIX_SPEED),
            held: HeldMovements::default(),
            mix_up: false,
            mix_down: false,
            looking: false,
            mouse: MouseLook::default(),
            clear_color: settings.clear_color,
            size: (width, height),
            last_frame: Instant::now(),
        };

        log::info!("Starting with {:?}", state.exercise);

        let app = Self {
            event_loop,
            gl_context,
            gl_window,
            scene,
            state,
        };

        Ok(app)
    }

    pub fn run(mut self) -> ! {
        let mut gl_renderer = GlRenderer::new();
        gl_renderer.resize(self.state.size.0, self.state.size.1);
        gl_renderer.set_depth_test(self.state.exercise.uses_camera());

        self.event_loop
            .run(move |event, _window_target, control_flow| {
                *control_flow = ControlFlow::Wait;
                match event {
                    Event::RedrawEventsCleared => {
                        self.state.update();

                        self.gl_window.window.request_redraw();
                        if let Err(e) = self.gl_window.surface.swap_buffers(&self.gl_context) {
                            log::error!("Could not swap buffers: {e}");
                            control_flow.set_exit();
                        }
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::Resized(size) => {
                            if let (Some(w), Some(h)) =
                                (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
                            {
                                self.gl_window.surface.resize(&self.gl_context, w, h);
                                gl_renderer.resize(size.width, size.height);
                                self.state.size = (size.width, size.height);
                                log::debug!("Resized to {}x{}", size.width, size.height);
                            }
                        }
                        WindowEvent::KeyboardInput { input, .. } => {
                            let Some(key) = input.virtual_keycode else {
                                return;
                            };
                            let pressed = input.state == ElementState::Pressed;

                            match self.state.handle_key(key, pressed) {
                                KeyOutcome::Exit => control_flow.set_exit(),
                                KeyOutcome::Switched => {
                                    gl_renderer.set_depth_test(self.state.exercise.uses_camera())
                                }
                                KeyOutcome::None => {}
                            }
                        }
                        WindowEvent::MouseInput { state, button, .. } => {
                            if let MouseButton::Right = button {
                                self.state.looking = state == ElementState::Pressed;
                                self.state.mouse.reset();
                            }
                        }
                        WindowEvent::CursorMoved { position, .. } => {
                            let (x_offset, y_offset) =
                                self.state.mouse.offset(position.x, position.y);

                            if self.state.looking && self.state.exercise.uses_camera() {
                                self.state.camera.process_look(x_offset, y_offset, true);
                            }
                        }
                        WindowEvent::MouseWheel { delta, .. } => {
                            if self.state.exercise.uses_camera() {
                                let y_offset = match delta {
                                    MouseScrollDelta::LineDelta(_, y) => y,
                                    MouseScrollDelta::PixelDelta(pos) => {
                                        (pos.y / PIXELS_PER_ZOOM_STEP) as f32
                                    }
                                };
                                self.state.camera.process_zoom(y_offset);
                            }
                        }
                        WindowEvent::Focused(false) => self.state.release_all(),
                        WindowEvent::CloseRequested => control_flow.set_exit(),
                        _ => (),
                    },
                    Event::RedrawRequested(_) => {
                        gl_renderer.set_wireframe(self.state.wireframe.value());

                        if let Err(e) = self.scene.draw(&mut gl_renderer, &self.state) {
                            log::error!("Could not draw {:?}: {e}", self.state.exercise);
                            control_flow.set_exit();
                        }
                    }
                    _ => (),
                }
            })
    }
}

/// GL objects for every exercise, created once the context is current.
struct Scene {
    left_triangle: Geometry,
    right_triangle: Geometry,
    quad: Geometry,
    yellow: Program,
    orange: Program,
    textured: Program,
    camera: Program,
    textures: [Texture2D; 2],
}

impl Scene {
    fn new(args: &Args) -> Result<Self, AppError> {
        let left_triangle = GeometryBuilder::new(&LEFT_TRIANGLE)
            .with_attribute(VertexAttribute::Vec3)
            .build()?;
        let right_triangle = GeometryBuilder::new(&RIGHT_TRIANGLE)
            .with_attribute(VertexAttribute::Vec3)
            .build()?;
        let quad = GeometryBuilder::new(&TEXTURED_QUAD)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec3)
            .with_attribute(VertexAttribute::Vec2)
            .with_indices(&QUAD_INDICES)
            .build()?;

        let yellow = ProgramBuilder::new(
            include_str!("gl_shaders/triangle.glsl"),
            include_str!("gl_shaders/yellow.glsl"),
        )
        .build()?;
        let orange = ProgramBuilder::new(
            include_str!("gl_shaders/triangle.glsl"),
            include_str!("gl_shaders/orange.glsl"),
        )
        .build()?;
        let textured = ProgramBuilder::new(
            include_str!("gl_shaders/textured.glsl"),
            include_str!("gl_shaders/blend.glsl"),
        )
        .build()?;
        let camera = ProgramBuilder::new(
            include_str!("gl_shaders/camera.glsl"),
            include_str!("gl_shaders/blend.glsl"),
        )
        .build()?;

        for program in [&textured, &camera] {
            program.set_int("texture1", 0)?;
            program.set_int("texture2", 1)?;
        }

        let base = load_image(
            args.texture.as_deref(),
            Image::checkerboard(256, 8, [181, 130, 80, 255], [110, 72, 40, 255]),
        )?;
        let overlay = load_image(
            args.overlay.as_deref(),
            Image::checkerboard(256, 2, [255, 220, 40, 255], [40, 40, 40, 0]),
        )?;

        let textures = [
            upload(&base, TextureFilter::Linear)?,
            upload(&overlay, TextureFilter::Linear)?,
        ];

        log::info!("Shaders and buffers ready");

        Ok(Self {
            left_triangle,
            right_triangle,
            quad,
            yellow,
            orange,
            textured,
            camera,
            textures,
        })
    }

    fn draw(&self, renderer: &mut GlRenderer, state: &State) -> Result<(), AppError> {
        let [r, g, b] = state.clear_color;
        renderer.clear_color(r, g, b);

        match state.exercise {
            Exercise::Triangles => {
                renderer.draw(&self.left_triangle, &self.yellow);
                renderer.draw(&self.right_triangle, &self.orange);
            }
            Exercise::TexturedQuad => {
                self.bind_textures();
                self.textured.set_float("mixValue", state.mixer.value())?;

                renderer.draw(&self.quad, &self.textured);
            }
            Exercise::Camera => {
                self.bind_textures();
                self.camera.set_float("mixValue", state.mixer.value())?;

                let (width, height) = state.size;
                let projection = exercise::projection(state.camera.fov(), width, height);

                self.camera.set_mat4("view", state.camera.view_matrix().as_ref())?;
                self.camera.set_mat4("projection", projection.as_ref())?;

                for i in 0..QUAD_POSITIONS.len() {
                    self.camera.set_mat4("model", exercise::quad_model(i).as_ref())?;
                    renderer.draw(&self.quad, &self.camera);
                }
            }
        }

        Ok(())
    }

    fn bind_textures(&self) {
        for (unit, texture) in self.textures.iter().enumerate() {
            texture.bind(unit as u8);
        }
    }
}

struct State {
    exercise: Exercise,
    camera: Camera,
    wireframe: Toggle,
    mixer: Mixer,
    held: HeldMovements,
    mix_up: bool,
    mix_down: bool,
    looking: bool,
    mouse: MouseLook,
    clear_color: [f32; 3],
    size: (u32, u32),
    last_frame: Instant,
}

enum KeyOutcome {
    None,
    Switched,
    Exit,
}

impl State {
    fn update(&mut self) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        if self.exercise.uses_camera() {
            self.held.apply(&mut self.camera, delta_time);
        }

        if self.exercise.uses_textures() {
            if self.mix_up {
                self.mixer.increase(delta_time);
            }
            if self.mix_down {
                self.mixer.decrease(delta_time);
            }
        }
    }

    fn handle_key(&mut self, key: VirtualKeyCode, pressed: bool) -> KeyOutcome {
        if let Some(movement) = movement_for(key) {
            self.held.set(movement, pressed);
            return KeyOutcome::None;
        }

        match key {
            VirtualKeyCode::Escape if pressed => return KeyOutcome::Exit,
            VirtualKeyCode::Space => {
                if !pressed {
                    self.wireframe.release();
                } else if self.wireframe.press() {
                    log::debug!("Wireframe: {}", self.wireframe.value());
                }
            }
            VirtualKeyCode::Up => self.mix_up = pressed,
            VirtualKeyCode::Down => self.mix_down = pressed,
            VirtualKeyCode::Key1 | VirtualKeyCode::Key2 | VirtualKeyCode::Key3 if pressed => {
                let digit = match key {
                    VirtualKeyCode::Key1 => 1,
                    VirtualKeyCode::Key2 => 2,
                    _ => 3,
                };

                if let Some(exercise) = Exercise::from_digit(digit) {
                    if exercise != self.exercise {
                        log::info!("Switching to {exercise:?}");
                        self.exercise = exercise;
                        self.release_all();
                        return KeyOutcome::Switched;
                    }
                }
            }
            _ => {}
        }

        KeyOutcome::None
    }

    fn release_all(&mut self) {
        self.held.clear();
        self.wireframe.release();
        self.mix_up = false;
        self.mix_down = false;
        self.looking = false;
        self.mouse.reset();
    }
}

/// Unwind payload for a display without any matching config.
struct NoGlConfig;

/// Config picker for [`DisplayBuilder::build`]. The picker has to return a
/// config, so an empty list unwinds with [`NoGlConfig`].
fn first_config<T>(mut configs: impl Iterator<Item = T>) -> T {
    configs.next().unwrap_or_else(|| panic::panic_any(NoGlConfig))
}

/// Turns a [`NoGlConfig`] unwind from `f` into an error. Other panics keep
/// unwinding.
fn catch_no_config<R>(f: impl FnOnce() -> R) -> Result<R, AppError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        if payload.is::<NoGlConfig>() {
            AppError::Window("display offers no GL configs".into())
        } else {
            panic::resume_unwind(payload)
        }
    })
}

fn movement_for(key: VirtualKeyCode) -> Option<CameraMovement> {
    let movement = match key {
        VirtualKeyCode::W => CameraMovement::MoveForward,
        VirtualKeyCode::S => CameraMovement::MoveBackward,
        VirtualKeyCode::A => CameraMovement::MoveLeft,
        VirtualKeyCode::D => CameraMovement::MoveRight,
        VirtualKeyCode::I => CameraMovement::PitchUp,
        VirtualKeyCode::K => CameraMovement::PitchDown,
        VirtualKeyCode::J => CameraMovement::TurnLeft,
        VirtualKeyCode::L => CameraMovement::TurnRight,
        _ => return None,
    };

    Some(movement)
}

fn load_image(path: Option<&Path>, fallback: Image) -> Result<Image, ImageError> {
    match path {
        Some(path) => {
            let image = Image::load_png(path)?;
            log::info!(
                "Loaded {}x{} texture from {}",
                image.width(),
                image.height(),
                path.display()
            );
            Ok(image)
        }
        None => Ok(fallback),
    }
}

fn upload(image: &Image, filter: TextureFilter) -> Result<Texture2D, TextureError> {
    Texture2D::new(
        image.width(),
        image.height(),
        image.pixels(),
        TextureFormats::Rgba8,
        filter,
    )
}

fn log_gl_version() {
    let version = unsafe { gl::GetString(gl::VERSION) };

    if !version.is_null() {
        let version = unsafe { CStr::from_ptr(version as *const c_char) };
        log::info!("OpenGL {}", version.to_string_lossy());
    }
}

pub struct GlWindow {
    // XXX the surface must be dropped before the window.
    pub surface: Surface<WindowSurface>,
    pub window: Window,
}

impl GlWindow {
    pub fn new(window: Window, config: &Config) -> Result<Self, AppError> {
        let (width, height): (u32, u32) = window.inner_size().into();
        let raw_window_handle = window.raw_window_handle();
        let attrs = SurfaceAttributesBuilder::<WindowSurface>::new().build(
            raw_window_handle,
            NonZeroU32::new(width).ok_or(AppError::ZeroSizedWindow)?,
            NonZeroU32::new(height).ok_or(AppError::ZeroSizedWindow)?,
        );

        let surface = unsafe { config.display().create_window_surface(config, &attrs)? };

        Ok(Self { window, surface })
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("could not create window: {0}")]
    Window(String),
    #[error("window has zero size")]
    ZeroSizedWindow,
    #[error("GL context error: {0}")]
    Context(#[from] glutin::error::Error),
    #[error(transparent)]
    Program(#[from] ProgramError),
    #[error(transparent)]
    Geometry(#[from] GBError),
    #[error(transparent)]
    Texture(#[from] TextureError),
    #[error(transparent)]
    Image(#[from] ImageError),
}
