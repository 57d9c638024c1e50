use cgmath::{Angle, Deg, InnerSpace, Matrix4, Point3, Vector3};

use crate::settings::CameraSettings;

pub const DEFAULT_YAW: f32 = -90.0;
pub const DEFAULT_PITCH: f32 = 0.0;
pub const DEFAULT_SPEED: f32 = 2.5;
pub const DEFAULT_SENSITIVITY: f32 = 0.01;
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const DEFAULT_ANGULAR_SPEED: f32 = 20.0;

pub const PITCH_LIMIT: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Input-system independent camera commands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    PitchUp,
    PitchDown,
    TurnLeft,
    TurnRight,
}

impl CameraMovement {
    pub const ALL: [CameraMovement; 8] = [
        CameraMovement::MoveForward,
        CameraMovement::MoveBackward,
        CameraMovement::MoveLeft,
        CameraMovement::MoveRight,
        CameraMovement::PitchUp,
        CameraMovement::PitchDown,
        CameraMovement::TurnLeft,
        CameraMovement::TurnRight,
    ];

    /// Position of this movement in [`CameraMovement::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

///
/// Fly camera driven by Euler angles.
///
/// The basis vectors are derived from `yaw`, `pitch` and `world_up` after every
/// mutation, so `front`, `right` and `up` always form an orthonormal
/// right-handed basis.
///
#[derive(Debug, Clone)]
pub struct Camera {
    position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    movement_speed: f32,
    look_sensitivity: f32,
    zoom: f32,
    angular_speed: f32,
}

impl Camera {
    pub fn new(position: Point3<f32>, world_up: Vector3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vector3::new(0.0, 0.0, -1.0),
            up: world_up,
            right: Vector3::new(1.0, 0.0, 0.0),
            world_up,
            yaw,
            pitch,
            movement_speed: DEFAULT_SPEED,
            look_sensitivity: DEFAULT_SENSITIVITY,
            zoom: DEFAULT_ZOOM,
            angular_speed: DEFAULT_ANGULAR_SPEED,
        };

        camera.update_vectors();
        camera
    }

    pub fn from_settings(settings: &CameraSettings) -> Self {
        let [x, y, z] = settings.position;
        let [ux, uy, uz] = settings.world_up;

        let mut camera = Self::new(
            Point3::new(x, y, z),
            Vector3::new(ux, uy, uz),
            settings.yaw,
            settings.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
        );
        camera.movement_speed = settings.movement_speed;
        camera.look_sensitivity = settings.look_sensitivity;
        camera.angular_speed = settings.angular_speed;

        camera
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn look_sensitivity(&self) -> f32 {
        self.look_sensitivity
    }

    pub fn angular_speed(&self) -> f32 {
        self.angular_speed
    }

    /// Vertical field of view for the projection, narrowed by scrolling.
    pub fn fov(&self) -> Deg<f32> {
        Deg(self.zoom)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let angle = self.angular_speed * delta_time;

        match direction {
            CameraMovement::MoveForward => self.position += self.front * velocity,
            CameraMovement::MoveBackward => self.position -= self.front * velocity,
            CameraMovement::MoveLeft => self.position -= self.right * velocity,
            CameraMovement::MoveRight => self.position += self.right * velocity,
            CameraMovement::PitchUp => self.pitch += angle,
            CameraMovement::PitchDown => self.pitch -= angle,
            CameraMovement::TurnLeft => self.yaw -= angle,
            CameraMovement::TurnRight => self.yaw += angle,
        }

        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);

        self.update_vectors();
    }

    /// Unconstrained pitch can pass the poles, where `front` becomes parallel
    /// to `world_up` and the basis degenerates.
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.look_sensitivity;
        self.pitch += y_offset * self.look_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        }

        self.update_vectors();
    }

    pub fn process_zoom(&mut self, y_offset: f32) {
        self.zoom = (self.zoom - y_offset).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (Deg(self.yaw), Deg(self.pitch));

        let front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());

        self.front = front.normalize();
        // normalized, their length shrinks towards the poles
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            DEFAULT_YAW,
            DEFAULT_PITCH,
        )
    }
}
