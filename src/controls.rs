use crate::camera::{Camera, CameraMovement};

///
/// Edge triggered boolean latch.
///
/// Holding the key down flips the value once, the key has to be released
/// before the next press is accepted.
///
#[derive(Debug, Copy, Clone)]
pub struct Toggle {
    value: bool,
    released: bool,
}

impl Toggle {
    pub fn new(value: bool) -> Self {
        Self {
            value,
            released: true,
        }
    }

    /// Returns `true` when the press flipped the value.
    pub fn press(&mut self) -> bool {
        if !self.released {
            return false;
        }

        self.value = !self.value;
        self.released = false;
        true
    }

    pub fn release(&mut self) {
        self.released = true;
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

/// Blend factor between two textures.
#[derive(Debug, Copy, Clone)]
pub struct Mixer {
    value: f32,
    step: f32,
}

impl Mixer {
    pub fn new(value: f32, step: f32) -> Self {
        Self {
            value: value.clamp(0.0, 1.0),
            step,
        }
    }

    pub fn increase(&mut self, delta_time: f32) {
        self.value = (self.value + self.step * delta_time).min(1.0);
    }

    pub fn decrease(&mut self, delta_time: f32) {
        self.value = (self.value - self.step * delta_time).max(0.0);
    }

    pub fn value(&self) -> f32 {
        self.value
    }
}

#[derive(Debug, Default, Copy, Clone)]
pub struct HeldMovements {
    held: [bool; 8],
}

impl HeldMovements {
    pub fn set(&mut self, movement: CameraMovement, pressed: bool) {
        self.held[movement.index()] = pressed;
    }

    pub fn is_held(&self, movement: CameraMovement) -> bool {
        self.held[movement.index()]
    }

    pub fn clear(&mut self) {
        self.held = [false; 8];
    }

    pub fn iter(&self) -> impl Iterator<Item = CameraMovement> + '_ {
        CameraMovement::ALL
            .into_iter()
            .filter(|movement| self.is_held(*movement))
    }

    pub fn apply(&self, camera: &mut Camera, delta_time: f32) {
        for movement in self.iter() {
            camera.process_movement(movement, delta_time);
        }
    }
}

///
/// Turns absolute cursor positions into look offsets.
///
/// The y axis is reversed since window coordinates grow downwards.
///
#[derive(Debug, Default, Copy, Clone)]
pub struct MouseLook {
    last: Option<(f64, f64)>,
}

impl MouseLook {
    pub fn offset(&mut self, x: f64, y: f64) -> (f32, f32) {
        let offset = match self.last {
            Some((last_x, last_y)) => ((x - last_x) as f32, (last_y - y) as f32),
            None => (0.0, 0.0),
        };

        self.last = Some((x, y));
        offset
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_needs_release() {
        let mut toggle = Toggle::new(false);

        assert!(toggle.press());
        assert!(toggle.value());

        assert!(!toggle.press());
        assert!(!toggle.press());
        assert!(toggle.value());

        toggle.release();
        assert!(toggle.press());
        assert!(!toggle.value());
    }

    #[test]
    fn mixer_stays_in_range() {
        let mut mixer = Mixer::new(0.2, 1.0);

        mixer.increase(0.5);
        assert!((mixer.value() - 0.7).abs() < 1e-6);

        mixer.increase(10.0);
        assert_eq!(mixer.value(), 1.0);

        mixer.decrease(0.25);
        assert!((mixer.value() - 0.75).abs() < 1e-6);

        mixer.decrease(10.0);
        assert_eq!(mixer.value(), 0.0);

        assert_eq!(Mixer::new(3.0, 1.0).value(), 1.0);
    }

    #[test]
    fn held_movements_drive_camera() {
        let mut held = HeldMovements::default();
        held.set(CameraMovement::MoveForward, true);
        held.set(CameraMovement::PitchUp, true);
        held.set(CameraMovement::TurnLeft, true);
        held.set(CameraMovement::TurnLeft, false);

        assert_eq!(
            held.iter().collect::<Vec<_>>(),
            vec![CameraMovement::MoveForward, CameraMovement::PitchUp]
        );

        let mut camera = Camera::default();
        held.apply(&mut camera, 1.0);

        assert!((camera.position().z + 2.5).abs() < 1e-5);
        assert!((camera.pitch() - 20.0).abs() < 1e-5);
        assert!((camera.yaw() + 90.0).abs() < 1e-5);

        held.clear();
        assert_eq!(held.iter().count(), 0);
    }

    #[test]
    fn mouse_look_offsets() {
        let mut look = MouseLook::default();

        assert_eq!(look.offset(400.0, 300.0), (0.0, 0.0));
        assert_eq!(look.offset(410.0, 290.0), (10.0, 10.0));
        assert_eq!(look.offset(405.0, 300.0), (-5.0, -10.0));

        look.reset();
        assert_eq!(look.offset(0.0, 0.0), (0.0, 0.0));
    }
}
