use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

use cgmath::{Angle, Deg};
use serde::{Deserialize, Serialize};

use crate::camera::{
    DEFAULT_ANGULAR_SPEED, DEFAULT_PITCH, DEFAULT_SENSITIVITY, DEFAULT_SPEED, DEFAULT_YAW,
    PITCH_LIMIT,
};

///
/// Optional JSON5 settings file.
///
/// Every field may be omitted, in which case the defaults below are used.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub camera: CameraSettings,
    pub clear_color: [f32; 3],
    pub mix: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub world_up: [f32; 3],
    pub yaw: f32,
    pub pitch: f32,
    pub movement_speed: f32,
    pub look_sensitivity: f32,
    pub angular_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 3.0],
            world_up: [0.0, 1.0, 0.0],
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            movement_speed: DEFAULT_SPEED,
            look_sensitivity: DEFAULT_SENSITIVITY,
            angular_speed: DEFAULT_ANGULAR_SPEED,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera: CameraSettings::default(),
            clear_color: [0.2, 0.3, 0.3],
            mix: 0.2,
        }
    }
}

impl Settings {
    pub fn load_path<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let settings_str = std::fs::read_to_string(path).map_err(SettingsError::InputError)?;

        Self::parse(&settings_str)
    }

    pub fn parse(src: &str) -> Result<Self, SettingsError> {
        let settings: Settings = json5::from_str(src).map_err(SettingsError::FormatError)?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let [x, y, z] = self.camera.world_up;
        let len = (x * x + y * y + z * z).sqrt();
        if len == 0.0 {
            return Err(SettingsError::Invalid("world_up must not be zero".into()));
        }

        // front reaches every direction within PITCH_LIMIT of the horizon,
        // world_up has to stay clear of that band
        let vertical = y.abs() / len;
        if vertical.is_nan() || vertical < Deg(PITCH_LIMIT + 0.5).sin() {
            return Err(SettingsError::Invalid(format!(
                "world_up {:?} must point within {} degrees of the vertical axis",
                self.camera.world_up,
                90.0 - PITCH_LIMIT - 0.5
            )));
        }

        if !(0.0..=1.0).contains(&self.mix) {
            return Err(SettingsError::Invalid(format!(
                "mix {} outside of [0, 1]",
                self.mix
            )));
        }

        if self.camera.look_sensitivity < 0.0
            || self.camera.movement_speed < 0.0
            || self.camera.angular_speed < 0.0
        {
            return Err(SettingsError::Invalid(
                "camera speeds must not be negative".into(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug)]
pub enum SettingsError {
    InputError(std::io::Error),
    FormatError(json5::Error),
    Invalid(String),
}

impl Display for SettingsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputError(e) => f.write_fmt(format_args!("could not read settings: {e}")),
            Self::FormatError(e) => f.write_fmt(format_args!("malformed settings: {e}")),
            Self::Invalid(msg) => f.write_fmt(format_args!("invalid settings: {msg}")),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputError(e) => Some(e),
            Self::FormatError(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use cgmath::InnerSpace;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::parse("{}").unwrap();

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_camera_section() {
        let src = r#"{
            // comments are fine in json5
            camera: { position: [1, 2, 3], movement_speed: 4.0 },
            mix: 0.5,
        }"#;

        let settings = Settings::parse(src).unwrap();

        assert_eq!(settings.camera.position, [1.0, 2.0, 3.0]);
        assert_eq!(settings.camera.movement_speed, 4.0);
        assert_eq!(settings.camera.yaw, -90.0);
        assert_eq!(settings.camera.look_sensitivity, 0.01);
        assert_eq!(settings.mix, 0.5);
        assert_eq!(settings.clear_color, [0.2, 0.3, 0.3]);
    }

    #[test]
    fn zero_world_up_is_rejected() {
        let src = "{ camera: { world_up: [0, 0, 0] } }";

        assert!(matches!(
            Settings::parse(src),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn parallel_world_up_is_rejected() {
        let src = "{ camera: { world_up: [1, 0, 0], yaw: 0 } }";

        assert!(matches!(
            Settings::parse(src),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn tilted_world_up_is_rejected() {
        // front reaches this direction once yaw turns to 0 and pitch to about 84
        let src = "{ camera: { world_up: [0.1, 1, 0] } }";

        assert!(matches!(
            Settings::parse(src),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn nan_world_up_is_rejected() {
        let settings = Settings {
            camera: CameraSettings {
                world_up: [0.0, f32::NAN, 0.0],
                ..CameraSettings::default()
            },
            ..Settings::default()
        };

        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn vertical_world_up_gives_finite_basis() {
        for src in [
            "{ camera: { world_up: [0, -1, 0] } }",
            "{ camera: { world_up: [0, 5, 0], pitch: 89 } }",
        ] {
            let settings = Settings::parse(src).unwrap();
            let camera = Camera::from_settings(&settings.camera);

            for v in [camera.front(), camera.right(), camera.up()] {
                assert!((v.magnitude() - 1.0).abs() < 1e-5, "{src}: {v:?}");
            }
        }
    }

    #[test]
    fn mix_out_of_range_is_rejected() {
        assert!(matches!(
            Settings::parse("{ mix: 1.5 }"),
            Err(SettingsError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_input() {
        assert!(matches!(
            Settings::parse("{ camera: "),
            Err(SettingsError::FormatError(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            Settings::load_path("/nonexistent/learngl/settings.json5"),
            Err(SettingsError::InputError(_))
        ));
    }
}
