pub mod camera;
pub mod controls;
pub mod exercise;
pub mod image;
pub mod settings;
