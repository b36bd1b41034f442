pub mod image_controller;
pub mod style_controller;
pub mod system_controller;
