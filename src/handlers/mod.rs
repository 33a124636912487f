pub mod health_handler;
pub mod image_handler;

pub use health_handler::*;
pub use image_handler::*;
