pub mod cors;
pub mod logging;

pub use cors::*;
