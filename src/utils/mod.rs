pub mod shutdown;
pub mod staging;
mod util;

pub use shutdown::*;
pub use staging::*;
pub use util::*;
