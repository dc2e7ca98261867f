pub mod io;
pub mod preprocessing;
pub mod steps;

pub use io::{load_image, save_image};
