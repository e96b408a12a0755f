pub mod error;
pub mod gpu;
pub mod loader;
pub mod texture;
pub mod viewer;
