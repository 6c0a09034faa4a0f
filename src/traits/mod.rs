pub mod loader;
pub mod renderer;

pub use loader::*;
pub use renderer::*;
