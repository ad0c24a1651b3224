pub mod dir;
pub mod kind;
pub mod renderer;

pub use dir::*;
pub use kind::*;
pub use renderer::*;
