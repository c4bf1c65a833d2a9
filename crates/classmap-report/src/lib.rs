pub mod dot;
pub mod publish;

pub use dot::render;
pub use publish::{publish, RenderError};
