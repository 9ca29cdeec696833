mod page;
pub mod renderer;

pub use renderer::{RenderError, RenderedDocument, Renderer};
