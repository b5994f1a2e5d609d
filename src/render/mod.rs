pub mod canvas;
pub mod renderer;
pub mod scene;

pub use canvas::{Canvas, DisplayList, DrawCommand, Layer};
pub use renderer::Renderer;
pub use scene::ScenePainter;
