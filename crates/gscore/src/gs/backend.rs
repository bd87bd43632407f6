use super::vertex_kick::PrimVertex;

/// The seam between primitive assembly and whatever draws the result.
/// The core hands over complete batches and never looks at them again.
pub trait RenderBackend {
    /// Accept one batch of assembled vertices (triangle list) for drawing.
    fn draw(&mut self, vertices: &[PrimVertex]);

    /// Frame boundary, after the final flush of the frame.
    fn present(&mut self) {}
}

/// Discards everything. Used when no rendering or introspection sink is
/// attached.
#[derive(Debug, Default)]
pub struct NullBackend;

impl RenderBackend for NullBackend {
    fn draw(&mut self, _vertices: &[PrimVertex]) {}
}
