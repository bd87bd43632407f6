//! Register-level front end of the PlayStation 2 Graphics Synthesizer.
//!
//! The crate turns a stream of GS register writes into assembled output
//! primitives for a render backend, and decodes the GS's tiled local memory
//! formats into linear bitmaps for framebuffer, depth buffer and texture
//! read-back. Rasterization, presentation and CLUT resolution are left to
//! the consumer.

pub mod bits;
pub mod fix;
pub mod gs;
