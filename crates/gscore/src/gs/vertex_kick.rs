use log::trace;
use num_traits::FromPrimitive;

use crate::bits::Bits;

use super::registers::{PrimitiveMode, PrimitiveType, Register, Rgbaq, Xyz};
use super::Gs;

/// Output batch capacity in vertices; reaching it forces a flush.
pub const VERTEX_BATCH_CAPACITY: usize = 0x1000;

/// One slot of the kick buffer: the raw register payloads captured at kick
/// time. Decoded lazily during assembly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Vertex {
    pub position: u64,
    pub rgbaq: u64,
    pub uv: u64,
    pub st: u64,
    pub fog: u8,
}

/// A device-ready output vertex, as handed to the render backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimVertex {
    pub x: f32,
    pub y: f32,
    pub z: u32,
    pub color: u32,
    pub s: f32,
    pub t: f32,
    pub q: f32,
    pub fog: f32,
}

/// Replaces the low-order mode bits (primitive type and attribute flags,
/// bits 0..=10) of the latched mode word, preserving everything above.
fn latch_primitive_mode(current: u64, source: u64) -> u64 {
    let mask = u64::mask(0..=10);
    (current & !mask) | (source & mask)
}

fn pack_color(color: Rgbaq) -> u32 {
    // Hardware packing: alpha in the top byte, then blue, green, red.
    (color.a as u32) << 24 | (color.b as u32) << 16 | (color.g as u32) << 8 | color.r as u32
}

impl Gs {
    /// A PRIM write. Switching topology flushes buffered output primitives
    /// before the pending count is redefined for the new topology.
    pub(super) fn set_primitive_type(&mut self, data: u64) {
        let new_type = PrimitiveType::from_u64(data.bits(0..=2))
            .unwrap_or_else(|| panic!("Invalid primitive type {:b}", data.bits(0..=2)));
        if new_type != self.primitive_type {
            self.flush_batch();
        }
        self.primitive_type = new_type;
        self.vertex_count = new_type.vertex_quota();
    }

    /// One kick trigger: captures the current color/UV/ST registers (and
    /// the fog byte from the payload for XYZF kicks) into the slot the
    /// pending count points at, then completes the primitive if the quota
    /// is met.
    pub(super) fn vertex_kick(&mut self, data: u64, drawing_kick: bool, fog: bool) {
        if self.vertex_count == 0 {
            // No valid PRIM seen yet.
            return;
        }
        let drawing_kick = drawing_kick && self.draw_enabled;

        let vertex = &mut self.vertex_buffer[self.vertex_count as usize - 1];
        vertex.rgbaq = self.registers[Register::Rgbaq];
        vertex.uv = self.registers[Register::Uv];
        vertex.st = self.registers[Register::St];
        if fog {
            vertex.position = data.bits(0..56);
            vertex.fog = data.bits(56..64) as u8;
        } else {
            vertex.position = data;
            vertex.fog = self.registers[Register::Fog].bits(56..64) as u8;
        }

        self.vertex_count -= 1;
        if self.vertex_count > 0 {
            return;
        }

        let source = if self.registers[Register::PrimitiveModeControl].bit(0) {
            self.registers[Register::Primitive]
        } else {
            self.registers[Register::PrimitiveMode]
        };
        self.primitive_mode = latch_primitive_mode(self.primitive_mode, source);

        if drawing_kick {
            let mode = PrimitiveMode::from(self.primitive_mode);
            self.context = self.resolve_context(mode.context.index());
        }

        match self.primitive_type {
            PrimitiveType::Point => {
                if drawing_kick {
                    self.assemble_point();
                }
                self.vertex_count = 1;
            }
            PrimitiveType::Line => {
                if drawing_kick {
                    self.assemble_line();
                }
                self.vertex_count = 2;
            }
            PrimitiveType::LineStrip => {
                if drawing_kick {
                    self.assemble_line();
                }
                self.vertex_buffer[1] = self.vertex_buffer[0];
                self.vertex_count = 1;
            }
            PrimitiveType::Triangle => {
                if drawing_kick {
                    self.assemble_triangle();
                }
                self.vertex_count = 3;
            }
            PrimitiveType::TriangleStrip => {
                if drawing_kick {
                    self.assemble_triangle();
                }
                self.vertex_buffer[2] = self.vertex_buffer[1];
                self.vertex_buffer[1] = self.vertex_buffer[0];
                self.vertex_count = 1;
            }
            PrimitiveType::TriangleFan => {
                if drawing_kick {
                    self.assemble_triangle();
                }
                // Same single-slot copy as LineStrip; slot 2 is left alone.
                self.vertex_buffer[1] = self.vertex_buffer[0];
                self.vertex_count = 1;
            }
            PrimitiveType::Sprite => {
                if drawing_kick {
                    self.assemble_sprite();
                }
                self.vertex_count = 2;
            }
            PrimitiveType::SpecificationProhibited => {}
        }
    }

    // Point, line and triangle assembly are extension points for a full
    // rasterizer; the kick machine still consumes their vertices so the
    // buffer bookkeeping stays exact.
    fn assemble_point(&mut self) {}

    fn assemble_line(&mut self) {}

    fn assemble_triangle(&mut self) {}

    /// Two corner vertices become two triangles tiling the axis-aligned
    /// rectangle between them. Depth comes from the newer vertex, color
    /// from the older one.
    fn assemble_sprite(&mut self) {
        let older = self.vertex_buffer[1];
        let newer = self.vertex_buffer[0];

        let corner0 = Xyz::from(older.position);
        let corner1 = Xyz::from(newer.position);

        let x0 = f32::from(corner0.x) - f32::from(self.context.offset.x);
        let y0 = f32::from(corner0.y) - f32::from(self.context.offset.y);
        let x1 = f32::from(corner1.x) - f32::from(self.context.offset.x);
        let y1 = f32::from(corner1.y) - f32::from(self.context.offset.y);
        let z = corner1.z;

        let color = pack_color(Rgbaq::from(older.rgbaq));

        // Texture coordinates are left for the render backend to sample.
        let vertex = |x: f32, y: f32| PrimVertex {
            x,
            y,
            z,
            color,
            s: 0.0,
            t: 0.0,
            q: 1.0,
            fog: 0.0,
        };
        self.push_vertices(&[
            vertex(x0, y0),
            vertex(x1, y0),
            vertex(x0, y1),
            vertex(x0, y1),
            vertex(x1, y0),
            vertex(x1, y1),
        ]);
    }

    fn push_vertices(&mut self, vertices: &[PrimVertex]) {
        self.batch.extend_from_slice(vertices);
        if self.batch.len() >= VERTEX_BATCH_CAPACITY {
            self.flush_batch();
        }
    }

    /// Hands the output batch to the backend and clears it. No-op when
    /// empty.
    pub fn flush_batch(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        trace!("flushing {} output vertices", self.batch.len());
        self.backend.draw(&self.batch);
        self.batch.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::super::backend::RenderBackend;
    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        batches: Rc<RefCell<Vec<Vec<PrimVertex>>>>,
    }

    impl RenderBackend for RecordingBackend {
        fn draw(&mut self, vertices: &[PrimVertex]) {
            self.batches.borrow_mut().push(vertices.to_vec());
        }
    }

    fn recording_gs() -> (Gs, Rc<RefCell<Vec<Vec<PrimVertex>>>>) {
        let batches = Rc::new(RefCell::new(Vec::new()));
        let gs = Gs::new(Box::new(RecordingBackend {
            batches: batches.clone(),
        }));
        (gs, batches)
    }

    fn xyz(x: u16, y: u16, z: u32) -> u64 {
        x as u64 | (y as u64) << 16 | (z as u64) << 32
    }

    const PRIM_POINT: u64 = 0;
    const PRIM_LINE: u64 = 1;
    const PRIM_LINE_STRIP: u64 = 2;
    const PRIM_TRIANGLE: u64 = 3;
    const PRIM_TRIANGLE_STRIP: u64 = 4;
    const PRIM_TRIANGLE_FAN: u64 = 5;
    const PRIM_SPRITE: u64 = 6;

    #[test]
    fn kick_before_prim_is_ignored() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Xyz2, xyz(16, 16, 0));
        assert_eq!(gs.vertex_count, 0);
    }

    #[test]
    fn point_retention() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_POINT);
        assert_eq!(gs.vertex_count, 1);
        gs.write_register(Register::Xyz2, xyz(16, 16, 1));
        assert_eq!(gs.vertex_count, 1);
    }

    #[test]
    fn line_retention() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_LINE);
        assert_eq!(gs.vertex_count, 2);
        gs.write_register(Register::Xyz2, xyz(16, 16, 1));
        assert_eq!(gs.vertex_count, 1);
        gs.write_register(Register::Xyz2, xyz(32, 32, 1));
        assert_eq!(gs.vertex_count, 2);
    }

    #[test]
    fn line_strip_retains_last_vertex() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_LINE_STRIP);
        gs.write_register(Register::Xyz2, xyz(16, 16, 1));
        gs.write_register(Register::Xyz2, xyz(32, 32, 1));
        assert_eq!(gs.vertex_count, 1);
        // The newest vertex moved into the older slot.
        assert_eq!(gs.vertex_buffer[1].position, xyz(32, 32, 1));
    }

    #[test]
    fn triangle_retention() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_TRIANGLE);
        gs.write_register(Register::Xyz2, xyz(16, 16, 1));
        gs.write_register(Register::Xyz2, xyz(32, 16, 1));
        assert_eq!(gs.vertex_count, 1);
        gs.write_register(Register::Xyz2, xyz(16, 32, 1));
        assert_eq!(gs.vertex_count, 3);
    }

    #[test]
    fn triangle_strip_shifts_last_two() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_TRIANGLE_STRIP);
        gs.write_register(Register::Xyz2, xyz(1 << 4, 0, 0));
        gs.write_register(Register::Xyz2, xyz(2 << 4, 0, 0));
        gs.write_register(Register::Xyz2, xyz(3 << 4, 0, 0));
        assert_eq!(gs.vertex_count, 1);
        assert_eq!(gs.vertex_buffer[2].position, xyz(2 << 4, 0, 0));
        assert_eq!(gs.vertex_buffer[1].position, xyz(3 << 4, 0, 0));
    }

    #[test]
    fn triangle_fan_copies_like_a_strip() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Primitive, PRIM_TRIANGLE_FAN);
        gs.write_register(Register::Xyz2, xyz(1 << 4, 0, 0));
        gs.write_register(Register::Xyz2, xyz(2 << 4, 0, 0));
        gs.write_register(Register::Xyz2, xyz(3 << 4, 0, 0));
        assert_eq!(gs.vertex_count, 1);
        // Only slot 1 is rewritten; slot 2 still holds the first vertex.
        assert_eq!(gs.vertex_buffer[1].position, xyz(3 << 4, 0, 0));
        assert_eq!(gs.vertex_buffer[2].position, xyz(1 << 4, 0, 0));
    }

    #[test]
    fn sprite_emits_two_triangles() {
        let (mut gs, batches) = recording_gs();
        gs.write_register(Register::PrimitiveModeControl, 1);
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Rgbaq, 0x40FF_8020);
        gs.write_register(Register::Xyz2, xyz(256 << 4, 256 << 4, 0));
        gs.write_register(Register::Rgbaq, 0x1111_1111);
        gs.write_register(Register::Xyz2, xyz(512 << 4, 512 << 4, 100));
        gs.end_frame();

        let batches = batches.borrow();
        assert_eq!(batches.len(), 1);
        let vertices = &batches[0];
        assert_eq!(vertices.len(), 6);

        // Two triangles tiling (256,256)..(512,512).
        let expected = [
            (256.0, 256.0),
            (512.0, 256.0),
            (256.0, 512.0),
            (256.0, 512.0),
            (512.0, 256.0),
            (512.0, 512.0),
        ];
        for (vertex, (x, y)) in vertices.iter().zip(expected) {
            assert_eq!((vertex.x, vertex.y), (x, y));
            assert_eq!(vertex.z, 100);
            // Color comes from the first kick, packed ABGR.
            assert_eq!(vertex.color, 0x40FF_8020);
            assert_eq!((vertex.s, vertex.t, vertex.q, vertex.fog), (0.0, 0.0, 1.0, 0.0));
        }
    }

    #[test]
    fn sprite_applies_primitive_offset() {
        let (mut gs, batches) = recording_gs();
        gs.write_register(Register::PrimitiveModeControl, 1);
        // Offset (32, 16) in 12.4 fixed point.
        gs.write_register(
            Register::XyOffset1,
            (32u64 << 4) | ((16u64 << 4) << 32),
        );
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Xyz2, xyz(64 << 4, 64 << 4, 0));
        gs.write_register(Register::Xyz2, xyz(128 << 4, 128 << 4, 0));
        gs.end_frame();

        let batches = batches.borrow();
        let first = batches[0][0];
        assert_eq!((first.x, first.y), (32.0, 48.0));
    }

    #[test]
    fn non_drawing_kick_advances_without_emitting() {
        let (mut gs, batches) = recording_gs();
        gs.write_register(Register::PrimitiveModeControl, 1);
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Xyz3, xyz(0, 0, 0));
        gs.write_register(Register::Xyz3, xyz(16 << 4, 16 << 4, 0));
        // The buffer cycled back to a fresh sprite.
        assert_eq!(gs.vertex_count, 2);
        gs.end_frame();
        assert!(batches.borrow().is_empty());
    }

    #[test]
    fn draw_disabled_suppresses_emission() {
        let (mut gs, batches) = recording_gs();
        gs.set_draw_enabled(false);
        gs.write_register(Register::PrimitiveModeControl, 1);
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Xyz2, xyz(0, 0, 0));
        gs.write_register(Register::Xyz2, xyz(16 << 4, 16 << 4, 0));
        assert_eq!(gs.vertex_count, 2);
        gs.end_frame();
        assert!(batches.borrow().is_empty());
    }

    #[test]
    fn triangle_kicks_consume_without_emitting() {
        let (mut gs, batches) = recording_gs();
        gs.write_register(Register::PrimitiveModeControl, 1);
        gs.write_register(Register::Primitive, PRIM_TRIANGLE);
        gs.write_register(Register::Rgbaq, 0x8040_2010);
        for (x, y) in [(16u16, 16u16), (32, 16), (16, 32)] {
            gs.write_register(Register::Xyz2, xyz(x << 4, y << 4, 0));
        }
        // The quota was consumed and reset; nothing was emitted.
        assert_eq!(gs.vertex_count, 3);
        gs.end_frame();
        assert!(batches.borrow().is_empty());
    }

    #[test]
    fn topology_switch_flushes_exactly_once() {
        let (mut gs, batches) = recording_gs();
        gs.write_register(Register::PrimitiveModeControl, 1);
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Xyz2, xyz(0, 0, 0));
        gs.write_register(Register::Xyz2, xyz(16 << 4, 16 << 4, 0));
        // One complete sprite buffered, another one half-kicked.
        gs.write_register(Register::Xyz2, xyz(32 << 4, 32 << 4, 0));
        assert!(batches.borrow().is_empty());

        gs.write_register(Register::Primitive, PRIM_TRIANGLE);
        {
            let batches = batches.borrow();
            assert_eq!(batches.len(), 1);
            // Only the complete sprite was flushed, no partial primitive.
            assert_eq!(batches[0].len(), 6);
        }
        // Same-topology rewrite does not flush again.
        gs.write_register(Register::Primitive, PRIM_TRIANGLE);
        assert_eq!(batches.borrow().len(), 1);
    }

    #[test]
    fn fog_kick_takes_fog_from_payload() {
        let mut gs = Gs::with_null_backend();
        gs.write_register(Register::Fog, 0xAA00_0000_0000_0000);
        gs.write_register(Register::Primitive, PRIM_LINE);
        gs.write_register(Register::Xyzf2, xyz(16, 16, 0) | (0x55u64 << 56));
        assert_eq!(gs.vertex_buffer[1].fog, 0x55);
        // The fog byte is masked out of the position payload.
        assert_eq!(gs.vertex_buffer[1].position, xyz(16, 16, 0));
        gs.write_register(Register::Xyz2, xyz(32, 32, 0));
        assert_eq!(gs.vertex_buffer[0].fog, 0xAA);
    }

    #[test]
    fn mode_latch_preserves_high_bits() {
        assert_eq!(
            latch_primitive_mode(0xFFFF_FFFF_FFFF_F800, 0x3C6),
            0xFFFF_FFFF_FFFF_FBC6
        );
        assert_eq!(latch_primitive_mode(0x7FF, 0), 0);
    }

    #[test]
    fn prmode_selected_when_control_clear() {
        let (mut gs, batches) = recording_gs();
        // PRMODECONT=0: attributes come from PRMODE. Select context 2
        // there and give context 2 an offset.
        gs.write_register(Register::PrimitiveMode, 1 << 9);
        gs.write_register(
            Register::XyOffset2,
            (32u64 << 4) | ((32u64 << 4) << 32),
        );
        gs.write_register(Register::Primitive, PRIM_SPRITE);
        gs.write_register(Register::Xyz2, xyz(64 << 4, 64 << 4, 0));
        gs.write_register(Register::Xyz2, xyz(128 << 4, 128 << 4, 0));
        gs.end_frame();

        let batches = batches.borrow();
        assert_eq!((batches[0][0].x, batches[0][0].y), (32.0, 32.0));
    }
}
