use enum_map::EnumMap;
use log::trace;
use thiserror::Error;

pub mod backend;
pub mod context;
pub mod pixel_storage;
pub mod readback;
pub mod registers;
pub mod transfer;
pub mod vertex_kick;

use backend::{NullBackend, RenderBackend};
use context::ResolvedContext;
use registers::{merge_clut_info, PixelStorageFormat, Register};
use vertex_kick::{PrimVertex, Vertex};

pub const LOCAL_MEMORY_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum GsError {
    /// A descriptor selected a pixel storage format this core cannot decode
    /// or store. Points at an emulation-fidelity gap, not at bad user input.
    #[error("unsupported pixel storage format {format} for {operation}")]
    UnsupportedFormat {
        format: PixelStorageFormat,
        operation: &'static str,
    },
    /// A transfer began while staged bytes from a previous transfer were
    /// still pending. The staging buffer is cleared before this is returned.
    #[error("transfer staging buffer not empty at transfer start ({pending} bytes pending)")]
    TransferInProgress { pending: usize },
}

/// One emulated GS device instance: the general-purpose register file,
/// 4 MiB of local memory, the vertex kick machine and the output batch.
///
/// All mutation happens through [`Gs::write_register`] and the transfer
/// methods; the read-back entry points are pure with respect to register
/// and memory state.
pub struct Gs {
    local_memory: Box<[u8]>,
    registers: EnumMap<Register, u64>,
    primitive_type: registers::PrimitiveType,
    primitive_mode: u64,
    vertex_buffer: [Vertex; 3],
    vertex_count: u32,
    draw_enabled: bool,
    context: ResolvedContext,
    batch: Vec<PrimVertex>,
    transfer_buffer: Vec<u8>,
    backend: Box<dyn RenderBackend>,
}

impl Gs {
    pub fn new(backend: Box<dyn RenderBackend>) -> Gs {
        Gs {
            local_memory: vec![0; LOCAL_MEMORY_SIZE].into_boxed_slice(),
            registers: EnumMap::default(),
            primitive_type: registers::PrimitiveType::default(),
            primitive_mode: 0,
            vertex_buffer: [Vertex::default(); 3],
            vertex_count: 0,
            draw_enabled: true,
            context: ResolvedContext::default(),
            batch: Vec::with_capacity(vertex_kick::VERTEX_BATCH_CAPACITY),
            transfer_buffer: Vec::new(),
            backend,
        }
    }

    pub fn with_null_backend() -> Gs {
        Gs::new(Box::new(NullBackend))
    }

    /// Raw register file read.
    pub fn register(&self, register: Register) -> u64 {
        self.registers[register]
    }

    /// Local memory view, addressed by the pixel storage functions.
    pub fn local_memory(&self) -> &[u8] {
        &self.local_memory
    }

    /// Globally enables or disables drawing kicks. Disabled kicks still
    /// advance the vertex machine, they just never emit primitives.
    pub fn set_draw_enabled(&mut self, enabled: bool) {
        self.draw_enabled = enabled;
    }

    /// Stores a general-purpose register value and applies its side
    /// effects (vertex kicks, topology switches, transfer activation).
    pub fn write_register(&mut self, register: Register, data: u64) {
        trace!("register write {register:?} = {data:#x}");
        self.registers[register] = data;

        match register {
            Register::Primitive => self.set_primitive_type(data),
            Register::Xyzf2 => self.vertex_kick(data, true, true),
            Register::Xyz2 => self.vertex_kick(data, true, false),
            Register::Xyzf3 => self.vertex_kick(data, false, true),
            Register::Xyz3 => self.vertex_kick(data, false, false),
            Register::TextureClut1 => {
                self.registers[Register::Texture1] =
                    merge_clut_info(self.registers[Register::Texture1], data);
            }
            Register::TextureClut2 => {
                self.registers[Register::Texture2] =
                    merge_clut_info(self.registers[Register::Texture2], data);
            }
            Register::TransmissionActivation => self.transmission_activated(data),
            Register::TransmissionData => self.transmission_data(data),
            _ => {}
        }
    }

    /// Frame-end event: flushes any buffered primitives and lets the
    /// backend present.
    pub fn end_frame(&mut self) {
        self.flush_batch();
        self.backend.present();
    }
}
