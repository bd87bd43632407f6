//! Deswizzling of local memory into linear bitmaps.
//!
//! Frame buffers, depth buffers and textures live in local memory in the
//! block-tiled layouts of their storage formats. The entry points here walk
//! a rectangle in raster order and produce a row-major [`Bitmap`] a host
//! can use directly.

use num_traits::FromPrimitive;

use super::registers::{FrameBufferSettings, PixelStorageFormat, Texture, ZBufferSettings};
use super::{Gs, GsError};

/// Frame and depth buffers have no register describing their height, so
/// read-back always covers the maximum the address space allows.
pub const FRAME_BUFFER_HEIGHT: u16 = 1024;

/// A linear, row-major image decoded from local memory.
///
/// Color and depth data is stored as one little-endian 32-bit word per
/// pixel (red in the low byte, alpha in the high byte). Palette indices
/// are stored one per byte, 4-bit indices zero-extended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u16,
    height: u16,
    bits_per_pixel: u8,
    data: Vec<u8>,
}

impl Bitmap {
    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bit width of the source texels: 32 for color and depth words, 8 or
    /// 4 for palette indices.
    pub fn bits_per_pixel(&self) -> u8 {
        self.bits_per_pixel
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// 32-bit word at (x, y). Meaningful for color and depth bitmaps.
    pub fn pixel(&self, x: u16, y: u16) -> u32 {
        let offset = (y as usize * self.width as usize + x as usize) * 4;
        let bytes = &self.data[offset..offset + 4];
        u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    /// Palette index at (x, y). Meaningful for index bitmaps.
    pub fn index(&self, x: u16, y: u16) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

fn decode_words(
    width: u16,
    height: u16,
    bits_per_pixel: u8,
    mut fetch: impl FnMut(u16, u16) -> u32,
) -> Bitmap {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&fetch(x, y).to_le_bytes());
        }
    }
    Bitmap {
        width,
        height,
        bits_per_pixel,
        data,
    }
}

fn decode_indices(
    width: u16,
    height: u16,
    bits_per_pixel: u8,
    mut fetch: impl FnMut(u16, u16) -> u8,
) -> Bitmap {
    let mut data = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            data.push(fetch(x, y));
        }
    }
    Bitmap {
        width,
        height,
        bits_per_pixel,
        data,
    }
}

/// 1555 -> 8888, replicating the hardware expansion: each 5-bit channel
/// shifts up by 3, the alpha bit selects 0x00 or 0xFF.
fn expand_rgba16(value: u16) -> u32 {
    let value = value as u32;
    let r = (value & 0x1F) << 3;
    let g = (value >> 5 & 0x1F) << 3;
    let b = (value >> 10 & 0x1F) << 3;
    let a = if value & 0x8000 != 0 { 0xFF } else { 0x00 };
    r | g << 8 | b << 16 | a << 24
}

impl Gs {
    /// Decodes the color buffer the given FRAME descriptor points at into
    /// a linear bitmap, [`FRAME_BUFFER_HEIGHT`] rows tall.
    pub fn read_framebuffer(&self, frame: FrameBufferSettings) -> Result<Bitmap, GsError> {
        let base = frame.base_pointer;
        let width = frame.width;
        let height = FRAME_BUFFER_HEIGHT;
        let bitmap = match frame.pixel_storage_format {
            PixelStorageFormat::Psmct32 => {
                decode_words(width, height, 32, |x, y| self.read_psmct32(base, x, y, width))
            }
            PixelStorageFormat::Psmct24 => decode_words(width, height, 32, |x, y| {
                self.read_psmct32(base, x, y, width) & 0x00FF_FFFF
            }),
            PixelStorageFormat::Psmct16 => decode_words(width, height, 32, |x, y| {
                expand_rgba16(self.read_psmct16(base, x, y, width))
            }),
            PixelStorageFormat::Psmct16s => decode_words(width, height, 32, |x, y| {
                expand_rgba16(self.read_psmct16s(base, x, y, width))
            }),
            format => {
                return Err(GsError::UnsupportedFormat {
                    format,
                    operation: "framebuffer read-back",
                })
            }
        };
        Ok(bitmap)
    }

    /// Decodes the depth buffer the given ZBUF descriptor points at. The
    /// frame descriptor supplies the buffer width, which ZBUF lacks.
    pub fn read_depthbuffer(
        &self,
        frame: FrameBufferSettings,
        z_buffer: ZBufferSettings,
    ) -> Result<Bitmap, GsError> {
        let base = z_buffer.base_pointer;
        let width = frame.width;
        let height = FRAME_BUFFER_HEIGHT;
        // ZBUF stores only the low nibble of the depth format.
        let mask = match z_buffer.pixel_storage_format {
            0b0000 => !0,
            0b0001 => 0x00FF_FFFF,
            nibble => {
                return Err(GsError::UnsupportedFormat {
                    format: PixelStorageFormat::from_u64(0b110000 | nibble as u64)
                        .unwrap_or(PixelStorageFormat::Psmz32),
                    operation: "depth buffer read-back",
                })
            }
        };
        Ok(decode_words(width, height, 32, |x, y| {
            self.read_psmz32(base, x, y, width) & mask
        }))
    }

    /// Decodes one mipmap level of the texture a TEX0 descriptor points
    /// at. Levels above 0 read from the TEX0 base as well; the MIPTBP
    /// descriptors are accepted for interface completeness but their
    /// per-level base pointers are not consulted yet.
    pub fn read_texture(
        &self,
        texture: Texture,
        _mip_map_1: u64,
        _mip_map_2: u64,
        mip_level: u8,
    ) -> Result<Bitmap, GsError> {
        let base = texture.base_pointer;
        let stride = texture.buffer_width;
        let width = (texture.width >> mip_level).max(1);
        let height = (texture.height >> mip_level).max(1);
        let bitmap = match texture.pixel_storage_format {
            PixelStorageFormat::Psmct32 => decode_words(width, height, 32, |x, y| {
                self.read_psmct32(base, x, y, stride)
            }),
            PixelStorageFormat::Psmct24 => decode_words(width, height, 32, |x, y| {
                self.read_psmct32(base, x, y, stride) & 0x00FF_FFFF
            }),
            PixelStorageFormat::Psmct16 => decode_words(width, height, 32, |x, y| {
                expand_rgba16(self.read_psmct16(base, x, y, stride))
            }),
            PixelStorageFormat::Psmct16s => decode_words(width, height, 32, |x, y| {
                expand_rgba16(self.read_psmct16s(base, x, y, stride))
            }),
            PixelStorageFormat::Psmt8 => {
                decode_indices(width, height, 8, |x, y| self.read_psmt8(base, x, y, stride))
            }
            PixelStorageFormat::Psmt4 => {
                decode_indices(width, height, 4, |x, y| self.read_psmt4(base, x, y, stride))
            }
            format => {
                return Err(GsError::UnsupportedFormat {
                    format,
                    operation: "texture read-back",
                })
            }
        };
        Ok(bitmap)
    }
}
