//! Host-to-local transfers.
//!
//! Transfer data arrives either through HWREG writes or through the bulk
//! [`Gs::transfer_write`] path. Both append to the same staging buffer;
//! once a whole rectangle's worth of bytes is staged,
//! [`Gs::process_host_to_local_transfer`] stores it into local memory in
//! the destination format's tiled layout.

use log::{debug, error, trace, warn};
use num_traits::FromPrimitive;

use super::registers::{
    BitBlitBuffer, PixelStorageFormat, PixelTransmissionOrder, Register, TransmissionDirection,
    TransmissionPosition, TransmissionSize,
};
use super::{Gs, GsError};
use crate::bits::Bits;

fn bits_per_pixel(format: PixelStorageFormat) -> Option<usize> {
    match format {
        PixelStorageFormat::Psmct32 | PixelStorageFormat::Psmz32 => Some(32),
        PixelStorageFormat::Psmct16 | PixelStorageFormat::Psmct16s => Some(16),
        PixelStorageFormat::Psmt8 => Some(8),
        PixelStorageFormat::Psmt4 => Some(4),
        _ => None,
    }
}

impl Gs {
    /// TRXDIR write. Restarts the transfer cursor; stale staged bytes from
    /// an aborted transfer are dropped.
    pub(super) fn transmission_activated(&mut self, data: u64) {
        debug!("transmission activation {:#x}", data.bits(0..=1));
        self.transfer_buffer.clear();

        let direction = TransmissionDirection::from_u64(data.bits(0..=1))
            .unwrap_or(TransmissionDirection::Deactivated);
        if direction == TransmissionDirection::HostToLocal {
            let blit = BitBlitBuffer::from(self.registers[Register::BitBlitBuffer]);
            if bits_per_pixel(blit.destination_pixel_storage_format).is_none() {
                warn!(
                    "host-to-local transmission activated with unsupported format {}, data will be dropped",
                    blit.destination_pixel_storage_format
                );
            }
        }
    }

    /// HWREG write. Stages eight bytes when a host-to-local transmission
    /// is active and processes the transfer once the staged data covers
    /// the whole TRXREG rectangle. Data for destination formats without a
    /// tiled store is dropped instead of staged.
    pub(super) fn transmission_data(&mut self, data: u64) {
        let direction = TransmissionDirection::from_u64(
            self.registers[Register::TransmissionActivation].bits(0..=1),
        )
        .unwrap_or(TransmissionDirection::Deactivated);
        if direction != TransmissionDirection::HostToLocal {
            trace!("data port write with transmission direction {direction:?} dropped");
            return;
        }

        let blit = BitBlitBuffer::from(self.registers[Register::BitBlitBuffer]);
        let Some(bits) = bits_per_pixel(blit.destination_pixel_storage_format) else {
            trace!(
                "data port write for unsupported format {} dropped",
                blit.destination_pixel_storage_format
            );
            return;
        };

        self.transfer_buffer.extend_from_slice(&data.to_le_bytes());

        let size = TransmissionSize::from(self.registers[Register::TransmissionSize]);
        let expected = size.width as usize * size.height as usize * bits / 8;
        if self.transfer_buffer.len() >= expected {
            if let Err(transfer_error) = self.process_host_to_local_transfer() {
                error!("host-to-local transfer failed: {transfer_error}");
            }
        }
    }

    /// Marks the start of a bulk transfer. Staged bytes from an earlier
    /// unfinished transfer are discarded and reported.
    pub fn begin_transfer_write(&mut self) -> Result<(), GsError> {
        if !self.transfer_buffer.is_empty() {
            let pending = self.transfer_buffer.len();
            self.transfer_buffer.clear();
            return Err(GsError::TransferInProgress { pending });
        }
        Ok(())
    }

    /// Appends one chunk of transfer data to the staging buffer.
    pub fn transfer_write(&mut self, data: &[u8]) {
        self.transfer_buffer.extend_from_slice(data);
    }

    /// Stores the staged bytes into local memory at the position and in
    /// the format the BITBLTBUF/TRXPOS/TRXREG descriptors select. The
    /// staging buffer is consumed even when the format is unsupported.
    pub fn process_host_to_local_transfer(&mut self) -> Result<(), GsError> {
        let data = std::mem::take(&mut self.transfer_buffer);
        let blit = BitBlitBuffer::from(self.registers[Register::BitBlitBuffer]);
        let position = TransmissionPosition::from(self.registers[Register::TransmissionPosition]);
        let size = TransmissionSize::from(self.registers[Register::TransmissionSize]);

        if size.width == 0 {
            warn!("host-to-local transfer with zero width dropped");
            return Ok(());
        }
        if position.order != PixelTransmissionOrder::UpperLeftToLowerRight {
            warn!(
                "host-to-local transfer with unimplemented order {:?}, storing upper-left to lower-right",
                position.order
            );
        }

        debug!(
            "host-to-local transfer: {} bytes, {}x{} at ({}, {}), {}",
            data.len(),
            size.width,
            size.height,
            position.destination_x,
            position.destination_y,
            blit.destination_pixel_storage_format,
        );

        let base = blit.destination_base_pointer;
        let stride = blit.destination_width;
        let pixel_count = size.width as usize * size.height as usize;
        let destination = |index: usize| {
            let x = (position.destination_x as usize + index % size.width as usize) % 2048;
            let y = (position.destination_y as usize + index / size.width as usize) % 2048;
            (x as u16, y as u16)
        };

        match blit.destination_pixel_storage_format {
            PixelStorageFormat::Psmct32 => {
                for (index, chunk) in data.chunks_exact(4).take(pixel_count).enumerate() {
                    let (x, y) = destination(index);
                    let value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    self.write_psmct32(base, x, y, stride, value);
                }
            }
            PixelStorageFormat::Psmz32 => {
                for (index, chunk) in data.chunks_exact(4).take(pixel_count).enumerate() {
                    let (x, y) = destination(index);
                    let value = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
                    self.write_psmz32(base, x, y, stride, value);
                }
            }
            PixelStorageFormat::Psmct16 => {
                for (index, chunk) in data.chunks_exact(2).take(pixel_count).enumerate() {
                    let (x, y) = destination(index);
                    let value = u16::from_le_bytes([chunk[0], chunk[1]]);
                    self.write_psmct16(base, x, y, stride, value);
                }
            }
            PixelStorageFormat::Psmct16s => {
                for (index, chunk) in data.chunks_exact(2).take(pixel_count).enumerate() {
                    let (x, y) = destination(index);
                    let value = u16::from_le_bytes([chunk[0], chunk[1]]);
                    self.write_psmct16s(base, x, y, stride, value);
                }
            }
            PixelStorageFormat::Psmt8 => {
                for (index, &value) in data.iter().take(pixel_count).enumerate() {
                    let (x, y) = destination(index);
                    self.write_psmt8(base, x, y, stride, value);
                }
            }
            PixelStorageFormat::Psmt4 => {
                // Two pixels per staged byte, low nibble first.
                for index in 0..(data.len() * 2).min(pixel_count) {
                    let (x, y) = destination(index);
                    let value = data[index / 2] >> (index % 2 * 4) & 0xF;
                    self.write_psmt4(base, x, y, stride, value);
                }
            }
            format => {
                return Err(GsError::UnsupportedFormat {
                    format,
                    operation: "host-to-local transfer",
                })
            }
        }
        Ok(())
    }
}
