//! Block-tiled addressing of GS local memory.
//!
//! Local memory is organized in 8 KiB pages of 32 256-byte blocks; each
//! pixel storage format arranges pages, blocks and pixels-within-block in
//! its own order. The functions here map logical (x, y) coordinates plus a
//! buffer base and stride to physical byte addresses. They are pure; all
//! state lives in the caller.

use super::{Gs, LOCAL_MEMORY_SIZE};

const PAGE_BYTES: u32 = 8192;
const BLOCK_BYTES: u32 = 256;

// Coordinates wrap at 2048 in both axes, like the address calculators in
// the real rasterizer.
fn wrap(x: u16, y: u16) -> (u32, u32) {
    (x as u32 % 2048, y as u32 % 2048)
}

// Block layout shared by PSMCT32/PSMZ32 (8x4 blocks of 8x8 pixels) and
// PSMT8 (8x4 blocks of 16x16 pixels).
fn block_ct32(bx: u32, by: u32) -> u32 {
    (bx & 1) | (by & 1) << 1 | (bx & 2) << 1 | (by & 2) << 2 | (bx & 4) << 2
}

// Block layout shared by PSMCT16 (4x8 blocks of 16x8) and PSMT4
// (4x8 blocks of 32x16).
fn block_ct16(bx: u32, by: u32) -> u32 {
    (by & 1) | (bx & 1) << 1 | (by & 2) << 1 | (bx & 2) << 2 | (by & 4) << 2
}

fn block_ct16s(bx: u32, by: u32) -> u32 {
    (by & 1) | (bx & 1) << 1 | (by & 4) | (by & 2) << 2 | (bx & 2) << 3
}

// Word index of a pixel inside an 8x8 32-bit block.
fn column_word_32(x: u32, y: u32) -> u32 {
    (x & 1) | (y & 1) << 1 | (x & 2) << 1 | (x & 4) << 1 | (y & 2) << 3 | (y & 4) << 3
}

// Halfword index of a pixel inside a 16x8 16-bit block.
fn column_halfword_16(x: u32, y: u32) -> u32 {
    (x & 8) >> 3
        | (x & 1) << 1
        | (y & 1) << 2
        | (x & 2) << 2
        | (x & 4) << 2
        | (y & 2) << 4
        | (y & 4) << 4
}

// Byte index of a pixel inside a 16x16 8-bit block. Bit 5 of the address
// alternates with the column parity (y bits 1 and 2).
fn column_byte_8(x: u32, y: u32) -> u32 {
    let flip = (x >> 2 ^ y >> 1 ^ y >> 2) & 1;
    (y & 2) >> 1
        | (x & 8) >> 2
        | (x & 1) << 2
        | (y & 1) << 3
        | (x & 2) << 3
        | flip << 5
        | (y & 4) << 4
        | (y & 8) << 4
}

// Nibble index of a pixel inside a 32x16 4-bit block, with the same
// column-parity flip as the 8-bit layout one bit higher.
fn column_nibble_4(x: u32, y: u32) -> u32 {
    let flip = (x >> 2 ^ y >> 1 ^ y >> 2) & 1;
    (y & 2) >> 1
        | (x & 8) >> 2
        | (x & 16) >> 2
        | (x & 1) << 3
        | (y & 1) << 4
        | (x & 2) << 4
        | flip << 6
        | (y & 4) << 5
        | (y & 8) << 5
}

/// PSMCT32 / PSMCT24: 64x32 pages, 8x8 blocks, 4 bytes per pixel.
pub fn psmct32_offset(x: u16, y: u16, width: u16) -> u32 {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 64).max(1);
    let page = (y / 32) * pages_per_row + x / 64;
    let block = block_ct32((x % 64) / 8, (y % 32) / 8);
    page * PAGE_BYTES + block * BLOCK_BYTES + column_word_32(x % 8, y % 8) * 4
}

/// PSMZ32 / PSMZ24: the PSMCT32 layout with the block index bits 3 and 4
/// inverted.
pub fn psmz32_offset(x: u16, y: u16, width: u16) -> u32 {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 64).max(1);
    let page = (y / 32) * pages_per_row + x / 64;
    let block = block_ct32((x % 64) / 8, (y % 32) / 8) ^ 0x18;
    page * PAGE_BYTES + block * BLOCK_BYTES + column_word_32(x % 8, y % 8) * 4
}

/// PSMCT16: 64x64 pages, 16x8 blocks, 2 bytes per pixel.
pub fn psmct16_offset(x: u16, y: u16, width: u16) -> u32 {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 64).max(1);
    let page = (y / 64) * pages_per_row + x / 64;
    let block = block_ct16((x % 64) / 16, (y % 64) / 8);
    page * PAGE_BYTES + block * BLOCK_BYTES + column_halfword_16(x % 16, y % 8) * 2
}

/// PSMCT16S: PSMCT16 with a different block ordering.
pub fn psmct16s_offset(x: u16, y: u16, width: u16) -> u32 {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 64).max(1);
    let page = (y / 64) * pages_per_row + x / 64;
    let block = block_ct16s((x % 64) / 16, (y % 64) / 8);
    page * PAGE_BYTES + block * BLOCK_BYTES + column_halfword_16(x % 16, y % 8) * 2
}

/// PSMT8: 128x64 pages, 16x16 blocks, 1 byte per pixel.
pub fn psmt8_offset(x: u16, y: u16, width: u16) -> u32 {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 128).max(1);
    let page = (y / 64) * pages_per_row + x / 128;
    let block = block_ct32((x % 128) / 16, (y % 64) / 16);
    page * PAGE_BYTES + block * BLOCK_BYTES + column_byte_8(x % 16, y % 16)
}

/// PSMT4: 128x128 pages, 32x16 blocks, a nibble per pixel. Returns the
/// byte address and the shift of the nibble within it.
pub fn psmt4_offset(x: u16, y: u16, width: u16) -> (u32, u32) {
    let (x, y) = wrap(x, y);
    let pages_per_row = (width as u32 / 128).max(1);
    let page = (y / 128) * pages_per_row + x / 128;
    let block = block_ct16((x % 128) / 32, (y % 128) / 16);
    let nibble = column_nibble_4(x % 32, y % 16);
    (
        page * PAGE_BYTES + block * BLOCK_BYTES + nibble / 2,
        (nibble & 1) * 4,
    )
}

impl Gs {
    // Base pointers are not required to be aligned, so accesses wrap per
    // byte rather than per element.
    fn read_u32(&self, address: u32) -> u32 {
        let mut bytes = [0; 4];
        for (offset, byte) in bytes.iter_mut().enumerate() {
            *byte = self.local_memory[(address as usize + offset) % LOCAL_MEMORY_SIZE];
        }
        u32::from_le_bytes(bytes)
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        for (offset, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.local_memory[(address as usize + offset) % LOCAL_MEMORY_SIZE] = byte;
        }
    }

    fn read_u16(&self, address: u32) -> u16 {
        u16::from_le_bytes([
            self.local_memory[address as usize % LOCAL_MEMORY_SIZE],
            self.local_memory[(address as usize + 1) % LOCAL_MEMORY_SIZE],
        ])
    }

    fn write_u16(&mut self, address: u32, value: u16) {
        let [low, high] = value.to_le_bytes();
        self.local_memory[address as usize % LOCAL_MEMORY_SIZE] = low;
        self.local_memory[(address as usize + 1) % LOCAL_MEMORY_SIZE] = high;
    }

    pub fn read_psmct32(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u32 {
        self.read_u32(base_pointer.wrapping_add(psmct32_offset(x, y, width)))
    }

    pub fn write_psmct32(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u32) {
        self.write_u32(base_pointer.wrapping_add(psmct32_offset(x, y, width)), value);
    }

    pub fn read_psmz32(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u32 {
        self.read_u32(base_pointer.wrapping_add(psmz32_offset(x, y, width)))
    }

    pub fn write_psmz32(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u32) {
        self.write_u32(base_pointer.wrapping_add(psmz32_offset(x, y, width)), value);
    }

    pub fn read_psmct16(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u16 {
        self.read_u16(base_pointer.wrapping_add(psmct16_offset(x, y, width)))
    }

    pub fn write_psmct16(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u16) {
        self.write_u16(base_pointer.wrapping_add(psmct16_offset(x, y, width)), value);
    }

    pub fn read_psmct16s(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u16 {
        self.read_u16(base_pointer.wrapping_add(psmct16s_offset(x, y, width)))
    }

    pub fn write_psmct16s(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u16) {
        self.write_u16(base_pointer.wrapping_add(psmct16s_offset(x, y, width)), value);
    }

    pub fn read_psmt8(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u8 {
        let address = base_pointer.wrapping_add(psmt8_offset(x, y, width));
        self.local_memory[address as usize % LOCAL_MEMORY_SIZE]
    }

    pub fn write_psmt8(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u8) {
        let address = base_pointer.wrapping_add(psmt8_offset(x, y, width));
        self.local_memory[address as usize % LOCAL_MEMORY_SIZE] = value;
    }

    pub fn read_psmt4(&self, base_pointer: u32, x: u16, y: u16, width: u16) -> u8 {
        let (offset, shift) = psmt4_offset(x, y, width);
        let address = base_pointer.wrapping_add(offset) as usize % LOCAL_MEMORY_SIZE;
        (self.local_memory[address] >> shift) & 0xF
    }

    pub fn write_psmt4(&mut self, base_pointer: u32, x: u16, y: u16, width: u16, value: u8) {
        let (offset, shift) = psmt4_offset(x, y, width);
        let address = base_pointer.wrapping_add(offset) as usize % LOCAL_MEMORY_SIZE;
        let byte = &mut self.local_memory[address];
        *byte = (*byte & !(0xF << shift)) | ((value & 0xF) << shift);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Block and pixel orderings below are the GS layout tables as
    // documented in the hardware manual.

    const BLOCKS_CT32: [[u32; 8]; 4] = [
        [0, 1, 4, 5, 16, 17, 20, 21],
        [2, 3, 6, 7, 18, 19, 22, 23],
        [8, 9, 12, 13, 24, 25, 28, 29],
        [10, 11, 14, 15, 26, 27, 30, 31],
    ];

    const BLOCKS_Z32: [[u32; 8]; 4] = [
        [24, 25, 28, 29, 8, 9, 12, 13],
        [26, 27, 30, 31, 10, 11, 14, 15],
        [16, 17, 20, 21, 0, 1, 4, 5],
        [18, 19, 22, 23, 2, 3, 6, 7],
    ];

    const BLOCKS_CT16: [[u32; 4]; 8] = [
        [0, 2, 8, 10],
        [1, 3, 9, 11],
        [4, 6, 12, 14],
        [5, 7, 13, 15],
        [16, 18, 24, 26],
        [17, 19, 25, 27],
        [20, 22, 28, 30],
        [21, 23, 29, 31],
    ];

    const BLOCKS_CT16S: [[u32; 4]; 8] = [
        [0, 2, 16, 18],
        [1, 3, 17, 19],
        [8, 10, 24, 26],
        [9, 11, 25, 27],
        [4, 6, 20, 22],
        [5, 7, 21, 23],
        [12, 14, 28, 30],
        [13, 15, 29, 31],
    ];

    const COLUMN_CT32: [[u32; 8]; 8] = [
        [0, 1, 4, 5, 8, 9, 12, 13],
        [2, 3, 6, 7, 10, 11, 14, 15],
        [16, 17, 20, 21, 24, 25, 28, 29],
        [18, 19, 22, 23, 26, 27, 30, 31],
        [32, 33, 36, 37, 40, 41, 44, 45],
        [34, 35, 38, 39, 42, 43, 46, 47],
        [48, 49, 52, 53, 56, 57, 60, 61],
        [50, 51, 54, 55, 58, 59, 62, 63],
    ];

    const COLUMN_CT16: [[u32; 16]; 8] = [
        [0, 2, 8, 10, 16, 18, 24, 26, 1, 3, 9, 11, 17, 19, 25, 27],
        [4, 6, 12, 14, 20, 22, 28, 30, 5, 7, 13, 15, 21, 23, 29, 31],
        [32, 34, 40, 42, 48, 50, 56, 58, 33, 35, 41, 43, 49, 51, 57, 59],
        [36, 38, 44, 46, 52, 54, 60, 62, 37, 39, 45, 47, 53, 55, 61, 63],
        [64, 66, 72, 74, 80, 82, 88, 90, 65, 67, 73, 75, 81, 83, 89, 91],
        [68, 70, 76, 78, 84, 86, 92, 94, 69, 71, 77, 79, 85, 87, 93, 95],
        [96, 98, 104, 106, 112, 114, 120, 122, 97, 99, 105, 107, 113, 115, 121, 123],
        [100, 102, 108, 110, 116, 118, 124, 126, 101, 103, 109, 111, 117, 119, 125, 127],
    ];

    #[test]
    fn psmct32_matches_layout_tables() {
        for y in 0..32u16 {
            for x in 0..64u16 {
                let expected = BLOCKS_CT32[y as usize / 8][x as usize / 8] * 256
                    + COLUMN_CT32[y as usize % 8][x as usize % 8] * 4;
                assert_eq!(psmct32_offset(x, y, 64), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn psmz32_matches_layout_tables() {
        for y in 0..32u16 {
            for x in 0..64u16 {
                let expected = BLOCKS_Z32[y as usize / 8][x as usize / 8] * 256
                    + COLUMN_CT32[y as usize % 8][x as usize % 8] * 4;
                assert_eq!(psmz32_offset(x, y, 64), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn psmct16_matches_layout_tables() {
        for y in 0..64u16 {
            for x in 0..64u16 {
                let expected = BLOCKS_CT16[y as usize / 8][x as usize / 16] * 256
                    + COLUMN_CT16[y as usize % 8][x as usize % 16] * 2;
                assert_eq!(psmct16_offset(x, y, 64), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn psmct16s_matches_layout_tables() {
        for y in 0..64u16 {
            for x in 0..64u16 {
                let expected = BLOCKS_CT16S[y as usize / 8][x as usize / 16] * 256
                    + COLUMN_CT16[y as usize % 8][x as usize % 16] * 2;
                assert_eq!(psmct16s_offset(x, y, 64), expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn psmt8_known_addresses() {
        // Anchor pixels of the 16x16 column layout.
        for (x, y, expected) in [
            (0u16, 0u16, 0u32),
            (1, 0, 4),
            (2, 0, 16),
            (3, 0, 20),
            (4, 0, 32),
            (7, 0, 52),
            (8, 0, 2),
            (15, 0, 54),
            (0, 1, 8),
            (0, 2, 33),
            (4, 2, 1),
            (0, 4, 96),
            (4, 4, 64),
            (0, 8, 128),
            (4, 8, 160),
            (0, 12, 224),
            (4, 12, 192),
            (15, 15, 255),
        ] {
            assert_eq!(psmt8_offset(x, y, 128), expected, "({x}, {y})");
        }
        // Blocks use the PSMCT32 ordering, 16x16 pixels each.
        assert_eq!(psmt8_offset(16, 0, 128), 256);
        assert_eq!(psmt8_offset(0, 16, 128), 2 * 256);
        assert_eq!(psmt8_offset(64, 0, 128), 16 * 256);
        // Second page starts after 8 KiB.
        assert_eq!(psmt8_offset(0, 64, 128), 8192);
    }

    #[test]
    fn psmt4_known_addresses() {
        // Anchor pixels of the 32x16 column layout, in nibbles.
        for (x, y, expected) in [
            (0u16, 0u16, 0u32),
            (1, 0, 8),
            (2, 0, 32),
            (4, 0, 64),
            (7, 0, 104),
            (8, 0, 2),
            (16, 0, 4),
            (31, 0, 110),
            (0, 1, 16),
            (0, 2, 65),
            (4, 2, 1),
            (0, 4, 192),
            (4, 4, 128),
            (31, 15, 511),
        ] {
            let (byte, shift) = psmt4_offset(x, y, 128);
            assert_eq!(byte * 2 + shift / 4, expected, "({x}, {y})");
        }
        // Blocks use the PSMCT16 ordering, 32x16 pixels each.
        assert_eq!(psmt4_offset(32, 0, 128), (512, 0));
        assert_eq!(psmt4_offset(0, 16, 128), (256, 0));
        assert_eq!(psmt4_offset(0, 32, 128), (2 * 512, 0));
        assert_eq!(psmt4_offset(0, 128, 128), (8192, 0));
    }

    #[test]
    fn page_rows_follow_buffer_width() {
        // Stride 128 pixels: the page right of (0,0) starts at 8 KiB, the
        // page below at 16 KiB.
        assert_eq!(psmct32_offset(64, 0, 128), 8192);
        assert_eq!(psmct32_offset(0, 32, 128), 16384);
        assert_eq!(psmct16_offset(64, 0, 128), 8192);
        assert_eq!(psmct16_offset(0, 64, 128), 16384);
        assert_eq!(psmt8_offset(128, 0, 256), 8192);
        assert_eq!(psmt8_offset(0, 64, 256), 16384);
    }

    #[test]
    fn nibble_accessors_pack_pairs() {
        let mut gs = Gs::with_null_backend();
        // (0, 0) is nibble 0 and (4, 2) nibble 1; they share byte 0.
        gs.write_psmt4(0, 0, 0, 128, 0xA);
        gs.write_psmt4(0, 4, 2, 128, 0x5);
        assert_eq!(gs.read_psmt4(0, 0, 0, 128), 0xA);
        assert_eq!(gs.read_psmt4(0, 4, 2, 128), 0x5);
        assert_eq!(gs.local_memory()[0], 0x5A);
        gs.write_psmt4(0, 0, 0, 128, 0xF);
        assert_eq!(gs.read_psmt4(0, 4, 2, 128), 0x5);
    }

    #[test]
    fn addresses_wrap_at_memory_size() {
        let mut gs = Gs::with_null_backend();
        gs.write_psmct32(LOCAL_MEMORY_SIZE as u32, 0, 0, 64, 0x1234_5678);
        assert_eq!(gs.read_psmct32(0, 0, 0, 64), 0x1234_5678);
    }

    #[test]
    fn unaligned_accesses_wrap_per_byte() {
        let mut gs = Gs::with_null_backend();
        // A base pointer three bytes short of the end straddles the wrap.
        let base = LOCAL_MEMORY_SIZE as u32 - 3;
        gs.write_psmct32(base, 0, 0, 64, 0xAABB_CCDD);
        assert_eq!(gs.read_psmct32(base, 0, 0, 64), 0xAABB_CCDD);
        assert_eq!(gs.local_memory()[LOCAL_MEMORY_SIZE - 1], 0xBB);
        assert_eq!(gs.local_memory()[0], 0xAA);

        gs.write_psmct16(LOCAL_MEMORY_SIZE as u32 - 1, 0, 0, 64, 0x1122);
        assert_eq!(gs.read_psmct16(LOCAL_MEMORY_SIZE as u32 - 1, 0, 0, 64), 0x1122);
    }
}
