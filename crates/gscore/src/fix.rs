use crate::bits::Bits;

/// Unsigned 12.4 fixed-point value, the GS encoding for vertex coordinates
/// and XY offsets. The pixel-space value is the raw value divided by 16.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fix124 {
    raw: u16,
}

impl Fix124 {
    pub fn from_raw(raw: u16) -> Self {
        Fix124 { raw }
    }

    pub fn raw(self) -> u16 {
        self.raw
    }

    pub fn round(self) -> u16 {
        (self.raw + 8).bits(4..16)
    }

    pub fn floor(self) -> u16 {
        self.raw.bits(4..16)
    }

    pub fn ceil(self) -> u16 {
        (self.raw + 15).bits(4..16)
    }
}

impl From<u16> for Fix124 {
    fn from(value: u16) -> Self {
        Fix124 { raw: value << 4 }
    }
}

impl From<Fix124> for f32 {
    fn from(value: Fix124) -> Self {
        value.raw as f32 / 16.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        let x = Fix124::from_raw(0x123); // 18.1875
        assert_eq!(x.floor(), 18);
        assert_eq!(x.ceil(), 19);
        assert_eq!(x.round(), 18);
        assert_eq!(Fix124::from_raw(0x128).round(), 19);
    }

    #[test]
    fn pixel_space() {
        assert_eq!(f32::from(Fix124::from(256)), 256.0);
        assert_eq!(f32::from(Fix124::from_raw(0x18)), 1.5);
    }
}
