use std::ops::{Bound, RangeBounds};

/// Bit-range access on unsigned integers. Bit 0 is the least significant
/// bit; ranges follow the usual `start..end` / `start..=end` conventions.
pub trait Bits: Copy {
    fn mask(range: impl RangeBounds<u32>) -> Self;
    fn bits(self, range: impl RangeBounds<u32>) -> Self;
    fn bit(self, index: u32) -> bool;
}

fn bounds(range: impl RangeBounds<u32>, width: u32) -> (u32, u32) {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start + 1,
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end + 1,
        Bound::Excluded(&end) => end,
        Bound::Unbounded => width,
    };
    (start, end)
}

macro_rules! impl_bits {
    ($($ty:ty),*) => {
        $(
            impl Bits for $ty {
                fn mask(range: impl RangeBounds<u32>) -> Self {
                    let (start, end) = bounds(range, Self::BITS);
                    if end - start == Self::BITS {
                        return Self::MAX;
                    }
                    (((1 as Self) << (end - start)) - 1) << start
                }

                fn bits(self, range: impl RangeBounds<u32>) -> Self {
                    let (start, end) = bounds(range, Self::BITS);
                    if end - start == Self::BITS {
                        return self >> start;
                    }
                    (self >> start) & (((1 as Self) << (end - start)) - 1)
                }

                fn bit(self, index: u32) -> bool {
                    (self >> index) & 1 != 0
                }
            }
        )*
    };
}

impl_bits!(u8, u16, u32, u64);
