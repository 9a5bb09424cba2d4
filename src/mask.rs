use bitvec::prelude::*;

/// Bit-packed classification mask aligned to the rectified image grid.
///
/// Stored row-major, one bit per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    width: u32,
    height: u32,
    bits: BitVec,
}

impl BinaryMask {
    pub fn new(width: u32, height: u32) -> BinaryMask {
        BinaryMask {
            width,
            height,
            bits: bitvec![0; width as usize * height as usize],
        }
    }

    /// Builds a mask from a row-major bit vector. Returns `None` if the length
    /// does not match `width * height`.
    pub fn from_bits(width: u32, height: u32, bits: BitVec) -> Option<BinaryMask> {
        if bits.len() != width as usize * height as usize {
            return None;
        }
        Some(BinaryMask {
            width,
            height,
            bits,
        })
    }

    /// Caller guarantees one bit per pixel.
    pub(crate) fn from_raw(width: u32, height: u32, bits: BitVec) -> BinaryMask {
        debug_assert_eq!(bits.len(), width as usize * height as usize);
        BinaryMask {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, col: u32, row: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }

    pub fn get(&self, col: u32, row: u32) -> bool {
        self.bits[self.index(col, row)]
    }

    pub fn set(&mut self, col: u32, row: u32, on: bool) {
        let idx = self.index(col, row);
        self.bits.set(idx, on);
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.not_any()
    }

    /// `(col, row)` of every set pixel, in row-major scan order.
    pub fn iter_ones(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let w = self.width as usize;
        self.bits
            .iter_ones()
            .map(move |idx| ((idx % w) as u32, (idx / w) as u32))
    }
}
