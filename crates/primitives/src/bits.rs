//! Logical bit addressing over byte strings.
//!
//! Bit `0` is the most significant bit of byte `0` and bit `8 * len - 1` is
//! the least significant bit of the last byte. Proximity and pseudo-address
//! generation both go through this trait so the two always agree on which
//! bit is which.
//!
//! Writes past the end of the slice are ignored rather than wrapped.

/// MSB-first bit access on a byte sequence.
pub trait MsbBits {
    /// Number of addressable bits.
    fn bit_len(&self) -> usize;

    /// Returns the bit at logical `index`, or `false` past the end.
    fn bit(&self, index: usize) -> bool;

    /// Sets the bit at logical `index` to `value`.
    fn set_bit(&mut self, index: usize, value: bool);

    /// Inverts the bit at logical `index`.
    fn flip_bit(&mut self, index: usize);

    /// Clears every bit from logical `index` through the end.
    fn clear_from(&mut self, index: usize);

    /// Number of leading bits shared with `other`.
    ///
    /// Equals the shorter bit length when one sequence is a prefix of the other.
    fn common_prefix_len(&self, other: &Self) -> usize;
}

/// Byte offset and in-byte mask of a logical bit.
#[inline(always)]
const fn locate(index: usize) -> (usize, u8) {
    (index / 8, 0x80 >> (index % 8))
}

impl MsbBits for [u8] {
    #[inline]
    fn bit_len(&self) -> usize {
        self.len() * 8
    }

    #[inline]
    fn bit(&self, index: usize) -> bool {
        let (byte, mask) = locate(index);
        self.get(byte).is_some_and(|b| b & mask != 0)
    }

    #[inline]
    fn set_bit(&mut self, index: usize, value: bool) {
        let (byte, mask) = locate(index);
        if let Some(b) = self.get_mut(byte) {
            if value {
                *b |= mask;
            } else {
                *b &= !mask;
            }
        }
    }

    #[inline]
    fn flip_bit(&mut self, index: usize) {
        let (byte, mask) = locate(index);
        if let Some(b) = self.get_mut(byte) {
            *b ^= mask;
        }
    }

    fn clear_from(&mut self, index: usize) {
        let byte = index / 8;
        // keep the `index % 8` high bits of the partial byte
        let keep = !(0xffu8 >> (index % 8));
        if let Some(b) = self.get_mut(byte) {
            *b &= keep;
        }
        for b in self.iter_mut().skip(byte + 1) {
            *b = 0;
        }
    }

    fn common_prefix_len(&self, other: &Self) -> usize {
        for (i, (x, y)) in self.iter().zip(other.iter()).enumerate() {
            let diff = x ^ y;
            if diff != 0 {
                return i * 8 + diff.leading_zeros() as usize;
            }
        }
        self.len().min(other.len()) * 8
    }
}
