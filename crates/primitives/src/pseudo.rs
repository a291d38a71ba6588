//! Pseudo-address generation.
//!
//! For a base address, every bin `i` and every suffix `j` in `0..2^k`, a
//! pseudo-address is built by:
//!
//! 1. copying the base,
//! 2. flipping logical bit `i` (so the result shares exactly `i` leading bits
//!    with the base),
//! 3. writing the `k` bits of `j`, most significant first, into positions
//!    `i + 1 ..= i + k`,
//! 4. clearing every bit from `i + k + 1` to the end.
//!
//! The output is deterministic and allocation is the only side effect, so
//! generation runs on any thread without coordination.
//!
//! # Truncation
//!
//! Suffix bits that would land past the last address bit are dropped; there
//! is no wraparound. With `MAX_BINS` equal to the address width, the last `k`
//! bins therefore carry a truncated suffix and `pseudo[i][j1]` may equal
//! `pseudo[i][j2]` for those bins. [`PseudoAddressGenerator::generate`]
//! accepts this; [`PseudoAddressGenerator::generate_uniform`] rejects any
//! request that would truncate.

use crate::{ADDRESS_BITS, Address, AddressError, MAX_BINS, bits::MsbBits};

/// Largest supported suffix length in bits.
pub const MAX_SUFFIX_LENGTH: u8 = 8;

/// Writes the pseudo-address for (`bin`, `suffix`) over `buf`, which holds the base.
fn write_pseudo(buf: &mut [u8], bin: usize, suffix: u32, suffix_length: u8) {
    let k = usize::from(suffix_length);

    buf.flip_bit(bin);

    for offset in 0..k {
        let value = (suffix >> (k - 1 - offset)) & 1 == 1;
        buf.set_bit(bin + 1 + offset, value);
    }

    buf.clear_from(bin + 1 + k);
}

/// Pseudo-address for (`bin`, `suffix`) over a base of any byte length.
///
/// Bits of `suffix` above `suffix_length` are ignored. Keep
/// `bin < base.len() * 8`: past the end no bit is flipped and the result
/// only has its tail cleared. Suffixes longer than [`MAX_SUFFIX_LENGTH`]
/// are rejected.
pub fn pseudo_address_bytes(
    base: &[u8],
    bin: usize,
    suffix: u32,
    suffix_length: u8,
) -> Result<Vec<u8>, AddressError> {
    check_suffix_length(suffix_length)?;
    let mut out = base.to_vec();
    write_pseudo(&mut out, bin, suffix, suffix_length);
    Ok(out)
}

fn check_suffix_length(suffix_length: u8) -> Result<(), AddressError> {
    if suffix_length > MAX_SUFFIX_LENGTH {
        return Err(AddressError::InvalidSuffixLength {
            suffix_length,
            max: MAX_SUFFIX_LENGTH,
        });
    }
    Ok(())
}

/// Generates the full `MAX_BINS x 2^k` pseudo-address grid for `base`.
///
/// The last `suffix_length` bins are truncated, see the module docs.
pub fn generate_pseudo_addresses(
    base: &Address,
    suffix_length: u8,
) -> Result<Vec<Vec<Address>>, AddressError> {
    Ok(PseudoAddressGenerator::new(suffix_length)?.generate(base))
}

/// Stateless pseudo-address generator parameterised by suffix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PseudoAddressGenerator {
    suffix_length: u8,
}

impl PseudoAddressGenerator {
    /// Create a generator producing `2^suffix_length` addresses per bin.
    pub fn new(suffix_length: u8) -> Result<Self, AddressError> {
        check_suffix_length(suffix_length)?;
        Ok(Self { suffix_length })
    }

    /// Suffix length in bits.
    pub const fn suffix_length(&self) -> u8 {
        self.suffix_length
    }

    /// Number of suffix values per bin (`2^k`).
    pub const fn suffixes(&self) -> u32 {
        1 << self.suffix_length
    }

    /// Highest bin count for which every bin gets the full suffix.
    pub const fn uniform_bins(&self) -> u16 {
        MAX_BINS - self.suffix_length as u16
    }

    /// The pseudo-address at (`bin`, `suffix`).
    ///
    /// Returns `None` if `bin` is not a valid bin or `suffix` does not fit in
    /// the suffix length.
    pub fn address(&self, base: &Address, bin: u16, suffix: u32) -> Option<Address> {
        if bin >= MAX_BINS || suffix >= self.suffixes() {
            return None;
        }
        Some(self.address_unchecked(base, bin, suffix))
    }

    fn address_unchecked(&self, base: &Address, bin: u16, suffix: u32) -> Address {
        let mut bytes = *base.as_bytes();
        write_pseudo(&mut bytes, usize::from(bin), suffix, self.suffix_length);
        Address::new(bytes)
    }

    /// All `2^k` pseudo-addresses of one bin, ordered by suffix.
    ///
    /// Empty if `bin` is not a valid bin.
    pub fn bin(&self, base: &Address, bin: u16) -> Vec<Address> {
        if bin >= MAX_BINS {
            return Vec::new();
        }
        (0..self.suffixes())
            .map(|suffix| self.address_unchecked(base, bin, suffix))
            .collect()
    }

    /// The full grid, indexed `[bin][suffix]`, covering every bin.
    ///
    /// Bins `MAX_BINS - k ..` carry truncated suffixes.
    pub fn generate(&self, base: &Address) -> Vec<Vec<Address>> {
        (0..MAX_BINS).map(|bin| self.bin(base, bin)).collect()
    }

    /// The grid for bins `0..bins`, requiring every bin to carry the full suffix.
    pub fn generate_uniform(
        &self,
        base: &Address,
        bins: u16,
    ) -> Result<Vec<Vec<Address>>, AddressError> {
        if usize::from(bins) + usize::from(self.suffix_length) > ADDRESS_BITS {
            return Err(AddressError::UniformCoverageExceeded {
                bins,
                suffix_length: self.suffix_length,
                bit_len: ADDRESS_BITS,
            });
        }
        Ok((0..bins).map(|bin| self.bin(base, bin)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proximity_bytes;

    #[test]
    fn test_toy_scenario() {
        // 8 bins, 2 suffix bits, 1-byte base
        let out = pseudo_address_bytes(&[0b0000_0000], 3, 0b10, 2).unwrap();
        // bit 3 flipped, bits 4-5 = 10, bits 6-7 cleared
        assert_eq!(out, vec![0b0001_1000]);
    }

    #[test]
    fn test_toy_grid() {
        let base = [0b1010_0110u8];
        for bin in 0..8usize {
            for suffix in 0..4u32 {
                let out = pseudo_address_bytes(&base, bin, suffix, 2).unwrap();
                assert_eq!(proximity_bytes(&base, &out), bin, "bin {bin} suffix {suffix}");
                assert_ne!(out.bit(bin), base.bit(bin));
                for pos in (bin + 3)..8 {
                    assert!(!out.bit(pos), "bit {pos} of bin {bin} not cleared");
                }
            }
        }
    }

    #[test]
    fn test_toy_truncation() {
        // bin 7 has no room for a suffix, bin 6 keeps only the high suffix bit
        let base = [0u8];
        assert_eq!(pseudo_address_bytes(&base, 7, 0b11, 2).unwrap(), vec![0b0000_0001]);
        assert_eq!(pseudo_address_bytes(&base, 6, 0b10, 2).unwrap(), vec![0b0000_0011]);
        assert_eq!(pseudo_address_bytes(&base, 6, 0b11, 2).unwrap(), vec![0b0000_0011]);
        assert_eq!(pseudo_address_bytes(&base, 6, 0b01, 2).unwrap(), vec![0b0000_0010]);
    }

    #[test]
    fn test_rejects_oversized_suffix() {
        let err = pseudo_address_bytes(&[0u8; 32], 0, 1, 40).unwrap_err();
        assert_eq!(err, AddressError::InvalidSuffixLength { suffix_length: 40, max: 8 });
        assert!(pseudo_address_bytes(&[0u8; 32], 0, 1, MAX_SUFFIX_LENGTH + 1).is_err());
        assert!(pseudo_address_bytes(&[0u8; 32], 0, 1, MAX_SUFFIX_LENGTH).is_ok());
    }

    #[test]
    fn test_clears_base_tail() {
        let base = [0xffu8; 2];
        let out = pseudo_address_bytes(&base, 2, 0b1, 1).unwrap();
        // 11 0 1 then zeros
        assert_eq!(out, vec![0b1101_0000, 0]);
    }

    #[test]
    fn test_grid_shape() {
        let generator = PseudoAddressGenerator::new(3).unwrap();
        let grid = generator.generate(&Address::ZERO);
        assert_eq!(grid.len(), usize::from(MAX_BINS));
        assert!(grid.iter().all(|row| row.len() == 8));
    }

    #[test]
    fn test_zero_suffix_length() {
        let generator = PseudoAddressGenerator::new(0).unwrap();
        let base = Address::ZERO;
        let row = generator.bin(&base, 0);
        assert_eq!(row.len(), 1);
        let mut expected = [0u8; 32];
        expected[0] = 0x80;
        assert_eq!(row[0], Address::new(expected));
    }

    #[test]
    fn test_generated_proximity_and_distinctness() {
        let base = Address::new(std::array::from_fn(|i| (i as u8).wrapping_mul(37) ^ 0x5c));
        let generator = PseudoAddressGenerator::new(2).unwrap();
        let grid = generator.generate_uniform(&base, generator.uniform_bins()).unwrap();

        for (bin, row) in grid.iter().enumerate() {
            for addr in row {
                assert_eq!(usize::from(base.proximity(addr)), bin);
            }
            let mut unique = row.clone();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), row.len(), "duplicate in bin {bin}");
        }
    }

    #[test]
    fn test_truncated_bins_keep_proximity() {
        let base = Address::ZERO;
        let generator = PseudoAddressGenerator::new(4).unwrap();
        let last = generator.bin(&base, MAX_BINS - 1);
        assert!(last.iter().all(|a| base.proximity(a) == MAX_BINS - 1));
        // no suffix room left: every entry collapses to the same address
        assert!(last.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_address_bounds() {
        let generator = PseudoAddressGenerator::new(2).unwrap();
        assert!(generator.address(&Address::ZERO, 0, 3).is_some());
        assert!(generator.address(&Address::ZERO, 0, 4).is_none());
        assert!(generator.address(&Address::ZERO, MAX_BINS, 0).is_none());
        assert!(generator.bin(&Address::ZERO, MAX_BINS).is_empty());
    }

    #[test]
    fn test_invalid_suffix_length() {
        assert_eq!(
            PseudoAddressGenerator::new(9),
            Err(AddressError::InvalidSuffixLength {
                suffix_length: 9,
                max: MAX_SUFFIX_LENGTH
            })
        );
        assert!(generate_pseudo_addresses(&Address::ZERO, 9).is_err());
    }

    #[test]
    fn test_uniform_coverage_exceeded() {
        let generator = PseudoAddressGenerator::new(2).unwrap();
        assert_eq!(
            generator.generate_uniform(&Address::ZERO, MAX_BINS),
            Err(AddressError::UniformCoverageExceeded {
                bins: MAX_BINS,
                suffix_length: 2,
                bit_len: 256
            })
        );
        assert_eq!(
            generator
                .generate_uniform(&Address::ZERO, MAX_BINS - 2)
                .unwrap()
                .len(),
            254
        );
    }
}
