use crate::{Address, bits::MsbBits};

// Proximity returns the proximity order of the MSB distance between x and y
//
// The distance metric MSB(x, y) of two equal length bit sequences x an y is the
// value of the binary integer cast of the x^y, ie., x and y bitwise xor-ed.
// the binary cast is big endian: most significant bit first (=MSB).
//
// Proximity(x, y) is a discrete logarithmic scaling of the MSB distance.
// It is calculated by counting the number of common leading zeros in the (MSB)
// binary representation of the x^y.
//
// (0 farthest, 255 closest, 256 self)
#[inline]
pub fn proximity(one: &Address, other: &Address) -> u16 {
    one.proximity(other)
}

/// Proximity over arbitrary byte strings of any length.
///
/// Used where the address width is not the overlay width, e.g. reduced
/// fixtures. Returns the shorter bit length when one input prefixes the other.
#[inline]
pub fn proximity_bytes(one: &[u8], other: &[u8]) -> usize {
    one.common_prefix_len(other)
}
