//! Fixed-length overlay address.

use std::{fmt, str::FromStr};

use alloy_primitives::{B256, U256};

use crate::{AddressError, bits::MsbBits, distance};

/// Length of an overlay address in bytes.
pub const ADDRESS_LENGTH: usize = 32;

/// Length of an overlay address in bits.
pub const ADDRESS_BITS: usize = ADDRESS_LENGTH * 8;

/// Number of proximity bins, one per address bit.
///
/// Valid bin indices are `0..MAX_BINS`. A proximity of `MAX_BINS` only occurs
/// between an address and itself.
pub const MAX_BINS: u16 = ADDRESS_BITS as u16;

/// 32-byte identifier of a peer or content item in the overlay.
///
/// Addresses are compared only as raw bytes. The derived `Ord` is the
/// byte-wise lexicographic order used to break distance ties.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(B256);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self(B256::ZERO);

    /// Create an address from its bytes.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(B256::new(bytes))
    }

    /// Create an address from a byte slice, rejecting any other length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidAddressLength {
                expected: ADDRESS_LENGTH,
                actual: bytes.len(),
            })?;
        Ok(Self::new(bytes))
    }

    /// The address bytes.
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0.0
    }

    /// The address bytes as a slice.
    pub fn as_slice(&self) -> &[u8] {
        self.0.as_slice()
    }

    /// Unwrap into the underlying fixed bytes.
    pub const fn into_inner(self) -> B256 {
        self.0
    }

    /// XOR distance to `other` as a big-endian unsigned integer.
    pub fn distance(&self, other: &Self) -> U256 {
        distance::distance(self, other)
    }

    /// Proximity order (shared leading bits) with `other`.
    ///
    /// Ranges over `0..=MAX_BINS`; `MAX_BINS` means `other == self`.
    pub fn proximity(&self, other: &Self) -> u16 {
        // bounded by ADDRESS_BITS, which fits in u16
        self.as_slice().common_prefix_len(other.as_slice()) as u16
    }

    /// Returns `true` if `a` is strictly closer to `self` than `b`.
    pub fn closer(&self, a: &Self, b: &Self) -> bool {
        distance::closer(a, b, self)
    }

    /// Orders `x` against `y` by closeness to `self`, nearest first.
    pub fn distance_cmp(&self, x: &Self, y: &Self) -> std::cmp::Ordering {
        distance::distance_cmp(self, x, y)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self::new(bytes)
    }
}

impl From<B256> for Address {
    fn from(bytes: B256) -> Self {
        Self(bytes)
    }
}

impl From<Address> for B256 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_slice(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Parses 64 hex characters, with or without a `0x` prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.as_slice()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(self, f)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self:x})")
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(self.as_slice()))
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AddressVisitor;

        impl serde::de::Visitor<'_> for AddressVisitor {
            type Value = Address;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 32-byte hex encoded address")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<Self::Value, E> {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(AddressVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEX: &str = "9100000000000000000000000000000000000000000000000000000000000001";

    #[test]
    fn test_hex_round_trip() {
        let addr: Address = HEX.parse().unwrap();
        assert_eq!(addr.to_string(), HEX);
        assert_eq!(format!("{addr:x}"), HEX);
        assert_eq!(format!("{addr:?}"), format!("Address({HEX})"));

        let prefixed: Address = format!("0x{HEX}").parse().unwrap();
        assert_eq!(prefixed, addr);
    }

    #[test]
    fn test_from_slice_rejects_wrong_length() {
        assert_eq!(
            Address::from_slice(&[0u8; 31]),
            Err(AddressError::InvalidAddressLength {
                expected: 32,
                actual: 31
            })
        );
        assert_eq!(
            Address::try_from(&[0u8; 33][..]),
            Err(AddressError::InvalidAddressLength {
                expected: 32,
                actual: 33
            })
        );
        assert_eq!(Address::from_slice(&[0u8; 32]), Ok(Address::ZERO));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            "zz".parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
        assert_eq!(
            "zz".parse::<Address>(),
            Err(AddressError::InvalidHex(hex::FromHexError::InvalidHexCharacter {
                c: 'z',
                index: 0
            }))
        );
        assert!(matches!(
            "00ff".parse::<Address>(),
            Err(AddressError::InvalidAddressLength { actual: 2, .. })
        ));
    }

    #[test]
    fn test_ord_is_bytewise() {
        let mut low = [0u8; 32];
        low[31] = 0xff;
        let mut high = [0u8; 32];
        high[0] = 0x01;
        assert!(Address::new(low) < Address::new(high));
    }

    #[test]
    fn test_self_proximity_is_max_bins() {
        let addr: Address = HEX.parse().unwrap();
        assert_eq!(addr.proximity(&addr), MAX_BINS);
        assert_eq!(addr.distance(&addr), U256::ZERO);
    }
}
