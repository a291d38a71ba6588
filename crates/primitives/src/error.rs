//! Error types for address parsing and pseudo-address generation.

/// Error raised at the address-space boundary.
///
/// All variants are local and recoverable: nothing in the address space is
/// mutated when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AddressError {
    /// Raw bytes were not exactly one address long.
    #[error("invalid address length: expected {expected} bytes, got {actual}")]
    InvalidAddressLength { expected: usize, actual: usize },

    /// Hex string could not be decoded.
    #[error("invalid address hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Suffix length exceeds what the pseudo-address generator supports.
    #[error("invalid suffix length {suffix_length}: at most {max} bits are supported")]
    InvalidSuffixLength { suffix_length: u8, max: u8 },

    /// Uniform suffix coverage was requested for more bins than the address can hold.
    #[error(
        "suffix length {suffix_length} cannot cover {bins} bins uniformly within {bit_len} address bits"
    )]
    UniformCoverageExceeded { bins: u16, suffix_length: u8, bit_len: usize },
}
