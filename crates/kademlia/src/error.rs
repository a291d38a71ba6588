//! Topology error types.

use orbit_primitives::AddressError;

/// Error returned by topology construction and raw-address operations.
#[derive(Debug, thiserror::Error)]
pub enum TopologyError {
    /// The address (or generator parameters) failed validation.
    #[error("address error: {0}")]
    Address(#[from] AddressError),

    /// A configuration value is out of range.
    #[error("invalid kademlia configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Result alias for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;
