//! Core primitive types for the Orbit overlay.
//!
//! This crate holds the pure, lock-free address-space algorithms every other
//! subsystem relies on to order peers and content by closeness.
//!
//! # Types
//!
//! ## Address Space
//! - [`Address`] - 32-byte overlay address (peers and content)
//! - [`distance`], [`distance_cmp`], [`closer`] - XOR metric and its total order
//! - [`proximity`] - shared leading bits, i.e. the bin index
//!
//! ## Bit Addressing
//! - [`MsbBits`] - MSB-first logical bit access shared by proximity and
//!   pseudo-address generation
//!
//! ## Pseudo-Addresses
//! - [`PseudoAddressGenerator`] - synthetic addresses at an exact proximity
//!   to a base, used as discovery probes and test fixtures
//!
//! ## Ordering
//! - [`closest_to`], [`sort_by_proximity`], [`sort_by_proximity_key`] -
//!   ranking helpers for listings and routing

mod address;
mod bits;
mod distance;
mod error;
mod ordering;
mod proximity;
mod pseudo;

pub use address::{ADDRESS_BITS, ADDRESS_LENGTH, Address, MAX_BINS};
pub use bits::MsbBits;
pub use distance::{closer, distance, distance_cmp};
pub use error::AddressError;
pub use ordering::{closest_to, sort_by_proximity, sort_by_proximity_key};
pub use proximity::{proximity, proximity_bytes};
pub use pseudo::{
    MAX_SUFFIX_LENGTH, PseudoAddressGenerator, generate_pseudo_addresses, pseudo_address_bytes,
};

/// Re-export of the integer type distances are expressed in.
pub use alloy_primitives::U256;
