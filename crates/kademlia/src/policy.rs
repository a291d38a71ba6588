//! Bin saturation policies.
//!
//! A policy decides how many peers a bin must hold before the node stops
//! seeking more in it. The topology asks the policy for every bin while
//! scanning for depth and never looks at the node role itself.
//!
//! Two standard policies are provided:
//!
//! - [`PerBinCap`]: every bin saturates independently at a fixed size. Suits
//!   full and boot nodes that want broad, evenly spread connectivity.
//! - [`TotalCap`]: no per-bin ceiling, only an aggregate target. Suits light
//!   nodes that need a handful of any peers: each shallow bin counts as
//!   saturated with a single peer until the aggregate is reached, and depth
//!   lands on the first bin past it.

use auto_impl::auto_impl;

/// Per-bin capacity strategy.
#[auto_impl(&, Box, Arc)]
pub trait SaturationPolicy: Send + Sync {
    /// Peer capacity of `bin`.
    ///
    /// `shallower` is the number of peers held in bins `0..bin`, which lets
    /// aggregate policies express their cap bin by bin.
    fn capacity(&self, bin: u16, shallower: usize) -> usize;

    /// Whether `bin` holding `count` peers has reached capacity.
    fn is_saturated(&self, bin: u16, count: usize, shallower: usize) -> bool {
        count >= self.capacity(bin, shallower)
    }
}

/// Every bin saturates at `max_peers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerBinCap {
    pub max_peers: usize,
}

impl PerBinCap {
    pub const fn new(max_peers: usize) -> Self {
        Self { max_peers }
    }
}

impl SaturationPolicy for PerBinCap {
    fn capacity(&self, _bin: u16, _shallower: usize) -> usize {
        self.max_peers
    }
}

/// Aggregate cap of `max_peers` with no per-bin ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TotalCap {
    pub max_peers: usize,
}

impl TotalCap {
    pub const fn new(max_peers: usize) -> Self {
        Self { max_peers }
    }
}

impl SaturationPolicy for TotalCap {
    fn capacity(&self, _bin: u16, shallower: usize) -> usize {
        if shallower >= self.max_peers {
            // past the aggregate cap: unbounded, never saturated
            usize::MAX
        } else {
            1
        }
    }
}
