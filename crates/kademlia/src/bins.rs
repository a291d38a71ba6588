//! Proximity bin partition.
//!
//! Peers are organized into bins by their proximity order to the local
//! address. The base address is not stored here: callers provide the bin
//! when adding a peer.
//!
//! # Implementation
//!
//! A `HashMap<Address, PeerRecord>` gives O(1) membership lookups and a
//! per-bin `HashSet` gives O(1) bin enumeration and counts. Bin sets are
//! created on first membership and kept afterwards, even when emptied.
//!
//! The partition does no locking of its own; the topology owns it behind a
//! single lock together with the depth derived from it.

use std::collections::{HashMap, HashSet};

use orbit_primitives::{Address, MAX_BINS};
use web_time::Instant;

use crate::SaturationPolicy;

/// A member of the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerRecord {
    /// The peer's overlay address.
    pub address: Address,

    /// Bin the peer lives in (its proximity to the local address).
    pub bin: u16,

    /// When the peer was added.
    pub connected_at: Instant,

    /// Last observed activity.
    pub last_seen: Instant,
}

/// Peers grouped by proximity bin.
#[derive(Debug, Default)]
pub struct BinPartition {
    /// Peer records keyed by address.
    members: HashMap<Address, PeerRecord>,

    /// Addresses per bin, created lazily.
    bins: HashMap<u16, HashSet<Address>>,
}

impl BinPartition {
    /// Create a new empty partition.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a peer to `bin`.
    ///
    /// Returns `true` if the peer was added (not already present).
    pub fn insert(&mut self, peer: Address, bin: u16) -> bool {
        if self.members.contains_key(&peer) {
            return false;
        }

        let now = Instant::now();
        self.members.insert(
            peer,
            PeerRecord {
                address: peer,
                bin,
                connected_at: now,
                last_seen: now,
            },
        );
        self.bins.entry(bin).or_default().insert(peer);
        true
    }

    /// Remove a peer from whichever bin holds it.
    ///
    /// Returns the removed record, or `None` if the peer was absent.
    pub fn remove(&mut self, peer: &Address) -> Option<PeerRecord> {
        let record = self.members.remove(peer)?;
        if let Some(bin) = self.bins.get_mut(&record.bin) {
            bin.remove(peer);
        }
        Some(record)
    }

    /// Refresh the last-seen time of a peer.
    ///
    /// Returns `false` if the peer is absent.
    pub fn touch(&mut self, peer: &Address) -> bool {
        match self.members.get_mut(peer) {
            Some(record) => {
                record.last_seen = Instant::now();
                true
            }
            None => false,
        }
    }

    /// Check if a peer is a member.
    pub fn contains(&self, peer: &Address) -> bool {
        self.members.contains_key(peer)
    }

    /// Get a peer's record.
    pub fn get(&self, peer: &Address) -> Option<&PeerRecord> {
        self.members.get(peer)
    }

    /// Number of peers in `bin`.
    pub fn count(&self, bin: u16) -> usize {
        self.bins.get(&bin).map_or(0, HashSet::len)
    }

    /// Total number of peers.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterate over the peers in `bin`.
    pub fn iter_bin(&self, bin: u16) -> impl Iterator<Item = &Address> {
        self.bins.get(&bin).into_iter().flatten()
    }

    /// Snapshot of the peers in `bin`.
    pub fn peers_in_bin(&self, bin: u16) -> HashSet<Address> {
        self.iter_bin(bin).copied().collect()
    }

    /// Iterate over all peer records.
    pub fn iter(&self) -> impl Iterator<Item = &PeerRecord> {
        self.members.values()
    }

    /// Peer count of every bin, indexed by bin.
    pub fn bin_sizes(&self) -> Vec<usize> {
        (0..MAX_BINS).map(|bin| self.count(bin)).collect()
    }

    /// Smallest bin not saturated under `policy`.
    ///
    /// Scans bins from the fringe inward and stops at the first bin whose
    /// count is below its capacity. Returns `MAX_BINS` if every bin is
    /// saturated. Cost is bounded by the number of bins, not peers.
    pub fn depth<P: SaturationPolicy + ?Sized>(&self, policy: &P) -> u16 {
        let mut shallower = 0usize;
        for bin in 0..MAX_BINS {
            let count = self.count(bin);
            if !policy.is_saturated(bin, count, shallower) {
                return bin;
            }
            shallower += count;
        }
        MAX_BINS
    }

    /// Bins that are below capacity under `policy`, in ascending order.
    pub fn unsaturated_bins<P: SaturationPolicy + ?Sized>(&self, policy: &P) -> Vec<u16> {
        let mut shallower = 0usize;
        let mut bins = Vec::new();
        for bin in 0..MAX_BINS {
            let count = self.count(bin);
            if !policy.is_saturated(bin, count, shallower) {
                bins.push(bin);
            }
            shallower += count;
        }
        bins
    }

    /// Whether `bin` is at capacity under `policy`.
    pub fn is_saturated<P: SaturationPolicy + ?Sized>(&self, bin: u16, policy: &P) -> bool {
        let shallower = (0..bin).map(|b| self.count(b)).sum();
        policy.is_saturated(bin, self.count(bin), shallower)
    }
}
