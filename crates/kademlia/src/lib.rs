//! Kademlia-style overlay topology for Orbit nodes.
//!
//! This crate keeps the local node's view of the overlay: connected peers
//! grouped into proximity bins, and the neighborhood depth derived from how
//! full those bins are.
//!
//! # Architecture
//!
//! - [`BinPartition`]: peers grouped by proximity order to the local address
//! - [`SaturationPolicy`]: injected strategy deciding when a bin is full
//! - [`KademliaTopology`]: the single owner of the partition and its depth,
//!   guarded by one reader-writer lock so membership and depth always change
//!   together
//! - the bin balancer ([`KademliaTopology::balance_targets`]): pseudo-address
//!   probes for the parts of shallow bins no connected peer covers
//!
//! Connection events from accept and dial paths call [`KademliaTopology::add`]
//! and [`KademliaTopology::remove`]; routing and listing code reads through the
//! query methods. Nothing here performs I/O.
//!
//! # Usage
//!
//! ```ignore
//! use orbit_kademlia::{KademliaConfig, KademliaTopology};
//!
//! let topology = KademliaTopology::new(local_address, KademliaConfig::default())?;
//!
//! // Feed connection lifecycle events
//! topology.add(peer);
//! topology.remove(&peer);
//!
//! // Steer discovery towards bins that still need peers
//! let probes = topology.balance_targets();
//! ```

mod args;
mod balancer;
mod bins;
mod config;
mod error;
mod metrics;
mod policy;

pub use args::{KademliaArgs, NodeRoleArg};
pub use bins::{BinPartition, PeerRecord};
pub use config::{
    DEFAULT_BIN_MAX_PEERS, DEFAULT_LIGHT_MAX_PEERS, DEFAULT_SUFFIX_LENGTH, KademliaConfig,
    NodeRole,
};
pub use error::{TopologyError, TopologyResult};
pub use policy::{PerBinCap, SaturationPolicy, TotalCap};

use std::{collections::HashSet, sync::Arc};

use orbit_primitives::{Address, MAX_BINS, PseudoAddressGenerator, sort_by_proximity};
use parking_lot::RwLock;
use tracing::{debug, info, trace};

use crate::metrics::KademliaMetrics;

/// Bin membership and the depth computed from it.
///
/// Always read and written as one unit.
#[derive(Debug, Default)]
struct TopologyState {
    bins: BinPartition,
    depth: u16,
}

impl TopologyState {
    fn snapshot(&self) -> TopologySnapshot {
        TopologySnapshot {
            depth: self.depth,
            bin_sizes: self.bins.bin_sizes(),
            total: self.bins.len(),
        }
    }
}

/// Kademlia-based peer topology.
///
/// Owns the bin partition of connected peers for one local address. Every
/// mutation recomputes depth under the same write lock, so readers never see
/// a depth that disagrees with the bin counts they read alongside it.
pub struct KademliaTopology {
    /// Local overlay address.
    base: Address,

    /// Configuration the topology was built from.
    config: KademliaConfig,

    /// Bin capacity strategy.
    policy: Box<dyn SaturationPolicy>,

    /// Probe generator for the bin balancer.
    generator: PseudoAddressGenerator,

    /// Bin membership and depth.
    state: RwLock<TopologyState>,

    metrics: KademliaMetrics,
}

impl std::fmt::Debug for KademliaTopology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("KademliaTopology")
            .field("base", &self.base)
            .field("depth", &state.depth)
            .field("connected_peers", &state.bins.len())
            .finish_non_exhaustive()
    }
}

impl KademliaTopology {
    /// Create a topology using the standard policy for the configured role.
    pub fn new(base: Address, config: KademliaConfig) -> TopologyResult<Arc<Self>> {
        config.validate()?;
        let policy = config.saturation_policy();
        Self::with_policy(base, config, policy)
    }

    /// Create a topology with an explicit saturation policy.
    ///
    /// The role-specific peer limits in `config` are neither used nor
    /// validated; only the suffix length is checked.
    pub fn with_policy<P>(
        base: Address,
        config: KademliaConfig,
        policy: P,
    ) -> TopologyResult<Arc<Self>>
    where
        P: SaturationPolicy + 'static,
    {
        let generator = PseudoAddressGenerator::new(config.suffix_length)?;
        let policy: Box<dyn SaturationPolicy> = Box::new(policy);

        let bins = BinPartition::new();
        let depth = bins.depth(&policy);

        Ok(Arc::new(Self {
            base,
            config,
            policy,
            generator,
            state: RwLock::new(TopologyState { bins, depth }),
            metrics: KademliaMetrics::default(),
        }))
    }

    /// Local overlay address.
    pub fn base(&self) -> &Address {
        &self.base
    }

    /// Configuration the topology was built from.
    pub fn config(&self) -> &KademliaConfig {
        &self.config
    }

    /// Bin of `peer` relative to the local address.
    pub fn bin_of(&self, peer: &Address) -> u16 {
        self.base.proximity(peer)
    }

    /// Add a connected peer.
    ///
    /// Returns `true` if the peer was inserted. Adding a present peer or the
    /// local address is a no-op.
    pub fn add(&self, peer: Address) -> bool {
        if peer == self.base {
            trace!(%peer, "ignoring local address");
            return false;
        }

        let bin = self.bin_of(&peer);
        let (old_depth, new_depth) = {
            let mut state = self.state.write();
            if !state.bins.insert(peer, bin) {
                trace!(%peer, bin, "peer already present");
                return false;
            }

            let old_depth = state.depth;
            state.depth = state.bins.depth(&self.policy);
            self.metrics.peer_added(state.bins.len(), state.depth);

            debug!(
                %peer,
                bin,
                depth = state.depth,
                connected = state.bins.len(),
                "peer added"
            );
            (old_depth, state.depth)
        };

        self.on_depth_change(old_depth, new_depth);
        true
    }

    /// Remove a peer from whichever bin holds it.
    ///
    /// Returns `true` if the peer was present.
    pub fn remove(&self, peer: &Address) -> bool {
        let (old_depth, new_depth) = {
            let mut state = self.state.write();
            let Some(record) = state.bins.remove(peer) else {
                trace!(%peer, "peer not present");
                return false;
            };

            let old_depth = state.depth;
            state.depth = state.bins.depth(&self.policy);
            self.metrics.peer_removed(state.bins.len(), state.depth);

            debug!(
                %peer,
                bin = record.bin,
                depth = state.depth,
                connected = state.bins.len(),
                "peer removed"
            );
            (old_depth, state.depth)
        };

        self.on_depth_change(old_depth, new_depth);
        true
    }

    /// Add a peer given as raw bytes, rejecting anything not one address long.
    pub fn add_raw(&self, bytes: &[u8]) -> TopologyResult<bool> {
        let peer = Address::from_slice(bytes)?;
        Ok(self.add(peer))
    }

    /// Remove a peer given as raw bytes, rejecting anything not one address long.
    pub fn remove_raw(&self, bytes: &[u8]) -> TopologyResult<bool> {
        let peer = Address::from_slice(bytes)?;
        Ok(self.remove(&peer))
    }

    /// Refresh a peer's last-seen time. Returns `false` if it is absent.
    pub fn touch(&self, peer: &Address) -> bool {
        self.state.write().bins.touch(peer)
    }

    /// Record of a single peer.
    pub fn peer(&self, peer: &Address) -> Option<PeerRecord> {
        self.state.read().bins.get(peer).copied()
    }

    /// Check if a peer is connected.
    pub fn contains(&self, peer: &Address) -> bool {
        self.state.read().bins.contains(peer)
    }

    /// Total number of connected peers.
    pub fn len(&self) -> usize {
        self.state.read().bins.len()
    }

    /// Check if there are no connected peers.
    pub fn is_empty(&self) -> bool {
        self.state.read().bins.is_empty()
    }

    /// Snapshot of the peers in `bin`. Empty for bins out of range.
    pub fn peers_in_bin(&self, bin: u16) -> HashSet<Address> {
        self.state.read().bins.peers_in_bin(bin)
    }

    /// Number of peers in `bin`. Zero for bins out of range.
    pub fn count(&self, bin: u16) -> usize {
        self.state.read().bins.count(bin)
    }

    /// Current neighborhood depth, in `0..=MAX_BINS`.
    pub fn depth(&self) -> u16 {
        self.state.read().depth
    }

    /// Peer count of every bin, indexed by bin.
    pub fn bin_sizes(&self) -> Vec<usize> {
        self.state.read().bins.bin_sizes()
    }

    /// Depth and bin counts read under one guard.
    pub fn snapshot(&self) -> TopologySnapshot {
        self.state.read().snapshot()
    }

    /// Whether `bin` has reached capacity.
    ///
    /// Bins out of range report saturated so discovery never targets them.
    pub fn is_bin_saturated(&self, bin: u16) -> bool {
        if bin >= MAX_BINS {
            return true;
        }
        self.state.read().bins.is_saturated(bin, &self.policy)
    }

    /// Bins still below capacity, in ascending order.
    pub fn unsaturated_bins(&self) -> Vec<u16> {
        self.state.read().bins.unsaturated_bins(&self.policy)
    }

    /// Connected peers at or beyond depth, deepest bin first.
    pub fn neighbors(&self) -> Vec<Address> {
        let state = self.state.read();
        (state.depth..MAX_BINS)
            .rev()
            .flat_map(|bin| state.bins.iter_bin(bin).copied())
            .collect()
    }

    /// Up to `count` connected peers nearest to `target`, nearest first.
    pub fn closest_to(&self, target: &Address, count: usize) -> Vec<Address> {
        let peers: Vec<Address> = {
            let state = self.state.read();
            state.bins.iter().map(|record| record.address).collect()
        };

        let mut sorted = sort_by_proximity(peers, target);
        sorted.truncate(count);
        sorted
    }

    fn on_depth_change(&self, old_depth: u16, new_depth: u16) {
        if old_depth != new_depth {
            info!(old_depth, new_depth, "kademlia depth changed");
            self.log_status();
        }
    }

    /// Log the current topology status showing bin populations.
    ///
    /// Non-empty bins are rendered as `bin:count`, the depth bin in brackets.
    pub fn log_status(&self) {
        let snapshot = self.snapshot();

        let mut bin_status = String::new();
        for (bin, count) in (0..MAX_BINS).zip(snapshot.bin_sizes.iter().copied()) {
            if count == 0 && bin != snapshot.depth {
                continue;
            }
            if !bin_status.is_empty() {
                bin_status.push(' ');
            }
            if bin == snapshot.depth {
                bin_status.push_str(&format!("[{bin}:{count}]"));
            } else {
                bin_status.push_str(&format!("{bin}:{count}"));
            }
        }

        if bin_status.is_empty() {
            bin_status = "(saturated)".to_string();
        }

        debug!(
            depth = snapshot.depth,
            connected = snapshot.total,
            bins = %bin_status,
            "kademlia topology"
        );
    }
}

/// Consistent view of depth and bin counts.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TopologySnapshot {
    /// Neighborhood depth.
    pub depth: u16,
    /// Peer count per bin, indexed by bin.
    pub bin_sizes: Vec<usize>,
    /// Total connected peers.
    pub total: usize,
}
