//! Topology metrics.

use metrics::{Counter, Gauge};

/// Topology metrics.
#[derive(Clone, Debug)]
pub(crate) struct KademliaMetrics {
    /// Current neighborhood depth
    depth: Gauge,
    /// Number of peers currently held in the bins
    connected_peers: Gauge,
    /// Number of peers added
    peers_added_total: Counter,
    /// Number of peers removed
    peers_removed_total: Counter,
}

impl Default for KademliaMetrics {
    fn default() -> Self {
        Self {
            depth: metrics::gauge!("kademlia.depth"),
            connected_peers: metrics::gauge!("kademlia.connected_peers"),
            peers_added_total: metrics::counter!("kademlia.peers_added_total"),
            peers_removed_total: metrics::counter!("kademlia.peers_removed_total"),
        }
    }
}

impl KademliaMetrics {
    /// Records a peer added, with the resulting state.
    pub(crate) fn peer_added(&self, connected: usize, depth: u16) {
        self.peers_added_total.increment(1);
        self.record_state(connected, depth);
    }

    /// Records a peer removed, with the resulting state.
    pub(crate) fn peer_removed(&self, connected: usize, depth: u16) {
        self.peers_removed_total.increment(1);
        self.record_state(connected, depth);
    }

    fn record_state(&self, connected: usize, depth: u16) {
        self.connected_peers.set(connected as f64);
        self.depth.set(f64::from(depth));
    }
}
