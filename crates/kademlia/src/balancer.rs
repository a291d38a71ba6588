//! Bin balancer.
//!
//! Each shallow bin is divided into `2^k` regions by the `k` bits that follow
//! its differing bit, one pseudo-address per region. A region with no
//! connected peer is a probe target: discovery should look for peers near it
//! so connections spread across the whole bin rather than clustering.

use std::collections::HashSet;

use orbit_primitives::{Address, MAX_BINS, closest_to};
use tracing::trace;

use crate::{KademliaTopology, TopologyState};

impl KademliaTopology {
    /// Pseudo-addresses of uncovered regions in bins `0..=depth`.
    ///
    /// Targets are ordered by bin, then by suffix. Bins whose suffix is
    /// truncated yield each distinct address once.
    pub fn balance_targets(&self) -> Vec<Address> {
        let state = self.state.read();
        self.balance_targets_locked(&state)
    }

    /// For each balance target, the closest known peer in the target's bin
    /// that is not connected yet.
    ///
    /// A peer is picked for at most one target. Targets with no eligible
    /// peer are skipped.
    pub fn balanced_candidates(&self, known: &[Address]) -> Vec<Address> {
        let state = self.state.read();
        let targets = self.balance_targets_locked(&state);

        let mut picked = HashSet::new();
        let mut candidates = Vec::new();
        for target in targets {
            let bin = self.bin_of(&target);
            let eligible = known.iter().filter(|peer| {
                **peer != self.base
                    && !state.bins.contains(peer)
                    && !picked.contains(*peer)
                    && self.bin_of(peer) == bin
            });

            if let Some(peer) = closest_to(eligible, &target) {
                trace!(%target, %peer, bin, "balance candidate");
                picked.insert(peer);
                candidates.push(peer);
            }
        }
        candidates
    }

    fn balance_targets_locked(&self, state: &TopologyState) -> Vec<Address> {
        let last = state.depth.min(MAX_BINS - 1);
        let suffix_length = u16::from(self.generator.suffix_length());

        let mut targets = Vec::new();
        for bin in 0..=last {
            // shared prefix length that puts a peer in the same region
            let region = (bin + suffix_length + 1).min(MAX_BINS);

            let mut seen = HashSet::new();
            for target in self.generator.bin(&self.base, bin) {
                if !seen.insert(target) {
                    continue;
                }
                let covered = state
                    .bins
                    .iter_bin(bin)
                    .any(|peer| target.proximity(peer) >= region);
                if !covered {
                    targets.push(target);
                }
            }
        }
        targets
    }
}
