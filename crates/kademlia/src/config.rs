//! Kademlia topology configuration.
//!
//! # Roles and Policies
//!
//! The node role only selects which saturation policy the topology is built
//! with; the topology itself never branches on role.
//!
//! - **Full / Boot** nodes use [`PerBinCap`] with `bin_max_peers` (default 8):
//!   every bin is filled independently for even connectivity.
//!
//! - **Light** nodes use [`TotalCap`] with `light_max_peers` (default 16):
//!   they only need that many peers in total, wherever they are.
//!
//! `suffix_length` (default 4) sets how many bits below each bin prefix the
//! bin balancer spreads its pseudo-address probes over.

use serde::{Deserialize, Serialize};

use orbit_primitives::MAX_SUFFIX_LENGTH;

use crate::{PerBinCap, SaturationPolicy, TopologyError, TopologyResult, TotalCap};

/// Default peers per bin before a full node considers it saturated.
pub const DEFAULT_BIN_MAX_PEERS: usize = 8;

/// Default total peers a light node aims for.
pub const DEFAULT_LIGHT_MAX_PEERS: usize = 16;

/// Default pseudo-address suffix length used by the bin balancer.
pub const DEFAULT_SUFFIX_LENGTH: u8 = 4;

/// Role of the local node in the overlay.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    strum::Display,
    strum::EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Consumes the network; keeps a small, fixed number of peers.
    Light,
    /// Stores and forwards content; keeps every bin populated.
    #[default]
    Full,
    /// Network entry point; a full node that others bootstrap from.
    Boot,
}

impl NodeRole {
    /// Whether this role participates as a full node.
    pub const fn is_full_node(&self) -> bool {
        matches!(self, Self::Full | Self::Boot)
    }
}

/// Configuration for the Kademlia topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KademliaConfig {
    /// Role of the local node; selects the saturation policy.
    pub role: NodeRole,

    /// Per-bin saturation size for full and boot nodes.
    pub bin_max_peers: usize,

    /// Total peer target for light nodes.
    pub light_max_peers: usize,

    /// Bits below the bin prefix the balancer spreads probes over.
    pub suffix_length: u8,
}

impl Default for KademliaConfig {
    fn default() -> Self {
        Self {
            role: NodeRole::default(),
            bin_max_peers: DEFAULT_BIN_MAX_PEERS,
            light_max_peers: DEFAULT_LIGHT_MAX_PEERS,
            suffix_length: DEFAULT_SUFFIX_LENGTH,
        }
    }
}

impl KademliaConfig {
    /// Set the node role.
    pub fn with_role(mut self, role: NodeRole) -> Self {
        self.role = role;
        self
    }

    /// Set the per-bin saturation size.
    pub fn with_bin_max_peers(mut self, count: usize) -> Self {
        self.bin_max_peers = count;
        self
    }

    /// Set the light node total peer target.
    pub fn with_light_max_peers(mut self, count: usize) -> Self {
        self.light_max_peers = count;
        self
    }

    /// Set the balancer suffix length.
    pub fn with_suffix_length(mut self, bits: u8) -> Self {
        self.suffix_length = bits;
        self
    }

    /// The standard saturation policy for the configured role.
    pub fn saturation_policy(&self) -> Box<dyn SaturationPolicy> {
        match self.role {
            NodeRole::Light => Box::new(TotalCap::new(self.light_max_peers)),
            NodeRole::Full | NodeRole::Boot => Box::new(PerBinCap::new(self.bin_max_peers)),
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> TopologyResult<()> {
        if self.bin_max_peers == 0 {
            return Err(TopologyError::InvalidConfig("bin_max_peers must be at least 1"));
        }
        if self.light_max_peers == 0 {
            return Err(TopologyError::InvalidConfig("light_max_peers must be at least 1"));
        }
        if self.suffix_length > MAX_SUFFIX_LENGTH {
            return Err(TopologyError::InvalidConfig("suffix_length must be at most 8 bits"));
        }
        Ok(())
    }
}
