//! CLI arguments for topology configuration.

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{
    DEFAULT_BIN_MAX_PEERS, DEFAULT_LIGHT_MAX_PEERS, DEFAULT_SUFFIX_LENGTH, KademliaConfig,
    NodeRole, TopologyResult,
};

/// CLI wrapper for [`NodeRole`] with clap integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRoleArg {
    /// Light node, keeps a small total number of peers.
    Light,
    /// Full node, fills every bin (default).
    #[default]
    Full,
    /// Boot node, a full node acting as a network entry point.
    Boot,
}

impl From<NodeRoleArg> for NodeRole {
    fn from(arg: NodeRoleArg) -> Self {
        match arg {
            NodeRoleArg::Light => Self::Light,
            NodeRoleArg::Full => Self::Full,
            NodeRoleArg::Boot => Self::Boot,
        }
    }
}

impl From<NodeRole> for NodeRoleArg {
    fn from(role: NodeRole) -> Self {
        match role {
            NodeRole::Light => Self::Light,
            NodeRole::Full => Self::Full,
            NodeRole::Boot => Self::Boot,
        }
    }
}

/// Kademlia topology CLI arguments.
#[derive(Debug, Args, Clone, Serialize, Deserialize)]
#[command(next_help_heading = "Kademlia")]
#[serde(default)]
pub struct KademliaArgs {
    /// Node role
    #[arg(long = "kademlia.role", value_enum, default_value_t = NodeRoleArg::Full)]
    pub role: NodeRoleArg,

    /// Peers per bin before a full node stops seeking more
    #[arg(long = "kademlia.bin-max-peers", default_value_t = DEFAULT_BIN_MAX_PEERS)]
    pub bin_max_peers: usize,

    /// Total peers a light node aims for
    #[arg(long = "kademlia.light-max-peers", default_value_t = DEFAULT_LIGHT_MAX_PEERS)]
    pub light_max_peers: usize,

    /// Pseudo-address suffix bits used by the bin balancer
    #[arg(long = "kademlia.suffix-length", default_value_t = DEFAULT_SUFFIX_LENGTH)]
    pub suffix_length: u8,
}

impl Default for KademliaArgs {
    fn default() -> Self {
        Self {
            role: NodeRoleArg::default(),
            bin_max_peers: DEFAULT_BIN_MAX_PEERS,
            light_max_peers: DEFAULT_LIGHT_MAX_PEERS,
            suffix_length: DEFAULT_SUFFIX_LENGTH,
        }
    }
}

impl KademliaArgs {
    /// Validate argument values.
    pub fn validate(&self) -> TopologyResult<()> {
        KademliaConfig::from(self).validate()
    }
}

impl From<&KademliaArgs> for KademliaConfig {
    fn from(args: &KademliaArgs) -> Self {
        Self {
            role: args.role.into(),
            bin_max_peers: args.bin_max_peers,
            light_max_peers: args.light_max_peers,
            suffix_length: args.suffix_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        kademlia: KademliaArgs,
    }

    #[test]
    fn test_defaults_match_config() {
        let cli = Cli::try_parse_from(["orbit"]).unwrap();
        assert_eq!(KademliaConfig::from(&cli.kademlia), KademliaConfig::default());
        assert_eq!(KademliaConfig::from(&KademliaArgs::default()), KademliaConfig::default());
    }

    #[test]
    fn test_parse_light_node() {
        let cli = Cli::try_parse_from([
            "orbit",
            "--kademlia.role",
            "light",
            "--kademlia.light-max-peers",
            "4",
            "--kademlia.suffix-length",
            "2",
        ])
        .unwrap();

        let config = KademliaConfig::from(&cli.kademlia);
        assert_eq!(config.role, NodeRole::Light);
        assert_eq!(config.light_max_peers, 4);
        assert_eq!(config.suffix_length, 2);
        assert!(cli.kademlia.validate().is_ok());
    }

    #[test]
    fn test_rejects_out_of_range() {
        let cli = Cli::try_parse_from(["orbit", "--kademlia.suffix-length", "12"]).unwrap();
        assert!(cli.kademlia.validate().is_err());

        assert!(Cli::try_parse_from(["orbit", "--kademlia.role", "relay"]).is_err());
    }

    #[test]
    fn test_role_arg_round_trip() {
        for role in [NodeRole::Light, NodeRole::Full, NodeRole::Boot] {
            assert_eq!(NodeRole::from(NodeRoleArg::from(role)), role);
        }
    }
}
