use std::time::Duration;

use ethers::types::H160;
use serde::{Deserialize, Serialize};

use govern_evm_client::{network::NetworkKind, Address};

/// The governance contract deployed on mainnet
pub const MAINNET_GOVERNANCE: Address = H160([
    0xf6, 0x48, 0xd3, 0x92, 0x01, 0x88, 0xf7, 0x9d, 0x04, 0x5e, 0x35, 0x00, 0x7a, 0xd1, 0xc3, 0x15,
    0x8d, 0x47, 0x73, 0x2b,
]);

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GovernAppConfig {
    pub networks: Vec<NetworkInfo>,

    /// Average time between blocks, in seconds
    #[serde(default = "default_block_time_secs")]
    pub block_time_secs: u64,
}

impl GovernAppConfig {
    pub const DEFAULT_BLOCK_TIME_SECS: u64 = 15;

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Get the contract configuration for a network
    pub fn network(&self, kind: NetworkKind) -> Option<&NetworkInfo> {
        self.networks.iter().find(|info| info.network == kind)
    }

    pub fn block_time(&self) -> Duration {
        Duration::from_secs(self.block_time_secs)
    }
}

impl Default for GovernAppConfig {
    fn default() -> Self {
        Self {
            networks: vec![NetworkInfo {
                network: NetworkKind::Mainnet,
                governance: MAINNET_GOVERNANCE,
                rpc_url: None,
            }],
            block_time_secs: Self::DEFAULT_BLOCK_TIME_SECS,
        }
    }
}

fn default_block_time_secs() -> u64 {
    GovernAppConfig::DEFAULT_BLOCK_TIME_SECS
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub network: NetworkKind,

    /// The address of the governance contract
    pub governance: Address,

    /// An endpoint to use for this network, when none is given explicitly
    #[serde(default)]
    pub rpc_url: Option<String>,
}
