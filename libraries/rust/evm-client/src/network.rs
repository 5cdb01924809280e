use std::fmt;

use serde::{Deserialize, Serialize};

use crate::NetworkUserInterface;

const MAINNET_CHAIN_ID: u64 = 1;
const ROPSTEN_CHAIN_ID: u64 = 3;

/// Description for the Ethereum network a client may connect to
#[derive(Serialize, Deserialize, Debug, Default, Eq, PartialEq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    /// The public main network
    #[default]
    Mainnet,

    /// The public network for development testing
    Ropsten,

    /// A non-public network for testing
    Localnet,
}

impl NetworkKind {
    /// Determine the network type based on its chain id
    pub fn from_chain_id(chain_id: u64) -> Self {
        match chain_id {
            MAINNET_CHAIN_ID => NetworkKind::Mainnet,
            ROPSTEN_CHAIN_ID => NetworkKind::Ropsten,
            _ => NetworkKind::Localnet,
        }
    }

    /// Determine the network type for a given interface
    pub async fn from_interface<I: NetworkUserInterface>(network: &I) -> Result<Self, I::Error> {
        let chain_id = network.get_chain_id().await?;
        Ok(Self::from_chain_id(chain_id))
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NetworkKind::Mainnet => "mainnet",
            NetworkKind::Ropsten => "ropsten",
            NetworkKind::Localnet => "localnet",
        };

        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_ids() {
        assert_eq!(NetworkKind::from_chain_id(1), NetworkKind::Mainnet);
        assert_eq!(NetworkKind::from_chain_id(3), NetworkKind::Ropsten);
        assert_eq!(NetworkKind::from_chain_id(1337), NetworkKind::Localnet);
    }

    #[test]
    fn serialized_names() {
        assert_eq!(
            serde_json::to_string(&NetworkKind::Ropsten).unwrap(),
            "\"ropsten\""
        );
        assert_eq!(
            serde_json::from_str::<NetworkKind>("\"localnet\"").unwrap(),
            NetworkKind::Localnet
        );
        assert_eq!(NetworkKind::default().to_string(), "mainnet");
    }
}
