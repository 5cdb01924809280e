use std::{sync::Arc, time::Duration};

use govern_evm_client::{Address, NetworkUserInterface, TxHash};

use client::ClientState;
use config::GovernAppConfig;
use governance::GovernanceClient;
use state::Session;

mod client;
pub mod config;
pub mod contracts;
pub mod governance;
pub mod state;
pub mod util;

pub use client::{ClientError, ClientResult};
pub use govern_evm_client::network::NetworkKind;

/// Central client object for interacting with the governance contracts
#[derive(Clone)]
pub struct GovernClient<I> {
    client: Arc<ClientState<I>>,
}

impl<I: NetworkUserInterface> GovernClient<I> {
    /// Create the client state, targeting the governance contract configured for `network`
    pub fn new(interface: I, config: &GovernAppConfig, network: NetworkKind) -> ClientResult<I, Self> {
        Ok(Self {
            client: Arc::new(ClientState::new(interface, config, network)?),
        })
    }

    /// Create a client for whichever network the interface is connected to
    pub async fn connect(interface: I, config: &GovernAppConfig) -> ClientResult<I, Self> {
        let network = NetworkKind::from_interface(&interface)
            .await
            .map_err(|e| ClientError::Interface(e))?;

        Self::new(interface, config, network)
    }

    /// A snapshot of the current session
    pub fn session(&self) -> Session {
        self.client.session()
    }

    pub fn account(&self) -> Option<Address> {
        self.client.session().account
    }

    /// Set the logged in account
    pub fn set_account(&self, account: Option<Address>) {
        self.client.set_account(account)
    }

    pub fn network(&self) -> NetworkKind {
        self.client.session().network
    }

    /// Record the network the user is connected to
    ///
    /// This does not change which governance contract the client talks to.
    pub fn set_network(&self, network: NetworkKind) {
        self.client.set_network(network)
    }

    /// The configured average time between blocks
    pub fn block_time(&self) -> Duration {
        self.client.block_time()
    }

    /// Hashes of the transactions sent through this client, oldest first
    pub fn transactions(&self) -> Vec<TxHash> {
        self.client.transactions()
    }

    /// Get the client for the governance contract
    pub fn governance(&self) -> GovernanceClient<I> {
        GovernanceClient::new(self.client.clone())
    }
}
