use std::{
    collections::VecDeque,
    error::Error as StdError,
    sync::{Mutex, MutexGuard},
    time::Duration,
};
use thiserror::Error;

use ethers::{
    abi::{AbiDecode, AbiError},
    contract::EthCall,
};

use govern_evm_client::{
    network::NetworkKind, Address, ContractCall, ExtError, NetworkUserInterface,
    NetworkUserInterfaceExt, TransactionReceipt, TxHash,
};

use crate::{config::GovernAppConfig, contracts::VoteToken, state::Session};

pub type ClientResult<I, T> = std::result::Result<T, ClientError<I>>;

#[derive(Error)]
pub enum ClientError<I: NetworkUserInterface> {
    #[error("interface error: {0:?}")]
    Interface(I::Error),
    #[error("decode error: {0}")]
    Deserialize(Box<dyn StdError + Send + Sync>),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("the vote token is not resolved, call init first")]
    Uninitialized,
    #[error("error: {0}")]
    Unexpected(String),
}

impl<I: NetworkUserInterface> std::fmt::Debug for ClientError<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "interface error: {e:?}"),
            Self::Deserialize(e) => write!(f, "decode error: {}", e),
            Self::InvalidArgument(e) => write!(f, "invalid argument: {}", e),
            Self::Uninitialized => write!(f, "uninitialized"),
            Self::Unexpected(e) => write!(f, "error: {}", e),
        }
    }
}

impl<I: NetworkUserInterface> From<ExtError<I>> for ClientError<I> {
    fn from(e: ExtError<I>) -> Self {
        match e {
            ExtError::Interface(err) => Self::Interface(err),
            ExtError::Decode { error, .. } => Self::Deserialize(Box::new(error)),
        }
    }
}

impl<I: NetworkUserInterface> From<AbiError> for ClientError<I> {
    fn from(err: AbiError) -> Self {
        Self::Deserialize(Box::new(err))
    }
}

/// Central object for client implementations, containing the contract configuration and
/// the session state shared by all clients derived from it.
pub struct ClientState<I> {
    pub(crate) network: I,
    governance: Address,
    block_time: Duration,
    session: Mutex<Session>,
    tx_log: Mutex<VecDeque<TxHash>>,
}

impl<I: NetworkUserInterface> ClientState<I> {
    pub fn new(network: I, config: &GovernAppConfig, kind: NetworkKind) -> ClientResult<I, Self> {
        let info = config.network(kind).ok_or_else(|| {
            ClientError::Unexpected(format!("no governance contract configured for {kind}"))
        })?;

        log::debug!("using governance contract {:?} on {kind}", info.governance);

        Ok(Self {
            governance: info.governance,
            block_time: config.block_time(),
            session: Mutex::new(Session {
                network: kind,
                ..Default::default()
            }),
            tx_log: Mutex::new(VecDeque::new()),
            network,
        })
    }

    pub fn governance(&self) -> Address {
        self.governance
    }

    pub fn block_time(&self) -> Duration {
        self.block_time
    }

    pub fn session(&self) -> Session {
        self.lock_session().clone()
    }

    pub fn set_account(&self, account: Option<Address>) {
        self.lock_session().account = account;
    }

    pub fn set_network(&self, network: NetworkKind) {
        self.lock_session().network = network;
    }

    pub(crate) fn set_vote_token(&self, token: VoteToken) {
        self.lock_session().vote_token = Some(token);
    }

    /// The resolved vote token, which is only available after initialization
    pub fn vote_token(&self) -> ClientResult<I, VoteToken> {
        self.lock_session()
            .vote_token
            .ok_or(ClientError::Uninitialized)
    }

    /// Hashes of the transactions sent through this client, oldest first
    pub fn transactions(&self) -> Vec<TxHash> {
        let tx_log = self.tx_log.lock().unwrap_or_else(|e| e.into_inner());
        tx_log.iter().copied().collect()
    }

    pub async fn get_block_number(&self) -> ClientResult<I, u64> {
        self.network
            .get_block_number()
            .await
            .map_err(|e| ClientError::Interface(e))
    }

    /// Call a contract function, decoding its output as `R`
    pub async fn call<C, R>(&self, call: &ContractCall<C>) -> ClientResult<I, R>
    where
        C: EthCall + Clone,
        R: AbiDecode,
    {
        Ok(self.network.call_contract(call).await?)
    }

    pub async fn send<C>(&self, from: Address, call: &ContractCall<C>) -> ClientResult<I, TransactionReceipt>
    where
        C: EthCall + Clone,
    {
        let function = call.function_name();
        log::debug!("sending {function} to {:?} from {from:?}", call.to);

        match self.network.send_contract(from, call).await {
            Ok(receipt) => {
                log::info!(
                    "tx result success: {function} {:?}",
                    receipt.transaction_hash
                );

                let mut tx_log = self.tx_log.lock().unwrap_or_else(|e| e.into_inner());
                tx_log.push_back(receipt.transaction_hash);

                Ok(receipt)
            }
            Err(e) => {
                let error = ClientError::from(e);
                log::error!("tx result failed: {function}: {error:?}");

                Err(error)
            }
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }
}
