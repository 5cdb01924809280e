use std::any::Any;

use async_trait::async_trait;
use ethers::{
    abi::{AbiDecode, AbiEncode, AbiError},
    contract::EthCall,
};
use thiserror::Error;

pub use ethers::types::{Address, Bytes, TransactionReceipt, TxHash, U256};

pub mod network;
pub mod rpc;
#[cfg(feature = "testing")]
pub mod testing;

/// A type that provides an interface to interact with an EVM network. Transactions are signed
/// by the node (or wallet) behind the interface, on behalf of the account they are sent from.
#[async_trait(?Send)]
pub trait NetworkUserInterface: Clone + 'static {
    type Error: Any + std::fmt::Debug;

    /// Get the chain id of the network
    async fn get_chain_id(&self) -> Result<u64, Self::Error>;

    /// Get the number of the most recent block
    async fn get_block_number(&self) -> Result<u64, Self::Error>;

    /// Execute a read-only call against the latest state, returning the raw output
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Self::Error>;

    /// Submit a transaction and wait until it has been included in a block
    ///
    /// Implementations must return an error for transactions that were reverted.
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, Self::Error>;
}

/// A contract function invocation, targeting a specific contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall<C> {
    pub to: Address,
    pub call: C,
}

impl<C: EthCall + Clone> ContractCall<C> {
    pub fn new(to: Address, call: C) -> Self {
        Self { to, call }
    }

    /// The calldata for the invocation, prefixed by the function selector
    pub fn data(&self) -> Bytes {
        self.call.clone().encode().into()
    }

    pub fn function_name(&self) -> String {
        C::function_name().into_owned()
    }
}

#[async_trait(?Send)]
pub trait NetworkUserInterfaceExt: NetworkUserInterface {
    /// Invoke a contract function without a transaction, and decode its outputs
    async fn call_contract<C, R>(&self, call: &ContractCall<C>) -> Result<R, ExtError<Self>>
    where
        C: EthCall + Clone,
        R: AbiDecode,
    {
        let output = self
            .call(call.to, call.data())
            .await
            .map_err(|e| ExtError::Interface(e))?;

        R::decode(output).map_err(|error| ExtError::Decode {
            address: call.to,
            error,
        })
    }

    /// Invoke a contract function in a transaction sent from the given account
    async fn send_contract<C>(
        &self,
        from: Address,
        call: &ContractCall<C>,
    ) -> Result<TransactionReceipt, ExtError<Self>>
    where
        C: EthCall + Clone,
    {
        self.send_transaction(from, call.to, call.data())
            .await
            .map_err(|e| ExtError::Interface(e))
    }
}

#[derive(Error)]
pub enum ExtError<I: NetworkUserInterface> {
    #[error("interface error")]
    Interface(I::Error),

    #[error("error decoding output from {address:?}: {error}")]
    Decode { address: Address, error: AbiError },
}

impl<I: NetworkUserInterface> std::fmt::Debug for ExtError<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Interface(e) => write!(f, "interface error: {e:?}"),
            Self::Decode { address, error } => write!(f, "decode error ({address:?}): {error}"),
        }
    }
}

impl<T: NetworkUserInterface> NetworkUserInterfaceExt for T {}
