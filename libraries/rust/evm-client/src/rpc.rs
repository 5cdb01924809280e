use async_trait::async_trait;
use ethers::{
    providers::{Http, JsonRpcClient, Middleware, Provider, ProviderError},
    types::{transaction::eip2718::TypedTransaction, TransactionRequest},
};
use thiserror::Error;

use crate::{Address, Bytes, NetworkUserInterface, TransactionReceipt, TxHash};

#[derive(Error, Debug)]
pub enum RpcError {
    #[error("invalid endpoint {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("transaction {0:?} was dropped before it was mined")]
    Dropped(TxHash),

    #[error("transaction {0:?} reverted")]
    Reverted(TxHash),
}

pub type RpcResult<T> = Result<T, RpcError>;

/// A JSON-RPC connection to an Ethereum node, implementing `NetworkUserInterface`
///
/// Transactions are submitted with `eth_sendTransaction`, so the node must manage the keys
/// for the sending account. Receipts are polled at the provider's interval.
#[derive(Clone, Debug)]
pub struct RpcConnection<P = Http> {
    provider: Provider<P>,
}

impl RpcConnection<Http> {
    /// Connect to a node over HTTP
    pub fn new(url: &str) -> RpcResult<Self> {
        let provider = Provider::<Http>::try_from(url).map_err(|e| RpcError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self::from_provider(provider))
    }
}

impl<P: JsonRpcClient> RpcConnection<P> {
    pub fn from_provider(provider: Provider<P>) -> Self {
        Self { provider }
    }
}

#[async_trait(?Send)]
impl<P: JsonRpcClient + Clone + 'static> NetworkUserInterface for RpcConnection<P> {
    type Error = RpcError;

    async fn get_chain_id(&self) -> RpcResult<u64> {
        let chain_id = self.provider.get_chainid().await?;

        u64::try_from(chain_id)
            .map_err(|_| RpcError::InvalidResponse(format!("chain id {chain_id} exceeds 64 bits")))
    }

    async fn get_block_number(&self) -> RpcResult<u64> {
        Ok(self.provider.get_block_number().await?.as_u64())
    }

    async fn call(&self, to: Address, data: Bytes) -> RpcResult<Bytes> {
        let tx: TypedTransaction = TransactionRequest::new().to(to).data(data).into();

        Ok(self.provider.call(&tx, None).await?)
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> RpcResult<TransactionReceipt> {
        let tx = TransactionRequest::new().from(from).to(to).data(data);
        let pending = self.provider.send_transaction(tx, None).await?;
        let hash = pending.tx_hash();

        log::debug!("submitted transaction {hash:?}");
        check_receipt(hash, pending.await?)
    }
}

fn check_receipt(
    hash: TxHash,
    receipt: Option<TransactionReceipt>,
) -> RpcResult<TransactionReceipt> {
    let receipt = receipt.ok_or(RpcError::Dropped(hash))?;

    // receipts from before byzantium carry no status
    match receipt.status {
        Some(status) if status.is_zero() => Err(RpcError::Reverted(hash)),
        _ => Ok(receipt),
    }
}
