//! An in-memory network for exercising clients without a node.
//!
//! Contract functions are scripted per target address, and every request made through the
//! interface is recorded in order so tests can assert on what was sent, and when.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use ethers::{
    abi::{AbiDecode, AbiEncode},
    contract::EthCall,
    types::{Selector, U64},
};
use thiserror::Error;

use crate::{Address, Bytes, NetworkUserInterface, TransactionReceipt, TxHash};

const LOCALNET_CHAIN_ID: u64 = 1337;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TestNetworkError(pub String);

/// A request received by the test network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ChainId,
    BlockNumber,
    Call { to: Address, data: Bytes },
    Send { from: Address, to: Address, data: Bytes },
}

impl Request {
    /// Check if this request invokes the function `C` on the given contract
    pub fn invokes<C: EthCall>(&self, contract: &Address) -> bool {
        match self {
            Request::Call { to, data } | Request::Send { to, data, .. } => {
                to == contract && data.starts_with(&C::selector())
            }
            _ => false,
        }
    }

    /// Decode the arguments of this request as a call to `C`
    pub fn decode<C: EthCall>(&self) -> Option<C> {
        match self {
            Request::Call { data, .. } | Request::Send { data, .. } => C::decode(data).ok(),
            _ => None,
        }
    }

    pub fn is_send(&self) -> bool {
        matches!(self, Request::Send { .. })
    }
}

type Handler = Box<dyn Fn(&[u8]) -> Result<Bytes, TestNetworkError> + Send>;

struct Responder {
    contract: Address,
    selector: Selector,
    handler: Handler,
}

struct NetworkState {
    chain_id: u64,
    block_number: u64,
    responders: Vec<Responder>,
    requests: Vec<Request>,
    sent: u64,
}

#[derive(Clone)]
pub struct TestNetwork {
    state: Arc<Mutex<NetworkState>>,
}

impl std::fmt::Debug for TestNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state();

        f.debug_struct("TestNetwork")
            .field("chain_id", &state.chain_id)
            .field("block_number", &state.block_number)
            .field("requests", &state.requests.len())
            .finish()
    }
}

impl Default for TestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl TestNetwork {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NetworkState {
                chain_id: LOCALNET_CHAIN_ID,
                block_number: 0,
                responders: vec![],
                requests: vec![],
                sent: 0,
            })),
        }
    }

    pub fn with_chain_id(self, chain_id: u64) -> Self {
        self.state().chain_id = chain_id;
        self
    }

    pub fn set_block_number(&self, block_number: u64) {
        self.state().block_number = block_number;
    }

    /// Always return the given outputs when `C` is invoked on the contract
    pub fn respond<C: EthCall + 'static>(
        &self,
        contract: Address,
        outputs: impl AbiEncode + Clone + Send + 'static,
    ) {
        self.add_responder(
            contract,
            C::selector(),
            Box::new(move |_| Ok(outputs.clone().encode().into())),
        );
    }

    /// Compute the outputs of `C` from its decoded arguments
    pub fn respond_with<C: EthCall + 'static, R: AbiEncode + 'static>(
        &self,
        contract: Address,
        handler: impl Fn(C) -> R + Send + 'static,
    ) {
        self.add_responder(
            contract,
            C::selector(),
            Box::new(move |data| {
                let call = C::decode(data).map_err(|e| TestNetworkError(e.to_string()))?;
                Ok(handler(call).encode().into())
            }),
        );
    }

    /// Fail every invocation of `C` on the contract
    pub fn reject<C: EthCall + 'static>(&self, contract: Address, message: &str) {
        let message = message.to_owned();
        self.add_responder(
            contract,
            C::selector(),
            Box::new(move |_| Err(TestNetworkError(message.clone()))),
        );
    }

    /// All requests received so far, in the order they arrived
    pub fn requests(&self) -> Vec<Request> {
        self.state().requests.clone()
    }

    /// Count the requests invoking `C` on the contract
    pub fn count<C: EthCall>(&self, contract: &Address) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|request| request.invokes::<C>(contract))
            .count()
    }

    pub fn clear_requests(&self) {
        self.state().requests.clear();
    }

    fn add_responder(&self, contract: Address, selector: Selector, handler: Handler) {
        self.state().responders.push(Responder {
            contract,
            selector,
            handler,
        });
    }

    fn state(&self) -> MutexGuard<'_, NetworkState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn dispatch(
        state: &NetworkState,
        to: &Address,
        data: &[u8],
    ) -> Option<Result<Bytes, TestNetworkError>> {
        // later registrations take precedence
        let responder = state
            .responders
            .iter()
            .rev()
            .find(|r| r.contract == *to && data.starts_with(&r.selector))?;

        Some((responder.handler)(data))
    }
}

#[async_trait(?Send)]
impl NetworkUserInterface for TestNetwork {
    type Error = TestNetworkError;

    async fn get_chain_id(&self) -> Result<u64, Self::Error> {
        let mut state = self.state();
        state.requests.push(Request::ChainId);
        Ok(state.chain_id)
    }

    async fn get_block_number(&self) -> Result<u64, Self::Error> {
        let mut state = self.state();
        state.requests.push(Request::BlockNumber);
        Ok(state.block_number)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, Self::Error> {
        let mut state = self.state();
        state.requests.push(Request::Call {
            to,
            data: data.clone(),
        });

        match Self::dispatch(&state, &to, &data) {
            Some(output) => output,
            None => Err(TestNetworkError(format!("no response for call to {to:?}"))),
        }
    }

    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
    ) -> Result<TransactionReceipt, Self::Error> {
        let mut state = self.state();
        state.requests.push(Request::Send {
            from,
            to,
            data: data.clone(),
        });

        // transactions without a scripted response are mined successfully
        if let Some(output) = Self::dispatch(&state, &to, &data) {
            output?;
        }

        state.sent += 1;

        Ok(TransactionReceipt {
            transaction_hash: TxHash::from_low_u64_be(state.sent),
            block_number: Some(U64::from(state.block_number)),
            status: Some(U64::one()),
            ..Default::default()
        })
    }
}
