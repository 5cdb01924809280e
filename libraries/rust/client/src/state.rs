use govern_evm_client::{network::NetworkKind, Address};

use crate::contracts::VoteToken;

pub mod governance;

/// Session information for a connected user
///
/// The account and network are set by the consumer of the client. The vote token is
/// resolved from the governance contract by `GovernanceClient::init`, and stays absent
/// until that succeeds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// The logged in account, if any
    pub account: Option<Address>,

    /// The network the user is connected to
    pub network: NetworkKind,

    pub(crate) vote_token: Option<VoteToken>,
}

impl Session {
    pub fn vote_token(&self) -> Option<&VoteToken> {
        self.vote_token.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.vote_token.is_some()
    }
}
