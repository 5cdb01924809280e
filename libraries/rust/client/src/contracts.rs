//! Bindings for the governance and vote token contracts, and builders for calls to them

use ethers::contract::abigen;

use govern_evm_client::{Address, ContractCall, U256};

// The `proposals` getter returns the fields of the contract's `Proposal` struct, in
// declaration order. `ProposalsReturn` is decoded by position and read by field name.
abigen!(
    BancorGovernance,
    r#"[
        function voteToken() external view returns (address)
        function votesOf(address voter) external view returns (uint256)
        function voteLocks(address account) external view returns (uint256)
        function stake(uint256 amount) external
        function unstake(uint256 amount) external
        function proposalCount() external view returns (uint256)
        function proposals(uint256 index) external view returns (uint256 id, uint256 start, uint256 end, address executor, string hash, bool open, address proposer, uint256 quorum, uint256 quorumRequired, uint256 totalForVotes, uint256 totalAgainstVotes, uint256 totalVotesAvailable)
    ]"#
);

abigen!(
    SmartToken,
    r#"[
        function symbol() external view returns (string)
        function decimals() external view returns (uint8)
        function balanceOf(address owner) external view returns (uint256)
        function approve(address spender, uint256 amount) external returns (bool)
    ]"#
);

/// Builder for calls to the governance contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GovernanceContract {
    pub address: Address,
}

impl GovernanceContract {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    /// The token used for voting weight
    pub fn vote_token(&self) -> ContractCall<VoteTokenCall> {
        ContractCall::new(self.address, VoteTokenCall)
    }

    pub fn votes_of(&self, voter: &Address) -> ContractCall<VotesOfCall> {
        ContractCall::new(self.address, VotesOfCall { voter: *voter })
    }

    /// The block number at which the account's stake unlocks
    pub fn vote_locks(&self, account: &Address) -> ContractCall<VoteLocksCall> {
        ContractCall::new(self.address, VoteLocksCall { account: *account })
    }

    pub fn stake(&self, amount: U256) -> ContractCall<StakeCall> {
        ContractCall::new(self.address, StakeCall { amount })
    }

    pub fn unstake(&self, amount: U256) -> ContractCall<UnstakeCall> {
        ContractCall::new(self.address, UnstakeCall { amount })
    }

    pub fn proposal_count(&self) -> ContractCall<ProposalCountCall> {
        ContractCall::new(self.address, ProposalCountCall)
    }

    pub fn proposal(&self, index: u64) -> ContractCall<ProposalsCall> {
        ContractCall::new(
            self.address,
            ProposalsCall {
                index: U256::from(index),
            },
        )
    }
}

/// The vote token, limited to the operations the governance client relies on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteToken {
    pub address: Address,
}

impl VoteToken {
    pub fn new(address: Address) -> Self {
        Self { address }
    }

    pub fn symbol(&self) -> ContractCall<SymbolCall> {
        ContractCall::new(self.address, SymbolCall)
    }

    pub fn decimals(&self) -> ContractCall<DecimalsCall> {
        ContractCall::new(self.address, DecimalsCall)
    }

    pub fn balance_of(&self, owner: &Address) -> ContractCall<BalanceOfCall> {
        ContractCall::new(self.address, BalanceOfCall { owner: *owner })
    }

    /// Allow `spender` to transfer up to `amount` from the sender of the transaction
    pub fn approve(&self, spender: &Address, amount: U256) -> ContractCall<ApproveCall> {
        ContractCall::new(
            self.address,
            ApproveCall {
                spender: *spender,
                amount,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::{abi::AbiDecode, contract::EthCall};

    #[test]
    fn signatures() {
        assert_eq!(VotesOfCall::abi_signature(), "votesOf(address)");
        assert_eq!(ProposalsCall::abi_signature(), "proposals(uint256)");
        assert_eq!(ApproveCall::abi_signature(), "approve(address,uint256)");

        // keccak256("balanceOf(address)")
        assert_eq!(BalanceOfCall::selector(), [0x70, 0xa0, 0x82, 0x31]);
        assert_eq!(DecimalsCall::selector(), [0x31, 0x3c, 0xe5, 0x67]);
    }

    #[test]
    fn built_calls_encode() {
        let governance = GovernanceContract::new(Address::repeat_byte(1));
        let token = VoteToken::new(Address::repeat_byte(2));

        let data = governance.proposal(3).data();
        assert_eq!(&data[..4], &ProposalsCall::selector());
        assert_eq!(data.len(), 36);

        let approve = token.approve(&governance.address, U256::from(10u64));
        assert_eq!(approve.to, token.address);
        assert_eq!(
            ApproveCall::decode(approve.data()).unwrap(),
            ApproveCall {
                spender: governance.address,
                amount: U256::from(10u64),
            }
        );
    }
}
