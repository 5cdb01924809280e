use std::time::Duration;

use ethers::abi::{AbiError, InvalidOutputType};
use serde::{Deserialize, Serialize};

use govern_evm_client::{Address, U256};

use crate::contracts::ProposalsReturn;

/// Snapshot of a governance proposal at the time it was queried
///
/// Vote and quorum amounts are the unscaled on-chain integers, in decimal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Proposal {
    pub id: u64,

    /// Block number at which voting starts
    pub start: u64,

    /// Block number at which voting ends
    pub end: u64,

    pub executor: Address,
    pub hash: String,
    pub open: bool,
    pub proposer: Address,
    pub quorum: String,
    pub quorum_required: String,
    pub total_for_votes: String,
    pub total_against_votes: String,
    pub total_votes_available: String,
}

impl TryFrom<ProposalsReturn> for Proposal {
    type Error = AbiError;

    fn try_from(fields: ProposalsReturn) -> Result<Self, Self::Error> {
        Ok(Self {
            id: to_u64("id", fields.id)?,
            start: to_u64("start", fields.start)?,
            end: to_u64("end", fields.end)?,
            executor: fields.executor,
            hash: fields.hash,
            open: fields.open,
            proposer: fields.proposer,
            quorum: fields.quorum.to_string(),
            quorum_required: fields.quorum_required.to_string(),
            total_for_votes: fields.total_for_votes.to_string(),
            total_against_votes: fields.total_against_votes.to_string(),
            total_votes_available: fields.total_votes_available.to_string(),
        })
    }
}

/// Narrow an on-chain integer that is expected to fit a block number or index
pub(crate) fn to_u64(name: &str, value: U256) -> Result<u64, AbiError> {
    u64::try_from(value).map_err(|_| {
        AbiError::DetokenizationError(InvalidOutputType(format!(
            "{name} {value} exceeds 64 bits"
        )))
    })
}

/// The stake lock of an account
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lock {
    /// The latest block when the lock was queried
    pub current_block: u64,

    /// The block at which the lock is released
    pub unlock_block: u64,

    /// Blocks left until the lock is released, zero if already released
    pub remaining_blocks: u64,
}

impl Lock {
    pub fn new(current_block: u64, unlock_block: u64) -> Self {
        Self {
            current_block,
            unlock_block,
            remaining_blocks: unlock_block.saturating_sub(current_block),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.remaining_blocks > 0
    }

    /// Estimate the time until the lock is released
    pub fn remaining_time(&self, block_time: Duration) -> Duration {
        let millis = u64::try_from(block_time.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(millis.saturating_mul(self.remaining_blocks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_lock_floors_at_zero() {
        let lock = Lock::new(130, 100);
        assert_eq!(lock.remaining_blocks, 0);
        assert!(!lock.is_locked());
        assert_eq!(lock.remaining_time(Duration::from_secs(15)), Duration::ZERO);
    }

    #[test]
    fn active_lock() {
        let lock = Lock::new(100, 130);
        assert_eq!(lock.remaining_blocks, 30);
        assert!(lock.is_locked());
        assert_eq!(
            lock.remaining_time(Duration::from_secs(15)),
            Duration::from_secs(450)
        );
    }

    fn proposal_fields() -> ProposalsReturn {
        ProposalsReturn {
            id: U256::from(2u64),
            start: U256::from(11_000_000u64),
            end: U256::from(11_040_320u64),
            executor: Address::repeat_byte(0xee),
            hash: "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG".to_owned(),
            open: true,
            proposer: Address::repeat_byte(0x42),
            quorum: U256::from(250_000u64),
            quorum_required: U256::from(200_000u64),
            total_for_votes: U256::exp10(30),
            total_against_votes: U256::zero(),
            total_votes_available: U256::exp10(30) * U256::from(4u64),
        }
    }

    #[test]
    fn proposal_fields_by_name() {
        let proposal = Proposal::try_from(proposal_fields()).unwrap();

        assert_eq!(proposal.id, 2);
        assert_eq!(proposal.start, 11_000_000);
        assert_eq!(proposal.end, 11_040_320);
        assert_eq!(proposal.executor, Address::repeat_byte(0xee));
        assert!(proposal.open);
        assert_eq!(proposal.proposer, Address::repeat_byte(0x42));
        assert_eq!(proposal.quorum_required, "200000");
        assert_eq!(proposal.total_for_votes, "1000000000000000000000000000000");
        assert_eq!(proposal.total_against_votes, "0");
        assert_eq!(proposal.total_votes_available, "4000000000000000000000000000000");
    }

    #[test]
    fn proposal_serializes_for_display() {
        let proposal = Proposal::try_from(proposal_fields()).unwrap();
        let json = serde_json::to_value(&proposal).unwrap();

        assert_eq!(json["quorumRequired"], "200000");
        assert_eq!(
            json["executor"],
            "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
        );
    }

    #[test]
    fn proposal_block_out_of_range() {
        let fields = ProposalsReturn {
            end: U256::MAX,
            ..proposal_fields()
        };

        assert!(Proposal::try_from(fields).is_err());
    }
}
