use std::sync::Arc;

use ethers::abi::{AbiError, InvalidOutputType};

use govern_evm_client::{Address, NetworkUserInterface, U256};

use crate::{
    client::{ClientError, ClientResult, ClientState},
    contracts::{GovernanceContract, ProposalsReturn, VoteToken},
    state::governance::{to_u64, Lock, Proposal},
    util::math::shrink_token,
};

/// Client for the governance contract, and the token it uses for voting weight
///
/// Operations involving the vote token require `init` to have completed first.
#[derive(Clone)]
pub struct GovernanceClient<I> {
    client: Arc<ClientState<I>>,
    contract: GovernanceContract,
}

impl<I: NetworkUserInterface> GovernanceClient<I> {
    pub(crate) fn new(client: Arc<ClientState<I>>) -> Self {
        let contract = GovernanceContract::new(client.governance());

        Self { client, contract }
    }

    /// The address of the governance contract
    pub fn address(&self) -> Address {
        self.contract.address
    }

    /// Resolve the vote token from the governance contract
    ///
    /// Calling this again resolves the token again, replacing the previous one.
    pub async fn init(&self) -> ClientResult<I, Address> {
        let token: Address = self.client.call(&self.contract.vote_token()).await?;

        log::debug!("vote token address {token:?}");
        self.client.set_vote_token(VoteToken::new(token));

        Ok(token)
    }

    /// The display symbol of the vote token
    pub async fn symbol(&self) -> ClientResult<I, String> {
        let token = self.client.vote_token()?;

        self.client.call(&token.symbol()).await
    }

    /// The voting weight of an account, in whole tokens
    pub async fn votes(&self, voter: &str) -> ClientResult<I, String> {
        let voter = parse_account("voter", voter)?;
        let token = self.client.vote_token()?;

        log::debug!("getting votes of {voter:?}");
        let votes: U256 = self.client.call(&self.contract.votes_of(&voter)).await?;
        let decimals = self.decimals(&token).await?;

        Ok(shrink_token(votes, decimals))
    }

    /// The vote token balance of an account, in whole tokens
    pub async fn balance(&self, account: &str) -> ClientResult<I, String> {
        let account = parse_account("account", account)?;
        let token = self.client.vote_token()?;

        log::debug!("getting balance of {account:?}");
        let balance_of = token.balance_of(&account);
        let (decimals, balance) = futures::try_join!(
            self.decimals(&token),
            self.client.call::<_, U256>(&balance_of),
        )?;

        Ok(shrink_token(balance, decimals))
    }

    /// The stake lock of an account, relative to the latest block
    pub async fn lock(&self, account: &str) -> ClientResult<I, Lock> {
        let account = parse_account("account", account)?;

        let unlock_block = self.client.call(&self.contract.vote_locks(&account)).await?;
        let unlock_block = to_u64("unlock block", unlock_block)?;
        let current_block = self.client.get_block_number().await?;

        let lock = Lock::new(current_block, unlock_block);
        log::debug!("lock of {account:?}: {lock:?}");

        Ok(lock)
    }

    /// Stake tokens from an account into the governance contract
    ///
    /// The governance contract is first approved to transfer `amount` from the account. The
    /// stake is only sent once the approval has been confirmed. A failed stake leaves the
    /// approval in place.
    pub async fn stake(&self, account: &str, amount: U256) -> ClientResult<I, bool> {
        let account = parse_account("account", account)?;
        check_amount(amount)?;
        let token = self.client.vote_token()?;

        self.client
            .send(account, &token.approve(&self.contract.address, amount))
            .await?;
        self.client
            .send(account, &self.contract.stake(amount))
            .await?;

        Ok(true)
    }

    /// Withdraw staked tokens back to an account
    pub async fn unstake(&self, account: &str, amount: U256) -> ClientResult<I, bool> {
        let account = parse_account("account", account)?;
        check_amount(amount)?;

        self.client
            .send(account, &self.contract.unstake(amount))
            .await?;

        Ok(true)
    }

    /// Read every proposal from the governance contract, in index order
    ///
    /// Indexes are read from zero up to and including the proposal count.
    pub async fn proposals(&self) -> ClientResult<I, Vec<Proposal>> {
        let count = self.client.call(&self.contract.proposal_count()).await?;
        let count = to_u64("proposal count", count)?;

        log::debug!("getting {count} proposals");

        let mut proposals = vec![];
        for index in 0..=count {
            let fields: ProposalsReturn = self.client.call(&self.contract.proposal(index)).await?;
            proposals.push(Proposal::try_from(fields)?);
        }

        Ok(proposals)
    }

    async fn decimals(&self, token: &VoteToken) -> ClientResult<I, u8> {
        let decimals: U256 = self.client.call(&token.decimals()).await?;

        u8::try_from(decimals).map_err(|_| {
            ClientError::from(AbiError::DetokenizationError(InvalidOutputType(format!(
                "decimals {decimals} exceeds uint8"
            ))))
        })
    }
}

fn parse_account<I: NetworkUserInterface>(name: &str, value: &str) -> ClientResult<I, Address> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ClientError::InvalidArgument(format!("missing {name} address")));
    }

    value
        .parse()
        .map_err(|e| ClientError::InvalidArgument(format!("{name}: {e}")))
}

fn check_amount<I: NetworkUserInterface>(amount: U256) -> ClientResult<I, ()> {
    if amount.is_zero() {
        return Err(ClientError::InvalidArgument("amount must not be zero".to_owned()));
    }

    Ok(())
}
