use std::time::Duration;

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use govern_client::{state::governance::Proposal, GovernClient};
use govern_evm_client::{NetworkUserInterface, U256};

pub async fn process_symbol<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    json: bool,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    let symbol = client.governance().symbol().await?;

    if json {
        println!("{}", serde_json::json!({ "symbol": symbol }));
    } else {
        println!("{symbol}");
    }

    Ok(())
}

pub async fn process_votes<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    account: &str,
    json: bool,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    let governance = client.governance();
    let (votes, symbol) = futures::try_join!(governance.votes(account), governance.symbol())?;

    if json {
        println!("{}", serde_json::json!({ "account": account, "votes": votes }));
    } else {
        println!("{votes} {symbol}");
    }

    Ok(())
}

pub async fn process_balance<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    account: &str,
    json: bool,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    let governance = client.governance();
    let (balance, symbol) = futures::try_join!(governance.balance(account), governance.symbol())?;

    if json {
        println!("{}", serde_json::json!({ "account": account, "balance": balance }));
    } else {
        println!("{balance} {symbol}");
    }

    Ok(())
}

pub async fn process_lock<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    account: &str,
    json: bool,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    let lock = client.governance().lock(account).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&lock)?);
    } else if lock.is_locked() {
        println!(
            "locked until block {} ({} blocks, about {})",
            lock.unlock_block,
            lock.remaining_blocks,
            format_duration(lock.remaining_time(client.block_time()))
        );
    } else {
        println!("unlocked since block {}", lock.unlock_block);
    }

    Ok(())
}

pub async fn process_stake<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    account: &str,
    amount: U256,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    client.governance().stake(account, amount).await?;
    println!("staked {amount}");

    Ok(())
}

pub async fn process_unstake<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    account: &str,
    amount: U256,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    client.governance().unstake(account, amount).await?;
    println!("unstaked {amount}");

    Ok(())
}

pub async fn process_proposals<I: NetworkUserInterface>(
    client: &GovernClient<I>,
    json: bool,
) -> Result<()>
where
    I::Error: Send + Sync,
{
    let proposals = client.governance().proposals().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&proposals)?);
    } else {
        println!("{}", proposal_table(&proposals));
    }

    Ok(())
}

fn proposal_table(proposals: &[Proposal]) -> Table {
    let mut table = Table::new();

    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Id", "Status", "Start", "End", "Proposer", "For", "Against", "Quorum", "Hash",
        ]);

    for proposal in proposals {
        table.add_row(vec![
            proposal.id.to_string(),
            if proposal.open { "open" } else { "closed" }.to_owned(),
            proposal.start.to_string(),
            proposal.end.to_string(),
            format!("{:?}", proposal.proposer),
            proposal.total_for_votes.clone(),
            proposal.total_against_votes.clone(),
            format!("{} / {}", proposal.quorum, proposal.quorum_required),
            proposal.hash.clone(),
        ]);
    }

    table
}

/// Render a duration as days, hours and minutes, rounding down to the minute
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.as_secs() / 60;
    let (days, hours, minutes) = (minutes / (24 * 60), minutes / 60 % 24, minutes % 60);

    match (days, hours) {
        (0, 0) => format!("{minutes}m"),
        (0, _) => format!("{hours}h {minutes}m"),
        _ => format!("{days}d {hours}h {minutes}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use govern_evm_client::Address;

    #[test]
    fn durations() {
        assert_eq!(format_duration(Duration::ZERO), "0m");
        assert_eq!(format_duration(Duration::from_secs(450)), "7m");
        assert_eq!(format_duration(Duration::from_secs(3 * 3600 + 60)), "3h 1m");
        assert_eq!(
            format_duration(Duration::from_secs(2 * 86400 + 5 * 3600 + 59)),
            "2d 5h 0m"
        );
    }

    #[test]
    fn table_has_a_row_per_proposal() {
        let proposal = Proposal {
            id: 0,
            start: 10,
            end: 20,
            executor: Address::zero(),
            hash: "QmHash".to_owned(),
            open: true,
            proposer: Address::repeat_byte(0x42),
            quorum: "5".to_owned(),
            quorum_required: "10".to_owned(),
            total_for_votes: "7".to_owned(),
            total_against_votes: "2".to_owned(),
            total_votes_available: "100".to_owned(),
        };
        let second = Proposal {
            id: 1,
            open: false,
            ..proposal.clone()
        };

        let rendered = proposal_table(&[proposal, second]).to_string();

        assert!(rendered.contains("QmHash"));
        assert!(rendered.contains("5 / 10"));
        assert!(rendered.contains("closed"));
    }
}
