use std::path::PathBuf;

use anyhow::Result;
use clap::{AppSettings, Parser, Subcommand};

use govern_client::GovernClient;
use govern_evm_client::{rpc::RpcConnection, U256};

pub mod actions;
pub mod config;

/// Endpoint used when neither the command line nor the config file names one
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

#[derive(Debug, Parser)]
#[clap(version)]
#[clap(propagate_version = true)]
#[clap(global_setting(AppSettings::DeriveDisplayOrder))]
pub struct CliOpts {
    /// The network endpoint to use
    #[clap(global = true, long, short = 'u', env = "RPC_URL")]
    pub rpc_endpoint: Option<String>,

    /// Path to a JSON file with the governance contract configuration
    #[clap(global = true, long, short = 'c', env = "GOV_CONFIG")]
    pub config: Option<PathBuf>,

    /// The account to query, or to send transactions from
    #[clap(global = true, long, short = 'a', env = "GOV_ACCOUNT")]
    pub account: Option<String>,

    /// Print results as JSON
    #[clap(global = true, long)]
    pub json: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the symbol of the vote token
    Symbol,

    /// Show the voting weight of the account
    Votes,

    /// Show the vote token balance of the account
    Balance,

    /// Show when the stake of the account unlocks
    Lock,

    /// Stake vote tokens into the governance contract
    Stake {
        /// The amount to stake, in base units of the token
        #[clap(value_parser = parse_amount)]
        amount: U256,
    },

    /// Withdraw staked tokens from the governance contract
    Unstake {
        /// The amount to withdraw, in base units of the token
        #[clap(value_parser = parse_amount)]
        amount: U256,
    },

    /// List all proposals
    Proposals,
}

fn parse_amount(value: &str) -> Result<U256, String> {
    U256::from_dec_str(value).map_err(|e| format!("invalid amount {value:?}: {e:?}"))
}

pub async fn run(opts: CliOpts) -> Result<()> {
    let _ = env_logger::builder().is_test(false).try_init();

    let app_config = config::load_app_config(opts.config.as_deref())?;
    let rpc_endpoint = opts
        .rpc_endpoint
        .or_else(|| config::configured_rpc_url(&app_config))
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_owned());

    log::debug!("using endpoint {rpc_endpoint}");

    let client = GovernClient::connect(RpcConnection::new(&rpc_endpoint)?, &app_config).await?;
    let account = opts.account.unwrap_or_default();

    if let Ok(address) = account.trim().parse() {
        client.set_account(Some(address));
    }

    log::info!(
        "connected to {} governance at {:?}",
        client.network(),
        client.governance().address()
    );

    // proposals and locks don't involve the vote token
    if !matches!(opts.command, Command::Lock | Command::Proposals) {
        client.governance().init().await?;
    }

    match opts.command {
        Command::Symbol => actions::process_symbol(&client, opts.json).await?,
        Command::Votes => actions::process_votes(&client, &account, opts.json).await?,
        Command::Balance => actions::process_balance(&client, &account, opts.json).await?,
        Command::Lock => actions::process_lock(&client, &account, opts.json).await?,
        Command::Stake { amount } => actions::process_stake(&client, &account, amount).await?,
        Command::Unstake { amount } => {
            actions::process_unstake(&client, &account, amount).await?
        }
        Command::Proposals => actions::process_proposals(&client, opts.json).await?,
    }

    Ok(())
}
