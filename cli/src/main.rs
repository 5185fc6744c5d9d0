use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gem_consensus::{Address, Header, HeaderChain};
use gem_execution::{load_alloc, StateDB};
use gem_governance::{governance_interface, GovernanceCall, InnerContract};
use primitive_types::U256;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod config;
mod logging;

use config::CliConfig;
use logging::{init_logging, LogLevel};

#[derive(Parser)]
#[command(name = "gem-governance")]
#[command(about = "Query the gem governance contract and encode calls to it")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE", env = "GEM_CONFIG")]
    config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

/// Block and state a query runs against
#[derive(Args)]
struct SnapshotArgs {
    /// Block header (JSON)
    #[arg(long, value_name = "FILE")]
    header: PathBuf,

    /// State allocation (JSON map of address to balance, nonce, code, storage)
    #[arg(long, value_name = "FILE")]
    state: PathBuf,

    /// Ancestor headers (JSON array), consulted by BLOCKHASH
    #[arg(long, value_name = "FILE")]
    ancestors: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the governance interface with selectors and event topics
    Interface,

    /// Check whether a node may produce blocks
    IsValid {
        #[arg(long)]
        node_id: String,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Reward address configured on-chain (zero when unset)
    Coinbase {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Address block rewards go to, falling back to the header's coinbase
    RewardAddress {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Current contract owner
    Owner {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Pending owner of an ownership transfer
    NewOwner {
        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Entry of the contract's node list
    WhiteList {
        #[arg(long, default_value = "0")]
        index: u64,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Print the input data for a governance transaction
    Encode {
        #[command(subcommand)]
        call: EncodeCommand,
    },
}

#[derive(Subcommand)]
enum EncodeCommand {
    UpdateCoinbase { address: Address },
    AddNodeId { node_id: String },
    RemoveNodeId { node_id: String },
    TransferOwnership { address: Address },
    AcceptOwnership,
}

impl From<EncodeCommand> for GovernanceCall {
    fn from(cmd: EncodeCommand) -> Self {
        match cmd {
            EncodeCommand::UpdateCoinbase { address } => GovernanceCall::UpdateCoinbase(address),
            EncodeCommand::AddNodeId { node_id } => GovernanceCall::AddNodeId(node_id),
            EncodeCommand::RemoveNodeId { node_id } => GovernanceCall::RemoveNodeId(node_id),
            EncodeCommand::TransferOwnership { address } => {
                GovernanceCall::TransferOwnership(address)
            }
            EncodeCommand::AcceptOwnership => GovernanceCall::AcceptOwnership,
        }
    }
}

/// Header, ancestry and state loaded from disk
struct Snapshot {
    header: Header,
    chain: HeaderChain,
    state: StateDB,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

impl SnapshotArgs {
    fn load(&self) -> Result<Snapshot> {
        let header: Header = read_json(&self.header)?;

        let ancestors: Vec<Header> = match &self.ancestors {
            Some(path) => read_json(path)?,
            None => Vec::new(),
        };

        let alloc_json = std::fs::read_to_string(&self.state)
            .with_context(|| format!("Failed to read {}", self.state.display()))?;
        let alloc = load_alloc(&alloc_json)?;
        let state = StateDB::from_alloc(&alloc)?;

        debug!(
            "Loaded block {} with {} accounts and {} ancestors",
            header.number,
            alloc.len(),
            ancestors.len()
        );

        Ok(Snapshot {
            header,
            chain: HeaderChain::from_headers(&ancestors),
            state,
        })
    }
}

fn with_contract<T>(
    args: &SnapshotArgs,
    config: &CliConfig,
    query: impl FnOnce(&InnerContract<'_>) -> Result<T>,
) -> Result<T> {
    let snapshot = args.load()?;
    let contract = InnerContract::new(
        &snapshot.header,
        &snapshot.chain,
        &snapshot.state,
        &config.chain,
    )?
    .with_config(config.governance.clone());
    query(&contract)
}

fn print_address(label: &str, address: Address) {
    println!("{}", json!({ label: address }));
}

fn run(command: Command, config: &CliConfig) -> Result<()> {
    match command {
        Command::Interface => {
            let iface = governance_interface()?;
            for function in iface.functions() {
                println!(
                    "0x{}  {:<32} {}",
                    hex::encode(function.selector()),
                    function.signature(),
                    if function.constant { "view" } else { "nonpayable" }
                );
            }
            for event in iface.events() {
                println!("{}  {}", event.topic(), event.signature());
            }
        }
        Command::IsValid { node_id, snapshot } => {
            let (valid, status) =
                with_contract(&snapshot, config, |c| Ok(c.is_valid(&node_id)?))?;
            info!("Node {} whitelist status: {}", node_id, status);
            println!(
                "{}",
                json!({ "node_id": node_id, "valid": valid, "status": status })
            );
        }
        Command::Coinbase { snapshot } => {
            let coinbase = with_contract(&snapshot, config, |c| Ok(c.coinbase()?))?;
            print_address("coinbase", coinbase);
        }
        Command::RewardAddress { snapshot } => {
            let reward = with_contract(&snapshot, config, |c| Ok(c.reward_address()?))?;
            print_address("reward_address", reward);
        }
        Command::Owner { snapshot } => {
            let owner = with_contract(&snapshot, config, |c| Ok(c.owner()?))?;
            print_address("owner", owner);
        }
        Command::NewOwner { snapshot } => {
            let new_owner = with_contract(&snapshot, config, |c| Ok(c.new_owner()?))?;
            print_address("new_owner", new_owner);
        }
        Command::WhiteList { index, snapshot } => {
            let entry =
                with_contract(&snapshot, config, |c| Ok(c.white_list(U256::from(index))?))?;
            println!("{}", serde_json::to_string(&entry)?);
        }
        Command::Encode { call } => {
            let call = GovernanceCall::from(call);
            let data = call.encode(governance_interface()?)?;
            println!(
                "{}",
                json!({
                    "method": call.method(),
                    "to": config.governance.contract_address,
                    "data": format!("0x{}", hex::encode(data)),
                })
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(level) = &cli.log_level {
        config.logging.level = LogLevel::parse(level);
    }
    init_logging(&config.logging.clone().with_env())?;

    gem_governance::init().context("Governance interface failed validation")?;
    debug!(
        "Governance contract at {} (chain {})",
        config.governance.contract_address, config.chain.chain_id
    );

    run(cli.command, &config)
}
