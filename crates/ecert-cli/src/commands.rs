//! Argument definitions and dispatch.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use ecert_contract::{CertificationContract, ContractConfig, MemoryLedger, StaticIdentity};
use ecert_core::EnterpriseId;

/// Enterprise certification ledger CLI.
///
/// Registers, certifies, revokes, blacklists and restores enterprise
/// records in a JSON ledger snapshot, enforcing the same role rules as the
/// deployed contract.
#[derive(Parser, Debug)]
#[command(name = "ecert", version, about)]
pub struct Cli {
    /// Ledger snapshot file.
    #[arg(long, global = true, default_value = "ledger.json")]
    pub ledger: PathBuf,

    #[command(flatten)]
    pub caller: CallerArgs,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Identity of the invoking caller.
#[derive(Args, Debug, Clone)]
pub struct CallerArgs {
    /// Caller identity.
    #[arg(long, global = true, default_value = "cli")]
    pub caller: String,

    /// Value of the caller's role attribute. Omit for a credential with no role.
    #[arg(long, global = true)]
    pub role: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the snapshot file if it does not exist.
    Init,
    /// Register a new enterprise (role: registrar).
    Register {
        id: String,
        name: String,
        #[arg(default_value = "")]
        details: String,
    },
    /// Certify a registered enterprise (role: certifier).
    Certify { id: String },
    /// Revoke a certification (role: certifier).
    Revoke {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Blacklist an enterprise (role: admin).
    Blacklist {
        id: String,
        #[arg(long)]
        reason: String,
    },
    /// Restore a blacklisted enterprise (role: admin).
    Unblacklist { id: String },
    /// Replace the organization list (role: admin).
    AssignOrgs {
        id: String,
        #[arg(value_delimiter = ',')]
        organizations: Vec<String>,
    },
    /// Replace the channel list (role: admin).
    AssignChannels {
        id: String,
        #[arg(value_delimiter = ',')]
        channels: Vec<String>,
    },
    /// Print one enterprise record.
    Show { id: String },
    /// Print every blacklisted enterprise.
    Blacklisted,
    /// Report whether an enterprise exists.
    Exists { id: String },
}

impl Command {
    fn mutates(&self) -> bool {
        !matches!(
            self,
            Self::Show { .. } | Self::Blacklisted | Self::Exists { .. }
        )
    }
}

impl CallerArgs {
    fn identity(&self, attribute: &str) -> StaticIdentity {
        let identity = StaticIdentity::new(self.caller.clone());
        match &self.role {
            Some(role) => identity.with_attribute(attribute, role.clone()),
            None => identity,
        }
    }
}

fn parse_id(raw: &str) -> anyhow::Result<EnterpriseId> {
    EnterpriseId::new(raw).with_context(|| format!("invalid enterprise id {raw:?}"))
}

/// Execute one command and return its JSON output.
pub fn run(cli: Cli) -> anyhow::Result<String> {
    let config = ContractConfig::from_env().context("loading contract configuration")?;
    let ledger = Arc::new(
        MemoryLedger::load_or_default(&cli.ledger)
            .with_context(|| format!("loading ledger snapshot {}", cli.ledger.display()))?,
    );
    let contract = CertificationContract::new(Arc::clone(&ledger), &config);
    let caller = cli.caller.identity(&config.role_attribute);
    tracing::debug!(ledger = %cli.ledger.display(), command = ?cli.command, "dispatching");

    let output = match &cli.command {
        Command::Init => {
            contract.init_ledger()?;
            serde_json::json!({ "ledger": cli.ledger.display().to_string(), "records": ledger.len() })
        }
        Command::Register { id, name, details } => serde_json::to_value(
            contract.register_enterprise(&caller, &parse_id(id)?, name, details)?,
        )?,
        Command::Certify { id } => {
            serde_json::to_value(contract.certify_enterprise(&caller, &parse_id(id)?)?)?
        }
        Command::Revoke { id, reason } => serde_json::to_value(
            contract.revoke_certification(&caller, &parse_id(id)?, reason)?,
        )?,
        Command::Blacklist { id, reason } => serde_json::to_value(
            contract.blacklist_enterprise(&caller, &parse_id(id)?, reason)?,
        )?,
        Command::Unblacklist { id } => {
            serde_json::to_value(contract.unblacklist_enterprise(&caller, &parse_id(id)?)?)?
        }
        Command::AssignOrgs { id, organizations } => serde_json::to_value(
            contract.assign_organizations(&caller, &parse_id(id)?, organizations.clone())?,
        )?,
        Command::AssignChannels { id, channels } => serde_json::to_value(
            contract.assign_channels(&caller, &parse_id(id)?, channels.clone())?,
        )?,
        Command::Show { id } => serde_json::to_value(contract.query_enterprise(&parse_id(id)?)?)?,
        Command::Blacklisted => serde_json::to_value(contract.query_blacklisted_enterprises()?)?,
        Command::Exists { id } => {
            serde_json::json!({ "exists": contract.enterprise_exists(&parse_id(id)?)? })
        }
    };

    if cli.command.mutates() {
        ledger
            .save(&cli.ledger)
            .with_context(|| format!("writing ledger snapshot {}", cli.ledger.display()))?;
    }

    Ok(serde_json::to_string_pretty(&output)?)
}
