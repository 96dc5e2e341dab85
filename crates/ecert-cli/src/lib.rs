//! # ecert-cli — Enterprise Certification Command-Line Interface
//!
//! Runs one contract operation per invocation against a ledger snapshot
//! file. The caller identity and its role attribute come from flags, so a
//! shell session can play registrar, certifier and admin in turn.
//!
//! ## Subcommands
//!
//! - `init` — create an empty snapshot
//! - `register`, `certify`, `revoke`, `blacklist`, `unblacklist`
//! - `assign-orgs`, `assign-channels`
//! - `show`, `blacklisted`, `exists`
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from dispatch; dispatch delegates to
//!   `ecert-contract` and holds no lifecycle logic.
//! - The snapshot is rewritten only after a mutating operation succeeds.

pub mod commands;

pub use commands::{run, Cli, Command};
