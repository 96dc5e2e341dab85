//! # ecert-contract — Enterprise Certification Contract
//!
//! The operation surface of the certification ledger. Every mutating
//! operation follows the same shape:
//!
//! ```text
//! role gate ──▶ read record ──▶ validate + compute next record ──▶ single put
//! ```
//!
//! The gate runs before anything is read. No operation touches more than one
//! key, and nothing is written until the transition has been validated, so a
//! failed operation leaves the ledger exactly as it found it.
//!
//! ## Collaborators
//!
//! - [`Ledger`] — the replicated key-value store (`get`/`put`/selector query).
//!   [`MemoryLedger`] is an in-process implementation used by the CLI and tests.
//! - [`IdentityProvider`] — resolves the caller id and its `role` attribute.
//! - [`CertificateIdSource`] — issues certificate ids on certification.
//!
//! ## Crate Policy
//!
//! - No retries and no timeouts: ledger failures surface to the caller as-is.
//! - No `.unwrap()` outside tests.

pub mod access;
pub mod certificate;
pub mod config;
pub mod contract;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod query;
pub mod store;

pub use access::{Operation, Role, RoleGate};
pub use certificate::{CertificateIdSource, MonotonicCertificateIds};
pub use config::{ConfigError, ContractConfig};
pub use contract::CertificationContract;
pub use error::{ContractError, ErrorKind};
pub use identity::{IdentityError, IdentityProvider, StaticIdentity};
pub use ledger::{Ledger, LedgerError, MemoryLedger, Selector};
pub use query::QueryService;
pub use store::RecordStore;
