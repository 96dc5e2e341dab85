//! # ecert-state — Enterprise Certification State Machine
//!
//! The domain core. An [`Enterprise`] record moves through
//!
//! ```text
//! REGISTERED ──certify──▶ CERTIFIED ──revoke──▶ REVOKED
//!      │                      │                    │
//!      └──────────blacklist───┴────────────────────┘
//!                             ▼
//!                        BLACKLISTED ──unblacklist──▶ (state before blacklisting)
//! ```
//!
//! Every transition is a `&mut self` method returning `Result`; a rejected
//! transition leaves the record untouched. Callers are expected to read the
//! record, apply exactly one transition, and write it back.
//!
//! ## Design
//!
//! The record is an enum-tagged struct rather than a typestate, because it
//! round-trips through an untyped ledger on every operation and its state is
//! only known after deserialization.

pub mod enterprise;
mod wire;

pub use enterprise::{
    Enterprise, EnterpriseError, EnterpriseState, DOC_TYPE, LEGACY_RECOVERY_MARKER,
};
