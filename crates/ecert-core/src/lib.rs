//! # ecert-core — Foundational Types for Enterprise Certification
//!
//! Leaf crate of the workspace. Defines the primitives every other crate
//! builds on: identifier newtypes for enterprises, certificates and callers,
//! and a UTC-only [`Timestamp`] that carries an explicit zero value for
//! record fields that are defined but not yet set.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ecert-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod temporal;

pub use error::CoreError;
pub use identity::{CallerId, CertificateId, EnterpriseId};
pub use temporal::Timestamp;
