//! # Identity Collaborator
//!
//! Credential issuance and verification happen outside this crate. The
//! contract only needs the caller's identity handle and the string value of
//! a named attribute bound to the caller's credential.

use std::collections::BTreeMap;

use thiserror::Error;

use ecert_core::CallerId;

/// Failure to resolve caller identity or attributes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No identity is bound to the current invocation.
    #[error("no client identity bound to this invocation")]
    NoIdentity,

    /// The credential could not be read or parsed.
    #[error("credential unreadable: {0}")]
    Credential(String),
}

/// Resolves the identity of the current caller.
pub trait IdentityProvider {
    /// The caller's identity handle.
    fn caller_id(&self) -> Result<CallerId, IdentityError>;

    /// Value of the named attribute on the caller's credential, or `None`
    /// if the credential does not carry it.
    fn attribute(&self, name: &str) -> Result<Option<String>, IdentityError>;
}

/// Identity with a fixed id and attribute set.
///
/// Used by the CLI, where the caller is given on the command line, and in
/// tests.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    id: Option<CallerId>,
    attributes: BTreeMap<String, String>,
}

impl StaticIdentity {
    /// An identity with no attributes.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(CallerId::new(id)),
            attributes: BTreeMap::new(),
        }
    }

    /// An invocation with no resolvable identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Add or replace an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

impl IdentityProvider for StaticIdentity {
    fn caller_id(&self) -> Result<CallerId, IdentityError> {
        self.id.clone().ok_or(IdentityError::NoIdentity)
    }

    fn attribute(&self, name: &str) -> Result<Option<String>, IdentityError> {
        if self.id.is_none() {
            return Err(IdentityError::NoIdentity);
        }
        Ok(self.attributes.get(name).cloned())
    }
}
