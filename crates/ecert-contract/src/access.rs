//! # Role Gate
//!
//! Every mutating operation names exactly one required role in
//! [`Operation::required_role`]. The gate resolves the caller, reads the
//! role attribute, and admits the caller only on an exact, case-sensitive
//! match. There is no hierarchy: `admin` does not imply `certifier`.
//!
//! The gate has no side effects and runs before any ledger read.

use serde::{Deserialize, Serialize};

use ecert_core::CallerId;

use crate::error::ContractError;
use crate::identity::IdentityProvider;

/// A role a caller's credential can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May register new enterprises.
    Registrar,
    /// May certify and revoke.
    Certifier,
    /// May blacklist, unblacklist and assign organizations/channels.
    Admin,
}

impl Role {
    /// The attribute value that grants this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registrar => "registrar",
            Self::Certifier => "certifier",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A role-gated contract operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    RegisterEnterprise,
    CertifyEnterprise,
    RevokeCertification,
    BlacklistEnterprise,
    UnblacklistEnterprise,
    AssignOrganizations,
    AssignChannels,
}

impl Operation {
    /// Permission table: the single role allowed to perform each operation.
    pub const fn required_role(self) -> Role {
        match self {
            Self::RegisterEnterprise => Role::Registrar,
            Self::CertifyEnterprise | Self::RevokeCertification => Role::Certifier,
            Self::BlacklistEnterprise
            | Self::UnblacklistEnterprise
            | Self::AssignOrganizations
            | Self::AssignChannels => Role::Admin,
        }
    }

    /// Operation name as exposed on the contract surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RegisterEnterprise => "RegisterEnterprise",
            Self::CertifyEnterprise => "CertifyEnterprise",
            Self::RevokeCertification => "RevokeCertification",
            Self::BlacklistEnterprise => "BlacklistEnterprise",
            Self::UnblacklistEnterprise => "UnblacklistEnterprise",
            Self::AssignOrganizations => "AssignOrganizations",
            Self::AssignChannels => "AssignChannels",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks a caller's role attribute against a required role.
#[derive(Debug, Clone)]
pub struct RoleGate {
    attribute: String,
}

impl RoleGate {
    /// Gate reading the role from the named credential attribute.
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }

    /// Name of the credential attribute holding the role.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Admit the caller iff its role attribute equals `required` exactly.
    ///
    /// Returns the resolved caller id on success.
    pub fn check_role(
        &self,
        identity: &dyn IdentityProvider,
        required: Role,
    ) -> Result<CallerId, ContractError> {
        let caller = identity
            .caller_id()
            .map_err(ContractError::IdentityUnavailable)?;
        let role = identity
            .attribute(&self.attribute)
            .map_err(ContractError::IdentityUnavailable)?
            .ok_or_else(|| ContractError::MissingRoleAttribute {
                caller: caller.clone(),
                attribute: self.attribute.clone(),
            })?;
        if role != required.as_str() {
            tracing::warn!(caller = %caller, role = %role, required = %required, "access denied");
            return Err(ContractError::AccessDenied { caller, required });
        }
        Ok(caller)
    }

    /// Admit the caller for `operation` per the permission table.
    pub fn authorize(
        &self,
        identity: &dyn IdentityProvider,
        operation: Operation,
    ) -> Result<CallerId, ContractError> {
        self.check_role(identity, operation.required_role())
    }
}
