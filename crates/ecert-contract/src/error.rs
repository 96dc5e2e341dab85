//! # Contract Error
//!
//! One error type for the whole operation surface. Every failure is local
//! to the operation that raised it: nothing was written, and nothing is
//! retried. [`ContractError::kind`] classifies an error for callers that
//! only need to know which class of failure occurred.

use thiserror::Error;

use ecert_core::{CallerId, EnterpriseId};
use ecert_state::EnterpriseError;

use crate::access::Role;
use crate::identity::IdentityError;
use crate::ledger::LedgerError;

/// Failure of a contract operation.
#[derive(Error, Debug)]
pub enum ContractError {
    /// The caller's identity could not be resolved.
    #[error("failed to get client identity: {0}")]
    IdentityUnavailable(#[source] IdentityError),

    /// The caller's credential carries no role attribute.
    #[error("client {caller} does not have role attribute {attribute:?}")]
    MissingRoleAttribute {
        /// Resolved caller id.
        caller: CallerId,
        /// Name of the attribute that was looked up.
        attribute: String,
    },

    /// The caller's role does not match the operation's required role.
    #[error("client {caller} does not have required role: {required}")]
    AccessDenied {
        /// Resolved caller id.
        caller: CallerId,
        /// The role the operation requires.
        required: Role,
    },

    /// No record is stored under the id.
    #[error("the enterprise {id} does not exist")]
    NotFound {
        /// The missing key.
        id: EnterpriseId,
    },

    /// Registration against an id that is already taken.
    #[error("the enterprise {id} already exists")]
    AlreadyExists {
        /// The existing key.
        id: EnterpriseId,
    },

    /// The lifecycle transition was rejected.
    #[error(transparent)]
    Transition(#[from] EnterpriseError),

    /// The ledger failed to serve a read or write.
    #[error("failed to access world state: {0}")]
    Store(#[from] LedgerError),

    /// Stored bytes do not decode as an enterprise record.
    #[error("corrupt record at key {key}: {source}")]
    CorruptRecord {
        /// Ledger key of the undecodable value.
        key: String,
        /// Decoder diagnostic.
        #[source]
        source: serde_json::Error,
    },

    /// A decoded record names a different id than the key it is stored under.
    #[error("record at key {key} carries id {id}")]
    KeyMismatch {
        /// Ledger key the record was read from.
        key: String,
        /// The id field inside the record.
        id: EnterpriseId,
    },

    /// A record could not be encoded for storage.
    #[error("failed to encode enterprise {id}: {source}")]
    Encode {
        /// The record's key.
        id: EnterpriseId,
        /// Encoder diagnostic.
        #[source]
        source: serde_json::Error,
    },
}

/// Coarse classification of a [`ContractError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller identity could not be resolved.
    IdentityUnavailable,
    /// Caller lacks the required role or any role at all.
    AccessDenied,
    /// Referenced record does not exist.
    NotFound,
    /// Duplicate registration or transition from an incompatible state.
    Conflict,
    /// Blacklisted record without usable recovery data.
    RecoveryDataMissing,
    /// Argument rejected before any state was touched.
    InvalidInput,
    /// Ledger read/write failure.
    StoreFailure,
    /// Stored record failed to decode.
    CorruptRecord,
}

impl ContractError {
    /// The taxonomy class of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IdentityUnavailable(_) => ErrorKind::IdentityUnavailable,
            Self::MissingRoleAttribute { .. } | Self::AccessDenied { .. } => {
                ErrorKind::AccessDenied
            }
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::Conflict,
            Self::Transition(inner) => match inner {
                EnterpriseError::InvalidTransition { .. }
                | EnterpriseError::AlreadyBlacklisted { .. }
                | EnterpriseError::NotBlacklisted { .. } => ErrorKind::Conflict,
                EnterpriseError::RecoveryDataMissing { .. } => ErrorKind::RecoveryDataMissing,
                EnterpriseError::ReservedMarker { .. } => ErrorKind::InvalidInput,
            },
            Self::Store(_) | Self::Encode { .. } => ErrorKind::StoreFailure,
            Self::CorruptRecord { .. } | Self::KeyMismatch { .. } => ErrorKind::CorruptRecord,
        }
    }
}
