//! # Record Store Adapter
//!
//! Typed view of the ledger: enterprise records in, enterprise records out.
//! A record is addressed by its id and nothing else, so a stored value whose
//! `id` field disagrees with its key is rejected on read
//! ([`ContractError::KeyMismatch`]). Decoding failures surface as
//! [`ContractError::CorruptRecord`]. Both are fatal to the current operation.

use ecert_core::EnterpriseId;
use ecert_state::Enterprise;

use crate::error::ContractError;
use crate::ledger::{Ledger, Selector};

/// Enterprise records stored by id in a [`Ledger`].
#[derive(Debug)]
pub struct RecordStore<L> {
    ledger: L,
}

impl<L: Ledger> RecordStore<L> {
    /// Wrap a ledger.
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    /// The underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Whether a record is stored under `id`.
    pub fn exists(&self, id: &EnterpriseId) -> Result<bool, ContractError> {
        Ok(self.ledger.get_state(id.as_str())?.is_some())
    }

    /// Read and decode the record stored under `id`.
    pub fn get(&self, id: &EnterpriseId) -> Result<Enterprise, ContractError> {
        let bytes = self
            .ledger
            .get_state(id.as_str())?
            .ok_or_else(|| ContractError::NotFound { id: id.clone() })?;
        tracing::debug!(enterprise = %id, bytes = bytes.len(), "read record");
        decode(id.as_str(), &bytes)
    }

    /// Encode and store a record under its own id.
    pub fn put(&self, enterprise: &Enterprise) -> Result<(), ContractError> {
        let bytes = serde_json::to_vec(enterprise).map_err(|source| ContractError::Encode {
            id: enterprise.id.clone(),
            source,
        })?;
        tracing::debug!(enterprise = %enterprise.id, bytes = bytes.len(), "write record");
        self.ledger.put_state(enterprise.id.as_str(), bytes)?;
        Ok(())
    }

    /// Evaluate `selector` and decode every matching record.
    pub fn query(&self, selector: &Selector) -> Result<Vec<Enterprise>, ContractError> {
        tracing::debug!(query = %selector.to_query_string(), "selector query");
        self.ledger
            .query(selector)?
            .into_iter()
            .map(|(key, bytes)| decode(&key, &bytes))
            .collect()
    }
}

fn decode(key: &str, bytes: &[u8]) -> Result<Enterprise, ContractError> {
    let enterprise: Enterprise =
        serde_json::from_slice(bytes).map_err(|source| ContractError::CorruptRecord {
            key: key.to_string(),
            source,
        })?;
    if enterprise.id.as_str() != key {
        return Err(ContractError::KeyMismatch {
            key: key.to_string(),
            id: enterprise.id,
        });
    }
    Ok(enterprise)
}
