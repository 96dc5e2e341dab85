//! # Query Service
//!
//! Read-only multi-record lookups. Builds a fixed selector and returns the
//! decoded matches; no pagination, ordering, or further filtering.

use ecert_state::{Enterprise, EnterpriseState, DOC_TYPE};

use crate::error::ContractError;
use crate::ledger::{Ledger, Selector};
use crate::store::RecordStore;

/// Selector-backed lookups over a [`RecordStore`].
#[derive(Debug)]
pub struct QueryService<'a, L> {
    store: &'a RecordStore<L>,
}

impl<'a, L: Ledger> QueryService<'a, L> {
    /// Query service over `store`.
    pub fn new(store: &'a RecordStore<L>) -> Self {
        Self { store }
    }

    /// Selector matching enterprise documents in `state`.
    pub fn state_selector(state: EnterpriseState) -> Selector {
        Selector::new()
            .field("docType", DOC_TYPE)
            .field("state", state.as_str())
    }

    /// All enterprises currently in `state`. Order is unspecified.
    pub fn in_state(&self, state: EnterpriseState) -> Result<Vec<Enterprise>, ContractError> {
        self.store.query(&Self::state_selector(state))
    }

    /// All blacklisted enterprises. Order is unspecified.
    pub fn blacklisted(&self) -> Result<Vec<Enterprise>, ContractError> {
        self.in_state(EnterpriseState::Blacklisted)
    }
}
