//! # Ledger Collaborator
//!
//! The contract consumes the replicated ledger through three calls: read a
//! key, write a key, and evaluate a document selector. Durability, ordering
//! and conflict resolution belong to the ledger, not to this crate.
//!
//! [`MemoryLedger`] implements the contract in-process over a
//! `parking_lot::RwLock`, with JSON snapshot load/save for the CLI.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors reported by a ledger implementation.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The ledger could not serve the request.
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// Snapshot file could not be read or written.
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot contents are not a JSON object of documents.
    #[error("invalid snapshot: {0}")]
    Snapshot(String),
}

/// Key-value ledger with document selector queries.
///
/// Implementations must make `put_state` atomic per key. Reads observe all
/// writes previously made through the same handle.
pub trait Ledger: Send + Sync {
    /// Read the value stored at `key`, or `None` if absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Store `value` at `key`, replacing any previous value.
    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError>;

    /// Return `(key, value)` for every stored JSON document matching `selector`.
    ///
    /// No match is an empty vector, not an error. Result order is unspecified.
    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError>;
}

impl<L: Ledger + ?Sized> Ledger for Arc<L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        (**self).get_state(key)
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        (**self).put_state(key, value)
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        (**self).query(selector)
    }
}

// ─── Selector ────────────────────────────────────────────────────────

/// Document filter made of nested key/value equality predicates,
/// e.g. `{"docType":"enterprise","state":"BLACKLISTED"}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selector {
    predicates: Map<String, Value>,
}

impl Selector {
    /// An empty selector, which matches every JSON object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality predicate on a top-level field.
    ///
    /// An object value matches nested fields recursively.
    pub fn field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.insert(field.into(), value.into());
        self
    }

    /// The predicates as a JSON object.
    pub fn predicates(&self) -> &Map<String, Value> {
        &self.predicates
    }

    /// Render as a rich query string: `{"selector":{...}}`.
    pub fn to_query_string(&self) -> String {
        serde_json::json!({ "selector": self.predicates }).to_string()
    }

    /// Whether `document` satisfies every predicate.
    pub fn matches(&self, document: &Value) -> bool {
        object_matches(&self.predicates, document)
    }
}

fn object_matches(predicates: &Map<String, Value>, document: &Value) -> bool {
    let Some(fields) = document.as_object() else {
        return false;
    };
    predicates.iter().all(|(key, expected)| match (expected, fields.get(key)) {
        (Value::Object(nested), Some(actual)) => object_matches(nested, actual),
        (_, Some(actual)) => actual == expected,
        (_, None) => false,
    })
}

// ─── In-Memory Ledger ────────────────────────────────────────────────

/// Thread-safe in-memory ledger.
///
/// Keys are kept ordered so snapshots are stable across saves.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    data: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a ledger from a JSON snapshot: an object mapping each key to
    /// its stored document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let raw = std::fs::read(path)?;
        let snapshot: BTreeMap<String, Value> = serde_json::from_slice(&raw)
            .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        let mut data = BTreeMap::new();
        for (key, document) in snapshot {
            let bytes = serde_json::to_vec(&document)
                .map_err(|e| LedgerError::Snapshot(format!("{key}: {e}")))?;
            data.insert(key, bytes);
        }
        Ok(Self {
            data: RwLock::new(data),
        })
    }

    /// Load a snapshot if the file exists, otherwise start empty.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Write the ledger contents to `path` as a pretty-printed JSON snapshot.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LedgerError> {
        let guard = self.data.read();
        let mut snapshot = Map::new();
        for (key, bytes) in guard.iter() {
            let document: Value = serde_json::from_slice(bytes)
                .map_err(|e| LedgerError::Snapshot(format!("{key} is not a JSON document: {e}")))?;
            snapshot.insert(key.clone(), document);
        }
        let rendered = serde_json::to_vec_pretty(&Value::Object(snapshot))
            .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        std::fs::write(path, rendered)?;
        Ok(())
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Ledger for MemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put_state(&self, key: &str, value: Vec<u8>) -> Result<(), LedgerError> {
        if key.is_empty() {
            return Err(LedgerError::Unavailable("key must not be empty".to_string()));
        }
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    fn query(&self, selector: &Selector) -> Result<Vec<(String, Vec<u8>)>, LedgerError> {
        let guard = self.data.read();
        Ok(guard
            .iter()
            .filter(|(_, bytes)| {
                // Non-JSON values are invisible to selector queries.
                serde_json::from_slice::<Value>(bytes)
                    .map(|doc| selector.matches(&doc))
                    .unwrap_or(false)
            })
            .map(|(key, bytes)| (key.clone(), bytes.clone()))
            .collect())
    }
}
