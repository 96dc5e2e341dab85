//! # Certificate ID Generation
//!
//! Certificate ids only need to be unique and ordered for traceability;
//! they are not secrets. The default source derives them from the UTC
//! clock in nanoseconds and bumps past the last issued value whenever the
//! clock has not advanced, so ids from one source are strictly increasing.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use ecert_core::CertificateId;

/// Issues certificate ids.
pub trait CertificateIdSource: Send + Sync {
    /// A fresh id, distinct from every id previously issued by this source.
    fn next_id(&self) -> CertificateId;
}

/// Clock-derived, strictly increasing ids of the form `<prefix>-<n>`.
#[derive(Debug)]
pub struct MonotonicCertificateIds {
    prefix: String,
    last: AtomicU64,
}

impl MonotonicCertificateIds {
    /// Source issuing ids under `prefix`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last: AtomicU64::new(0),
        }
    }

    /// The next sequence value: the clock reading, or one past the last
    /// issued value if the clock has not moved past it.
    fn next_sequence(&self, now: u64) -> u64 {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(previous.saturating_add(1))
    }
}

impl Default for MonotonicCertificateIds {
    fn default() -> Self {
        Self::new("CERT")
    }
}

impl CertificateIdSource for MonotonicCertificateIds {
    fn next_id(&self) -> CertificateId {
        let now = Utc::now()
            .timestamp_nanos_opt()
            .and_then(|n| u64::try_from(n).ok())
            .unwrap_or(0);
        let sequence = self.next_sequence(now);
        CertificateId::new(format!("{}-{}", self.prefix, sequence))
    }
}
