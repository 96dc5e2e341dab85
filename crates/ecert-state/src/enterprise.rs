//! # Enterprise Certification Lifecycle
//!
//! The sole record type of the ledger and the transitions that mutate it.
//!
//! ## Recovering the Pre-Blacklist State
//!
//! Blacklisting must be reversible: unblacklisting puts the record back into
//! whatever state it was in before. The prior state is kept in the explicit
//! `previousState` field. Records written by the earlier encoding instead
//! carry it appended to `details` behind [`LEGACY_RECOVERY_MARKER`]; those
//! are still decoded on unblacklist, but nothing in this crate writes the
//! marker any more.
//!
//! ## Wire Format
//!
//! Field names are fixed by the ledger documents already in circulation
//! (`docType`, `certificateId`, `blacklistReason`, ...). Unset identifiers
//! serialize as `""`, unset timestamps as `0001-01-01T00:00:00Z`.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ecert_core::{CallerId, CertificateId, CoreError, EnterpriseId, Timestamp};

/// Value of the `docType` field on every enterprise document.
pub const DOC_TYPE: &str = "enterprise";

/// Delimiter the legacy encoding placed between the original `details`
/// text and the name of the pre-blacklist state.
pub const LEGACY_RECOVERY_MARKER: &str = "|PREVIOUS_STATE:";

// ─── Enterprise State ────────────────────────────────────────────────

/// Certification state of an enterprise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnterpriseState {
    /// Registered, awaiting certification.
    Registered,
    /// Holds a current certificate.
    Certified,
    /// Certificate withdrawn. No path back to an active state.
    Revoked,
    /// Suspended by an administrator; the prior state is recoverable.
    Blacklisted,
}

impl EnterpriseState {
    /// All states, in lifecycle order.
    pub const ALL: [EnterpriseState; 4] = [
        Self::Registered,
        Self::Certified,
        Self::Revoked,
        Self::Blacklisted,
    ];

    /// Wire name of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "REGISTERED",
            Self::Certified => "CERTIFIED",
            Self::Revoked => "REVOKED",
            Self::Blacklisted => "BLACKLISTED",
        }
    }
}

impl std::fmt::Display for EnterpriseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnterpriseState {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| CoreError::UnknownState(s.to_string()))
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by enterprise lifecycle transitions.
///
/// A transition that returns an error has not modified the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnterpriseError {
    /// The transition is not permitted from the record's current state.
    #[error("enterprise {id} is {from}; cannot move to {to}")]
    InvalidTransition {
        /// The enterprise key.
        id: EnterpriseId,
        /// Current state.
        from: EnterpriseState,
        /// Attempted target state.
        to: EnterpriseState,
    },

    /// Blacklisting a record that is already blacklisted.
    #[error("enterprise {id} is already blacklisted")]
    AlreadyBlacklisted {
        /// The enterprise key.
        id: EnterpriseId,
    },

    /// Unblacklisting a record that is not blacklisted.
    #[error("enterprise {id} is {state}, not BLACKLISTED")]
    NotBlacklisted {
        /// The enterprise key.
        id: EnterpriseId,
        /// Current state.
        state: EnterpriseState,
    },

    /// A blacklisted record carries no usable pre-blacklist state.
    #[error("unable to determine previous state for enterprise {id}")]
    RecoveryDataMissing {
        /// The enterprise key.
        id: EnterpriseId,
    },

    /// Free text contains the reserved recovery delimiter.
    #[error("details of enterprise {id} must not contain {marker:?}")]
    ReservedMarker {
        /// The enterprise key.
        id: EnterpriseId,
        /// The reserved delimiter.
        marker: &'static str,
    },
}

// ─── Enterprise ──────────────────────────────────────────────────────

/// An enterprise certification record, exactly as stored under its `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enterprise {
    /// Always [`DOC_TYPE`]; lets selector queries tell record kinds apart.
    pub doc_type: String,
    /// Ledger key.
    pub id: EnterpriseId,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub details: String,
    /// Current certification state.
    pub state: EnterpriseState,
    /// Set on certification.
    #[serde(default, with = "crate::wire::empty_as_none")]
    pub certificate_id: Option<CertificateId>,
    #[serde(default)]
    pub certification_date: Timestamp,
    /// Caller that performed the certification.
    #[serde(default, with = "crate::wire::empty_as_none")]
    pub certified_by: Option<CallerId>,
    #[serde(default)]
    pub revocation_date: Timestamp,
    #[serde(default)]
    pub revocation_reason: String,
    #[serde(default)]
    pub blacklist_date: Timestamp,
    #[serde(default)]
    pub blacklist_reason: String,
    /// Organization identifiers, in the order the administrator supplied.
    #[serde(default, deserialize_with = "crate::wire::null_as_empty")]
    pub organizations: Vec<String>,
    /// Channel identifiers, in the order the administrator supplied.
    #[serde(default, deserialize_with = "crate::wire::null_as_empty")]
    pub channels: Vec<String>,
    pub created_at: Timestamp,
    /// Refreshed by every mutation.
    pub updated_at: Timestamp,
    /// State held immediately before blacklisting. Present only while
    /// the record is blacklisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_state: Option<EnterpriseState>,
}

impl Enterprise {
    /// Create a freshly registered record (→ REGISTERED).
    ///
    /// Rejects `details` containing [`LEGACY_RECOVERY_MARKER`], so the
    /// marker can only ever appear in records produced by the old encoding.
    pub fn register(
        id: EnterpriseId,
        name: String,
        details: String,
        now: Timestamp,
    ) -> Result<Self, EnterpriseError> {
        if details.contains(LEGACY_RECOVERY_MARKER) {
            return Err(EnterpriseError::ReservedMarker {
                id,
                marker: LEGACY_RECOVERY_MARKER,
            });
        }
        Ok(Self {
            doc_type: DOC_TYPE.to_string(),
            id,
            name,
            details,
            state: EnterpriseState::Registered,
            certificate_id: None,
            certification_date: Timestamp::ZERO,
            certified_by: None,
            revocation_date: Timestamp::ZERO,
            revocation_reason: String::new(),
            blacklist_date: Timestamp::ZERO,
            blacklist_reason: String::new(),
            organizations: Vec::new(),
            channels: Vec::new(),
            created_at: now,
            updated_at: now,
            previous_state: None,
        })
    }

    /// Certify a registered enterprise (REGISTERED → CERTIFIED).
    ///
    /// `issue` is called only once the transition is known to be legal.
    pub fn certify(
        &mut self,
        issue: impl FnOnce() -> CertificateId,
        certified_by: CallerId,
        now: Timestamp,
    ) -> Result<(), EnterpriseError> {
        self.require_state(EnterpriseState::Registered, EnterpriseState::Certified)?;
        self.state = EnterpriseState::Certified;
        self.certificate_id = Some(issue());
        self.certified_by = Some(certified_by);
        self.certification_date = now;
        self.updated_at = now;
        Ok(())
    }

    /// Revoke a certification (CERTIFIED → REVOKED).
    pub fn revoke(&mut self, reason: String, now: Timestamp) -> Result<(), EnterpriseError> {
        self.require_state(EnterpriseState::Certified, EnterpriseState::Revoked)?;
        self.state = EnterpriseState::Revoked;
        self.revocation_reason = reason;
        self.revocation_date = now;
        self.updated_at = now;
        Ok(())
    }

    /// Blacklist the enterprise from any non-blacklisted state.
    ///
    /// The current state is kept in `previous_state`; `details` is not
    /// touched.
    pub fn blacklist(&mut self, reason: String, now: Timestamp) -> Result<(), EnterpriseError> {
        if self.state == EnterpriseState::Blacklisted {
            return Err(EnterpriseError::AlreadyBlacklisted {
                id: self.id.clone(),
            });
        }
        self.previous_state = Some(self.state);
        self.state = EnterpriseState::Blacklisted;
        self.blacklist_reason = reason;
        self.blacklist_date = now;
        self.updated_at = now;
        Ok(())
    }

    /// Restore a blacklisted enterprise to its pre-blacklist state.
    ///
    /// Clears the blacklist date and reason. For legacy records the
    /// recovery suffix is also stripped from `details`.
    pub fn unblacklist(&mut self, now: Timestamp) -> Result<EnterpriseState, EnterpriseError> {
        if self.state != EnterpriseState::Blacklisted {
            return Err(EnterpriseError::NotBlacklisted {
                id: self.id.clone(),
                state: self.state,
            });
        }
        let (restored, details) = self.recover_previous_state()?;
        self.state = restored;
        if let Some(details) = details {
            self.details = details;
        }
        self.previous_state = None;
        self.blacklist_reason.clear();
        self.blacklist_date = Timestamp::ZERO;
        self.updated_at = now;
        Ok(restored)
    }

    /// Replace the organization list wholesale. Members are not validated.
    pub fn assign_organizations(&mut self, organizations: Vec<String>, now: Timestamp) {
        self.organizations = organizations;
        self.updated_at = now;
    }

    /// Replace the channel list wholesale. Members are not validated.
    pub fn assign_channels(&mut self, channels: Vec<String>, now: Timestamp) {
        self.channels = channels;
        self.updated_at = now;
    }

    /// Whether the record currently holds a valid certificate.
    pub fn is_certified(&self) -> bool {
        self.state == EnterpriseState::Certified
    }

    /// Decode the pre-blacklist state, and for legacy records the original
    /// `details` text.
    fn recover_previous_state(
        &self,
    ) -> Result<(EnterpriseState, Option<String>), EnterpriseError> {
        let missing = || EnterpriseError::RecoveryDataMissing {
            id: self.id.clone(),
        };

        if let Some(previous) = self.previous_state {
            if previous == EnterpriseState::Blacklisted {
                return Err(missing());
            }
            return Ok((previous, None));
        }

        let parts: Vec<&str> = self.details.split(LEGACY_RECOVERY_MARKER).collect();
        let [original, state_name] = parts.as_slice() else {
            return Err(missing());
        };
        match state_name.parse::<EnterpriseState>() {
            Ok(EnterpriseState::Blacklisted) | Err(_) => Err(missing()),
            Ok(previous) => Ok((previous, Some((*original).to_string()))),
        }
    }

    fn require_state(
        &self,
        expected: EnterpriseState,
        target: EnterpriseState,
    ) -> Result<(), EnterpriseError> {
        if self.state != expected {
            return Err(EnterpriseError::InvalidTransition {
                id: self.id.clone(),
                from: self.state,
                to: target,
            });
        }
        Ok(())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn t0() -> Timestamp {
        ts("2026-03-01T09:00:00Z")
    }

    fn t1() -> Timestamp {
        ts("2026-03-02T09:00:00Z")
    }

    fn make_registered(details: &str) -> Enterprise {
        Enterprise::register(
            EnterpriseId::new("E1").unwrap(),
            "Acme".to_string(),
            details.to_string(),
            t0(),
        )
        .unwrap()
    }

    fn make_certified() -> Enterprise {
        let mut e = make_registered("desc");
        e.certify(|| CertificateId::new("CERT-1"), CallerId::new("certifier-1"), t1())
            .unwrap();
        e
    }

    // ── Happy-path lifecycle tests ───────────────────────────────────

    #[test]
    fn test_register_sets_defaults() {
        let e = make_registered("desc");
        assert_eq!(e.doc_type, DOC_TYPE);
        assert_eq!(e.state, EnterpriseState::Registered);
        assert!(e.organizations.is_empty());
        assert!(e.channels.is_empty());
        assert!(e.certificate_id.is_none());
        assert!(e.revocation_date.is_zero());
        assert_eq!(e.created_at, t0());
        assert_eq!(e.updated_at, t0());
    }

    #[test]
    fn test_register_rejects_marker_in_details() {
        let result = Enterprise::register(
            EnterpriseId::new("E1").unwrap(),
            "Acme".to_string(),
            "x|PREVIOUS_STATE:CERTIFIED".to_string(),
            t0(),
        );
        assert!(matches!(result, Err(EnterpriseError::ReservedMarker { .. })));
    }

    #[test]
    fn test_certify_from_registered() {
        let e = make_certified();
        assert_eq!(e.state, EnterpriseState::Certified);
        assert_eq!(e.certificate_id, Some(CertificateId::new("CERT-1")));
        assert_eq!(e.certified_by, Some(CallerId::new("certifier-1")));
        assert_eq!(e.certification_date, t1());
        assert_eq!(e.updated_at, t1());
        assert!(e.is_certified());
    }

    #[test]
    fn test_revoke_from_certified() {
        let mut e = make_certified();
        e.revoke("expired audit".to_string(), t1()).unwrap();
        assert_eq!(e.state, EnterpriseState::Revoked);
        assert_eq!(e.revocation_reason, "expired audit");
        assert_eq!(e.revocation_date, t1());
    }

    #[test]
    fn test_blacklist_keeps_details_and_records_previous_state() {
        let mut e = make_certified();
        e.blacklist("fraud".to_string(), t1()).unwrap();
        assert_eq!(e.state, EnterpriseState::Blacklisted);
        assert_eq!(e.previous_state, Some(EnterpriseState::Certified));
        assert_eq!(e.details, "desc");
        assert_eq!(e.blacklist_reason, "fraud");
        assert_eq!(e.blacklist_date, t1());
    }

    #[test]
    fn test_unblacklist_restores_and_clears() {
        let mut e = make_certified();
        e.blacklist("fraud".to_string(), t0()).unwrap();
        let restored = e.unblacklist(t1()).unwrap();
        assert_eq!(restored, EnterpriseState::Certified);
        assert_eq!(e.state, EnterpriseState::Certified);
        assert_eq!(e.details, "desc");
        assert_eq!(e.blacklist_reason, "");
        assert!(e.blacklist_date.is_zero());
        assert!(e.previous_state.is_none());
        assert_eq!(e.updated_at, t1());
    }

    #[test]
    fn test_blacklist_from_revoked_restores_revoked() {
        let mut e = make_certified();
        e.revoke("r".to_string(), t1()).unwrap();
        e.blacklist("b".to_string(), t1()).unwrap();
        e.unblacklist(t1()).unwrap();
        assert_eq!(e.state, EnterpriseState::Revoked);
    }

    #[test]
    fn test_assign_replaces_wholesale() {
        let mut e = make_registered("desc");
        e.assign_organizations(vec!["org-b".into(), "org-a".into()], t1());
        e.assign_organizations(vec!["org-c".into()], t1());
        assert_eq!(e.organizations, vec!["org-c".to_string()]);
        e.assign_channels(vec!["ch-2".into(), "ch-1".into()], t1());
        assert_eq!(e.channels, vec!["ch-2".to_string(), "ch-1".to_string()]);
        assert_eq!(e.updated_at, t1());
    }

    // ── Invalid transition tests ─────────────────────────────────────

    #[test]
    fn test_cannot_certify_twice() {
        let mut e = make_certified();
        let before = e.clone();
        let err = e
            .certify(|| CertificateId::new("CERT-2"), CallerId::new("c"), t1())
            .unwrap_err();
        assert_eq!(
            err,
            EnterpriseError::InvalidTransition {
                id: EnterpriseId::new("E1").unwrap(),
                from: EnterpriseState::Certified,
                to: EnterpriseState::Certified,
            }
        );
        assert_eq!(e, before);
    }

    #[test]
    fn test_cannot_certify_blacklisted() {
        let mut e = make_registered("desc");
        e.blacklist("b".to_string(), t1()).unwrap();
        assert!(e
            .certify(|| CertificateId::new("CERT-2"), CallerId::new("c"), t1())
            .is_err());
    }

    #[test]
    fn test_rejected_certify_does_not_issue() {
        let mut e = make_certified();
        let mut issued = false;
        let result = e.certify(
            || {
                issued = true;
                CertificateId::new("CERT-3")
            },
            CallerId::new("c"),
            t1(),
        );
        assert!(result.is_err());
        assert!(!issued);
        assert_eq!(e.certificate_id, Some(CertificateId::new("CERT-1")));
    }

    #[test]
    fn test_cannot_revoke_registered() {
        let mut e = make_registered("desc");
        assert!(e.revoke("r".to_string(), t1()).is_err());
        assert_eq!(e.state, EnterpriseState::Registered);
    }

    #[test]
    fn test_cannot_blacklist_twice() {
        let mut e = make_certified();
        e.blacklist("first".to_string(), t1()).unwrap();
        let before = e.clone();
        let err = e.blacklist("second".to_string(), t1()).unwrap_err();
        assert!(matches!(err, EnterpriseError::AlreadyBlacklisted { .. }));
        assert_eq!(e, before);
    }

    #[test]
    fn test_unblacklist_requires_blacklisted() {
        let mut e = make_certified();
        let before = e.clone();
        assert_eq!(
            e.unblacklist(t1()),
            Err(EnterpriseError::NotBlacklisted {
                id: EnterpriseId::new("E1").unwrap(),
                state: EnterpriseState::Certified,
            })
        );
        assert_eq!(e, before);
    }

    // ── Legacy recovery encoding ─────────────────────────────────────

    fn legacy_blacklisted(details: &str) -> Enterprise {
        let mut e = make_registered("placeholder");
        e.state = EnterpriseState::Blacklisted;
        e.details = details.to_string();
        e.blacklist_reason = "fraud".to_string();
        e.blacklist_date = t0();
        e
    }

    #[test]
    fn test_legacy_marker_is_decoded() {
        let mut e = legacy_blacklisted("desc|PREVIOUS_STATE:CERTIFIED");
        e.unblacklist(t1()).unwrap();
        assert_eq!(e.state, EnterpriseState::Certified);
        assert_eq!(e.details, "desc");
        assert_eq!(e.blacklist_reason, "");
    }

    #[test]
    fn test_legacy_without_marker_is_missing() {
        let mut e = legacy_blacklisted("desc");
        let before = e.clone();
        assert!(matches!(
            e.unblacklist(t1()),
            Err(EnterpriseError::RecoveryDataMissing { .. })
        ));
        assert_eq!(e, before);
    }

    #[test]
    fn test_legacy_double_marker_is_missing() {
        let mut e =
            legacy_blacklisted("desc|PREVIOUS_STATE:REGISTERED|PREVIOUS_STATE:BLACKLISTED");
        assert!(matches!(
            e.unblacklist(t1()),
            Err(EnterpriseError::RecoveryDataMissing { .. })
        ));
    }

    #[test]
    fn test_legacy_unknown_state_is_missing() {
        let mut e = legacy_blacklisted("desc|PREVIOUS_STATE:ACTIVE");
        assert!(matches!(
            e.unblacklist(t1()),
            Err(EnterpriseError::RecoveryDataMissing { .. })
        ));
    }

    // ── Display / parsing ────────────────────────────────────────────

    #[test]
    fn test_state_display_and_parse() {
        for state in EnterpriseState::ALL {
            assert_eq!(state.to_string().parse::<EnterpriseState>().unwrap(), state);
        }
        assert!("registered".parse::<EnterpriseState>().is_err());
    }

    // ── Serialization tests ──────────────────────────────────────────

    #[test]
    fn test_wire_field_names() {
        let e = make_certified();
        let value = serde_json::to_value(&e).unwrap();
        let obj = value.as_object().unwrap();
        for field in [
            "docType",
            "id",
            "name",
            "details",
            "state",
            "certificateId",
            "certificationDate",
            "certifiedBy",
            "revocationDate",
            "revocationReason",
            "blacklistDate",
            "blacklistReason",
            "organizations",
            "channels",
            "createdAt",
            "updatedAt",
        ] {
            assert!(obj.contains_key(field), "missing {field}");
        }
        assert!(!obj.contains_key("previousState"));
        assert_eq!(obj["state"], "CERTIFIED");
        assert_eq!(obj["revocationDate"], "0001-01-01T00:00:00Z");
    }

    #[test]
    fn test_unset_identifiers_serialize_empty() {
        let value = serde_json::to_value(make_registered("d")).unwrap();
        assert_eq!(value["certificateId"], "");
        assert_eq!(value["certifiedBy"], "");
    }

    #[test]
    fn test_previous_state_serialized_while_blacklisted() {
        let mut e = make_registered("d");
        e.blacklist("b".to_string(), t1()).unwrap();
        let value = serde_json::to_value(&e).unwrap();
        assert_eq!(value["previousState"], "REGISTERED");
    }

    #[test]
    fn test_decodes_legacy_document() {
        let json = r#"{
            "docType": "enterprise",
            "id": "E9",
            "name": "Legacy",
            "details": "old|PREVIOUS_STATE:REVOKED",
            "state": "BLACKLISTED",
            "certificateId": "CERT-1700000000000000000",
            "certificationDate": "2023-11-14T22:13:20.123+05:30",
            "certifiedBy": "",
            "revocationDate": "2023-12-01T00:00:00Z",
            "revocationReason": "lapsed",
            "blacklistDate": "2024-01-01T00:00:00Z",
            "blacklistReason": "fraud",
            "organizations": null,
            "channels": ["ch1"],
            "createdAt": "2023-11-14T22:00:00+05:30",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let mut e: Enterprise = serde_json::from_str(json).unwrap();
        assert!(e.organizations.is_empty());
        assert!(e.certified_by.is_none());
        assert_eq!(e.certification_date.to_iso8601(), "2023-11-14T16:43:20Z");
        e.unblacklist(t1()).unwrap();
        assert_eq!(e.state, EnterpriseState::Revoked);
        assert_eq!(e.details, "old");
    }

    // ── Properties ───────────────────────────────────────────────────

    fn reachable_state(e: &mut Enterprise, target: EnterpriseState) {
        if target == EnterpriseState::Registered {
            return;
        }
        e.certify(|| CertificateId::new("CERT-1"), CallerId::new("c"), t0())
            .unwrap();
        if target == EnterpriseState::Revoked {
            e.revoke("r".to_string(), t0()).unwrap();
        }
    }

    proptest! {
        #[test]
        fn prop_blacklist_roundtrip_restores_state_and_details(
            details in ".*",
            idx in 0usize..3,
        ) {
            prop_assume!(!details.contains(LEGACY_RECOVERY_MARKER));
            let target = EnterpriseState::ALL[idx];
            let mut e = Enterprise::register(
                EnterpriseId::new("E1").unwrap(),
                "Acme".to_string(),
                details.clone(),
                t0(),
            )
            .unwrap();
            let original_details = e.details.clone();
            reachable_state(&mut e, target);

            e.blacklist("reason".to_string(), t1()).unwrap();
            e.unblacklist(t1()).unwrap();

            prop_assert_eq!(e.state, target);
            prop_assert_eq!(e.details, original_details);
        }
    }
}
