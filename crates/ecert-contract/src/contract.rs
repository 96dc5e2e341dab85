//! # Certification Contract
//!
//! The operation surface. Each mutating operation is one logical
//! transaction against a single key:
//!
//! 1. role gate (no ledger access before it passes),
//! 2. read the current record,
//! 3. apply one lifecycle transition in memory,
//! 4. a single `put` of the whole record.
//!
//! A rejected transition returns before step 4, so the stored record is
//! never partially updated. Read operations are not role-gated.

use tracing::{info, warn};

use ecert_core::{CallerId, EnterpriseId, Timestamp};
use ecert_state::{Enterprise, EnterpriseError};

use crate::access::{Operation, RoleGate};
use crate::certificate::{CertificateIdSource, MonotonicCertificateIds};
use crate::config::ContractConfig;
use crate::error::ContractError;
use crate::identity::IdentityProvider;
use crate::ledger::Ledger;
use crate::query::QueryService;
use crate::store::RecordStore;

/// Role-gated enterprise certification operations over a ledger.
#[derive(Debug)]
pub struct CertificationContract<L, C = MonotonicCertificateIds> {
    store: RecordStore<L>,
    gate: RoleGate,
    certificates: C,
}

impl<L: Ledger> CertificationContract<L> {
    /// Contract over `ledger` with the clock-derived certificate id source.
    pub fn new(ledger: L, config: &ContractConfig) -> Self {
        Self::with_certificate_source(
            ledger,
            config,
            MonotonicCertificateIds::new(config.certificate_prefix.clone()),
        )
    }
}

impl<L: Ledger, C: CertificateIdSource> CertificationContract<L, C> {
    /// Contract over `ledger` issuing certificate ids from `certificates`.
    pub fn with_certificate_source(ledger: L, config: &ContractConfig, certificates: C) -> Self {
        Self {
            store: RecordStore::new(ledger),
            gate: RoleGate::new(config.role_attribute.clone()),
            certificates,
        }
    }

    /// The typed record store.
    pub fn store(&self) -> &RecordStore<L> {
        &self.store
    }

    /// Ledger bootstrap hook. Writes nothing.
    pub fn init_ledger(&self) -> Result<(), ContractError> {
        info!("ledger initialization");
        Ok(())
    }

    /// Create a new record in REGISTERED state. Requires `registrar`.
    pub fn register_enterprise(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
        name: &str,
        details: &str,
    ) -> Result<Enterprise, ContractError> {
        let caller = self.gate.authorize(caller, Operation::RegisterEnterprise)?;
        if self.store.exists(id)? {
            warn!(enterprise = %id, caller = %caller, "registration conflicts with existing record");
            return Err(ContractError::AlreadyExists { id: id.clone() });
        }
        let enterprise = Enterprise::register(
            id.clone(),
            name.to_string(),
            details.to_string(),
            Timestamp::now(),
        )?;
        self.store.put(&enterprise)?;
        info!(enterprise = %id, caller = %caller, state = %enterprise.state, "enterprise registered");
        Ok(enterprise)
    }

    /// REGISTERED → CERTIFIED with a fresh certificate id. Requires `certifier`.
    pub fn certify_enterprise(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::CertifyEnterprise, id, |e, caller, now| {
            e.certify(|| self.certificates.next_id(), caller.clone(), now)
        })
    }

    /// CERTIFIED → REVOKED. Requires `certifier`.
    pub fn revoke_certification(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
        reason: &str,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::RevokeCertification, id, |e, _, now| {
            e.revoke(reason.to_string(), now)
        })
    }

    /// Any non-blacklisted state → BLACKLISTED. Requires `admin`.
    pub fn blacklist_enterprise(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
        reason: &str,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::BlacklistEnterprise, id, |e, _, now| {
            e.blacklist(reason.to_string(), now)
        })
    }

    /// BLACKLISTED → the state held before blacklisting. Requires `admin`.
    pub fn unblacklist_enterprise(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::UnblacklistEnterprise, id, |e, _, now| {
            e.unblacklist(now).map(|_| ())
        })
    }

    /// Replace the organization list wholesale. Requires `admin`.
    pub fn assign_organizations(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
        organizations: Vec<String>,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::AssignOrganizations, id, |e, _, now| {
            e.assign_organizations(organizations, now);
            Ok(())
        })
    }

    /// Replace the channel list wholesale. Requires `admin`.
    pub fn assign_channels(
        &self,
        caller: &dyn IdentityProvider,
        id: &EnterpriseId,
        channels: Vec<String>,
    ) -> Result<Enterprise, ContractError> {
        self.transition(caller, Operation::AssignChannels, id, |e, _, now| {
            e.assign_channels(channels, now);
            Ok(())
        })
    }

    /// Read one record.
    pub fn query_enterprise(&self, id: &EnterpriseId) -> Result<Enterprise, ContractError> {
        self.store.get(id)
    }

    /// Every record currently BLACKLISTED, in no particular order.
    pub fn query_blacklisted_enterprises(&self) -> Result<Vec<Enterprise>, ContractError> {
        QueryService::new(&self.store).blacklisted()
    }

    /// Whether a record exists under `id`.
    pub fn enterprise_exists(&self, id: &EnterpriseId) -> Result<bool, ContractError> {
        self.store.exists(id)
    }

    /// Gate, read, apply `apply`, write. Nothing is written if any step fails.
    fn transition<F>(
        &self,
        identity: &dyn IdentityProvider,
        operation: Operation,
        id: &EnterpriseId,
        apply: F,
    ) -> Result<Enterprise, ContractError>
    where
        F: FnOnce(&mut Enterprise, &CallerId, Timestamp) -> Result<(), EnterpriseError>,
    {
        let caller = self.gate.authorize(identity, operation)?;
        let mut enterprise = self.store.get(id)?;
        let from = enterprise.state;

        if let Err(err) = apply(&mut enterprise, &caller, Timestamp::now()) {
            warn!(
                enterprise = %id,
                caller = %caller,
                operation = %operation,
                state = %from,
                error = %err,
                "transition rejected"
            );
            return Err(err.into());
        }

        self.store.put(&enterprise)?;
        info!(
            enterprise = %id,
            caller = %caller,
            operation = %operation,
            from = %from,
            to = %enterprise.state,
            "transition committed"
        );
        Ok(enterprise)
    }
}
