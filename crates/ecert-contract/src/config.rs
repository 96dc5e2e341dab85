//! Contract configuration.
//!
//! Defaults match the deployed credential layout. Override via environment
//! variables or explicit construction.

use thiserror::Error;

/// Default credential attribute carrying the caller's role.
pub const DEFAULT_ROLE_ATTRIBUTE: &str = "role";

/// Default prefix for issued certificate ids.
pub const DEFAULT_CERTIFICATE_PREFIX: &str = "CERT";

/// Configuration for [`crate::CertificationContract`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Credential attribute holding the caller's role.
    pub role_attribute: String,
    /// Prefix of issued certificate ids.
    pub certificate_prefix: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            role_attribute: DEFAULT_ROLE_ATTRIBUTE.to_string(),
            certificate_prefix: DEFAULT_CERTIFICATE_PREFIX.to_string(),
        }
    }
}

impl ContractConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `ECERT_ROLE_ATTRIBUTE` (default: `role`)
    /// - `ECERT_CERT_PREFIX` (default: `CERT`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = Self {
            role_attribute: lookup("ECERT_ROLE_ATTRIBUTE")
                .unwrap_or_else(|| DEFAULT_ROLE_ATTRIBUTE.to_string()),
            certificate_prefix: lookup("ECERT_CERT_PREFIX")
                .unwrap_or_else(|| DEFAULT_CERTIFICATE_PREFIX.to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject empty or whitespace-bearing values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (var, value) in [
            ("ECERT_ROLE_ATTRIBUTE", &self.role_attribute),
            ("ECERT_CERT_PREFIX", &self.certificate_prefix),
        ] {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::Invalid {
                    var,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {var}: must be non-empty without whitespace")]
    Invalid { var: &'static str, value: String },
}
