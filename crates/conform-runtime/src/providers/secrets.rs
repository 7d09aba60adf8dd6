//! Credential handling for completion providers.
//!
//! Credentials never appear in `Debug` or `Display` output and are zeroed
//! on drop. Call [`ApiCredential::expose`] only where the value is sent.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use super::ProviderError;

/// Where a credential was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Passed on the command line
    Argument,
    /// Loaded from environment variable
    Environment,
    /// Provided programmatically
    Programmatic,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::Argument => write!(f, "argument"),
            CredentialSource::Environment => write!(f, "environment"),
            CredentialSource::Programmatic => write!(f, "programmatic"),
        }
    }
}

/// A securely-stored API credential.
pub struct ApiCredential {
    value: SecretString,
    source: CredentialSource,
    name: &'static str,
}

impl ApiCredential {
    pub fn new(value: impl Into<String>, source: CredentialSource, name: &'static str) -> Self {
        Self {
            value: SecretString::from(value.into()),
            source,
            name,
        }
    }

    /// Load credential from an environment variable.
    pub fn from_env(env_var: &str, name: &'static str) -> Result<Self, ProviderError> {
        std::env::var(env_var)
            .ok()
            .filter(|v| !v.is_empty())
            .map(|v| Self::new(v, CredentialSource::Environment, name))
            .ok_or_else(|| {
                ProviderError::NotConfigured(format!(
                    "{} not set: configure '{}' environment variable",
                    name, env_var
                ))
            })
    }

    /// Use an explicit value when given, otherwise the environment variable.
    pub fn from_arg_or_env(
        explicit: Option<String>,
        env_var: &str,
        name: &'static str,
    ) -> Result<Self, ProviderError> {
        match explicit.filter(|v| !v.is_empty()) {
            Some(value) => Ok(Self::new(value, CredentialSource::Argument, name)),
            None => Self::from_env(env_var, name).map_err(|_| {
                ProviderError::NotConfigured(format!(
                    "{} required: pass --api-key or set the {} environment variable",
                    name, env_var
                ))
            }),
        }
    }

    /// Expose the credential value for use in API calls.
    pub fn expose(&self) -> &str {
        self.value.expose_secret()
    }

    pub fn is_empty(&self) -> bool {
        self.value.expose_secret().is_empty()
    }

    pub fn source(&self) -> CredentialSource {
        self.source
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredential")
            .field("value", &"[REDACTED]")
            .field("source", &self.source)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for ApiCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from {} [REDACTED]", self.name, self.source)
    }
}
