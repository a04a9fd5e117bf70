//! Error types for the DataGrid operator

use crate::conditions::ConditionStatus;
use thiserror::Error;

/// Result type alias for operator operations
pub type Result<T> = std::result::Result<T, OperatorError>;

/// Errors that can occur during operator operations
#[derive(Error, Debug)]
pub enum OperatorError {
    /// Kubernetes API error
    #[error("Kubernetes API error: {0}")]
    KubeApi(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The cluster workload has no running members to talk to
    #[error("No members found for workload {workload} in namespace {namespace}")]
    NoMembers { namespace: String, workload: String },

    /// The resource carries a value that cannot be interpreted
    #[error("Invalid resource: {0}")]
    InvalidResource(String),

    /// An expected condition does not hold
    #[error(transparent)]
    ConditionMismatch(#[from] ConditionMismatch),

    /// Admin credentials could not be fetched
    #[error(transparent)]
    CredentialLookupFailed(#[from] CredentialLookupFailed),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<kube::Error> for OperatorError {
    fn from(err: kube::Error) -> Self {
        OperatorError::KubeApi(err.to_string())
    }
}

/// A condition's actual status disagrees with the status required of it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error(
    "condition '{condition_type}' has status '{actual}', expected '{expected}'{}",
    reason_suffix(.message)
)]
pub struct ConditionMismatch {
    pub condition_type: String,
    pub actual: ConditionStatus,
    pub expected: ConditionStatus,
    pub message: String,
}

fn reason_suffix(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(" reason '{}'", message)
    }
}

/// Errors returned by a [`crate::client::SecretStore`].
#[derive(Error, Debug)]
pub enum SecretStoreError {
    #[error("secret {namespace}/{name} not found")]
    NotFound { name: String, namespace: String },

    #[error("secret {name} has no '{key}' entry")]
    MissingKey { name: String, key: String },

    #[error("secret store unavailable: {0}")]
    Transient(String),
}

/// The admin secret of a cluster could not be read.
#[derive(Error, Debug)]
#[error("unable to retrieve admin credentials from secret {namespace}/{secret}: {source}")]
pub struct CredentialLookupFailed {
    pub secret: String,
    pub namespace: String,
    #[source]
    pub source: SecretStoreError,
}
