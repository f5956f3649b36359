//! Error types for the resource manager.

use thiserror::Error;

/// Errors that can occur during resource-manager operations.
///
/// Absence of a resource is not an error: reads report it as `Ok(None)` and
/// deletes treat it as success. Every variant here is a real failure.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// Transport or API failure from the cluster, tagged with the resource
    /// kind and name (or label selector) it occurred for.
    #[error("cluster API error for {kind} `{name}`: {source}")]
    Api {
        /// Resource kind the failing call targeted.
        kind: &'static str,
        /// Resource name or label selector the failing call targeted.
        name: String,
        /// The underlying client error.
        #[source]
        source: kube::Error,
    },

    /// Failure building or talking to the underlying client.
    #[error("Kubernetes client error: {0}")]
    Client(#[from] kube::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ManagerError {
    pub(crate) fn api(kind: &'static str, name: impl Into<String>, source: kube::Error) -> Self {
        Self::Api {
            kind,
            name: name.into(),
            source,
        }
    }
}

/// A specialized Result type for resource-manager operations.
pub type Result<T> = std::result::Result<T, ManagerError>;
