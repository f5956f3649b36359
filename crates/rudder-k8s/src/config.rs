//! Resource manager configuration.
//!
//! Cluster context is passed explicitly at construction time rather than
//! read from ambient environment state, so a process can hold managers for
//! different clusters or namespaces side by side.

use serde::{Deserialize, Serialize};

/// How the manager connects to the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionMode {
    /// Use the service-account credentials mounted inside a cluster pod.
    InCluster,
    /// Use the local kubeconfig file.
    #[default]
    Kubeconfig,
}

/// Configuration for a [`ResourceManager`](crate::ResourceManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Namespace used for all namespaced operations.
    pub namespace: String,
    /// Cluster connection mode.
    pub connection: ConnectionMode,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            connection: ConnectionMode::default(),
        }
    }
}

impl ManagerConfig {
    /// Create a config for the given namespace with the default connection
    /// mode.
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ManagerConfig::default();
        assert_eq!(config.namespace, "default");
        assert_eq!(config.connection, ConnectionMode::Kubeconfig);
    }

    #[test]
    fn with_namespace() {
        let config = ManagerConfig::with_namespace("experiments");
        assert_eq!(config.namespace, "experiments");
        assert_eq!(config.connection, ConnectionMode::Kubeconfig);
    }

    #[test]
    fn connection_mode_serde() {
        let json = serde_json::to_string(&ConnectionMode::InCluster).unwrap();
        assert_eq!(json, "\"in_cluster\"");
    }
}
