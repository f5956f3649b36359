//! Node lifecycle statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnrecognizedStatus;

/// Observed readiness status of a cluster node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum NodeLifecycle {
    /// Status could not be obtained from the control plane.
    #[default]
    Unknown,
    /// Node is healthy and accepting pods.
    Ready,
    /// Node is reachable but not accepting pods.
    NotReady,
    /// Node was removed from the cluster.
    Deleted,
}

impl NodeLifecycle {
    /// Every status in the node vocabulary.
    pub const ALL: [Self; 4] = [Self::Unknown, Self::Ready, Self::NotReady, Self::Deleted];

    /// The label as reported by the control plane.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Ready => "Ready",
            Self::NotReady => "NotReady",
            Self::Deleted => "Deleted",
        }
    }

    /// True when the node is accepting pods.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// True when the node is no longer part of the cluster.
    #[must_use]
    pub const fn is_gone(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl fmt::Display for NodeLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeLifecycle {
    type Err = UnrecognizedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Unknown" => Ok(Self::Unknown),
            "Ready" => Ok(Self::Ready),
            "NotReady" => Ok(Self::NotReady),
            "Deleted" => Ok(Self::Deleted),
            other => Err(UnrecognizedStatus::new("node", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness() {
        assert!(NodeLifecycle::Ready.is_ready());
        assert!(!NodeLifecycle::NotReady.is_ready());
        assert!(!NodeLifecycle::Unknown.is_ready());
        assert!(NodeLifecycle::Deleted.is_gone());
    }

    #[test]
    fn labels_round_trip() {
        for status in NodeLifecycle::ALL {
            assert_eq!(status.as_str().parse::<NodeLifecycle>(), Ok(status));
        }
    }

    #[test]
    fn unrecognized_label_is_rejected() {
        assert!("Cordoned".parse::<NodeLifecycle>().is_err());
    }
}
