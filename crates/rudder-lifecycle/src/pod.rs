//! Pod lifecycle statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnrecognizedStatus;

/// Observed lifecycle status of a pod, mirroring the container runtime phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PodLifecycle {
    /// Pod accepted but not yet scheduled onto a node.
    Pending,
    /// Images are being pulled and containers started.
    ContainerCreating,
    /// At least one container is running.
    Running,
    /// All containers terminated successfully.
    Succeeded,
    /// At least one container terminated in failure.
    Failed,
    /// Status could not be obtained from the control plane.
    #[default]
    Unknown,
}

impl PodLifecycle {
    /// Every status in the pod vocabulary.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::ContainerCreating,
        Self::Running,
        Self::Succeeded,
        Self::Failed,
        Self::Unknown,
    ];

    /// The label as reported by the control plane.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::ContainerCreating => "ContainerCreating",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Unknown => "Unknown",
        }
    }

    /// True when work is actively progressing or about to.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Pending | Self::ContainerCreating | Self::Running)
    }

    /// True for terminal statuses.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// True exactly when the pod has not reached a terminal status.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        !self.is_done()
    }
}

impl fmt::Display for PodLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PodLifecycle {
    type Err = UnrecognizedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "ContainerCreating" => Ok(Self::ContainerCreating),
            "Running" => Ok(Self::Running),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            "Unknown" => Ok(Self::Unknown),
            other => Err(UnrecognizedStatus::new("pod", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_and_done_are_disjoint() {
        for status in PodLifecycle::ALL {
            assert!(
                !(status.is_running() && status.is_done()),
                "{status} is both running and done"
            );
        }
    }

    #[test]
    fn deletable_is_not_done() {
        for status in PodLifecycle::ALL {
            assert_eq!(status.is_deletable(), !status.is_done());
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(PodLifecycle::Succeeded.is_done());
        assert!(PodLifecycle::Failed.is_done());
        assert!(!PodLifecycle::Running.is_done());
        assert!(!PodLifecycle::Unknown.is_done());
    }

    #[test]
    fn labels_round_trip() {
        for status in PodLifecycle::ALL {
            assert_eq!(status.as_str().parse::<PodLifecycle>(), Ok(status));
        }
    }

    #[test]
    fn unrecognized_label_is_rejected() {
        let err = "Evicted".parse::<PodLifecycle>().unwrap_err();
        assert_eq!(err.kind, "pod");
        assert_eq!(err.status, "Evicted");
    }
}
