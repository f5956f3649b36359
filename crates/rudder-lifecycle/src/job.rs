//! Job lifecycle statuses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnrecognizedStatus;

/// Observed lifecycle status of a batch job.
///
/// `Created`, `Pausing`, and `Unknown` are neither running nor done: a
/// created job has not started progressing yet, a pausing job is suspended,
/// and an unknown status carries no information either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum JobLifecycle {
    /// Job registered but nothing scheduled yet.
    Created,
    /// Container image for the job is being built.
    Building,
    /// Job submitted, waiting for resources.
    Pending,
    /// Job resources allocated, containers coming up.
    Starting,
    /// Job is executing.
    Running,
    /// Job is being suspended.
    Pausing,
    /// Job completed successfully.
    Succeeded,
    /// Job terminated in failure.
    Failed,
    /// Job resources were deleted before completion.
    Deleted,
    /// Job was cancelled by an operator.
    Killed,
    /// Job reached an unspecified terminal state.
    Finished,
    /// Status could not be obtained from the control plane.
    #[default]
    Unknown,
}

impl JobLifecycle {
    /// Every status in the job vocabulary.
    pub const ALL: [Self; 12] = [
        Self::Created,
        Self::Building,
        Self::Pending,
        Self::Starting,
        Self::Running,
        Self::Pausing,
        Self::Succeeded,
        Self::Failed,
        Self::Deleted,
        Self::Killed,
        Self::Finished,
        Self::Unknown,
    ];

    /// The label as reported by the control plane.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Building => "Building",
            Self::Pending => "Pending",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Pausing => "Pausing",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Deleted => "Deleted",
            Self::Killed => "Killed",
            Self::Finished => "Finished",
            Self::Unknown => "Unknown",
        }
    }

    /// True for the earliest pre-run statuses.
    #[must_use]
    pub const fn is_starting(self) -> bool {
        matches!(self, Self::Created | Self::Building)
    }

    /// True when work is actively progressing or about to.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(
            self,
            Self::Building | Self::Pending | Self::Starting | Self::Running
        )
    }

    /// True when a kill/cancel action is meaningful.
    #[must_use]
    pub const fn is_killable(self) -> bool {
        matches!(
            self,
            Self::Starting | Self::Building | Self::Pending | Self::Pausing | Self::Running
        )
    }

    /// True for terminal statuses.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::Deleted | Self::Killed | Self::Finished
        )
    }

    /// True exactly when the job has not reached a terminal status.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        !self.is_done()
    }
}

impl fmt::Display for JobLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobLifecycle {
    type Err = UnrecognizedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Building" => Ok(Self::Building),
            "Pending" => Ok(Self::Pending),
            "Starting" => Ok(Self::Starting),
            "Running" => Ok(Self::Running),
            "Pausing" => Ok(Self::Pausing),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            "Deleted" => Ok(Self::Deleted),
            "Killed" => Ok(Self::Killed),
            "Finished" => Ok(Self::Finished),
            "Unknown" => Ok(Self::Unknown),
            other => Err(UnrecognizedStatus::new("job", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_and_done_are_disjoint() {
        for status in JobLifecycle::ALL {
            assert!(
                !(status.is_running() && status.is_done()),
                "{status} is both running and done"
            );
        }
    }

    #[test]
    fn killable_partition() {
        use JobLifecycle::{
            Building, Deleted, Failed, Finished, Killed, Pausing, Pending, Running, Starting,
            Succeeded,
        };

        for status in [Starting, Building, Pending, Pausing, Running] {
            assert!(status.is_killable(), "{status} should be killable");
        }
        for status in [Succeeded, Failed, Deleted, Killed, Finished] {
            assert!(!status.is_killable(), "{status} should not be killable");
        }
    }

    #[test]
    fn deletable_is_not_done() {
        for status in JobLifecycle::ALL {
            assert_eq!(status.is_deletable(), !status.is_done());
        }
    }

    #[test]
    fn starting_statuses() {
        assert!(JobLifecycle::Created.is_starting());
        assert!(JobLifecycle::Building.is_starting());
        assert!(!JobLifecycle::Running.is_starting());
        assert!(!JobLifecycle::Pending.is_starting());
    }

    #[test]
    fn every_terminal_label_listed_once() {
        let done: Vec<_> = JobLifecycle::ALL
            .iter()
            .filter(|s| s.is_done())
            .collect();
        assert_eq!(done.len(), 5);
    }

    #[test]
    fn labels_round_trip() {
        for status in JobLifecycle::ALL {
            assert_eq!(status.as_str().parse::<JobLifecycle>(), Ok(status));
        }
    }

    #[test]
    fn unrecognized_label_is_rejected() {
        let err = "Resuming".parse::<JobLifecycle>().unwrap_err();
        assert_eq!(err.kind, "job");
        assert_eq!(err.status, "Resuming");
    }

    #[test]
    fn serde_uses_control_plane_labels() {
        let json = serde_json::to_string(&JobLifecycle::Succeeded).unwrap();
        assert_eq!(json, "\"Succeeded\"");
        let parsed: JobLifecycle = serde_json::from_str("\"Pausing\"").unwrap();
        assert_eq!(parsed, JobLifecycle::Pausing);
    }
}
