//! Experiment lifecycle statuses and aggregation over owned jobs.
//!
//! An experiment owns one or more jobs (typically a master plus workers).
//! Its own status vocabulary is classified like the other kinds; the
//! aggregate predicates derive an experiment-level answer from the observed
//! statuses of the jobs it owns.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnrecognizedStatus;
use crate::job::JobLifecycle;

/// Observed lifecycle status of an experiment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ExperimentLifecycle {
    /// Experiment registered but nothing scheduled yet.
    Created,
    /// Experiment accepted by the scheduler.
    Scheduled,
    /// Experiment resources are coming up.
    Starting,
    /// Container images for the experiment are being built.
    Building,
    /// Experiment submitted, waiting for resources.
    Pending,
    /// At least one owned job is executing.
    Running,
    /// All owned jobs completed successfully.
    Succeeded,
    /// At least one owned job failed.
    Failed,
    /// Experiment resources were deleted before completion.
    Deleted,
    /// Status could not be obtained from the control plane.
    #[default]
    Unknown,
}

impl ExperimentLifecycle {
    /// Every status in the experiment vocabulary.
    pub const ALL: [Self; 10] = [
        Self::Created,
        Self::Scheduled,
        Self::Starting,
        Self::Building,
        Self::Pending,
        Self::Running,
        Self::Succeeded,
        Self::Failed,
        Self::Deleted,
        Self::Unknown,
    ];

    /// The label as reported by the control plane.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "Created",
            Self::Scheduled => "Scheduled",
            Self::Starting => "Starting",
            Self::Building => "Building",
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Deleted => "Deleted",
            Self::Unknown => "Unknown",
        }
    }

    /// True when work is actively progressing or about to.
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(
            self,
            Self::Scheduled | Self::Starting | Self::Building | Self::Pending | Self::Running
        )
    }

    /// True for terminal statuses.
    #[must_use]
    pub const fn is_done(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Deleted)
    }

    /// True exactly when the experiment has not reached a terminal status.
    #[must_use]
    pub const fn is_deletable(self) -> bool {
        !self.is_done()
    }
}

impl fmt::Display for ExperimentLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExperimentLifecycle {
    type Err = UnrecognizedStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(Self::Created),
            "Scheduled" => Ok(Self::Scheduled),
            "Starting" => Ok(Self::Starting),
            "Building" => Ok(Self::Building),
            "Pending" => Ok(Self::Pending),
            "Running" => Ok(Self::Running),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            "Deleted" => Ok(Self::Deleted),
            "Unknown" => Ok(Self::Unknown),
            other => Err(UnrecognizedStatus::new("experiment", other)),
        }
    }
}

/// True when at least one owned job is starting.
#[must_use]
pub fn any_starting(jobs: &[JobLifecycle]) -> bool {
    jobs.iter().any(|job| job.is_starting())
}

/// True when at least one owned job is running.
#[must_use]
pub fn any_running(jobs: &[JobLifecycle]) -> bool {
    jobs.iter().any(|job| job.is_running())
}

/// True when every owned job succeeded.
///
/// An experiment with no observed jobs is not considered succeeded; the
/// empty set yields `false` rather than the vacuous truth.
#[must_use]
pub fn all_succeeded(jobs: &[JobLifecycle]) -> bool {
    !jobs.is_empty() && jobs.iter().all(|job| *job == JobLifecycle::Succeeded)
}

/// True when at least one owned job failed.
#[must_use]
pub fn any_failed(jobs: &[JobLifecycle]) -> bool {
    jobs.contains(&JobLifecycle::Failed)
}

/// True when at least one owned job was deleted.
#[must_use]
pub fn any_deleted(jobs: &[JobLifecycle]) -> bool {
    jobs.contains(&JobLifecycle::Deleted)
}

/// True when every owned job is individually deletable.
///
/// Vacuously true for an empty set: deleting an experiment that owns no
/// jobs has nothing left to block it.
#[must_use]
pub fn all_deletable(jobs: &[JobLifecycle]) -> bool {
    jobs.iter().all(|job| job.is_deletable())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobLifecycle::{Building, Created, Deleted, Failed, Running, Succeeded};

    #[test]
    fn running_and_done_are_disjoint() {
        for status in ExperimentLifecycle::ALL {
            assert!(
                !(status.is_running() && status.is_done()),
                "{status} is both running and done"
            );
        }
    }

    #[test]
    fn deletable_is_not_done() {
        for status in ExperimentLifecycle::ALL {
            assert_eq!(status.is_deletable(), !status.is_done());
        }
    }

    #[test]
    fn labels_round_trip() {
        for status in ExperimentLifecycle::ALL {
            assert_eq!(status.as_str().parse::<ExperimentLifecycle>(), Ok(status));
        }
    }

    #[test]
    fn unrecognized_label_is_rejected() {
        let err = "Archived".parse::<ExperimentLifecycle>().unwrap_err();
        assert_eq!(err.kind, "experiment");
    }

    #[test]
    fn starting_when_any_job_starts() {
        assert!(any_starting(&[Running, Created]));
        assert!(any_starting(&[Building]));
        assert!(!any_starting(&[Running, Succeeded]));
        assert!(!any_starting(&[]));
    }

    #[test]
    fn running_when_any_job_runs() {
        assert!(any_running(&[Succeeded, Running]));
        assert!(!any_running(&[Succeeded, Failed]));
        assert!(!any_running(&[]));
    }

    #[test]
    fn succeeded_only_when_all_jobs_succeed() {
        assert!(all_succeeded(&[Succeeded, Succeeded]));
        assert!(!all_succeeded(&[Succeeded, Running]));
        assert!(!all_succeeded(&[Failed]));
    }

    #[test]
    fn empty_job_set_is_not_succeeded() {
        // An experiment with no observed jobs has made no progress; it does
        // not count as succeeded.
        assert!(!all_succeeded(&[]));
    }

    #[test]
    fn failed_when_any_job_fails() {
        assert!(any_failed(&[Running, Failed, Succeeded]));
        assert!(!any_failed(&[Running, Succeeded]));
    }

    #[test]
    fn deleted_when_any_job_deleted() {
        assert!(any_deleted(&[Deleted, Running]));
        assert!(!any_deleted(&[Running]));
    }

    #[test]
    fn deletable_when_all_jobs_deletable() {
        assert!(all_deletable(&[Running, Created]));
        assert!(!all_deletable(&[Running, Succeeded]));
        // Nothing blocks deleting an experiment that owns no jobs.
        assert!(all_deletable(&[]));
    }
}
