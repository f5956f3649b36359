//! Lifecycle status classification for cluster workloads.
//!
//! This crate provides the status vocabularies reported by the cluster
//! control plane for the workload kinds rudder cares about, together with
//! the pure predicates other components use to decide whether a workload is
//! startable, running, killable, or done:
//!
//! - **Pods**: the container-runtime phase of a single pod
//! - **Jobs**: the lifecycle of a single batch workload
//! - **Experiments**: an aggregate over the jobs an experiment owns
//! - **Nodes**: the readiness of a cluster node
//!
//! Statuses are observed snapshots: nothing in this crate transitions a
//! resource's actual state, and no predicate performs I/O. Each kind defines
//! its own vocabulary independently; a pod's `Running` and a job's `Running`
//! are distinct values that happen to print identically.
//!
//! # Example
//!
//! ```
//! use rudder_lifecycle::JobLifecycle;
//!
//! let status: JobLifecycle = "Running".parse().unwrap();
//! assert!(status.is_running());
//! assert!(status.is_killable());
//! assert!(!status.is_done());
//!
//! // Labels outside the vocabulary are rejected rather than bucketed.
//! assert!("Exploded".parse::<JobLifecycle>().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod experiment;
pub mod job;
pub mod node;
pub mod pod;

pub use error::UnrecognizedStatus;
pub use experiment::ExperimentLifecycle;
pub use job::JobLifecycle;
pub use node::NodeLifecycle;
pub use pod::PodLifecycle;
