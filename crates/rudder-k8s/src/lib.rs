//! Idempotent resource-manager facade over the Kubernetes API.
//!
//! This crate wraps the cluster control plane with a uniform contract for a
//! fixed set of resource kinds (pods, jobs, deployments, services,
//! ingresses, config maps, secrets, persistent volumes and claims, custom
//! objects, nodes):
//!
//! - **Explicit absence**: reads return `Ok(None)` for a missing resource
//!   instead of a not-found error, and deleting a missing resource
//!   succeeds.
//! - **Read-then-create-or-patch upserts**: `create_or_update_*` checks
//!   existence, then creates or merge-patches, and reports which happened.
//!   The two calls are not atomic; a concurrent create surfaces as a
//!   failure, never as a silent retry.
//! - **Uniform error policy**: every operation takes a `reraise` flag. When
//!   false, provider failures are logged and a neutral value is returned —
//!   the caller cannot distinguish absence from failure in that mode, a
//!   sharp edge worth reading twice. When true, failures come back as
//!   [`ManagerError::Api`] carrying the resource kind, name, and cause.
//!
//! The hard parts (watch streams, caches, conflict resolution, transport
//! retries and timeouts) belong to [`kube`] and are deliberately not
//! reimplemented here.
//!
//! # Example
//!
//! ```no_run
//! use rudder_k8s::{ManagerConfig, ResourceManager};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ResourceManager::new(ManagerConfig::with_namespace("experiments")).await?;
//!
//! // Absent resources read back as None.
//! if manager.get_job("trainer", true).await?.is_none() {
//!     println!("job not created yet");
//! }
//!
//! // Bulk cleanup by label, one delete at a time.
//! manager.delete_pods("experiment=42", true).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Testing
//!
//! The generic operations in [`ops`] run against anything implementing
//! [`ClusterApi`]; enable the `test-utils` feature for an in-memory,
//! call-recording `MockApi`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod api;
pub mod config;
pub mod error;
pub mod manager;
pub mod ops;

pub use api::ClusterApi;
pub use config::{ConnectionMode, ManagerConfig};
pub use error::{ManagerError, Result};
pub use manager::ResourceManager;

#[cfg(any(test, feature = "test-utils"))]
pub use api::mock::{MockApi, MockCall};
