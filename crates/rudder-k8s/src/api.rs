//! The provider seam between the manager and the cluster.
//!
//! [`ClusterApi`] is the narrow interface the manager consumes per resource
//! kind. Its `read` returns a three-way discriminant (`Ok(Some)` found,
//! `Ok(None)` absent, `Err` provider failure) so callers branch on an
//! explicit result rather than inspecting error types. The real
//! implementation is a blanket impl over [`kube::Api`]; tests use the
//! call-recording [`mock::MockApi`].

use std::fmt;

use async_trait::async_trait;
use kube::api::{Api, DeleteParams, ListParams, Patch, PatchParams, PostParams};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Primitive operations the manager requires from the cluster, per kind.
#[async_trait]
pub trait ClusterApi<K>: Send + Sync {
    /// Fetch a resource by name. `Ok(None)` means the resource is absent;
    /// `Err` means the read itself failed.
    async fn read(&self, name: &str) -> kube::Result<Option<K>>;

    /// Create a resource. A concurrent create by another actor surfaces as
    /// the provider's "already exists" error.
    async fn create(&self, body: &K) -> kube::Result<K>;

    /// Merge-patch an existing resource.
    async fn patch(&self, name: &str, body: &K) -> kube::Result<K>;

    /// Delete a resource by name. Deleting an absent resource yields the
    /// provider's not-found error.
    async fn delete(&self, name: &str) -> kube::Result<()>;

    /// List resources matching a label selector. Ordering is
    /// provider-defined.
    async fn list(&self, label_selector: &str) -> kube::Result<Vec<K>>;
}

#[async_trait]
impl<K> ClusterApi<K> for Api<K>
where
    K: Clone + DeserializeOwned + Serialize + fmt::Debug + Send + Sync,
{
    async fn read(&self, name: &str) -> kube::Result<Option<K>> {
        self.get_opt(name).await
    }

    async fn create(&self, body: &K) -> kube::Result<K> {
        Api::create(self, &PostParams::default(), body).await
    }

    async fn patch(&self, name: &str, body: &K) -> kube::Result<K> {
        Api::patch(self, name, &PatchParams::default(), &Patch::Merge(body)).await
    }

    async fn delete(&self, name: &str) -> kube::Result<()> {
        Api::delete(self, name, &DeleteParams::default())
            .await
            .map(|_| ())
    }

    async fn list(&self, label_selector: &str) -> kube::Result<Vec<K>> {
        let params = ListParams::default().labels(label_selector);
        Api::list(self, &params).await.map(|list| list.items)
    }
}

/// An in-memory provider for testing without a cluster.
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use kube::core::ErrorResponse;
    use kube::ResourceExt;
    use parking_lot::Mutex;

    use super::ClusterApi;

    /// One recorded provider call, in issue order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MockCall {
        /// `read(name)`.
        Read(String),
        /// `create(body)` with the body's name.
        Create(String),
        /// `patch(name, body)`.
        Patch(String),
        /// `delete(name)`.
        Delete(String),
        /// `list(label_selector)`.
        List(String),
    }

    struct MockState<K> {
        objects: BTreeMap<String, K>,
        calls: Vec<MockCall>,
        read_failure: Option<u16>,
        create_failure: Option<u16>,
        patch_failure: Option<u16>,
        list_failure: Option<u16>,
        delete_failures: BTreeMap<String, u16>,
    }

    /// A provider that stores resources in memory, records every call, and
    /// can be scripted to fail individual operations with a given HTTP
    /// status code.
    pub struct MockApi<K> {
        state: Mutex<MockState<K>>,
    }

    impl<K> Default for MockApi<K> {
        fn default() -> Self {
            Self {
                state: Mutex::new(MockState {
                    objects: BTreeMap::new(),
                    calls: Vec::new(),
                    read_failure: None,
                    create_failure: None,
                    patch_failure: None,
                    list_failure: None,
                    delete_failures: BTreeMap::new(),
                }),
            }
        }
    }

    impl<K> MockApi<K> {
        /// Create an empty mock provider.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a resource as already present in the cluster.
        pub fn insert(&self, name: impl Into<String>, object: K) {
            self.state.lock().objects.insert(name.into(), object);
        }

        /// Make every `read` fail with the given HTTP status code.
        pub fn fail_reads(&self, code: u16) {
            self.state.lock().read_failure = Some(code);
        }

        /// Make every `create` fail with the given HTTP status code.
        pub fn fail_creates(&self, code: u16) {
            self.state.lock().create_failure = Some(code);
        }

        /// Make every `patch` fail with the given HTTP status code.
        pub fn fail_patches(&self, code: u16) {
            self.state.lock().patch_failure = Some(code);
        }

        /// Make every `list` fail with the given HTTP status code.
        pub fn fail_lists(&self, code: u16) {
            self.state.lock().list_failure = Some(code);
        }

        /// Make `delete` of one specific resource fail with the given code.
        pub fn fail_delete(&self, name: impl Into<String>, code: u16) {
            self.state.lock().delete_failures.insert(name.into(), code);
        }

        /// Every provider call issued so far, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<MockCall> {
            self.state.lock().calls.clone()
        }

        /// Whether a resource with this name is currently stored.
        #[must_use]
        pub fn contains(&self, name: &str) -> bool {
            self.state.lock().objects.contains_key(name)
        }

        /// Number of stored resources.
        #[must_use]
        pub fn len(&self) -> usize {
            self.state.lock().objects.len()
        }

        /// Whether no resources are stored.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.state.lock().objects.is_empty()
        }
    }

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{reason} from mock provider"),
            reason: reason.to_string(),
            code,
        })
    }

    #[async_trait]
    impl<K> ClusterApi<K> for MockApi<K>
    where
        K: ResourceExt + Clone + Send + Sync,
    {
        async fn read(&self, name: &str) -> kube::Result<Option<K>> {
            let mut state = self.state.lock();
            state.calls.push(MockCall::Read(name.to_string()));
            if let Some(code) = state.read_failure {
                return Err(api_error(code, "ReadFailure"));
            }
            Ok(state.objects.get(name).cloned())
        }

        async fn create(&self, body: &K) -> kube::Result<K> {
            let name = body.name_any();
            let mut state = self.state.lock();
            state.calls.push(MockCall::Create(name.clone()));
            if let Some(code) = state.create_failure {
                return Err(api_error(code, "CreateFailure"));
            }
            if state.objects.contains_key(&name) {
                return Err(api_error(409, "AlreadyExists"));
            }
            state.objects.insert(name, body.clone());
            Ok(body.clone())
        }

        async fn patch(&self, name: &str, body: &K) -> kube::Result<K> {
            let mut state = self.state.lock();
            state.calls.push(MockCall::Patch(name.to_string()));
            if let Some(code) = state.patch_failure {
                return Err(api_error(code, "PatchFailure"));
            }
            if !state.objects.contains_key(name) {
                return Err(api_error(404, "NotFound"));
            }
            state.objects.insert(name.to_string(), body.clone());
            Ok(body.clone())
        }

        async fn delete(&self, name: &str) -> kube::Result<()> {
            let mut state = self.state.lock();
            state.calls.push(MockCall::Delete(name.to_string()));
            if let Some(code) = state.delete_failures.get(name).copied() {
                return Err(api_error(code, "DeleteFailure"));
            }
            if state.objects.remove(name).is_none() {
                return Err(api_error(404, "NotFound"));
            }
            Ok(())
        }

        async fn list(&self, label_selector: &str) -> kube::Result<Vec<K>> {
            let mut state = self.state.lock();
            state.calls.push(MockCall::List(label_selector.to_string()));
            if let Some(code) = state.list_failure {
                return Err(api_error(code, "ListFailure"));
            }
            Ok(state.objects.values().cloned().collect())
        }
    }
}
