//! The per-kind resource manager facade.

use std::collections::BTreeMap;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::{
    ConfigMap, Node, PersistentVolume, PersistentVolumeClaim, Pod, Secret, Service,
};
use k8s_openapi::api::networking::v1::Ingress;
use k8s_openapi::apimachinery::pkg::version::Info;
use kube::api::{Api, ApiResource, DynamicObject, Patch, PatchParams};
use kube::config::KubeConfigOptions;
use kube::Client;
use tracing::{debug, error};

use crate::config::{ConnectionMode, ManagerConfig};
use crate::error::{ManagerError, Result};
use crate::ops;

/// An idempotent facade over the cluster API for a fixed set of resource
/// kinds.
///
/// Every operation takes a `reraise` flag selecting the error policy: with
/// `reraise = false` provider failures are logged and a neutral value is
/// returned (`None`, an empty vec, a completed delete), so the caller
/// cannot tell absence from failure; with `reraise = true` failures are
/// wrapped in [`ManagerError::Api`] and returned.
///
/// Namespaced operations use the manager's current namespace; node and
/// persistent-volume operations are cluster-scoped and ignore it. The
/// manager holds no other state and issues every call sequentially. It is
/// not safe to mutate the namespace from several threads; construct one
/// manager per caller context instead.
pub struct ResourceManager {
    client: Client,
    namespace: String,
}

impl ResourceManager {
    /// Connect to the cluster described by the config.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Config`] when the cluster configuration
    /// cannot be loaded, or [`ManagerError::Client`] when the client cannot
    /// be built from it.
    pub async fn new(config: ManagerConfig) -> Result<Self> {
        let kube_config = match config.connection {
            ConnectionMode::InCluster => kube::Config::incluster().map_err(|e| {
                ManagerError::Config(format!("in-cluster configuration unavailable: {e}"))
            })?,
            ConnectionMode::Kubeconfig => {
                kube::Config::from_kubeconfig(&KubeConfigOptions::default())
                    .await
                    .map_err(|e| ManagerError::Config(format!("kubeconfig unavailable: {e}")))?
            }
        };
        let client = Client::try_from(kube_config)?;

        Ok(Self {
            client,
            namespace: config.namespace,
        })
    }

    /// Create a manager with a pre-built client.
    ///
    /// This is useful for tests and for callers that configure the client
    /// themselves.
    #[must_use]
    pub fn with_client(client: Client, namespace: impl Into<String>) -> Self {
        Self {
            client,
            namespace: namespace.into(),
        }
    }

    /// The namespace used for namespaced operations.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Switch the namespace used for namespaced operations.
    ///
    /// Requires exclusive access; share a manager across tasks only if the
    /// namespace never changes, or guard the mutation externally.
    pub fn set_namespace(&mut self, namespace: impl Into<String>) {
        self.namespace = namespace.into();
    }

    fn pods(&self) -> Api<Pod> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn jobs(&self) -> Api<Job> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn deployments(&self) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn services(&self) -> Api<Service> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn ingresses(&self) -> Api<Ingress> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn config_maps(&self) -> Api<ConfigMap> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn secrets(&self) -> Api<Secret> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn volume_claims(&self) -> Api<PersistentVolumeClaim> {
        Api::namespaced(self.client.clone(), &self.namespace)
    }

    fn volumes(&self) -> Api<PersistentVolume> {
        Api::all(self.client.clone())
    }

    fn nodes(&self) -> Api<Node> {
        Api::all(self.client.clone())
    }

    fn custom_objects(&self, resource: &ApiResource) -> Api<DynamicObject> {
        Api::namespaced_with(self.client.clone(), &self.namespace, resource)
    }

    /// Fetch the API server version.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn server_version(&self, reraise: bool) -> Result<Option<Info>> {
        match self.client.apiserver_version().await {
            Ok(info) => Ok(Some(info)),
            Err(e) => {
                error!(error = %e, "cluster API error");
                if reraise {
                    Err(ManagerError::api("version", "server", e))
                } else {
                    Ok(None)
                }
            }
        }
    }

    // ----- pods -----

    /// Fetch the named pod.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_pod(&self, name: &str, reraise: bool) -> Result<Option<Pod>> {
        ops::get_resource(&self.pods(), "pod", name, reraise).await
    }

    /// Create or patch the named pod, reporting whether it was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_pod(
        &self,
        name: &str,
        body: &Pod,
        reraise: bool,
    ) -> Result<Option<(Pod, bool)>> {
        ops::create_or_update(&self.pods(), "pod", name, body, reraise).await
    }

    /// Delete the named pod; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_pod(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.pods(), "pod", name, reraise).await
    }

    /// List pods matching a label selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_pods(&self, label_selector: &str, reraise: bool) -> Result<Vec<Pod>> {
        ops::list_resources(&self.pods(), "pod", label_selector, reraise).await
    }

    /// Delete every pod matching a label selector, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first provider failure when `reraise` is true.
    pub async fn delete_pods(&self, label_selector: &str, reraise: bool) -> Result<()> {
        ops::delete_collection(&self.pods(), "pod", label_selector, reraise).await
    }

    // ----- jobs -----

    /// Fetch the named job.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_job(&self, name: &str, reraise: bool) -> Result<Option<Job>> {
        ops::get_resource(&self.jobs(), "job", name, reraise).await
    }

    /// Create or patch the named job, reporting whether it was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_job(
        &self,
        name: &str,
        body: &Job,
        reraise: bool,
    ) -> Result<Option<(Job, bool)>> {
        ops::create_or_update(&self.jobs(), "job", name, body, reraise).await
    }

    /// Delete the named job; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_job(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.jobs(), "job", name, reraise).await
    }

    /// List jobs matching a label selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_jobs(&self, label_selector: &str, reraise: bool) -> Result<Vec<Job>> {
        ops::list_resources(&self.jobs(), "job", label_selector, reraise).await
    }

    /// Delete every job matching a label selector, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first provider failure when `reraise` is true.
    pub async fn delete_jobs(&self, label_selector: &str, reraise: bool) -> Result<()> {
        ops::delete_collection(&self.jobs(), "job", label_selector, reraise).await
    }

    // ----- deployments -----

    /// Fetch the named deployment.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_deployment(&self, name: &str, reraise: bool) -> Result<Option<Deployment>> {
        ops::get_resource(&self.deployments(), "deployment", name, reraise).await
    }

    /// Create or patch the named deployment, reporting whether it was
    /// created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_deployment(
        &self,
        name: &str,
        body: &Deployment,
        reraise: bool,
    ) -> Result<Option<(Deployment, bool)>> {
        ops::create_or_update(&self.deployments(), "deployment", name, body, reraise).await
    }

    /// Delete the named deployment; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_deployment(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.deployments(), "deployment", name, reraise).await
    }

    /// List deployments matching a label selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_deployments(
        &self,
        label_selector: &str,
        reraise: bool,
    ) -> Result<Vec<Deployment>> {
        ops::list_resources(&self.deployments(), "deployment", label_selector, reraise).await
    }

    /// Delete every deployment matching a label selector, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first provider failure when `reraise` is true.
    pub async fn delete_deployments(&self, label_selector: &str, reraise: bool) -> Result<()> {
        ops::delete_collection(&self.deployments(), "deployment", label_selector, reraise).await
    }

    // ----- services -----

    /// Fetch the named service.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_service(&self, name: &str, reraise: bool) -> Result<Option<Service>> {
        ops::get_resource(&self.services(), "service", name, reraise).await
    }

    /// Create or patch the named service, reporting whether it was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_service(
        &self,
        name: &str,
        body: &Service,
        reraise: bool,
    ) -> Result<Option<(Service, bool)>> {
        ops::create_or_update(&self.services(), "service", name, body, reraise).await
    }

    /// Delete the named service; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_service(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.services(), "service", name, reraise).await
    }

    /// List services matching a label selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_services(&self, label_selector: &str, reraise: bool) -> Result<Vec<Service>> {
        ops::list_resources(&self.services(), "service", label_selector, reraise).await
    }

    /// Delete every service matching a label selector, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first provider failure when `reraise` is true.
    pub async fn delete_services(&self, label_selector: &str, reraise: bool) -> Result<()> {
        ops::delete_collection(&self.services(), "service", label_selector, reraise).await
    }

    // ----- ingresses -----

    /// Fetch the named ingress.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_ingress(&self, name: &str, reraise: bool) -> Result<Option<Ingress>> {
        ops::get_resource(&self.ingresses(), "ingress", name, reraise).await
    }

    /// Create or patch the named ingress, reporting whether it was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_ingress(
        &self,
        name: &str,
        body: &Ingress,
        reraise: bool,
    ) -> Result<Option<(Ingress, bool)>> {
        ops::create_or_update(&self.ingresses(), "ingress", name, body, reraise).await
    }

    /// Delete the named ingress; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_ingress(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.ingresses(), "ingress", name, reraise).await
    }

    /// List ingresses matching a label selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_ingresses(&self, label_selector: &str, reraise: bool) -> Result<Vec<Ingress>> {
        ops::list_resources(&self.ingresses(), "ingress", label_selector, reraise).await
    }

    /// Delete every ingress matching a label selector, sequentially.
    ///
    /// # Errors
    ///
    /// Propagates the first provider failure when `reraise` is true.
    pub async fn delete_ingresses(&self, label_selector: &str, reraise: bool) -> Result<()> {
        ops::delete_collection(&self.ingresses(), "ingress", label_selector, reraise).await
    }

    // ----- config maps -----

    /// Fetch the named config map.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_config_map(&self, name: &str, reraise: bool) -> Result<Option<ConfigMap>> {
        ops::get_resource(&self.config_maps(), "config map", name, reraise).await
    }

    /// Create or patch the named config map, reporting whether it was
    /// created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_config_map(
        &self,
        name: &str,
        body: &ConfigMap,
        reraise: bool,
    ) -> Result<Option<(ConfigMap, bool)>> {
        ops::create_or_update(&self.config_maps(), "config map", name, body, reraise).await
    }

    /// Delete the named config map; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_config_map(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.config_maps(), "config map", name, reraise).await
    }

    // ----- secrets -----

    /// Fetch the named secret.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_secret(&self, name: &str, reraise: bool) -> Result<Option<Secret>> {
        ops::get_resource(&self.secrets(), "secret", name, reraise).await
    }

    /// Create or patch the named secret, reporting whether it was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_secret(
        &self,
        name: &str,
        body: &Secret,
        reraise: bool,
    ) -> Result<Option<(Secret, bool)>> {
        ops::create_or_update(&self.secrets(), "secret", name, body, reraise).await
    }

    /// Delete the named secret; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_secret(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.secrets(), "secret", name, reraise).await
    }

    // ----- persistent volumes -----

    /// Fetch the named persistent volume (cluster-scoped).
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_volume(&self, name: &str, reraise: bool) -> Result<Option<PersistentVolume>> {
        ops::get_resource(&self.volumes(), "persistent volume", name, reraise).await
    }

    /// Create or patch the named persistent volume, reporting whether it
    /// was created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_volume(
        &self,
        name: &str,
        body: &PersistentVolume,
        reraise: bool,
    ) -> Result<Option<(PersistentVolume, bool)>> {
        ops::create_or_update(&self.volumes(), "persistent volume", name, body, reraise).await
    }

    /// Delete the named persistent volume; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_volume(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.volumes(), "persistent volume", name, reraise).await
    }

    // ----- persistent volume claims -----

    /// Fetch the named volume claim.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_volume_claim(
        &self,
        name: &str,
        reraise: bool,
    ) -> Result<Option<PersistentVolumeClaim>> {
        ops::get_resource(&self.volume_claims(), "volume claim", name, reraise).await
    }

    /// Create or patch the named volume claim, reporting whether it was
    /// created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_volume_claim(
        &self,
        name: &str,
        body: &PersistentVolumeClaim,
        reraise: bool,
    ) -> Result<Option<(PersistentVolumeClaim, bool)>> {
        ops::create_or_update(&self.volume_claims(), "volume claim", name, body, reraise).await
    }

    /// Delete the named volume claim; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_volume_claim(&self, name: &str, reraise: bool) -> Result<()> {
        ops::delete_resource(&self.volume_claims(), "volume claim", name, reraise).await
    }

    // ----- custom objects -----

    /// Fetch the named custom object of the given resource type.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_custom_object(
        &self,
        name: &str,
        resource: &ApiResource,
        reraise: bool,
    ) -> Result<Option<DynamicObject>> {
        ops::get_resource(&self.custom_objects(resource), "custom object", name, reraise).await
    }

    /// Create or patch the named custom object, reporting whether it was
    /// created.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn create_or_update_custom_object(
        &self,
        name: &str,
        resource: &ApiResource,
        body: &DynamicObject,
        reraise: bool,
    ) -> Result<Option<(DynamicObject, bool)>> {
        ops::create_or_update(
            &self.custom_objects(resource),
            "custom object",
            name,
            body,
            reraise,
        )
        .await
    }

    /// Delete the named custom object; absence is success.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn delete_custom_object(
        &self,
        name: &str,
        resource: &ApiResource,
        reraise: bool,
    ) -> Result<()> {
        ops::delete_resource(&self.custom_objects(resource), "custom object", name, reraise).await
    }

    /// List custom objects of the given resource type matching a label
    /// selector.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_custom_objects(
        &self,
        resource: &ApiResource,
        label_selector: &str,
        reraise: bool,
    ) -> Result<Vec<DynamicObject>> {
        ops::list_resources(
            &self.custom_objects(resource),
            "custom object",
            label_selector,
            reraise,
        )
        .await
    }

    // ----- nodes -----

    /// Fetch the named node (cluster-scoped).
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn get_node(&self, name: &str, reraise: bool) -> Result<Option<Node>> {
        ops::get_resource(&self.nodes(), "node", name, reraise).await
    }

    /// List every node in the cluster.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn list_nodes(&self, reraise: bool) -> Result<Vec<Node>> {
        ops::list_resources(&self.nodes(), "node", "", reraise).await
    }

    /// Merge-patch the labels of the named node.
    ///
    /// # Errors
    ///
    /// Propagates the provider failure when `reraise` is true.
    pub async fn update_node_labels(
        &self,
        name: &str,
        labels: &BTreeMap<String, String>,
        reraise: bool,
    ) -> Result<Option<Node>> {
        let body = serde_json::json!({ "metadata": { "labels": labels } });
        match self
            .nodes()
            .patch(name, &PatchParams::default(), &Patch::Merge(&body))
            .await
        {
            Ok(node) => {
                debug!(kind = "node", name, "node labels patched");
                Ok(Some(node))
            }
            Err(e) => {
                error!(kind = "node", name, error = %e, "cluster API error");
                if reraise {
                    Err(ManagerError::api("node", name, e))
                } else {
                    Ok(None)
                }
            }
        }
    }
}
