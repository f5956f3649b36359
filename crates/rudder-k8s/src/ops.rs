//! Generic resource operations.
//!
//! Each operation here implements the uniform contract the manager applies
//! to every resource kind: explicit absence instead of not-found errors,
//! read-then-create-or-patch upserts, idempotent deletes, and the `reraise`
//! error policy.
//!
//! # The `reraise` flag
//!
//! With `reraise = false` (the usual mode) provider failures are logged and
//! the operation returns a neutral value: `Ok(None)` for reads and upserts,
//! an empty `Vec` for lists, `Ok(())` for deletes. A caller in this mode
//! **cannot** distinguish "truly absent" from "the provider call failed";
//! the failure is visible only in logs. Pass `reraise = true` when that
//! distinction matters.

use kube::ResourceExt;
use tracing::{debug, error};

use crate::api::ClusterApi;
use crate::error::{ManagerError, Result};

/// Fetch a resource by name.
///
/// Returns `Ok(None)` when the resource is absent, and also when the read
/// fails and `reraise` is false.
///
/// # Errors
///
/// Propagates the provider failure when `reraise` is true.
pub async fn get_resource<K, A>(
    api: &A,
    kind: &'static str,
    name: &str,
    reraise: bool,
) -> Result<Option<K>>
where
    A: ClusterApi<K>,
{
    match api.read(name).await {
        Ok(found) => Ok(found),
        Err(e) => {
            error!(kind, name, error = %e, "cluster API error");
            if reraise {
                Err(ManagerError::api(kind, name, e))
            } else {
                Ok(None)
            }
        }
    }
}

/// Create a resource if absent, otherwise merge-patch it.
///
/// The existence check and the write are two separate calls; a concurrent
/// create racing the check surfaces as a failed create, never as a silent
/// retry-as-update. A failing existence check never falls through to a
/// create attempt.
///
/// On success returns the resource and whether it was created (`true`) or
/// patched (`false`). Returns `Ok(None)` when a failure was swallowed
/// because `reraise` is false.
///
/// # Errors
///
/// Propagates the provider failure when `reraise` is true.
pub async fn create_or_update<K, A>(
    api: &A,
    kind: &'static str,
    name: &str,
    body: &K,
    reraise: bool,
) -> Result<Option<(K, bool)>>
where
    A: ClusterApi<K>,
{
    let existing = match api.read(name).await {
        Ok(found) => found,
        Err(e) => {
            error!(kind, name, error = %e, "existence check failed");
            return if reraise {
                Err(ManagerError::api(kind, name, e))
            } else {
                Ok(None)
            };
        }
    };

    let outcome = if existing.is_some() {
        api.patch(name, body).await.map(|r| (r, false))
    } else {
        api.create(body).await.map(|r| (r, true))
    };

    match outcome {
        Ok((resource, created)) => {
            if created {
                debug!(kind, name, "resource created");
            } else {
                debug!(kind, name, "resource patched");
            }
            Ok(Some((resource, created)))
        }
        Err(e) => {
            error!(kind, name, error = %e, "cluster API error");
            if reraise {
                Err(ManagerError::api(kind, name, e))
            } else {
                Ok(None)
            }
        }
    }
}

/// Delete a resource by name, treating absence as success.
///
/// The resource is read first; when absent no delete call is issued. A
/// deletion racing the check (not-found from the delete call itself) is
/// also success.
///
/// # Errors
///
/// Propagates the provider failure when `reraise` is true.
pub async fn delete_resource<K, A>(
    api: &A,
    kind: &'static str,
    name: &str,
    reraise: bool,
) -> Result<()>
where
    A: ClusterApi<K>,
{
    match api.read(name).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            debug!(kind, name, "resource not found, nothing to delete");
            return Ok(());
        }
        Err(e) => {
            error!(kind, name, error = %e, "cluster API error");
            return if reraise {
                Err(ManagerError::api(kind, name, e))
            } else {
                Ok(())
            };
        }
    }

    match api.delete(name).await {
        Ok(()) => {
            debug!(kind, name, "resource deleted");
            Ok(())
        }
        Err(kube::Error::Api(e)) if e.code == 404 => {
            debug!(kind, name, "resource already gone");
            Ok(())
        }
        Err(e) => {
            error!(kind, name, error = %e, "cluster API error");
            if reraise {
                Err(ManagerError::api(kind, name, e))
            } else {
                Ok(())
            }
        }
    }
}

/// List resources matching a label selector.
///
/// Returns an empty vec when the list fails and `reraise` is false; the
/// ordering of results is provider-defined.
///
/// # Errors
///
/// Propagates the provider failure when `reraise` is true.
pub async fn list_resources<K, A>(
    api: &A,
    kind: &'static str,
    label_selector: &str,
    reraise: bool,
) -> Result<Vec<K>>
where
    A: ClusterApi<K>,
{
    match api.list(label_selector).await {
        Ok(items) => Ok(items),
        Err(e) => {
            error!(kind, selector = label_selector, error = %e, "cluster API error");
            if reraise {
                Err(ManagerError::api(kind, label_selector, e))
            } else {
                Ok(Vec::new())
            }
        }
    }
}

/// Delete every resource matching a label selector, one at a time.
///
/// Deletes are sequential in the listed order. A failing delete leaves the
/// already-deleted resources deleted; with `reraise` the first failure
/// aborts the remainder, without it the remaining deletes still run.
///
/// # Errors
///
/// Propagates the first provider failure when `reraise` is true.
pub async fn delete_collection<K, A>(
    api: &A,
    kind: &'static str,
    label_selector: &str,
    reraise: bool,
) -> Result<()>
where
    A: ClusterApi<K>,
    K: ResourceExt,
{
    let items = list_resources(api, kind, label_selector, reraise).await?;
    for item in &items {
        delete_resource(api, kind, &item.name_any(), reraise).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{MockApi, MockCall};
    use k8s_openapi::api::core::v1::Pod;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pod(name: &str) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                ..ObjectMeta::default()
            },
            ..Pod::default()
        }
    }

    fn seeded(names: &[&str]) -> MockApi<Pod> {
        let api = MockApi::new();
        for name in names {
            api.insert(*name, pod(name));
        }
        api
    }

    #[tokio::test]
    async fn get_reports_presence_and_absence() {
        let api = seeded(&["web"]);

        let found = get_resource(&api, "pod", "web", false).await.unwrap();
        assert!(found.is_some());

        let absent = get_resource(&api, "pod", "ghost", false).await.unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn get_failure_is_swallowed_without_reraise() {
        let api: MockApi<Pod> = MockApi::new();
        api.fail_reads(500);

        // Indistinguishable from absence in this mode.
        let result = get_resource(&api, "pod", "web", false).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn get_failure_propagates_with_reraise() {
        let api: MockApi<Pod> = MockApi::new();
        api.fail_reads(500);

        let err = get_resource(&api, "pod", "web", true).await.unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Api { kind: "pod", .. }
        ));
    }

    #[tokio::test]
    async fn upsert_creates_absent_resource_exactly_once() {
        let api: MockApi<Pod> = MockApi::new();

        let (_, created) = create_or_update(&api, "pod", "web", &pod("web"), true)
            .await
            .unwrap()
            .unwrap();

        assert!(created);
        assert_eq!(
            api.calls(),
            vec![
                MockCall::Read("web".to_string()),
                MockCall::Create("web".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn upsert_patches_present_resource() {
        let api = seeded(&["web"]);

        let (_, created) = create_or_update(&api, "pod", "web", &pod("web"), true)
            .await
            .unwrap()
            .unwrap();

        assert!(!created);
        assert_eq!(
            api.calls(),
            vec![
                MockCall::Read("web".to_string()),
                MockCall::Patch("web".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn upsert_existence_check_failure_never_falls_through_to_create() {
        let api: MockApi<Pod> = MockApi::new();
        api.fail_reads(503);

        let err = create_or_update(&api, "pod", "web", &pod("web"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Api { .. }));
        assert_eq!(api.calls(), vec![MockCall::Read("web".to_string())]);

        // Same without reraise: swallowed, but still no write attempted.
        let api: MockApi<Pod> = MockApi::new();
        api.fail_reads(503);
        let result = create_or_update(&api, "pod", "web", &pod("web"), false)
            .await
            .unwrap();
        assert!(result.is_none());
        assert_eq!(api.calls(), vec![MockCall::Read("web".to_string())]);
    }

    #[tokio::test]
    async fn upsert_surfaces_concurrent_create_conflict() {
        // Read sees the resource absent, then the create hits a conflict
        // from a concurrent actor. That is a failure of the operation, not
        // a retry as update.
        let api: MockApi<Pod> = MockApi::new();
        api.fail_creates(409);

        let err = create_or_update(&api, "pod", "web", &pod("web"), true)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Api { .. }));
        assert!(!api.calls().contains(&MockCall::Patch("web".to_string())));
    }

    #[tokio::test]
    async fn delete_absent_resource_issues_no_delete_call() {
        let api: MockApi<Pod> = MockApi::new();

        delete_resource(&api, "pod", "ghost", true).await.unwrap();

        assert_eq!(api.calls(), vec![MockCall::Read("ghost".to_string())]);
    }

    #[tokio::test]
    async fn delete_present_resource() {
        let api = seeded(&["web"]);

        delete_resource(&api, "pod", "web", true).await.unwrap();

        assert!(!api.contains("web"));
        assert_eq!(
            api.calls(),
            vec![
                MockCall::Read("web".to_string()),
                MockCall::Delete("web".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn delete_racing_not_found_is_success() {
        // Present at the existence check, gone by the time the delete call
        // lands.
        let api = seeded(&["web"]);
        api.fail_delete("web", 404);

        delete_resource(&api, "pod", "web", true).await.unwrap();
    }

    #[tokio::test]
    async fn delete_failure_follows_reraise_policy() {
        let api = seeded(&["web"]);
        api.fail_delete("web", 500);
        delete_resource(&api, "pod", "web", false).await.unwrap();

        let api = seeded(&["web"]);
        api.fail_delete("web", 500);
        let err = delete_resource(&api, "pod", "web", true).await.unwrap_err();
        assert!(matches!(err, ManagerError::Api { .. }));
    }

    #[tokio::test]
    async fn list_returns_matches_or_neutral_empty() {
        let api = seeded(&["a", "b"]);
        let items = list_resources(&api, "pod", "task=demo", true).await.unwrap();
        assert_eq!(items.len(), 2);

        let api: MockApi<Pod> = MockApi::new();
        api.fail_lists(500);
        let items = list_resources(&api, "pod", "task=demo", false).await.unwrap();
        assert!(items.is_empty());

        let api: MockApi<Pod> = MockApi::new();
        api.fail_lists(500);
        assert!(list_resources(&api, "pod", "task=demo", true).await.is_err());
    }

    #[tokio::test]
    async fn bulk_delete_aborts_on_first_failure_with_reraise() {
        let api = seeded(&["a", "b", "c"]);
        api.fail_delete("b", 500);

        let err = delete_collection(&api, "pod", "task=demo", true)
            .await
            .unwrap_err();
        assert!(matches!(err, ManagerError::Api { .. }));

        // "a" stays deleted, "c" was never attempted.
        assert!(!api.contains("a"));
        assert!(api.contains("b"));
        assert!(api.contains("c"));
        let calls = api.calls();
        assert!(calls.contains(&MockCall::Delete("a".to_string())));
        assert!(calls.contains(&MockCall::Delete("b".to_string())));
        assert!(!calls.contains(&MockCall::Read("c".to_string())));
        assert!(!calls.contains(&MockCall::Delete("c".to_string())));
    }

    #[tokio::test]
    async fn bulk_delete_continues_past_failures_without_reraise() {
        let api = seeded(&["a", "b", "c"]);
        api.fail_delete("b", 500);

        delete_collection(&api, "pod", "task=demo", false)
            .await
            .unwrap();

        assert!(!api.contains("a"));
        assert!(api.contains("b"));
        assert!(!api.contains("c"));
    }
}
