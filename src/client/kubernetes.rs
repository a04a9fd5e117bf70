//! Kubernetes-backed secret store and member enumeration

use super::{AdminCredentials, MemberLister, SecretStore};
use crate::error::{OperatorError, Result, SecretStoreError};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Pod, Secret};
use kube::api::{Api, ListParams};
use kube::Client;
use tracing::debug;

/// Label carried by every member pod, valued with the owning workload name
pub const MEMBER_LABEL: &str = "app.kubernetes.io/instance";

const USERNAME_KEY: &str = "username";
const PASSWORD_KEY: &str = "password";

/// Reads admin credentials from Kubernetes Secrets
#[derive(Clone)]
pub struct KubeSecretStore {
    client: Client,
}

impl KubeSecretStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn secret_value(secret: &Secret, name: &str, key: &str) -> std::result::Result<String, SecretStoreError> {
    let missing = || SecretStoreError::MissingKey {
        name: name.to_string(),
        key: key.to_string(),
    };

    if let Some(value) = secret.string_data.as_ref().and_then(|d| d.get(key)) {
        return Ok(value.clone());
    }
    let bytes = secret
        .data
        .as_ref()
        .and_then(|d| d.get(key))
        .ok_or_else(missing)?;
    String::from_utf8(bytes.0.clone()).map_err(|_| missing())
}

/// Extracts the admin credentials held by `secret`.
fn credentials_from_secret(
    secret: &Secret,
    name: &str,
) -> std::result::Result<AdminCredentials, SecretStoreError> {
    Ok(AdminCredentials {
        username: secret_value(secret, name, USERNAME_KEY)?,
        password: secret_value(secret, name, PASSWORD_KEY)?,
    })
}

#[async_trait]
impl SecretStore for KubeSecretStore {
    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> std::result::Result<AdminCredentials, SecretStoreError> {
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        let secret = match secrets.get(name).await {
            Ok(secret) => secret,
            Err(kube::Error::Api(ae)) if ae.code == 404 => {
                return Err(SecretStoreError::NotFound {
                    name: name.to_string(),
                    namespace: namespace.to_string(),
                })
            }
            Err(e) => return Err(SecretStoreError::Transient(e.to_string())),
        };
        debug!("Read admin secret {}/{}", namespace, name);
        credentials_from_secret(&secret, name)
    }
}

/// Lists cluster members as the pods of their StatefulSet
#[derive(Clone)]
pub struct KubePodLister {
    client: Client,
}

impl KubePodLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// A member counts only while its pod is Running and not being deleted.
fn is_live_member(pod: &Pod) -> bool {
    let running = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.as_deref())
        == Some("Running");
    running && pod.metadata.deletion_timestamp.is_none()
}

#[async_trait]
impl MemberLister for KubePodLister {
    async fn list_members(&self, namespace: &str, workload: &str) -> Result<Vec<String>> {
        let pods: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let pod_list = pods
            .list(&ListParams::default().labels(&format!("{}={}", MEMBER_LABEL, workload)))
            .await
            .map_err(|e| OperatorError::KubeApi(e.to_string()))?;

        let mut members: Vec<String> = pod_list
            .items
            .into_iter()
            .filter(is_live_member)
            .filter_map(|pod| pod.metadata.name)
            .collect();
        members.sort();
        Ok(members)
    }
}
