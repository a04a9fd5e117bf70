//! Administrative client binding
//!
//! An [`AdminClient`] talks to one member of a DataGrid cluster on the
//! administrative port, authenticated with the operator's admin
//! credentials. [`AdminClientBinder::bind`] fetches those credentials once;
//! [`AdminClient::rebind`] points an existing client at another member
//! without another secret lookup.
//!
//! There is no process-wide credential cache: each `bind` fetches the
//! secret again, so callers iterating over members should `rebind`.

mod endpoint;
mod kubernetes;

pub use endpoint::{EndpointFactory, MemberEndpoint};
pub use kubernetes::{KubePodLister, KubeSecretStore, MEMBER_LABEL};

use crate::crd::DataGrid;
use crate::error::{CredentialLookupFailed, OperatorError, Result, SecretStoreError};
use async_trait::async_trait;
use kube::ResourceExt;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Port of the server's administrative endpoint
pub const ADMIN_PORT: u16 = 11223;

/// Protocol of the administrative endpoint
pub const ADMIN_PROTOCOL: &str = "http";

/// Name of the server container within a member pod
pub const SERVER_CONTAINER: &str = "datagrid";

/// Username/password pair for the administrative endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Source of admin credentials
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> std::result::Result<AdminCredentials, SecretStoreError>;
}

#[async_trait]
impl<T: SecretStore + ?Sized> SecretStore for Arc<T> {
    async fn get_secret(
        &self,
        name: &str,
        namespace: &str,
    ) -> std::result::Result<AdminCredentials, SecretStoreError> {
        (**self).get_secret(name, namespace).await
    }
}

/// Enumerates the members of a cluster workload
#[async_trait]
pub trait MemberLister: Send + Sync {
    /// Member identifiers, in a stable order
    async fn list_members(&self, namespace: &str, workload: &str) -> Result<Vec<String>>;
}

/// Builds the transport used to issue calls to a single member
pub trait TransportFactory: Send + Sync {
    type Transport;

    fn new_transport(&self, config: &ClientConfig) -> Self::Transport;
}

/// Everything needed to reach one member's administrative endpoint.
///
/// Clones share the credentials.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub credentials: Arc<AdminCredentials>,
    pub member: String,
    pub namespace: String,
    /// Headless service the members are addressable through
    pub service: String,
    pub protocol: String,
    pub port: u16,
    pub container: String,
}

/// Client bound to one cluster member
pub struct AdminClient<F: TransportFactory> {
    config: ClientConfig,
    transport: F::Transport,
    factory: Arc<F>,
}

impl<F: TransportFactory> AdminClient<F> {
    fn new(config: ClientConfig, factory: Arc<F>) -> Self {
        let transport = factory.new_transport(&config);
        Self {
            config,
            transport,
            factory,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn member(&self) -> &str {
        &self.config.member
    }

    pub fn transport(&self) -> &F::Transport {
        &self.transport
    }

    /// Returns a client for `member` reusing this client's credentials.
    /// Performs no I/O.
    pub fn rebind(&self, member: &str) -> Self {
        let mut config = self.config.clone();
        config.member = member.to_string();
        debug!(
            from = %self.config.member,
            to = %member,
            "Rebinding admin client"
        );
        Self::new(config, Arc::clone(&self.factory))
    }
}

impl<F: TransportFactory> fmt::Debug for AdminClient<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Creates admin clients for DataGrid members
pub struct AdminClientBinder<S, F> {
    secrets: S,
    factory: Arc<F>,
}

impl<S: SecretStore, F: TransportFactory> AdminClientBinder<S, F> {
    pub fn new(secrets: S, factory: F) -> Self {
        Self {
            secrets,
            factory: Arc::new(factory),
        }
    }

    /// Fetches the admin credentials of `grid` and binds a client to `member`.
    pub async fn bind(
        &self,
        grid: &DataGrid,
        member: &str,
    ) -> std::result::Result<AdminClient<F>, CredentialLookupFailed> {
        let namespace = grid.namespace().unwrap_or_else(|| "default".to_string());
        let secret = grid.admin_secret_name();

        let credentials = self
            .secrets
            .get_secret(&secret, &namespace)
            .await
            .map_err(|source| CredentialLookupFailed {
                secret: secret.clone(),
                namespace: namespace.clone(),
                source,
            })?;

        info!(
            grid = %grid.name_any(),
            namespace = %namespace,
            member = %member,
            "Bound admin client"
        );

        let config = ClientConfig {
            credentials: Arc::new(credentials),
            member: member.to_string(),
            namespace,
            service: grid.ping_service_name(),
            protocol: ADMIN_PROTOCOL.to_string(),
            port: ADMIN_PORT,
            container: SERVER_CONTAINER.to_string(),
        };
        Ok(AdminClient::new(config, Arc::clone(&self.factory)))
    }

    /// Binds a client to the first member of the grid's StatefulSet.
    pub async fn bind_first_member<L: MemberLister>(
        &self,
        grid: &DataGrid,
        members: &L,
    ) -> Result<AdminClient<F>> {
        let namespace = grid.namespace().unwrap_or_else(|| "default".to_string());
        let workload = grid.stateful_set_name();

        let listed = members.list_members(&namespace, &workload).await?;
        let first = listed
            .first()
            .ok_or_else(|| OperatorError::NoMembers {
                namespace: namespace.clone(),
                workload: workload.clone(),
            })?;

        Ok(self.bind(grid, first).await?)
    }
}
