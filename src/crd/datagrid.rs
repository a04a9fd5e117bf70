//! DataGrid Custom Resource Definition
//!
//! Defines the specification for a managed data grid cluster, its status
//! conditions, and the names of the objects derived from it.

use crate::conditions::ConditionSet;
use crate::conditions::DataGridCondition;
use crate::error::{OperatorError, Result};
use crate::naming;
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::{CustomResource, ResourceExt};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use tracing::info;

/// Annotation toggling the creation of a ServiceMonitor
pub const SERVICE_MONITORING_ANNOTATION: &str = "datagrid.io/monitoring";

/// Image tag fragment identifying natively compiled server images
pub const NATIVE_IMAGE_MARKER: &str = "native";

/// Log category always enabled at debug level in the server configuration
pub const BACKUP_LOG_CATEGORY: &str = "server.core.backup";

pub const DEFAULT_IMAGE: &str = "ghcr.io/datagrid/server:latest";
pub const DEFAULT_MEMORY_SIZE: &str = "1Gi";
pub const DEFAULT_STORAGE_SIZE: &str = "1Gi";
pub const DEFAULT_CACHE_REPLICATION_FACTOR: i32 = 2;

/// Serving certificate mode under which the platform issues endpoint certificates
pub const SERVING_CERTS_MODE: &str = "openshift.io";
/// Service that issues serving certificates
pub const SERVING_CERTS_SERVICE: &str = "service.beta.openshift.io";

pub const DEFAULT_SITE_KEYSTORE_FILE_NAME: &str = "keystore.p12";
pub const DEFAULT_SITE_TRANSPORT_KEYSTORE_ALIAS: &str = "transport";
pub const DEFAULT_SITE_ROUTER_KEYSTORE_ALIAS: &str = "router";
pub const DEFAULT_SITE_TRUSTSTORE_FILE_NAME: &str = "truststore.p12";

/// DataGrid is the Schema for the datagrids API
#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[kube(
    group = "datagrid.io",
    version = "v1",
    kind = "DataGrid",
    namespaced,
    status = "DataGridStatus",
    shortname = "dg",
    printcolumn = r#"{"name":"Replicas","type":"integer","jsonPath":".spec.replicas"}"#,
    printcolumn = r#"{"name":"Age","type":"date","jsonPath":".metadata.creationTimestamp"}"#
)]
#[serde(rename_all = "camelCase")]
pub struct DataGridSpec {
    /// Number of cluster members
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Container image to use for the server
    #[serde(default)]
    pub image: Option<String>,

    /// Service type and cross-site configuration
    #[serde(default)]
    pub service: ServiceSpec,

    /// Resources of the server container
    #[serde(default)]
    pub container: ContainerSpec,

    /// Endpoint security
    #[serde(default)]
    pub security: SecuritySpec,

    /// How the cluster is exposed outside Kubernetes
    #[serde(default)]
    pub expose: Option<ExposeSpec>,

    /// Server logging
    #[serde(default)]
    pub logging: Option<LoggingSpec>,

    /// Configuration listener sidecar
    #[serde(default)]
    pub config_listener: Option<ConfigListenerSpec>,

    /// Upgrade strategy
    #[serde(default)]
    pub upgrades: Option<UpgradesSpec>,

    /// Extra libraries added to the server classpath
    #[serde(default)]
    pub dependencies: Option<DependenciesSpec>,
}

/// Type of service offered by the cluster
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum ServiceType {
    #[default]
    Cache,
    DataGrid,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSpec {
    #[serde(default, rename = "type")]
    pub service_type: Option<ServiceType>,

    /// Number of owners of each entry
    #[serde(default)]
    pub replication_factor: i32,

    /// Cross-site replication
    #[serde(default)]
    pub sites: Option<SitesSpec>,

    /// Persistent storage of DataGrid services
    #[serde(default)]
    pub container: Option<ServiceContainerSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ServiceContainerSpec {
    /// Size of the persistent volume (e.g., "1Gi")
    #[serde(default)]
    pub storage: Option<String>,
    #[serde(default)]
    pub storage_class_name: Option<String>,
    #[serde(default)]
    pub ephemeral_storage: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SitesSpec {
    pub local: LocalSiteSpec,
    #[serde(default)]
    pub locations: Vec<SiteLocationSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocalSiteSpec {
    pub name: String,
    #[serde(default)]
    pub expose: Option<CrossSiteExposeSpec>,
    /// TLS between sites
    #[serde(default)]
    pub encryption: Option<CrossSiteEncryption>,
}

/// How the local site is reachable from remote sites
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum CrossSiteExposeType {
    ClusterIP,
    NodePort,
    LoadBalancer,
    Route,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrossSiteExposeSpec {
    #[serde(rename = "type")]
    pub expose_type: CrossSiteExposeType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum TlsProtocol {
    #[default]
    #[serde(rename = "TLSv1.2")]
    Tls12,
    #[serde(rename = "TLSv1.3")]
    Tls13,
}

impl TlsProtocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            TlsProtocol::Tls12 => "TLSv1.2",
            TlsProtocol::Tls13 => "TLSv1.3",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CrossSiteEncryption {
    #[serde(default)]
    pub protocol: Option<TlsProtocol>,
    #[serde(default)]
    pub transport_key_store: CrossSiteKeyStore,
    #[serde(default)]
    pub router_key_store: CrossSiteKeyStore,
    #[serde(default)]
    pub trust_store: Option<CrossSiteTrustStore>,
}

/// Keystore held in a Secret; empty fields fall back to defaults
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CrossSiteKeyStore {
    #[serde(default)]
    pub secret_name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CrossSiteTrustStore {
    #[serde(default)]
    pub secret_name: String,
    #[serde(default)]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteLocationSpec {
    pub name: String,
    /// Name of the cluster at the remote site (defaults to this cluster's name)
    #[serde(default)]
    pub cluster_name: Option<String>,
    /// Namespace of the remote cluster (defaults to this cluster's namespace)
    #[serde(default)]
    pub namespace: Option<String>,
}

/// Resources of the server container, as `<limit>` or `<limit>:<request>`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContainerSpec {
    #[serde(default)]
    pub cpu: Option<String>,
    #[serde(default)]
    pub memory: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySpec {
    /// Secret holding the endpoint identities
    #[serde(default)]
    pub endpoint_secret_name: Option<String>,
    #[serde(default)]
    pub endpoint_authentication: Option<bool>,
    #[serde(default)]
    pub endpoint_encryption: Option<EndpointEncryption>,
    #[serde(default)]
    pub authorization: Option<AuthorizationSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct EndpointEncryption {
    /// Certificate source (Secret, Service, None)
    #[serde(default, rename = "type")]
    pub source: Option<CertificateSource>,
    /// Service issuing the certificate when the source is `Service`
    #[serde(default)]
    pub cert_service_name: Option<String>,
    #[serde(default)]
    pub cert_secret_name: Option<String>,
    #[serde(default)]
    pub client_cert: Option<ClientCertType>,
    #[serde(default)]
    pub client_cert_secret_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum CertificateSource {
    Secret,
    #[serde(alias = "service")]
    Service,
    None,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ClientCertType {
    None,
    Authenticate,
    Validate,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub roles: Vec<AuthorizationRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuthorizationRole {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub enum ExposeType {
    NodePort,
    LoadBalancer,
    Route,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExposeSpec {
    #[serde(rename = "type")]
    pub expose_type: ExposeType,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSpec {
    /// Log level per category
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfigListenerSpec {
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub enum UpgradeType {
    #[default]
    Shutdown,
    HotRodRolling,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpgradesSpec {
    #[serde(rename = "type")]
    pub upgrade_type: UpgradeType,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct DependenciesSpec {
    /// PersistentVolumeClaim holding user libraries
    #[serde(default)]
    pub volume_claim_name: Option<String>,
    /// Artifacts downloaded into the server on start
    #[serde(default)]
    pub artifacts: Vec<ArtifactSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactSpec {
    pub url: String,
    /// Checksum as `<algorithm>:<hex>`
    #[serde(default)]
    pub hash: Option<String>,
}

/// Status of the DataGrid
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct DataGridStatus {
    /// Conditions representing cluster state
    #[serde(default)]
    #[schemars(with = "Vec<DataGridCondition>")]
    pub conditions: ConditionSet,
    /// StatefulSet currently backing the cluster; set after a live migration
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stateful_set_name: String,
    /// Cluster size to restore once an upgrade shutdown has completed
    #[serde(default)]
    pub replicas_wanted_at_restart: i32,
}

/// Kind of server image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Jvm,
    Native,
}

fn default_replicas() -> i32 {
    1
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() {
        default
    } else {
        value
    }
}

fn parse_quantity(value: &str) -> Result<Quantity> {
    let value = value.trim();
    let digits = value.trim_end_matches(|c: char| c.is_ascii_alphabetic());
    let suffix = &value[digits.len()..];
    let valid_suffix = matches!(
        suffix,
        "" | "m" | "k" | "M" | "G" | "T" | "P" | "E" | "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei"
    );
    if digits.is_empty() || digits.parse::<f64>().is_err() || !valid_suffix {
        return Err(OperatorError::InvalidResource(format!(
            "unable to parse quantity '{}'",
            value
        )));
    }
    Ok(Quantity(value.to_string()))
}

/// Parses `<limit>:<request>` or `<limit>` (request equals limit) into
/// (requests, limits).
fn request_limits(value: &str) -> Result<(Quantity, Quantity)> {
    if value.is_empty() {
        return Err(OperatorError::InvalidResource(
            "resource string cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() > 2 {
        return Err(OperatorError::InvalidResource(format!(
            "unexpected resource format. Expected a string of '<limit>:<request>' or '<limit>', received: '{}'",
            value
        )));
    }

    let limits = parse_quantity(parts[0])?;
    let requests = match parts.get(1) {
        Some(request) => parse_quantity(request)?,
        None => limits.clone(),
    };
    Ok((requests, limits))
}

impl ContainerSpec {
    /// CPU (requests, limits) of the server container
    pub fn cpu_resources(&self) -> Result<(Quantity, Quantity)> {
        request_limits(self.cpu.as_deref().unwrap_or_default())
    }

    /// Memory (requests, limits) of the server container
    pub fn memory_resources(&self) -> Result<(Quantity, Quantity)> {
        request_limits(self.memory.as_deref().unwrap_or_default())
    }
}

impl DataGrid {
    /// Conditions of the resource; empty when no status has been written yet.
    pub fn conditions(&self) -> Cow<'_, ConditionSet> {
        match self.status.as_ref() {
            Some(status) => Cow::Borrowed(&status.conditions),
            None => Cow::Owned(ConditionSet::new()),
        }
    }

    /// Mutable access to the conditions, creating the status if needed.
    pub fn conditions_mut(&mut self) -> &mut ConditionSet {
        &mut self.status.get_or_insert_with(Default::default).conditions
    }

    pub fn replicas_wanted_at_restart(&self) -> i32 {
        self.status
            .as_ref()
            .map(|s| s.replicas_wanted_at_restart)
            .unwrap_or_default()
    }

    /// Fills unset optional fields with their defaults.
    pub fn apply_defaults(&mut self) {
        let name = self.name_any();
        let spec = &mut self.spec;

        if spec.service.service_type.is_none() {
            spec.service.service_type = Some(ServiceType::Cache);
        }
        if spec.service.service_type == Some(ServiceType::Cache)
            && spec.service.replication_factor == 0
        {
            spec.service.replication_factor = DEFAULT_CACHE_REPLICATION_FACTOR;
        }
        if spec.container.memory.as_deref().unwrap_or_default().is_empty() {
            spec.container.memory = Some(DEFAULT_MEMORY_SIZE.to_string());
        }
        if spec.service.service_type == Some(ServiceType::DataGrid) {
            let container = spec.service.container.get_or_insert_with(Default::default);
            if container.storage.is_none() {
                container.storage = Some(DEFAULT_STORAGE_SIZE.to_string());
            }
        }

        let generated = generated_secret_name(&name);
        let authentication = *spec.security.endpoint_authentication.get_or_insert(true);
        if authentication {
            if spec.security.endpoint_secret_name.as_deref().unwrap_or_default().is_empty() {
                spec.security.endpoint_secret_name = Some(generated);
            }
        } else if spec.security.endpoint_secret_name.as_deref() == Some(generated.as_str()) {
            spec.security.endpoint_secret_name = None;
        }

        if spec.upgrades.is_none() {
            spec.upgrades = Some(UpgradesSpec {
                upgrade_type: UpgradeType::Shutdown,
            });
        }
        if spec.config_listener.is_none() {
            spec.config_listener = Some(ConfigListenerSpec { enabled: true });
        }
    }

    /// Fills in endpoint encryption: certificates from the serving
    /// certificate service when the platform provides one, and client
    /// certificate defaults.
    pub fn apply_endpoint_encryption_settings(&mut self, serving_certs_mode: &str) {
        let name = self.name_any();
        let use_serving_certs = serving_certs_mode == SERVING_CERTS_MODE
            && (!self.is_encryption_cert_source_defined() || self.is_encryption_cert_from_service());

        if use_serving_certs {
            let encryption = self
                .spec
                .security
                .endpoint_encryption
                .get_or_insert_with(Default::default);
            if encryption.cert_service_name.as_deref().unwrap_or_default().is_empty()
                || encryption.source.is_none()
            {
                info!(grid = %name, "Serving certificate service present, configuring endpoint encryption");
                encryption.source = Some(CertificateSource::Service);
                encryption.cert_service_name = Some(SERVING_CERTS_SERVICE.to_string());
            }
            if encryption.cert_secret_name.as_deref().unwrap_or_default().is_empty() {
                encryption.cert_secret_name = Some(format!("{}-cert-secret", name));
            }
        }

        if let Some(encryption) = self.spec.security.endpoint_encryption.as_mut() {
            let client_cert = *encryption.client_cert.get_or_insert(ClientCertType::None);
            if client_cert != ClientCertType::None
                && encryption.client_cert_secret_name.as_deref().unwrap_or_default().is_empty()
            {
                encryption.client_cert_secret_name = Some(format!("{}-client-cert-secret", name));
            }
        }
    }

    pub fn image_name(&self) -> &str {
        match self.spec.image.as_deref() {
            Some(image) if !image.is_empty() => image,
            _ => DEFAULT_IMAGE,
        }
    }

    pub fn image_type(&self) -> ImageType {
        if self.image_name().contains(NATIVE_IMAGE_MARKER) {
            ImageType::Native
        } else {
            ImageType::Jvm
        }
    }

    pub fn service_type(&self) -> ServiceType {
        self.spec.service.service_type.unwrap_or_default()
    }

    pub fn is_data_grid(&self) -> bool {
        self.service_type() == ServiceType::DataGrid
    }

    pub fn is_cache(&self) -> bool {
        self.service_type() == ServiceType::Cache
    }

    // Names

    /// Name of the StatefulSet backing the cluster. Changes after a live
    /// migration, so derived names that must follow the workload use this
    /// rather than the resource name.
    pub fn stateful_set_name(&self) -> String {
        match self.status.as_ref() {
            Some(status) if !status.stateful_set_name.is_empty() => {
                status.stateful_set_name.clone()
            }
            _ => self.name_any(),
        }
    }

    pub fn service_name(&self) -> String {
        self.name_any()
    }

    pub fn admin_service_name(&self) -> String {
        format!("{}-admin", self.name_any())
    }

    pub fn ping_service_name(&self) -> String {
        format!("{}-ping", self.stateful_set_name())
    }

    pub fn config_name(&self) -> String {
        format!("{}-configuration", self.stateful_set_name())
    }

    /// Secret holding the operator's own admin credentials
    pub fn admin_secret_name(&self) -> String {
        format!("{}{}", self.name_any(), naming::ADMIN_SECRET_NAME_SUFFIX)
    }

    /// Secret holding the endpoint identities
    pub fn secret_name(&self) -> String {
        match self.spec.security.endpoint_secret_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => generated_secret_name(&self.name_any()),
        }
    }

    /// Name of the endpoint secret the operator generates when none is given
    pub fn generate_secret_name(&self) -> String {
        generated_secret_name(&self.name_any())
    }

    /// Whether the endpoint secret is the one generated by the operator
    pub fn is_generated_secret(&self) -> bool {
        self.spec.security.endpoint_secret_name.as_deref() == Some(self.generate_secret_name().as_str())
    }

    pub fn security_secret_name(&self) -> String {
        format!("{}-security", self.name_any())
    }

    pub fn service_monitor_name(&self) -> String {
        format!("{}-monitor", self.name_any())
    }

    pub fn gossip_router_deployment_name(&self) -> String {
        format!("{}-router", self.name_any())
    }

    pub fn config_listener_name(&self) -> String {
        format!("{}-config-listener", self.name_any())
    }

    pub fn service_external_name(&self) -> String {
        naming::external_service_name(
            &self.name_any(),
            &self.namespace().unwrap_or_default(),
            self.expose_type() == Some(ExposeType::Route),
            naming::EXTERNAL_SERVICE_FILLER,
        )
    }

    // Exposure and security

    pub fn is_exposed(&self) -> bool {
        self.spec.expose.is_some()
    }

    pub fn expose_type(&self) -> Option<ExposeType> {
        self.spec.expose.as_ref().map(|e| e.expose_type)
    }

    pub fn is_encryption_enabled(&self) -> bool {
        self.spec
            .security
            .endpoint_encryption
            .as_ref()
            .is_some_and(|e| e.source != Some(CertificateSource::None))
    }

    pub fn is_encryption_cert_from_service(&self) -> bool {
        self.spec
            .security
            .endpoint_encryption
            .as_ref()
            .is_some_and(|e| e.source == Some(CertificateSource::Service))
    }

    pub fn is_encryption_cert_source_defined(&self) -> bool {
        self.spec
            .security
            .endpoint_encryption
            .as_ref()
            .is_some_and(|e| e.source.is_some())
    }

    /// Secret holding the endpoint keystore
    pub fn keystore_secret_name(&self) -> Option<&str> {
        self.spec
            .security
            .endpoint_encryption
            .as_ref()
            .and_then(|e| e.cert_secret_name.as_deref())
            .filter(|n| !n.is_empty())
    }

    /// Secret holding the truststore used to check client certificates
    pub fn truststore_secret_name(&self) -> Option<&str> {
        self.spec
            .security
            .endpoint_encryption
            .as_ref()
            .and_then(|e| e.client_cert_secret_name.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn is_client_cert_enabled(&self) -> bool {
        self.is_encryption_enabled()
            && self
                .spec
                .security
                .endpoint_encryption
                .as_ref()
                .and_then(|e| e.client_cert)
                .is_some_and(|c| c != ClientCertType::None)
    }

    /// Protocol scheme of the cluster endpoints
    pub fn endpoint_scheme(&self) -> &'static str {
        if self.is_encryption_enabled() {
            "https"
        } else {
            "http"
        }
    }

    pub fn is_authentication_enabled(&self) -> bool {
        self.spec.security.endpoint_authentication.unwrap_or(true)
    }

    pub fn is_authorization_enabled(&self) -> bool {
        self.spec
            .security
            .authorization
            .as_ref()
            .is_some_and(|a| a.enabled)
    }

    pub fn authorization_roles(&self) -> &[AuthorizationRole] {
        match &self.spec.security.authorization {
            Some(authz) if authz.enabled => authz.roles.as_slice(),
            _ => &[],
        }
    }

    // Storage

    pub fn is_ephemeral_storage(&self) -> bool {
        self.spec
            .service
            .container
            .as_ref()
            .is_some_and(|c| c.ephemeral_storage)
    }

    pub fn storage_class_name(&self) -> Option<&str> {
        self.spec
            .service
            .container
            .as_ref()
            .and_then(|c| c.storage_class_name.as_deref())
            .filter(|n| !n.is_empty())
    }

    pub fn storage_size(&self) -> Option<&str> {
        self.spec
            .service
            .container
            .as_ref()
            .and_then(|c| c.storage.as_deref())
    }

    // Dependencies

    /// Whether user libraries are mounted from a PersistentVolumeClaim
    pub fn has_dependencies_volume(&self) -> bool {
        self.spec
            .dependencies
            .as_ref()
            .and_then(|d| d.volume_claim_name.as_deref())
            .is_some_and(|n| !n.is_empty())
    }

    pub fn has_external_artifacts(&self) -> bool {
        self.spec
            .dependencies
            .as_ref()
            .is_some_and(|d| !d.artifacts.is_empty())
    }

    // Cross-site

    pub fn has_sites(&self) -> bool {
        self.is_data_grid() && self.spec.service.sites.is_some()
    }

    /// How the local site is exposed to remote sites; `None` without sites
    pub fn cross_site_expose_type(&self) -> Option<CrossSiteExposeType> {
        self.spec
            .service
            .sites
            .as_ref()
            .and_then(|s| s.local.expose.as_ref())
            .map(|e| e.expose_type)
    }

    /// Cross-site TLS settings, present only when TLS is enabled
    fn site_encryption(&self) -> Option<&CrossSiteEncryption> {
        if !self.has_sites() {
            return None;
        }
        self.spec
            .service
            .sites
            .as_ref()
            .and_then(|s| s.local.encryption.as_ref())
            .filter(|e| e.transport_key_store != CrossSiteKeyStore::default())
    }

    /// TLS is on once a transport keystore is configured
    pub fn is_site_tls_enabled(&self) -> bool {
        self.site_encryption().is_some()
    }

    pub fn site_tls_protocol(&self) -> Option<TlsProtocol> {
        self.site_encryption()
            .map(|e| e.protocol.unwrap_or_default())
    }

    pub fn site_transport_secret_name(&self) -> Option<&str> {
        self.site_encryption()
            .map(|e| e.transport_key_store.secret_name.as_str())
    }

    pub fn site_transport_keystore_file_name(&self) -> Option<&str> {
        self.site_encryption().map(|e| {
            non_empty_or(&e.transport_key_store.filename, DEFAULT_SITE_KEYSTORE_FILE_NAME)
        })
    }

    pub fn site_transport_keystore_alias(&self) -> Option<&str> {
        self.site_encryption().map(|e| {
            non_empty_or(&e.transport_key_store.alias, DEFAULT_SITE_TRANSPORT_KEYSTORE_ALIAS)
        })
    }

    pub fn site_router_secret_name(&self) -> Option<&str> {
        self.site_encryption()
            .map(|e| e.router_key_store.secret_name.as_str())
    }

    pub fn site_router_keystore_file_name(&self) -> Option<&str> {
        self.site_encryption().map(|e| {
            non_empty_or(&e.router_key_store.filename, DEFAULT_SITE_KEYSTORE_FILE_NAME)
        })
    }

    pub fn site_router_keystore_alias(&self) -> Option<&str> {
        self.site_encryption().map(|e| {
            non_empty_or(&e.router_key_store.alias, DEFAULT_SITE_ROUTER_KEYSTORE_ALIAS)
        })
    }

    pub fn site_truststore_secret_name(&self) -> Option<&str> {
        self.site_encryption()
            .and_then(|e| e.trust_store.as_ref())
            .map(|t| t.secret_name.as_str())
    }

    pub fn site_truststore_file_name(&self) -> Option<&str> {
        self.site_encryption().map(|e| match &e.trust_store {
            Some(trust_store) => {
                non_empty_or(&trust_store.filename, DEFAULT_SITE_TRUSTSTORE_FILE_NAME)
            }
            None => DEFAULT_SITE_TRUSTSTORE_FILE_NAME,
        })
    }

    /// Site locations other than the local one, keyed by name
    pub fn remote_site_locations(&self) -> BTreeMap<String, SiteLocationSpec> {
        let Some(sites) = &self.spec.service.sites else {
            return BTreeMap::new();
        };
        sites
            .locations
            .iter()
            .filter(|l| l.name != sites.local.name)
            .map(|l| (l.name.clone(), l.clone()))
            .collect()
    }

    /// Names of all site locations, local included, sorted
    pub fn site_locations_names(&self) -> Vec<String> {
        let Some(sites) = &self.spec.service.sites else {
            return Vec::new();
        };
        let mut names: Vec<String> = sites
            .locations
            .iter()
            .filter(|l| l.name != sites.local.name)
            .map(|l| l.name.clone())
            .collect();
        names.push(sites.local.name.clone());
        names.sort();
        names
    }

    pub fn site_service_name(&self) -> String {
        naming::site_service_name(&self.name_any())
    }

    pub fn site_route_name(&self) -> String {
        naming::site_route_name(&self.name_any())
    }

    pub fn remote_site_cluster_name(&self, location: &str) -> String {
        self.remote_site_locations()
            .get(location)
            .and_then(|l| l.cluster_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.name_any())
    }

    pub fn remote_site_namespace(&self, location: &str) -> String {
        self.remote_site_locations()
            .get(location)
            .and_then(|l| l.namespace.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.namespace().unwrap_or_default())
    }

    pub fn remote_site_service_name(&self, location: &str) -> String {
        naming::site_service_name(&self.remote_site_cluster_name(location))
    }

    pub fn remote_site_route_name(&self, location: &str) -> String {
        naming::site_route_name(&self.remote_site_cluster_name(location))
    }

    pub fn remote_site_service_fqn(&self, location: &str) -> String {
        naming::service_fqn(
            &self.remote_site_service_name(location),
            &self.remote_site_namespace(location),
        )
    }

    // Monitoring and logging

    pub fn is_service_monitor_enabled(&self) -> bool {
        self.annotations()
            .get(SERVICE_MONITORING_ANNOTATION)
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false)
    }

    /// Enables monitoring unless the annotation is already present.
    pub fn apply_monitoring_annotation(&mut self) {
        self.annotations_mut()
            .entry(SERVICE_MONITORING_ANNOTATION.to_string())
            .or_insert_with(|| true.to_string());
    }

    /// Log categories for the server configuration
    pub fn log_categories_for_config(&self) -> BTreeMap<String, String> {
        let mut categories = BTreeMap::new();
        categories.insert(BACKUP_LOG_CATEGORY.to_string(), "debug".to_string());
        if let Some(logging) = &self.spec.logging {
            categories.extend(logging.categories.clone());
        }
        categories
    }

    pub fn is_config_listener_enabled(&self) -> bool {
        self.spec.config_listener.as_ref().is_some_and(|c| c.enabled)
    }
}

fn generated_secret_name(name: &str) -> String {
    format!("{}-{}", name, naming::GENERATED_SECRET_SUFFIX)
}
