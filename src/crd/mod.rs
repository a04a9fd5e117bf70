//! Custom Resource Definitions for the DataGrid operator
//!
//! - DataGrid: a managed data grid cluster

mod datagrid;

pub use datagrid::{
    ArtifactSpec, AuthorizationRole, AuthorizationSpec, CertificateSource, ClientCertType,
    ConfigListenerSpec, ContainerSpec, CrossSiteEncryption, CrossSiteExposeSpec,
    CrossSiteExposeType, CrossSiteKeyStore, CrossSiteTrustStore, DataGrid, DataGridSpec,
    DataGridStatus, DependenciesSpec, EndpointEncryption, ExposeSpec, ExposeType, ImageType,
    LocalSiteSpec, LoggingSpec, SecuritySpec, ServiceContainerSpec, ServiceSpec, ServiceType,
    SiteLocationSpec, SitesSpec, TlsProtocol, UpgradeType, UpgradesSpec, BACKUP_LOG_CATEGORY,
    DEFAULT_IMAGE, NATIVE_IMAGE_MARKER, SERVICE_MONITORING_ANNOTATION, SERVING_CERTS_MODE,
    SERVING_CERTS_SERVICE,
};
