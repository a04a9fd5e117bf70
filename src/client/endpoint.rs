//! Member endpoint resolution
//!
//! The HTTP client itself is left to callers; [`EndpointFactory`] only
//! resolves where a member's administrative endpoint lives and which
//! credentials to present there.

use super::{AdminCredentials, ClientConfig, TransportFactory};
use std::sync::Arc;

/// Address and credentials of one member's administrative endpoint
#[derive(Debug, Clone)]
pub struct MemberEndpoint {
    pub base_url: String,
    pub container: String,
    pub credentials: Arc<AdminCredentials>,
}

/// [`TransportFactory`] producing [`MemberEndpoint`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointFactory;

impl TransportFactory for EndpointFactory {
    type Transport = MemberEndpoint;

    fn new_transport(&self, config: &ClientConfig) -> MemberEndpoint {
        // Members of a StatefulSet resolve as <pod>.<headless service>.<namespace>.svc
        let base_url = format!(
            "{}://{}.{}.{}.svc:{}",
            config.protocol, config.member, config.service, config.namespace, config.port
        );
        MemberEndpoint {
            base_url,
            container: config.container.clone(),
            credentials: Arc::clone(&config.credentials),
        }
    }
}
