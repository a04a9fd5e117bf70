//! Controllers for the DataGrid operator
//!
//! Each controller watches its CRD and evaluates the observed state of the
//! clusters it describes.

mod datagrid;

pub use datagrid::{assess, Assessment, DataGridController};

use std::time::Duration;

/// Settings handed to controllers at startup
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Namespace to watch; `None` watches all namespaces
    pub namespace: Option<String>,
    /// Requeue interval for stable clusters
    pub requeue: Duration,
    /// Requeue interval for clusters that are not formed or are upgrading
    pub unstable_requeue: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            requeue: Duration::from_secs(60),
            unstable_requeue: Duration::from_secs(10),
        }
    }
}
