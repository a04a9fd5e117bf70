//! DataGrid Kubernetes Operator
//!
//! Core of an operator managing data grid clusters.
//!
//! ## Modules
//!
//! - `conditions`: case-insensitive status condition store
//! - `stability`: whether a cluster is well formed
//! - `upgrade`: whether a pending upgrade may continue
//! - `naming`: derived object names and their length limits
//! - `client`: admin clients bound to individual cluster members
//!
//! ## Example
//!
//! ```yaml
//! apiVersion: datagrid.io/v1
//! kind: DataGrid
//! metadata:
//!   name: my-grid
//! spec:
//!   replicas: 3
//!   service:
//!     type: DataGrid
//! ```

pub mod client;
pub mod conditions;
pub mod controllers;
pub mod crd;
pub mod error;
pub mod naming;
pub mod stability;
pub mod upgrade;

pub use client::{AdminClient, AdminClientBinder, AdminCredentials, ClientConfig};
pub use conditions::{ConditionSet, ConditionStatus, DataGridCondition};
pub use controllers::{ControllerConfig, DataGridController};
pub use crd::{DataGrid, DataGridSpec, DataGridStatus};
pub use error::{ConditionMismatch, CredentialLookupFailed, OperatorError, Result};
pub use upgrade::UpgradeState;
