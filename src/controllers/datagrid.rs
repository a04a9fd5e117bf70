//! DataGrid Controller
//!
//! Watches DataGrid custom resources and reports, on every reconcile,
//! whether each cluster is stable and whether a pending upgrade may
//! continue. Status is owned by the control plane; this controller only
//! reads it.

use super::ControllerConfig;
use crate::client::{KubePodLister, MemberLister};
use crate::crd::DataGrid;
use crate::error::{OperatorError, Result};
use crate::stability::{ensure_cluster_stability, not_formed};
use crate::upgrade::UpgradeState;
use futures::StreamExt;
use kube::api::Api;
use kube::runtime::controller::{Action, Controller};
use kube::runtime::watcher::Config;
use kube::{Client, ResourceExt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// What a reconcile pass concluded about a cluster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub members: usize,
    pub desired: usize,
    pub formed: bool,
    pub upgrade: UpgradeState,
}

impl Assessment {
    /// Requeue interval for this assessment: unstable clusters and clusters
    /// mid-upgrade are checked again sooner.
    pub fn requeue_after(&self, config: &ControllerConfig) -> Duration {
        if !self.formed || self.upgrade != UpgradeState::NoUpgrade {
            config.unstable_requeue
        } else {
            config.requeue
        }
    }
}

/// Evaluates stability and upgrade readiness of `grid` given its live
/// member count.
pub fn assess(grid: &DataGrid, members: usize) -> Assessment {
    let conditions = grid.conditions();
    let desired = usize::try_from(grid.spec.replicas).unwrap_or_default();
    let replicas_wanted_at_restart = grid.replicas_wanted_at_restart();

    let upgrade = UpgradeState::evaluate(&conditions, replicas_wanted_at_restart);
    upgrade.trace(replicas_wanted_at_restart);

    Assessment {
        members,
        desired,
        formed: !not_formed(&conditions, members, desired),
        upgrade,
    }
}

/// Context for the DataGrid controller
pub struct DataGridController {
    client: Client,
    members: KubePodLister,
    config: ControllerConfig,
}

impl DataGridController {
    /// Create a new DataGrid controller
    pub fn new(client: Client, config: ControllerConfig) -> Self {
        Self {
            members: KubePodLister::new(client.clone()),
            client,
            config,
        }
    }

    /// Run the DataGrid controller
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let grids: Api<DataGrid> = match self.config.namespace.as_deref() {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        };

        info!("Starting DataGrid controller");

        Controller::new(grids, Config::default())
            .shutdown_on_signal()
            .run(
                |grid, ctx| async move { ctx.reconcile(grid).await },
                |_grid, error, ctx| {
                    error!("Reconciliation error: {:?}", error);
                    Action::requeue(ctx.config.unstable_requeue)
                },
                Arc::clone(&self),
            )
            .for_each(|result| async move {
                match result {
                    Ok((obj, _action)) => {
                        info!("Reconciled data grid: {}", obj.name);
                    }
                    Err(e) => {
                        error!("Reconciliation failed: {:?}", e);
                    }
                }
            })
            .await;

        Ok(())
    }

    /// Reconcile a DataGrid
    async fn reconcile(&self, grid: Arc<DataGrid>) -> std::result::Result<Action, OperatorError> {
        let name = grid.name_any();
        let namespace = grid.namespace().unwrap_or_else(|| "default".to_string());

        info!("Reconciling DataGrid {}/{}", namespace, name);

        if grid.metadata.deletion_timestamp.is_some() {
            return Ok(Action::await_change());
        }

        let members = self
            .members
            .list_members(&namespace, &grid.stateful_set_name())
            .await?;

        let assessment = assess(&grid, members.len());
        let conditions = grid.conditions();
        if assessment.formed {
            info!(
                grid = %name,
                members = assessment.members,
                "Cluster is well formed"
            );
        } else if let Err(mismatch) = ensure_cluster_stability(&conditions) {
            warn!(grid = %name, "Cluster not formed: {}", mismatch);
        } else {
            warn!(
                grid = %name,
                "Cluster not formed: {}/{} members running",
                assessment.members,
                assessment.desired
            );
        }

        Ok(Action::requeue(assessment.requeue_after(&self.config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditions::{ConditionStatus, CONDITION_STOPPING, CONDITION_UPGRADE};
    use crate::crd::DataGridStatus;
    use crate::stability::EXPECTED_STABLE_CONDITIONS;

    fn grid(replicas: i32) -> DataGrid {
        let spec = serde_json::from_value(serde_json::json!({ "replicas": replicas })).unwrap();
        let mut grid = DataGrid::new("grid", spec);
        grid.metadata.namespace = Some("ns".to_string());
        grid
    }

    fn stable(replicas: i32) -> DataGrid {
        let mut g = grid(replicas);
        for (condition_type, status) in EXPECTED_STABLE_CONDITIONS {
            g.conditions_mut().set(condition_type, status, "");
        }
        g
    }

    fn config() -> ControllerConfig {
        ControllerConfig {
            namespace: None,
            requeue: Duration::from_secs(60),
            unstable_requeue: Duration::from_secs(10),
        }
    }

    #[test]
    fn test_assess_stable_grid() {
        let assessment = assess(&stable(3), 3);
        assert!(assessment.formed);
        assert_eq!(assessment.upgrade, UpgradeState::NoUpgrade);
        assert_eq!(assessment.requeue_after(&config()), Duration::from_secs(60));
    }

    #[test]
    fn test_assess_missing_members() {
        let assessment = assess(&stable(3), 2);
        assert!(!assessment.formed);
        assert_eq!(assessment.requeue_after(&config()), Duration::from_secs(10));
    }

    #[test]
    fn test_assess_without_status() {
        let assessment = assess(&grid(1), 1);
        assert!(!assessment.formed);
        assert_eq!(assessment.upgrade, UpgradeState::NoUpgrade);
    }

    #[test]
    fn test_assess_upgrade_ready() {
        let mut g = stable(3);
        g.conditions_mut()
            .set(CONDITION_UPGRADE, ConditionStatus::True, "");
        g.conditions_mut()
            .set(CONDITION_STOPPING, ConditionStatus::False, "");
        g.status.get_or_insert_with(DataGridStatus::default).replicas_wanted_at_restart = 3;

        let assessment = assess(&g, 0);
        assert!(!assessment.formed);
        assert_eq!(assessment.upgrade, UpgradeState::ReadyToContinue);
        assert_eq!(assessment.requeue_after(&config()), Duration::from_secs(10));
    }

    #[test]
    fn test_assess_negative_replicas() {
        let assessment = assess(&stable(-1), 0);
        assert_eq!(assessment.desired, 0);
        assert!(assessment.formed);
    }
}
