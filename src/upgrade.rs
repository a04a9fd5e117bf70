//! Upgrade readiness
//!
//! Derives, from the conditions and the replica count recorded at shutdown,
//! whether a pending upgrade may continue. Nothing here is stored: the state
//! is recomputed on every reconcile.

use crate::conditions::{ConditionSet, ConditionStatus, CONDITION_STOPPING, CONDITION_UPGRADE};
use std::fmt;
use tracing::{debug, info};

/// Where a cluster stands with respect to an upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpgradeState {
    /// The Upgrade condition is not set
    NoUpgrade,
    /// Graceful shutdown before the upgrade is still running
    AwaitingShutdown,
    /// Shutdown finished but the restart size is not decided yet
    AwaitingReplicaTarget,
    /// The upgrade can continue
    ReadyToContinue,
}

impl UpgradeState {
    pub fn evaluate(conditions: &ConditionSet, replicas_wanted_at_restart: i32) -> Self {
        if !conditions.is_true(CONDITION_UPGRADE) {
            UpgradeState::NoUpgrade
        } else if conditions.status(CONDITION_STOPPING) != ConditionStatus::False {
            UpgradeState::AwaitingShutdown
        } else if replicas_wanted_at_restart <= 0 {
            UpgradeState::AwaitingReplicaTarget
        } else {
            UpgradeState::ReadyToContinue
        }
    }

    pub fn can_continue(&self) -> bool {
        matches!(self, UpgradeState::ReadyToContinue)
    }

    /// Logs why the upgrade is, or is not, continuing.
    pub fn trace(&self, replicas_wanted_at_restart: i32) {
        match self {
            UpgradeState::NoUpgrade => debug!(state = %self, "no upgrade requested"),
            UpgradeState::AwaitingShutdown => info!(
                state = %self,
                "wait for graceful shutdown before update to complete"
            ),
            UpgradeState::AwaitingReplicaTarget => info!(
                state = %self,
                "replicas to restart with not yet set, wait for graceful shutdown to complete"
            ),
            UpgradeState::ReadyToContinue => info!(
                state = %self,
                replicas_wanted_at_restart,
                "graceful shutdown after upgrade completed, continue upgrade process"
            ),
        }
    }
}

impl fmt::Display for UpgradeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UpgradeState::NoUpgrade => "NoUpgrade",
            UpgradeState::AwaitingShutdown => "AwaitingShutdown",
            UpgradeState::AwaitingReplicaTarget => "AwaitingReplicaTarget",
            UpgradeState::ReadyToContinue => "ReadyToContinue",
        };
        f.write_str(s)
    }
}

/// Returns true once graceful shutdown for an upgrade has completed and the
/// restart size is known.
pub fn is_upgrade_needed(conditions: &ConditionSet, replicas_wanted_at_restart: i32) -> bool {
    let state = UpgradeState::evaluate(conditions, replicas_wanted_at_restart);
    state.trace(replicas_wanted_at_restart);
    state.can_continue()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(upgrade: ConditionStatus, stopping: ConditionStatus) -> ConditionSet {
        let mut set = ConditionSet::new();
        set.set(CONDITION_UPGRADE, upgrade, "");
        set.set(CONDITION_STOPPING, stopping, "");
        set
    }

    #[test]
    fn test_no_upgrade_regardless_of_other_fields() {
        for stopping in [ConditionStatus::True, ConditionStatus::False, ConditionStatus::Unknown] {
            for replicas in [-1, 0, 3] {
                let set = conditions(ConditionStatus::False, stopping);
                assert_eq!(UpgradeState::evaluate(&set, replicas), UpgradeState::NoUpgrade);
                assert!(!is_upgrade_needed(&set, replicas));
            }
        }
        assert!(!is_upgrade_needed(&ConditionSet::new(), 3));
    }

    #[test]
    fn test_upgrade_waits_for_shutdown() {
        let set = conditions(ConditionStatus::True, ConditionStatus::True);
        assert_eq!(UpgradeState::evaluate(&set, 3), UpgradeState::AwaitingShutdown);
        assert!(!is_upgrade_needed(&set, 3));

        let unknown = conditions(ConditionStatus::True, ConditionStatus::Unknown);
        assert_eq!(
            UpgradeState::evaluate(&unknown, 3),
            UpgradeState::AwaitingShutdown
        );
    }

    #[test]
    fn test_upgrade_waits_for_replica_target() {
        let set = conditions(ConditionStatus::True, ConditionStatus::False);
        assert_eq!(
            UpgradeState::evaluate(&set, 0),
            UpgradeState::AwaitingReplicaTarget
        );
        assert!(!is_upgrade_needed(&set, 0));
        assert!(!is_upgrade_needed(&set, -2));
    }

    #[test]
    fn test_upgrade_ready_to_continue() {
        let set = conditions(ConditionStatus::True, ConditionStatus::False);
        assert_eq!(UpgradeState::evaluate(&set, 3), UpgradeState::ReadyToContinue);
        assert!(is_upgrade_needed(&set, 3));
    }

    #[test]
    fn test_absent_stopping_reads_as_false() {
        let mut set = ConditionSet::new();
        set.set(CONDITION_UPGRADE, ConditionStatus::True, "");
        assert!(is_upgrade_needed(&set, 1));
    }

    #[test]
    fn test_evaluation_does_not_mutate() {
        let set = conditions(ConditionStatus::True, ConditionStatus::False);
        let before = set.clone();
        let _ = is_upgrade_needed(&set, 3);
        assert_eq!(set, before);
    }
}
