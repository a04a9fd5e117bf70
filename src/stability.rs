//! Cluster stability checks over a DataGrid's conditions

use crate::conditions::{
    ConditionSet, ConditionStatus, CONDITION_GRACEFUL_SHUTDOWN, CONDITION_PRELIM_CHECKS_PASSED,
    CONDITION_STOPPING, CONDITION_UPGRADE, CONDITION_WELL_FORMED,
};
use crate::error::ConditionMismatch;

/// Conditions that must hold for a cluster to be considered stable.
pub const EXPECTED_STABLE_CONDITIONS: [(&str, ConditionStatus); 5] = [
    (CONDITION_GRACEFUL_SHUTDOWN, ConditionStatus::False),
    (CONDITION_PRELIM_CHECKS_PASSED, ConditionStatus::True),
    (CONDITION_UPGRADE, ConditionStatus::False),
    (CONDITION_STOPPING, ConditionStatus::False),
    (CONDITION_WELL_FORMED, ConditionStatus::True),
];

/// Checks each expected condition status, failing on the first mismatch.
pub fn expect_statuses<I, K>(
    conditions: &ConditionSet,
    expected: I,
) -> std::result::Result<(), ConditionMismatch>
where
    I: IntoIterator<Item = (K, ConditionStatus)>,
    K: AsRef<str>,
{
    for (condition_type, status) in expected {
        let actual = conditions.get(condition_type.as_ref());
        if actual.status != status {
            return Err(ConditionMismatch {
                condition_type: condition_type.as_ref().to_string(),
                actual: actual.status,
                expected: status,
                message: actual.message,
            });
        }
    }
    Ok(())
}

/// Fails with the first condition that keeps the cluster from being stable.
pub fn ensure_cluster_stability(
    conditions: &ConditionSet,
) -> std::result::Result<(), ConditionMismatch> {
    expect_statuses(conditions, EXPECTED_STABLE_CONDITIONS)
}

pub fn is_well_formed(conditions: &ConditionSet) -> bool {
    ensure_cluster_stability(conditions).is_ok()
}

/// True when the cluster is not well formed or runs fewer members than
/// desired.
pub fn not_formed(conditions: &ConditionSet, actual_members: usize, desired_members: usize) -> bool {
    !is_well_formed(conditions) || actual_members < desired_members
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn stable() -> ConditionSet {
        let mut set = ConditionSet::new();
        for (condition_type, status) in EXPECTED_STABLE_CONDITIONS {
            set.set(condition_type, status, "");
        }
        set
    }

    fn flip(status: ConditionStatus) -> ConditionStatus {
        match status {
            ConditionStatus::True => ConditionStatus::False,
            _ => ConditionStatus::True,
        }
    }

    #[test]
    fn test_stable_cluster_is_well_formed() {
        assert!(is_well_formed(&stable()));
        assert!(ensure_cluster_stability(&stable()).is_ok());
    }

    #[test]
    fn test_flipping_any_condition_breaks_stability() {
        for (condition_type, status) in EXPECTED_STABLE_CONDITIONS {
            let mut set = stable();
            set.set(condition_type, flip(status), "");
            assert!(!is_well_formed(&set), "{} flipped", condition_type);

            let err = ensure_cluster_stability(&set).unwrap_err();
            assert_eq!(err.condition_type, condition_type);
            assert_eq!(err.expected, status);
            assert_eq!(err.actual, flip(status));
        }
    }

    #[test]
    fn test_empty_set_is_not_well_formed() {
        // Absent conditions read as False, so the True expectations fail
        let err = ensure_cluster_stability(&ConditionSet::new()).unwrap_err();
        assert_eq!(err.expected, ConditionStatus::True);
        assert_eq!(err.actual, ConditionStatus::False);
    }

    #[test]
    fn test_mismatch_carries_condition_message() {
        let mut set = stable();
        set.set(CONDITION_WELL_FORMED, ConditionStatus::False, "2/3 members joined");

        let err = ensure_cluster_stability(&set).unwrap_err();
        assert_eq!(err.message, "2/3 members joined");
        assert!(err.to_string().ends_with("reason '2/3 members joined'"));
    }

    #[test]
    fn test_expect_statuses_with_map() {
        let mut set = ConditionSet::new();
        set.set("Custom", ConditionStatus::Unknown, "");

        let mut expected = BTreeMap::new();
        expected.insert("custom", ConditionStatus::Unknown);
        assert!(expect_statuses(&set, expected.clone()).is_ok());

        expected.insert("Missing", ConditionStatus::True);
        let err = expect_statuses(&set, expected).unwrap_err();
        assert_eq!(err.condition_type, "Missing");
    }

    #[test]
    fn test_not_formed() {
        let set = stable();
        assert!(!not_formed(&set, 3, 3));
        assert!(!not_formed(&set, 4, 3));
        assert!(not_formed(&set, 2, 3));

        let mut unstable = stable();
        unstable.set(CONDITION_STOPPING, ConditionStatus::True, "");
        assert!(not_formed(&unstable, 3, 3));
    }
}
