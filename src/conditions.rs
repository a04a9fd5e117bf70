//! Status condition store for DataGrid resources
//!
//! Conditions are identified by their type, compared case-insensitively.
//! A condition that is not present reads as `False`: the stability and
//! upgrade checks are written against that convention, so there is no
//! `Unknown` default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// DataGrid condition types
pub const CONDITION_GRACEFUL_SHUTDOWN: &str = "GracefulShutdown";
pub const CONDITION_PRELIM_CHECKS_PASSED: &str = "PrelimChecksPassed";
pub const CONDITION_UPGRADE: &str = "Upgrade";
pub const CONDITION_STOPPING: &str = "Stopping";
pub const CONDITION_WELL_FORMED: &str = "WellFormed";

/// Status of a condition
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

impl ConditionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionStatus::True => "True",
            ConditionStatus::False => "False",
            ConditionStatus::Unknown => "Unknown",
        }
    }
}

impl From<bool> for ConditionStatus {
    fn from(value: bool) -> Self {
        if value {
            ConditionStatus::True
        } else {
            ConditionStatus::False
        }
    }
}

impl fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition of a DataGrid
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataGridCondition {
    /// Type of condition
    pub r#type: String,
    /// Status of the condition (True, False, Unknown)
    pub status: ConditionStatus,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl DataGridCondition {
    pub fn new(condition_type: &str, status: ConditionStatus, message: &str) -> Self {
        Self {
            r#type: condition_type.to_string(),
            status,
            message: message.to_string(),
        }
    }
}

/// Folds each character on its own; `str::to_lowercase` would map a
/// word-final sigma differently from the same letter mid-word.
fn fold(condition_type: &str) -> String {
    condition_type.chars().flat_map(char::to_lowercase).collect()
}

/// Ordered set of conditions, unique by case-folded type.
///
/// Serializes as a plain list so it can sit in the resource status as-is.
/// Lookups go through an index of folded type to position; the index always
/// points at the first entry carrying a given folded type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DataGridCondition>", into = "Vec<DataGridCondition>")]
pub struct ConditionSet {
    conditions: Vec<DataGridCondition>,
    index: HashMap<String, usize>,
}

impl ConditionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the condition of the given type, or a `False` condition with
    /// an empty message when it is absent.
    pub fn get(&self, condition_type: &str) -> DataGridCondition {
        match self.position(condition_type) {
            Some(idx) => self.conditions[idx].clone(),
            None => DataGridCondition::new(condition_type, ConditionStatus::False, ""),
        }
    }

    /// Status of the given condition, `False` when absent.
    pub fn status(&self, condition_type: &str) -> ConditionStatus {
        self.position(condition_type)
            .map(|idx| self.conditions[idx].status)
            .unwrap_or(ConditionStatus::False)
    }

    pub fn is_true(&self, condition_type: &str) -> bool {
        self.status(condition_type) == ConditionStatus::True
    }

    pub fn has(&self, condition_type: &str) -> bool {
        self.position(condition_type).is_some()
    }

    /// Sets a condition, updating it in place when a condition of the same
    /// type already exists. Returns whether anything changed.
    pub fn set(&mut self, condition_type: &str, status: ConditionStatus, message: &str) -> bool {
        if let Some(idx) = self.position(condition_type) {
            let existing = &mut self.conditions[idx];
            let mut changed = false;
            if existing.status != status {
                existing.status = status;
                changed = true;
            }
            if existing.message != message {
                existing.message = message.to_string();
                changed = true;
            }
            return changed;
        }

        self.index
            .insert(fold(condition_type), self.conditions.len());
        self.conditions
            .push(DataGridCondition::new(condition_type, status, message));
        true
    }

    /// Applies every condition in order. Returns true if any of them changed
    /// the set.
    pub fn set_all<'a, I>(&mut self, conditions: I) -> bool
    where
        I: IntoIterator<Item = &'a DataGridCondition>,
    {
        let mut changed = false;
        for c in conditions {
            changed |= self.set(&c.r#type, c.status, &c.message);
        }
        changed
    }

    /// Removes the condition of the given type. Returns whether a condition
    /// was removed.
    pub fn remove(&mut self, condition_type: &str) -> bool {
        match self.position(condition_type) {
            Some(idx) => {
                self.conditions.remove(idx);
                self.reindex();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataGridCondition> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    fn position(&self, condition_type: &str) -> Option<usize> {
        self.index.get(&fold(condition_type)).copied()
    }

    fn reindex(&mut self) {
        self.index.clear();
        for (idx, c) in self.conditions.iter().enumerate() {
            self.index.entry(fold(&c.r#type)).or_insert(idx);
        }
    }
}

impl From<Vec<DataGridCondition>> for ConditionSet {
    fn from(conditions: Vec<DataGridCondition>) -> Self {
        let mut set = Self {
            conditions,
            index: HashMap::new(),
        };
        set.reindex();
        set
    }
}

impl From<ConditionSet> for Vec<DataGridCondition> {
    fn from(set: ConditionSet) -> Self {
        set.conditions
    }
}

impl PartialEq for ConditionSet {
    fn eq(&self, other: &Self) -> bool {
        self.conditions == other.conditions
    }
}

impl Eq for ConditionSet {}

impl<'a> IntoIterator for &'a ConditionSet {
    type Item = &'a DataGridCondition;
    type IntoIter = std::slice::Iter<'a, DataGridCondition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}
