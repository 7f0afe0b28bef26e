//! Workflow assignment document - who is delegated to each stage, and by whom.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use super::{UserId, WorkflowRoleKey};

/// Value the settings layer sends to clear a stage.
pub const UNASSIGN_ALL_SENTINEL: &str = "unassigned";

/// One delegation. Never edited after creation; removal deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowRoleAssignment {
    user_id: UserId,
    assigned_by: String,
    assigned_at: DateTime<Utc>,
}

impl WorkflowRoleAssignment {
    pub(crate) fn new(user_id: UserId, assigned_by: impl Into<String>) -> Self {
        Self {
            user_id,
            assigned_by: assigned_by.into(),
            assigned_at: Utc::now(),
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Display name of the staff member who made the delegation.
    pub fn assigned_by(&self) -> &str {
        &self.assigned_by
    }

    pub fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }
}

type AssignmentMap = BTreeMap<WorkflowRoleKey, Vec<WorkflowRoleAssignment>>;

/// Stage key → assignments in grant order. Empty stages are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AssignmentMap", into = "AssignmentMap")]
pub struct WorkflowAssignments {
    stages: AssignmentMap,
}

impl From<AssignmentMap> for WorkflowAssignments {
    /// Drops empty stages and repeated users within a stage, keeping each
    /// user's earliest grant.
    fn from(mut stages: AssignmentMap) -> Self {
        for assignments in stages.values_mut() {
            let mut seen = HashSet::new();
            assignments.retain(|assignment| seen.insert(assignment.user_id.clone()));
        }
        stages.retain(|_, assignments| !assignments.is_empty());
        Self { stages }
    }
}

impl From<WorkflowAssignments> for AssignmentMap {
    fn from(assignments: WorkflowAssignments) -> Self {
        assignments.stages
    }
}

impl WorkflowAssignments {
    pub fn get(&self, key: WorkflowRoleKey) -> &[WorkflowRoleAssignment] {
        self.stages.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn holds(&self, key: WorkflowRoleKey, user_id: &str) -> bool {
        self.get(key)
            .iter()
            .any(|assignment| assignment.user_id.as_str() == user_id)
    }

    /// Stages that currently have at least one assignee, in key order.
    pub fn iter(&self) -> impl Iterator<Item = (WorkflowRoleKey, &[WorkflowRoleAssignment])> {
        self.stages
            .iter()
            .map(|(key, assignments)| (*key, assignments.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub(crate) fn push(&mut self, key: WorkflowRoleKey, assignment: WorkflowRoleAssignment) {
        self.stages.entry(key).or_default().push(assignment);
    }

    pub(crate) fn replace(
        &mut self,
        key: WorkflowRoleKey,
        assignment: WorkflowRoleAssignment,
    ) -> Vec<WorkflowRoleAssignment> {
        self.stages.insert(key, vec![assignment]).unwrap_or_default()
    }

    pub(crate) fn clear(&mut self, key: WorkflowRoleKey) -> Vec<WorkflowRoleAssignment> {
        self.stages.remove(&key).unwrap_or_default()
    }

    /// Remove every assignment of `user_id` on `key`. Returns how many were removed.
    pub(crate) fn remove_user(&mut self, key: WorkflowRoleKey, user_id: &str) -> usize {
        let Some(assignments) = self.stages.get_mut(&key) else {
            return 0;
        };
        let before = assignments.len();
        assignments.retain(|assignment| assignment.user_id.as_str() != user_id);
        let removed = before - assignments.len();
        if assignments.is_empty() {
            self.stages.remove(&key);
        }
        removed
    }
}

/// Target of an assign action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignmentTarget {
    User(UserId),
    UnassignAll,
}

impl AssignmentTarget {
    /// Empty input and the sentinel clear the stage; anything else is a user id.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == UNASSIGN_ALL_SENTINEL {
            AssignmentTarget::UnassignAll
        } else {
            AssignmentTarget::User(UserId::new(value))
        }
    }
}

impl From<UserId> for AssignmentTarget {
    fn from(user_id: UserId) -> Self {
        AssignmentTarget::User(user_id)
    }
}
