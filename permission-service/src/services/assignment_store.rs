//! Workflow assignment store - delegations per stage key.

use serde::Serialize;

use crate::models::{
    AssignmentTarget, UserId, WorkflowAssignments, WorkflowRoleAssignment, WorkflowRoleKey,
};

/// What an assign call did to the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum AssignmentResult {
    /// The user was added to the stage.
    Assigned,
    /// Single-assignee mode: the stage now holds only the new assignment.
    Replaced { previous: Vec<UserId> },
    /// Multi-assignee mode: the user already held the stage.
    AlreadyAssigned,
    /// The unassign-all sentinel cleared the stage.
    Cleared { removed: usize },
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowAssignmentStore {
    assignments: WorkflowAssignments,
}

impl WorkflowAssignmentStore {
    pub fn new(assignments: WorkflowAssignments) -> Self {
        Self { assignments }
    }

    pub fn document(&self) -> &WorkflowAssignments {
        &self.assignments
    }

    pub fn into_document(self) -> WorkflowAssignments {
        self.assignments
    }

    pub(crate) fn replace_document(&mut self, assignments: WorkflowAssignments) {
        self.assignments = assignments;
    }

    /// Apply an assign action. Cross-stage rules are the caller's concern;
    /// see `AssignmentPolicy::assign`.
    pub fn assign(
        &mut self,
        key: WorkflowRoleKey,
        target: &AssignmentTarget,
        actor_name: &str,
        allow_multiple: bool,
    ) -> AssignmentResult {
        let user_id = match target {
            AssignmentTarget::UnassignAll => {
                let removed = self.assignments.clear(key).len();
                tracing::info!(role_key = key.as_str(), removed, "Workflow role cleared");
                return AssignmentResult::Cleared { removed };
            }
            AssignmentTarget::User(user_id) => user_id,
        };

        let assignment = WorkflowRoleAssignment::new(user_id.clone(), actor_name);
        if !allow_multiple {
            let previous: Vec<UserId> = self
                .assignments
                .replace(key, assignment)
                .into_iter()
                .map(|assignment| assignment.user_id().clone())
                .collect();
            tracing::info!(
                role_key = key.as_str(),
                user_id = %user_id,
                assigned_by = actor_name,
                replaced = previous.len(),
                "Workflow role assigned"
            );
            return if previous.is_empty() {
                AssignmentResult::Assigned
            } else {
                AssignmentResult::Replaced { previous }
            };
        }

        if self.assignments.holds(key, user_id.as_str()) {
            tracing::debug!(
                role_key = key.as_str(),
                user_id = %user_id,
                "Workflow role already held"
            );
            return AssignmentResult::AlreadyAssigned;
        }

        self.assignments.push(key, assignment);
        tracing::info!(
            role_key = key.as_str(),
            user_id = %user_id,
            assigned_by = actor_name,
            "Workflow role assigned"
        );
        AssignmentResult::Assigned
    }

    /// Remove the user's assignment. Absent users are ignored.
    pub fn unassign(&mut self, key: WorkflowRoleKey, user_id: &str) -> bool {
        let removed = self.assignments.remove_user(key, user_id) > 0;
        if removed {
            tracing::info!(role_key = key.as_str(), user_id, "Workflow role unassigned");
        }
        removed
    }

    pub fn assignments_for(&self, key: WorkflowRoleKey) -> &[WorkflowRoleAssignment] {
        self.assignments.get(key)
    }

    pub fn is_assigned(&self, key: WorkflowRoleKey, user_id: &str) -> bool {
        self.assignments.holds(key, user_id)
    }

    /// Every stage the user currently holds, in key order.
    pub fn roles_held_by(&self, user_id: &str) -> Vec<WorkflowRoleKey> {
        self.assignments
            .iter()
            .filter(|(_, assignments)| {
                assignments
                    .iter()
                    .any(|assignment| assignment.user_id().as_str() == user_id)
            })
            .map(|(key, _)| key)
            .collect()
    }
}
