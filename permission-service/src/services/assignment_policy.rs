//! Assignment policy - business rules applied before a delegation is stored.
//!
//! Two rules apply at assignment time only:
//! - single vs multiple assignees per stage (`allow_multiple_assignees_per_role`)
//! - no signer on two stages of one chain (`enforce_unique_signers`)
//!
//! Existing assignments are never re-validated when the flags change.

use serde::Serialize;
use std::sync::Arc;

use super::assignment_store::{AssignmentResult, WorkflowAssignmentStore};
use super::error::AccessError;
use crate::models::{
    AssignmentGlobalPolicy, AssignmentTarget, StaffDirectory, StaffMember, UserId, WorkflowChain,
    WorkflowRoleKey,
};

/// A user holding more than one stage of the same chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerConflict {
    pub user_id: UserId,
    pub chain: WorkflowChain,
    pub stages: Vec<WorkflowRoleKey>,
}

#[derive(Debug, Clone)]
pub struct AssignmentPolicy {
    settings: AssignmentGlobalPolicy,
    directory: Arc<StaffDirectory>,
}

impl AssignmentPolicy {
    pub fn new(settings: AssignmentGlobalPolicy, directory: Arc<StaffDirectory>) -> Self {
        Self {
            settings,
            directory,
        }
    }

    pub fn settings(&self) -> &AssignmentGlobalPolicy {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: AssignmentGlobalPolicy) {
        tracing::info!(
            allow_multiple_assignees_per_role = settings.allow_multiple_assignees_per_role,
            enforce_unique_signers = settings.enforce_unique_signers,
            "Assignment policy updated"
        );
        self.settings = settings;
    }

    /// Validate and apply an assign action. A rejected call leaves the store untouched.
    pub fn assign(
        &self,
        store: &mut WorkflowAssignmentStore,
        key: WorkflowRoleKey,
        target: &AssignmentTarget,
        actor: &StaffMember,
    ) -> Result<AssignmentResult, AccessError> {
        if let AssignmentTarget::User(user_id) = target {
            self.ensure_assignable(user_id)?;
            if self.settings.enforce_unique_signers {
                self.check_unique_signer(store, key, user_id)?;
            }
        }

        Ok(store.assign(
            key,
            target,
            &actor.name,
            self.settings.allow_multiple_assignees_per_role,
        ))
    }

    /// Fails if `user_id` holds another stage of `key`'s chain.
    pub fn check_unique_signer(
        &self,
        store: &WorkflowAssignmentStore,
        key: WorkflowRoleKey,
        user_id: &UserId,
    ) -> Result<(), AccessError> {
        match key
            .chain_peers()
            .find(|peer| store.is_assigned(*peer, user_id.as_str()))
        {
            Some(held_stage) => {
                tracing::warn!(
                    user_id = %user_id,
                    requested = key.as_str(),
                    held_stage = held_stage.as_str(),
                    chain = %key.chain(),
                    "Rejected duplicate signer"
                );
                Err(AccessError::DuplicateSignerConflict {
                    user_id: user_id.clone(),
                    requested: key,
                    held_stage,
                    chain: key.chain(),
                })
            }
            None => Ok(()),
        }
    }

    fn ensure_assignable(&self, user_id: &UserId) -> Result<(), AccessError> {
        match self.directory.role_of(user_id.as_str()) {
            Some(role) if role.is_privileged() => {
                tracing::warn!(
                    user_id = %user_id,
                    role = %role,
                    "Rejected workflow assignment of privileged user"
                );
                Err(AccessError::IneligibleAssignee {
                    user_id: user_id.clone(),
                    role,
                })
            }
            _ => Ok(()),
        }
    }

    /// Users currently holding two or more stages of one chain. Reporting only.
    pub fn signer_conflicts(&self, store: &WorkflowAssignmentStore) -> Vec<SignerConflict> {
        let mut conflicts = Vec::new();
        for chain in WorkflowChain::ALL {
            let mut seen: Vec<(&UserId, Vec<WorkflowRoleKey>)> = Vec::new();
            for stage in chain.stages() {
                for assignment in store.assignments_for(stage) {
                    let holder = assignment.user_id();
                    match seen.iter_mut().find(|(user_id, _)| *user_id == holder) {
                        Some((_, stages)) => stages.push(stage),
                        None => seen.push((assignment.user_id(), vec![stage])),
                    }
                }
            }
            conflicts.extend(
                seen.into_iter()
                    .filter(|(_, stages)| stages.len() > 1)
                    .map(|(user_id, stages)| SignerConflict {
                        user_id: user_id.clone(),
                        chain,
                        stages,
                    }),
            );
        }
        conflicts
    }
}
