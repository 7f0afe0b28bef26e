//! Edit session - the load → edit → save unit for permission and assignment documents.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use super::assignment_policy::AssignmentPolicy;
use super::assignment_store::{AssignmentResult, WorkflowAssignmentStore};
use super::error::AccessError;
use super::resolver::PermissionResolver;
use crate::models::{
    AppPermissions, AssignmentGlobalPolicy, AssignmentTarget, PermissionCatalog, PermissionChange,
    StaffDirectory, StaffMember, WorkflowAssignments, WorkflowRoleKey,
};

/// Documents handed back to the host for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedDocuments {
    pub permissions: AppPermissions,
    pub assignments: WorkflowAssignments,
    #[serde(skip)]
    pub changes: Vec<PermissionChange>,
}

pub struct EditSession {
    id: Uuid,
    resolver: PermissionResolver,
    store: WorkflowAssignmentStore,
    policy: AssignmentPolicy,
    saved_permissions: AppPermissions,
    saved_assignments: WorkflowAssignments,
}

impl EditSession {
    pub fn open(
        catalog: Arc<PermissionCatalog>,
        directory: Arc<StaffDirectory>,
        permissions: AppPermissions,
        assignments: WorkflowAssignments,
        settings: AssignmentGlobalPolicy,
    ) -> Self {
        let id = Uuid::new_v4();
        tracing::info!(session_id = %id, "Edit session opened");

        Self {
            id,
            saved_permissions: permissions.clone(),
            saved_assignments: assignments.clone(),
            resolver: PermissionResolver::new(catalog, Arc::clone(&directory), permissions),
            store: WorkflowAssignmentStore::new(assignments),
            policy: AssignmentPolicy::new(settings, directory),
        }
    }

    /// Open from the persisted JSON documents.
    pub fn from_json(
        catalog: Arc<PermissionCatalog>,
        directory: Arc<StaffDirectory>,
        permissions_json: &str,
        assignments_json: &str,
        settings: AssignmentGlobalPolicy,
    ) -> Result<Self, AccessError> {
        let permissions: AppPermissions = serde_json::from_str(permissions_json)?;
        let assignments: WorkflowAssignments = serde_json::from_str(assignments_json)?;
        let session = Self::open(catalog, directory, permissions, assignments, settings);
        Ok(session)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn permissions(&self) -> &PermissionResolver {
        &self.resolver
    }

    pub fn permissions_mut(&mut self) -> &mut PermissionResolver {
        &mut self.resolver
    }

    pub fn assignments(&self) -> &WorkflowAssignmentStore {
        &self.store
    }

    pub fn policy(&self) -> &AssignmentPolicy {
        &self.policy
    }

    pub fn update_policy(&mut self, settings: AssignmentGlobalPolicy) {
        self.policy.update_settings(settings);
    }

    pub fn assign(
        &mut self,
        key: WorkflowRoleKey,
        target: &AssignmentTarget,
        actor: &StaffMember,
    ) -> Result<AssignmentResult, AccessError> {
        let span = tracing::info_span!("edit_session", session_id = %self.id);
        let _guard = span.enter();
        self.policy.assign(&mut self.store, key, target, actor)
    }

    pub fn unassign(&mut self, key: WorkflowRoleKey, user_id: &str) -> bool {
        let span = tracing::info_span!("edit_session", session_id = %self.id);
        let _guard = span.enter();
        self.store.unassign(key, user_id)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.resolver.permissions() != &self.saved_permissions
            || self.store.document() != &self.saved_assignments
    }

    /// Documents to persist. The committed state becomes the new baseline.
    pub fn commit(&mut self) -> SavedDocuments {
        let changes = self
            .resolver
            .permissions()
            .changes_since(&self.saved_permissions);
        for change in &changes {
            tracing::info!(
                session_id = %self.id,
                subject = ?change.subject,
                module = %change.module,
                action = %change.action,
                before = ?change.before,
                after = ?change.after,
                "Permission change committed"
            );
        }

        self.saved_permissions = self.resolver.permissions().clone();
        self.saved_assignments = self.store.document().clone();
        tracing::info!(session_id = %self.id, changes = changes.len(), "Edit session committed");

        SavedDocuments {
            permissions: self.saved_permissions.clone(),
            assignments: self.saved_assignments.clone(),
            changes,
        }
    }

    /// Throw away edits since the last load or commit.
    pub fn discard(&mut self) {
        self.resolver
            .replace_permissions(self.saved_permissions.clone());
        self.store.replace_document(self.saved_assignments.clone());
        tracing::info!(session_id = %self.id, "Edit session discarded");
    }
}
