//! Role templates - seed a user's overrides from a role baseline.

use crate::models::{AppPermissions, Role, UserId};

#[derive(Debug, Clone)]
pub struct TemplateApplier;

impl TemplateApplier {
    /// Replace the user's overrides with a snapshot of `role`'s baseline.
    ///
    /// The snapshot is an owned copy: later baseline edits do not reach the
    /// user. A role without a baseline removes the user's overrides entirely,
    /// so future baseline edits resurface through normal role deferral.
    pub fn apply_template(permissions: &mut AppPermissions, user_id: &UserId, role: Role) {
        let snapshot = permissions.role_grants(role).cloned().unwrap_or_default();
        let cells: usize = snapshot.values().map(|actions| actions.len()).sum();

        if snapshot.is_empty() {
            permissions.remove_user(user_id.as_str());
        } else {
            permissions.replace_user_overrides(user_id.clone(), snapshot);
        }

        tracing::info!(
            user_id = %user_id,
            template_role = %role,
            cells,
            "Role template applied"
        );
    }
}
