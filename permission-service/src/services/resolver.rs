//! Effective-permission resolution and permission editing.
//!
//! Resolution layers a user's override over the role baseline:
//! `override ?? roles[role][module][action] ?? false`. Owner and Super Admin
//! bypass both layers and are always granted.

use serde::Serialize;
use std::sync::Arc;

use super::error::AccessError;
use super::template::TemplateApplier;
use crate::models::{
    ActionKey, AppPermissions, ModuleKey, PermissionCatalog, Role, StaffDirectory, StaffMember,
    UserId,
};

/// Outcome of a single lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub granted: bool,
    /// An override exists and differs from the current role baseline.
    pub is_override: bool,
}

/// Resolution of one catalog cell for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveGrant {
    pub module: ModuleKey,
    pub action: ActionKey,
    #[serde(flatten)]
    pub resolution: Resolution,
}

/// Owns the permission document for one edit session.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    catalog: Arc<PermissionCatalog>,
    directory: Arc<StaffDirectory>,
    permissions: AppPermissions,
}

impl PermissionResolver {
    pub fn new(
        catalog: Arc<PermissionCatalog>,
        directory: Arc<StaffDirectory>,
        permissions: AppPermissions,
    ) -> Self {
        Self {
            catalog,
            directory,
            permissions,
        }
    }

    pub fn catalog(&self) -> &PermissionCatalog {
        &self.catalog
    }

    pub fn permissions(&self) -> &AppPermissions {
        &self.permissions
    }

    pub fn into_permissions(self) -> AppPermissions {
        self.permissions
    }

    pub(crate) fn replace_permissions(&mut self, permissions: AppPermissions) {
        self.permissions = permissions;
    }

    /// Effective grant for `user` on (`module`, `action`).
    pub fn resolve(
        &self,
        user: &StaffMember,
        module: &str,
        action: &str,
    ) -> Result<Resolution, AccessError> {
        let (module, action) = self.catalog.entry(module, action)?;
        let resolution = self.resolve_cell(user, module.as_str(), action.as_str());

        tracing::trace!(
            user_id = %user.id,
            role = %user.role,
            module = %module,
            action = %action,
            granted = resolution.granted,
            is_override = resolution.is_override,
            "Permission resolved"
        );

        Ok(resolution)
    }

    fn resolve_cell(&self, user: &StaffMember, module: &str, action: &str) -> Resolution {
        if user.role.is_privileged() {
            return Resolution {
                granted: true,
                is_override: false,
            };
        }

        let baseline = self.permissions.baseline(user.role, module, action);
        match self
            .permissions
            .user_override(user.id.as_str(), module, action)
        {
            Some(value) => Resolution {
                granted: value,
                is_override: value != baseline,
            },
            None => Resolution {
                granted: baseline,
                is_override: false,
            },
        }
    }

    /// Resolution of every catalog cell, in catalog order.
    pub fn effective_permissions(&self, user: &StaffMember) -> Vec<EffectiveGrant> {
        self.catalog
            .pairs()
            .map(|(module, action)| EffectiveGrant {
                module: module.clone(),
                action: action.clone(),
                resolution: self.resolve_cell(user, module.as_str(), action.as_str()),
            })
            .collect()
    }

    /// Cells where the user's override currently differs from the role baseline.
    pub fn diverging_overrides(&self, user: &StaffMember) -> Vec<EffectiveGrant> {
        self.effective_permissions(user)
            .into_iter()
            .filter(|grant| grant.resolution.is_override)
            .collect()
    }

    /// Set a role baseline cell. Privileged roles are rejected.
    pub fn set_role_permission(
        &mut self,
        role: Role,
        module: &str,
        action: &str,
        value: bool,
    ) -> Result<(), AccessError> {
        let (module, action) = self.catalog.entry(module, action)?;
        if role.is_privileged() {
            tracing::warn!(
                role = %role,
                module = %module,
                action = %action,
                "Rejected edit of privileged role"
            );
            return Err(AccessError::PrivilegedRoleImmutable(role));
        }

        self.permissions.set_role_value(role, module, action, value);
        tracing::info!(
            role = %role,
            module = %module,
            action = %action,
            value,
            "Role permission updated"
        );
        Ok(())
    }

    /// Set a user override cell.
    pub fn set_user_override(
        &mut self,
        user_id: &UserId,
        module: &str,
        action: &str,
        value: bool,
    ) -> Result<(), AccessError> {
        let (module, action) = self.catalog.entry(module, action)?;
        self.ensure_editable_user(user_id)?;

        self.permissions
            .set_user_override(user_id, module, action, value);
        tracing::info!(
            user_id = %user_id,
            module = %module,
            action = %action,
            value,
            "User override set"
        );
        Ok(())
    }

    /// Remove one override so the user defers to the role again.
    pub fn clear_user_override(
        &mut self,
        user_id: &UserId,
        module: &str,
        action: &str,
    ) -> Result<Option<bool>, AccessError> {
        let (module, action) = self.catalog.entry(module, action)?;
        self.ensure_editable_user(user_id)?;

        let removed = self.permissions.remove_user_override(
            user_id.as_str(),
            module.as_str(),
            action.as_str(),
        );
        if removed.is_some() {
            tracing::info!(
                user_id = %user_id,
                module = %module,
                action = %action,
                "User override cleared"
            );
        }
        Ok(removed)
    }

    /// Drop all of a user's overrides. Returns whether any existed.
    pub fn reset_user(&mut self, user_id: &UserId) -> Result<bool, AccessError> {
        self.ensure_editable_user(user_id)?;

        let existed = self.permissions.remove_user(user_id.as_str()).is_some();
        if existed {
            tracing::info!(user_id = %user_id, "User overrides reset to role");
        }
        Ok(existed)
    }

    /// Copy `role`'s current baseline into the user's overrides.
    pub fn apply_template(&mut self, user_id: &UserId, role: Role) -> Result<(), AccessError> {
        self.ensure_editable_user(user_id)?;
        TemplateApplier::apply_template(&mut self.permissions, user_id, role);
        Ok(())
    }

    fn ensure_editable_user(&self, user_id: &UserId) -> Result<(), AccessError> {
        match self.directory.role_of(user_id.as_str()) {
            Some(role) if role.is_privileged() => {
                tracing::warn!(
                    user_id = %user_id,
                    role = %role,
                    "Rejected edit of privileged user"
                );
                Err(AccessError::PrivilegedRoleImmutable(role))
            }
            Some(_) => Ok(()),
            None => {
                tracing::debug!(user_id = %user_id, "Editing user not present in roster");
                Ok(())
            }
        }
    }
}
