//! Permission documents - role baseline and sparse per-user overrides.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::{ActionKey, ModuleKey, PermissionCatalog, Role, UserId};

/// Action → grant inside one module.
pub type ActionGrants = BTreeMap<ActionKey, bool>;
/// Module → actions.
pub type ModuleGrants = BTreeMap<ModuleKey, ActionGrants>;
/// Role baseline. Unset cells read as denied.
pub type RoleMatrix = BTreeMap<Role, ModuleGrants>;
/// Per-user overrides. Unset cells defer to the role.
pub type UserOverrideMatrix = BTreeMap<UserId, ModuleGrants>;

/// Whole permission document as loaded and saved by the settings layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppPermissions {
    #[serde(default)]
    pub roles: RoleMatrix,
    #[serde(default)]
    pub users: UserOverrideMatrix,
}

/// Whose row a change touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "camelCase")]
pub enum PermissionSubject {
    Role(Role),
    User(UserId),
}

/// One cell that differs between two documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionChange {
    pub subject: PermissionSubject,
    pub module: ModuleKey,
    pub action: ActionKey,
    pub before: Option<bool>,
    pub after: Option<bool>,
}

fn cell(grants: Option<&ModuleGrants>, module: &str, action: &str) -> Option<bool> {
    grants?.get(module)?.get(action).copied()
}

fn set_cell(grants: &mut ModuleGrants, module: &ModuleKey, action: &ActionKey, value: bool) {
    grants
        .entry(module.clone())
        .or_default()
        .insert(action.clone(), value);
}

fn diff_grants(
    subject: &PermissionSubject,
    before: Option<&ModuleGrants>,
    after: Option<&ModuleGrants>,
    out: &mut Vec<PermissionChange>,
) {
    let cells: BTreeSet<(&ModuleKey, &ActionKey)> = before
        .into_iter()
        .chain(after)
        .flat_map(|grants| {
            grants
                .iter()
                .flat_map(|(module, actions)| actions.keys().map(move |action| (module, action)))
        })
        .collect();

    for (module, action) in cells {
        let old = cell(before, module.as_str(), action.as_str());
        let new = cell(after, module.as_str(), action.as_str());
        if old != new {
            out.push(PermissionChange {
                subject: subject.clone(),
                module: module.clone(),
                action: action.clone(),
                before: old,
                after: new,
            });
        }
    }
}

fn prune_grants(grants: &mut ModuleGrants, catalog: &PermissionCatalog) -> usize {
    let mut removed = 0;
    grants.retain(|module, actions| {
        let before = actions.len();
        actions.retain(|action, _| catalog.contains(module.as_str(), action.as_str()));
        removed += before - actions.len();
        !actions.is_empty()
    });
    removed
}

impl AppPermissions {
    pub fn role_grants(&self, role: Role) -> Option<&ModuleGrants> {
        self.roles.get(&role)
    }

    pub fn user_overrides(&self, user_id: &str) -> Option<&ModuleGrants> {
        self.users.get(user_id)
    }

    /// Explicit baseline cell, if set.
    pub fn role_value(&self, role: Role, module: &str, action: &str) -> Option<bool> {
        cell(self.roles.get(&role), module, action)
    }

    /// Baseline grant with deny-by-default applied.
    pub fn baseline(&self, role: Role, module: &str, action: &str) -> bool {
        self.role_value(role, module, action).unwrap_or(false)
    }

    /// Override cell; `None` means the user defers to the role.
    pub fn user_override(&self, user_id: &str, module: &str, action: &str) -> Option<bool> {
        cell(self.users.get(user_id), module, action)
    }

    pub fn set_role_value(
        &mut self,
        role: Role,
        module: &ModuleKey,
        action: &ActionKey,
        value: bool,
    ) {
        set_cell(self.roles.entry(role).or_default(), module, action, value);
    }

    pub fn set_user_override(
        &mut self,
        user_id: &UserId,
        module: &ModuleKey,
        action: &ActionKey,
        value: bool,
    ) {
        let grants = self.users.entry(user_id.clone()).or_default();
        set_cell(grants, module, action, value);
    }

    /// Remove one override cell. Containers left empty are dropped.
    pub fn remove_user_override(
        &mut self,
        user_id: &str,
        module: &str,
        action: &str,
    ) -> Option<bool> {
        let grants = self.users.get_mut(user_id)?;
        let actions = grants.get_mut(module)?;
        let removed = actions.remove(action)?;
        if actions.is_empty() {
            grants.remove(module);
        }
        if grants.is_empty() {
            self.users.remove(user_id);
        }
        Some(removed)
    }

    /// Replace a user's whole override set.
    pub fn replace_user_overrides(&mut self, user_id: UserId, grants: ModuleGrants) {
        self.users.insert(user_id, grants);
    }

    pub fn remove_user(&mut self, user_id: &str) -> Option<ModuleGrants> {
        self.users.remove(user_id)
    }

    /// Cell-level differences from `baseline` to `self`, roles first.
    pub fn changes_since(&self, baseline: &AppPermissions) -> Vec<PermissionChange> {
        let mut changes = Vec::new();

        let roles: BTreeSet<&Role> = baseline.roles.keys().chain(self.roles.keys()).collect();
        for role in roles {
            diff_grants(
                &PermissionSubject::Role(*role),
                baseline.roles.get(role),
                self.roles.get(role),
                &mut changes,
            );
        }

        let users: BTreeSet<&UserId> = baseline.users.keys().chain(self.users.keys()).collect();
        for user_id in users {
            diff_grants(
                &PermissionSubject::User(user_id.clone()),
                baseline.users.get(user_id),
                self.users.get(user_id),
                &mut changes,
            );
        }

        changes
    }

    /// Drop cells naming modules or actions the catalog no longer has.
    /// Returns the number of cells removed.
    pub fn prune_unknown(&mut self, catalog: &PermissionCatalog) -> usize {
        let mut removed = 0;
        for grants in self.roles.values_mut() {
            removed += prune_grants(grants, catalog);
        }
        for grants in self.users.values_mut() {
            removed += prune_grants(grants, catalog);
        }
        self.roles.retain(|_, grants| !grants.is_empty());
        self.users.retain(|_, grants| !grants.is_empty());
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> AppPermissions {
        serde_json::from_value(json!({
            "roles": {
                "Cashier": { "sales": { "create_sale": true, "refund": false } },
                "Manager": { "sales": { "refund": true } }
            },
            "users": {
                "u-1": { "sales": { "refund": true } }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_unset_cells_are_absent_not_false() {
        let permissions = document();
        let cashier = Role::Cashier;
        assert_eq!(
            permissions.role_value(cashier, "sales", "refund"),
            Some(false)
        );
        assert_eq!(permissions.role_value(cashier, "sales", "void_sale"), None);
        assert!(!permissions.baseline(Role::Investor, "sales", "view"));
        assert_eq!(
            permissions.user_override("u-1", "sales", "refund"),
            Some(true)
        );
        assert_eq!(
            permissions.user_override("u-1", "sales", "create_sale"),
            None
        );
        assert_eq!(permissions.user_override("u-2", "sales", "refund"), None);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let permissions: AppPermissions = serde_json::from_str("{}").unwrap();
        assert_eq!(permissions, AppPermissions::default());
    }

    #[test]
    fn test_remove_override_drops_empty_containers() {
        let mut permissions = document();
        assert_eq!(
            permissions.remove_user_override("u-1", "sales", "refund"),
            Some(true)
        );
        assert!(permissions.user_overrides("u-1").is_none());
        assert_eq!(
            permissions.remove_user_override("u-1", "sales", "refund"),
            None
        );
    }

    #[test]
    fn test_changes_since_lists_each_cell() {
        let saved = document();
        let mut edited = saved.clone();
        edited.set_role_value(Role::Cashier, &"sales".into(), &"refund".into(), true);
        edited.set_user_override(&"u-2".into(), &"reports".into(), &"view".into(), false);
        edited.remove_user_override("u-1", "sales", "refund");

        let changes = edited.changes_since(&saved);
        assert_eq!(changes.len(), 3);
        assert_eq!(changes[0].subject, PermissionSubject::Role(Role::Cashier));
        assert_eq!(
            (changes[0].before, changes[0].after),
            (Some(false), Some(true))
        );
        assert_eq!(changes[1].subject, PermissionSubject::User("u-1".into()));
        assert_eq!((changes[1].before, changes[1].after), (Some(true), None));
        assert_eq!(changes[2].subject, PermissionSubject::User("u-2".into()));
        assert_eq!(
            (changes[2].before, changes[2].after),
            (None, Some(false))
        );

        assert!(saved.changes_since(&saved).is_empty());
    }

    #[test]
    fn test_prune_unknown_removes_stale_cells() {
        let mut permissions = document();
        permissions.set_role_value(Role::Manager, &"payroll".into(), &"run".into(), true);
        permissions.set_user_override(&"u-3".into(), &"sales".into(), &"teleport".into(), true);

        let removed = permissions.prune_unknown(&PermissionCatalog::retail());
        assert_eq!(removed, 2);
        let manager = permissions.role_grants(Role::Manager).unwrap();
        assert!(manager.get("payroll").is_none());
        assert!(permissions.user_overrides("u-3").is_none());
        assert!(permissions.baseline(Role::Cashier, "sales", "create_sale"));
    }
}
