//! Permission catalog - functional modules and the actions each exposes.
//!
//! The catalog is configuration data: the settings layer builds it once and
//! every resolver and editor borrows it read-only.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::services::error::{AccessError, CatalogEntry};

/// Key of a functional module, e.g. `sales`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(String);

/// Key of an action inside a module, e.g. `create_sale`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionKey(String);

macro_rules! string_key {
    ($name:ident) => {
        impl $name {
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_string())
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_key!(ModuleKey);
string_key!(ActionKey);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDefinition {
    pub key: ActionKey,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDefinition {
    pub key: ModuleKey,
    pub label: String,
    pub actions: Vec<ActionDefinition>,
}

impl ModuleDefinition {
    pub fn action(&self, action: &str) -> Option<&ActionDefinition> {
        self.actions.iter().find(|a| a.key.as_str() == action)
    }
}

/// Ordered, validated set of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionCatalog {
    modules: Vec<ModuleDefinition>,
}

impl PermissionCatalog {
    /// Build a catalog. Module keys must be unique, every module needs at
    /// least one action and action keys must be unique within a module.
    pub fn new(modules: Vec<ModuleDefinition>) -> Result<Self, AccessError> {
        let mut seen_modules = HashSet::new();
        for module in &modules {
            if !seen_modules.insert(module.key.as_str()) {
                return Err(AccessError::InvalidCatalog(format!(
                    "duplicate module '{}'",
                    module.key
                )));
            }
            if module.actions.is_empty() {
                return Err(AccessError::InvalidCatalog(format!(
                    "module '{}' has no actions",
                    module.key
                )));
            }
            let mut seen_actions = HashSet::new();
            for action in &module.actions {
                if !seen_actions.insert(action.key.as_str()) {
                    return Err(AccessError::InvalidCatalog(format!(
                        "duplicate action '{}' in module '{}'",
                        action.key, module.key
                    )));
                }
            }
        }

        Ok(Self { modules })
    }

    /// Parse a catalog from its JSON description.
    pub fn from_json(json: &str) -> Result<Self, AccessError> {
        let modules: Vec<ModuleDefinition> = serde_json::from_str(json)?;
        Self::new(modules)
    }

    /// Catalog shipped with the retail back office.
    pub fn retail() -> Arc<PermissionCatalog> {
        Arc::clone(&RETAIL_CATALOG)
    }

    pub fn modules(&self) -> &[ModuleDefinition] {
        &self.modules
    }

    pub fn module(&self, module: &str) -> Option<&ModuleDefinition> {
        self.modules.iter().find(|m| m.key.as_str() == module)
    }

    pub fn contains(&self, module: &str, action: &str) -> bool {
        self.module(module)
            .is_some_and(|m| m.action(action).is_some())
    }

    /// Look up a (module, action) pair, returning the catalog's own keys.
    pub fn entry(
        &self,
        module: &str,
        action: &str,
    ) -> Result<(&ModuleKey, &ActionKey), AccessError> {
        let definition = self.module(module).ok_or_else(|| {
            AccessError::UnknownCatalogEntry(CatalogEntry::Module(module.to_string()))
        })?;
        let action_definition = definition.action(action).ok_or_else(|| {
            AccessError::UnknownCatalogEntry(CatalogEntry::Action {
                module: module.to_string(),
                action: action.to_string(),
            })
        })?;
        Ok((&definition.key, &action_definition.key))
    }

    /// Every (module, action) pair in catalog order.
    pub fn pairs(&self) -> impl Iterator<Item = (&ModuleKey, &ActionKey)> {
        self.modules
            .iter()
            .flat_map(|m| m.actions.iter().map(move |a| (&m.key, &a.key)))
    }
}

fn retail_module(key: &str, label: &str, actions: &[(&str, &str)]) -> ModuleDefinition {
    ModuleDefinition {
        key: ModuleKey::from(key),
        label: label.to_string(),
        actions: actions
            .iter()
            .map(|(key, label)| ActionDefinition {
                key: ActionKey::from(*key),
                label: label.to_string(),
            })
            .collect(),
    }
}

static RETAIL_CATALOG: Lazy<Arc<PermissionCatalog>> = Lazy::new(|| {
    Arc::new(PermissionCatalog {
        modules: vec![
            retail_module("dashboard", "Dashboard", &[("view", "View dashboard")]),
            retail_module(
                "sales",
                "Sales",
                &[
                    ("view", "View sales"),
                    ("create_sale", "Create sale"),
                    ("edit_sale", "Edit sale"),
                    ("void_sale", "Void sale"),
                    ("apply_discount", "Apply discount"),
                    ("refund", "Issue refund"),
                ],
            ),
            retail_module(
                "products",
                "Products",
                &[
                    ("view", "View products"),
                    ("create", "Create product"),
                    ("edit", "Edit product"),
                    ("delete", "Delete product"),
                    ("edit_price", "Change price"),
                ],
            ),
            retail_module(
                "inventory",
                "Inventory",
                &[
                    ("view", "View stock"),
                    ("adjust_stock", "Adjust stock"),
                    ("transfer", "Transfer stock"),
                    ("stock_audit", "Run stock audit"),
                ],
            ),
            retail_module(
                "purchases",
                "Purchases",
                &[
                    ("view", "View purchases"),
                    ("create", "Create purchase order"),
                    ("receive_goods", "Receive goods"),
                    ("set_costing", "Set landed cost"),
                ],
            ),
            retail_module(
                "customers",
                "Customers",
                &[
                    ("view", "View customers"),
                    ("create", "Create customer"),
                    ("edit", "Edit customer"),
                    ("delete", "Delete customer"),
                ],
            ),
            retail_module(
                "cash_register",
                "Cash Register",
                &[
                    ("view", "View register"),
                    ("open_close", "Open and close shift"),
                    ("count_cash", "Count cash"),
                    ("bank_deposit", "Record bank deposit"),
                ],
            ),
            retail_module(
                "expenses",
                "Expenses",
                &[
                    ("view", "View expenses"),
                    ("create", "Record expense"),
                    ("delete", "Delete expense"),
                ],
            ),
            retail_module(
                "reports",
                "Reports",
                &[("view", "View reports"), ("export", "Export reports")],
            ),
            retail_module(
                "staff",
                "Staff",
                &[("view", "View staff"), ("manage", "Manage staff")],
            ),
            retail_module(
                "settings",
                "Settings",
                &[("view", "View settings"), ("edit", "Edit settings")],
            ),
        ],
    })
});
