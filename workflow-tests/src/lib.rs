//! Settings-session workflow tests library.
//!
//! Provides a fixture shop holding its documents the way the host application
//! persists them (whole JSON documents), so tests can run complete
//! load → edit → save cycles against the access crates.
//!
//! ## Usage
//!
//! ```bash
//! cargo test -p workflow-tests
//! ```

use anyhow::{anyhow, Result};
use permission_service::models::AssignmentGlobalPolicy;
use permission_service::services::SavedDocuments;
use permission_service::{EditSession, PermissionCatalog, StaffDirectory, StaffMember};
use serde_json::json;
use std::sync::Arc;

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    access_core::observability::init_test_tracing(
        "info,workflow_tests=debug,permission_service=debug",
    );
}

/// A shop with a roster and its persisted settings documents.
#[derive(Debug, Clone)]
pub struct ShopFixture {
    pub catalog: Arc<PermissionCatalog>,
    pub directory: Arc<StaffDirectory>,
    pub permissions_json: String,
    pub assignments_json: String,
    pub settings_json: String,
    pub saves: usize,
}

impl ShopFixture {
    /// Small retail shop: one owner, a manager, two cashiers, a bank verifier and an investor.
    pub fn corner_mart() -> Result<Self> {
        let roster = json!([
            { "id": "u-owner", "name": "Olivia Owner", "role": "Owner" },
            { "id": "u-root", "name": "Sam Root", "role": "Super Admin" },
            { "id": "u-mgr", "name": "Maya Manager", "role": "Manager",
              "avatarUrl": "https://cdn.example.com/avatars/maya.png" },
            { "id": "u-cash-1", "name": "Carl Cashier", "role": "Cashier" },
            { "id": "u-cash-2", "name": "Cleo Cashier", "role": "Cashier" },
            { "id": "u-bank", "name": "Bea Bank", "role": "BankVerifier" },
            { "id": "u-agent", "name": "Sid Seller", "role": "SellerAgent" },
            { "id": "u-inv", "name": "Ivan Investor", "role": "Investor" }
        ]);

        let permissions = json!({
            "roles": {
                "Manager": {
                    "sales": {
                        "view": true,
                        "create_sale": true,
                        "void_sale": true,
                        "refund": true
                    },
                    "inventory": { "view": true, "adjust_stock": true },
                    "reports": { "view": true, "export": true }
                },
                "Cashier": {
                    "sales": { "view": true, "create_sale": true },
                    "cash_register": { "view": true, "open_close": true, "count_cash": true }
                },
                "BankVerifier": {
                    "cash_register": { "view": true, "bank_deposit": true }
                }
            },
            "users": {
                "u-cash-2": { "sales": { "refund": true } }
            }
        });

        let settings = json!({
            "businessName": "Corner Mart",
            "currency": "USD",
            "receiptFooter": "Thanks for shopping local",
            "allowMultipleAssigneesPerRole": false,
            "enforceUniqueSigners": true
        });

        Ok(Self {
            catalog: PermissionCatalog::retail(),
            directory: Arc::new(StaffDirectory::from_json(&roster.to_string())?),
            permissions_json: permissions.to_string(),
            assignments_json: "{}".to_string(),
            settings_json: settings.to_string(),
            saves: 0,
        })
    }

    pub fn policy(&self) -> Result<AssignmentGlobalPolicy> {
        let policy = AssignmentGlobalPolicy::from_settings_json(&self.settings_json)?;
        Ok(policy)
    }

    /// Load every document and start an edit session.
    pub fn open_session(&self) -> Result<EditSession> {
        Ok(EditSession::from_json(
            Arc::clone(&self.catalog),
            Arc::clone(&self.directory),
            &self.permissions_json,
            &self.assignments_json,
            self.policy()?,
        )?)
    }

    pub fn member(&self, user_id: &str) -> Result<StaffMember> {
        self.directory
            .get(user_id)
            .cloned()
            .ok_or_else(|| anyhow!("no staff member {}", user_id))
    }

    /// Replace the stored documents wholesale.
    pub fn persist(&mut self, saved: &SavedDocuments) -> Result<()> {
        self.permissions_json = serde_json::to_string(&saved.permissions)?;
        self.assignments_json = serde_json::to_string(&saved.assignments)?;
        self.saves += 1;
        tracing::debug!(saves = self.saves, changes = saved.changes.len(), "Documents persisted");
        Ok(())
    }

    /// Flip the policy flags inside the stored settings document.
    pub fn set_policy_flags(&mut self, allow_multiple: bool, enforce_unique: bool) -> Result<()> {
        let mut settings: serde_json::Value = serde_json::from_str(&self.settings_json)?;
        settings["allowMultipleAssigneesPerRole"] = json!(allow_multiple);
        settings["enforceUniqueSigners"] = json!(enforce_unique);
        self.settings_json = settings.to_string();
        Ok(())
    }
}
