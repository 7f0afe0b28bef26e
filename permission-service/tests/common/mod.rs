//! Test helpers for permission-service integration tests.
//!
//! Provides a small roster, the retail catalog and document builders.

#![allow(dead_code)]

use permission_service::{
    AppPermissions, AssignmentGlobalPolicy, AssignmentPolicy, PermissionCatalog,
    PermissionResolver, Role, StaffDirectory, StaffMember,
};
use serde_json::json;
use std::sync::Arc;

pub fn init() {
    access_core::observability::init_test_tracing("info,permission_service=debug");
}

pub fn owner() -> StaffMember {
    StaffMember::new("u-owner", "Olivia Owner", Role::Owner)
}

pub fn super_admin() -> StaffMember {
    StaffMember::new("u-root", "Sam Root", Role::SuperAdmin)
}

pub fn cashier() -> StaffMember {
    StaffMember::new("u-cash", "Carl Cashier", Role::Cashier)
}

pub fn manager() -> StaffMember {
    StaffMember::new("u-mgr", "Maya Manager", Role::Manager)
}

pub fn bank_verifier() -> StaffMember {
    StaffMember::new("u-bank", "Bea Bank", Role::BankVerifier)
}

pub fn investor() -> StaffMember {
    StaffMember::new("u-inv", "Ivan Investor", Role::Investor)
}

pub fn directory() -> Arc<StaffDirectory> {
    Arc::new(
        StaffDirectory::new(vec![
            owner(),
            super_admin(),
            cashier(),
            manager(),
            bank_verifier(),
            investor(),
        ])
        .expect("valid roster"),
    )
}

/// Cashier may create sales; Manager may refund and export reports.
pub fn permissions() -> AppPermissions {
    serde_json::from_value(json!({
        "roles": {
            "Cashier": { "sales": { "create_sale": true, "view": true } },
            "Manager": {
                "sales": { "create_sale": true, "view": true, "refund": true },
                "reports": { "view": true, "export": true }
            }
        },
        "users": {}
    }))
    .expect("valid permissions document")
}

pub fn resolver(permissions: AppPermissions) -> PermissionResolver {
    PermissionResolver::new(PermissionCatalog::retail(), directory(), permissions)
}

pub fn assignment_policy(allow_multiple: bool, enforce_unique: bool) -> AssignmentPolicy {
    AssignmentPolicy::new(
        AssignmentGlobalPolicy {
            allow_multiple_assignees_per_role: allow_multiple,
            enforce_unique_signers: enforce_unique,
        },
        directory(),
    )
}
