//! Integration tests for role templates.

mod common;

use permission_service::{AccessError, Role, UserId};

#[test]
fn template_is_a_snapshot_not_a_live_link() {
    common::init();
    let mut resolver = common::resolver(common::permissions());
    let cashier = common::cashier();

    resolver.apply_template(&cashier.id, Role::Manager).unwrap();
    let snapshot = resolver
        .permissions()
        .user_overrides(cashier.id.as_str())
        .cloned()
        .unwrap();

    resolver
        .set_role_permission(Role::Manager, "sales", "refund", false)
        .unwrap();
    resolver
        .set_role_permission(Role::Manager, "settings", "edit", true)
        .unwrap();

    assert_eq!(
        resolver.permissions().user_overrides(cashier.id.as_str()),
        Some(&snapshot)
    );
    let refund = resolver.resolve(&cashier, "sales", "refund").unwrap();
    let settings = resolver.resolve(&cashier, "settings", "edit").unwrap();
    assert!(refund.granted);
    assert!(!settings.granted);
}

#[test]
fn template_grants_show_as_overrides_against_own_role() {
    common::init();
    let mut resolver = common::resolver(common::permissions());
    let cashier = common::cashier();

    resolver.apply_template(&cashier.id, Role::Manager).unwrap();

    let refund = resolver.resolve(&cashier, "sales", "refund").unwrap();
    assert!(refund.granted);
    assert!(refund.is_override);

    let create = resolver.resolve(&cashier, "sales", "create_sale").unwrap();
    assert!(create.granted);
    assert!(!create.is_override);
}

#[test]
fn template_from_role_without_baseline_defers_to_role() {
    common::init();
    let mut resolver = common::resolver(common::permissions());
    let cashier = common::cashier();

    resolver
        .set_user_override(&cashier.id, "sales", "create_sale", false)
        .unwrap();
    resolver.apply_template(&cashier.id, Role::Investor).unwrap();

    assert!(resolver
        .permissions()
        .user_overrides(cashier.id.as_str())
        .is_none());

    // Deferral, not an explicit deny: later baseline edits come through.
    resolver
        .set_role_permission(Role::Cashier, "inventory", "view", true)
        .unwrap();
    let resolution = resolver.resolve(&cashier, "inventory", "view").unwrap();
    assert!(resolution.granted);
    assert!(!resolution.is_override);
}

#[test]
fn template_cannot_target_privileged_users() {
    common::init();
    let mut resolver = common::resolver(common::permissions());
    let err = resolver
        .apply_template(&common::super_admin().id, Role::Cashier)
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::PrivilegedRoleImmutable(Role::SuperAdmin)
    ));
    assert!(resolver.permissions().users.is_empty());
}

#[test]
fn template_for_unlisted_user_is_allowed() {
    common::init();
    let mut resolver = common::resolver(common::permissions());
    let new_hire = UserId::from("u-new-hire");
    resolver.apply_template(&new_hire, Role::Cashier).unwrap();
    assert_eq!(
        resolver
            .permissions()
            .user_override("u-new-hire", "sales", "create_sale"),
        Some(true)
    );
}
