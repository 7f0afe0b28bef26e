//! End-to-end load → edit → save cycles over the persisted documents.

use permission_service::models::PermissionSubject;
use permission_service::{AccessError, Role, UserId};
use serde_json::Value;
use workflow_tests::{init_tracing, ShopFixture};

#[test]
fn test_loaded_documents_resolve_as_stored() -> anyhow::Result<()> {
    init_tracing();
    let shop = ShopFixture::corner_mart()?;
    let session = shop.open_session()?;

    let carl = shop.member("u-cash-1")?;
    let cleo = shop.member("u-cash-2")?;
    let resolver = session.permissions();

    assert!(resolver.resolve(&carl, "sales", "create_sale")?.granted);
    assert!(!resolver.resolve(&carl, "sales", "refund")?.granted);

    let refund = resolver.resolve(&cleo, "sales", "refund")?;
    assert!(refund.granted);
    assert!(refund.is_override);
    assert!(!session.has_unsaved_changes());
    Ok(())
}

#[test]
fn test_privileged_staff_see_everything() -> anyhow::Result<()> {
    init_tracing();
    let shop = ShopFixture::corner_mart()?;
    let session = shop.open_session()?;

    for id in ["u-owner", "u-root"] {
        let member = shop.member(id)?;
        let grants = session.permissions().effective_permissions(&member);
        assert_eq!(grants.len(), shop.catalog.pairs().count());
        for grant in &grants {
            assert!(grant.resolution.granted);
            assert!(!grant.resolution.is_override);
        }
    }
    Ok(())
}

#[test]
fn test_edit_commit_and_reload() -> anyhow::Result<()> {
    init_tracing();
    let mut shop = ShopFixture::corner_mart()?;
    let mut session = shop.open_session()?;
    let carl = UserId::from("u-cash-1");

    session
        .permissions_mut()
        .set_user_override(&carl, "sales", "void_sale", true)?;
    session
        .permissions_mut()
        .set_role_permission(Role::Cashier, "expenses", "create", true)?;
    assert!(session.has_unsaved_changes());

    let saved = session.commit();
    assert_eq!(saved.changes.len(), 2);
    let subject = PermissionSubject::User(carl);
    let edited = saved
        .changes
        .iter()
        .find(|change| change.subject == subject);
    assert!(edited.is_some_and(|change| change.after == Some(true)));
    assert!(!session.has_unsaved_changes());
    shop.persist(&saved)?;

    // Whole-document save: the stored JSON carries both matrices.
    let stored: Value = serde_json::from_str(&shop.permissions_json)?;
    assert_eq!(stored["users"]["u-cash-1"]["sales"]["void_sale"], true);
    assert_eq!(stored["roles"]["Cashier"]["expenses"]["create"], true);

    let reloaded = shop.open_session()?;
    let member = shop.member("u-cash-1")?;
    let resolver = reloaded.permissions();
    assert!(resolver.resolve(&member, "sales", "void_sale")?.granted);
    assert!(resolver.resolve(&member, "expenses", "create")?.granted);
    assert_eq!(resolver.permissions(), &saved.permissions);
    Ok(())
}

#[test]
fn test_discard_drops_unsaved_edits() -> anyhow::Result<()> {
    init_tracing();
    let shop = ShopFixture::corner_mart()?;
    let mut session = shop.open_session()?;
    let cleo = UserId::from("u-cash-2");

    assert!(session.permissions_mut().reset_user(&cleo)?);
    session
        .permissions_mut()
        .set_role_permission(Role::Manager, "settings", "edit", true)?;
    assert!(session.has_unsaved_changes());

    session.discard();
    assert!(!session.has_unsaved_changes());

    let member = shop.member("u-cash-2")?;
    let refund = session.permissions().resolve(&member, "sales", "refund")?;
    assert!(refund.granted);
    Ok(())
}

#[test]
fn test_template_then_tweak_persists_as_overrides() -> anyhow::Result<()> {
    init_tracing();
    let mut shop = ShopFixture::corner_mart()?;
    let mut session = shop.open_session()?;
    let sid = UserId::from("u-agent");

    session.permissions_mut().apply_template(&sid, Role::Manager)?;
    session
        .permissions_mut()
        .set_user_override(&sid, "reports", "export", false)?;

    // Later baseline edits do not flow into the copied template.
    session
        .permissions_mut()
        .set_role_permission(Role::Manager, "purchases", "view", true)?;

    let saved = session.commit();
    shop.persist(&saved)?;

    let reloaded = shop.open_session()?;
    let member = shop.member("u-agent")?;
    let resolver = reloaded.permissions();
    assert!(resolver.resolve(&member, "sales", "void_sale")?.granted);
    assert!(resolver.resolve(&member, "reports", "view")?.granted);
    assert!(!resolver.resolve(&member, "reports", "export")?.granted);
    assert!(!resolver.resolve(&member, "purchases", "view")?.granted);
    Ok(())
}

#[test]
fn test_rejected_edits_leave_session_clean() -> anyhow::Result<()> {
    init_tracing();
    let shop = ShopFixture::corner_mart()?;
    let mut session = shop.open_session()?;
    let carl = UserId::from("u-cash-1");

    let err = session
        .permissions_mut()
        .set_role_permission(Role::Owner, "sales", "refund", false)
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::PrivilegedRoleImmutable(Role::Owner)
    ));

    let err = session
        .permissions_mut()
        .set_user_override(&carl, "sales", "teleport", true)
        .unwrap_err();
    assert!(matches!(err, AccessError::UnknownCatalogEntry(_)));

    let err = session
        .permissions_mut()
        .apply_template(&UserId::from("u-owner"), Role::Cashier)
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::PrivilegedRoleImmutable(Role::Owner)
    ));

    assert!(!session.has_unsaved_changes());
    Ok(())
}
