//! Staff permission resolution and workflow stage delegation.
//!
//! - [`services::PermissionResolver`] answers "may this user do this action in
//!   this module" from a role baseline and sparse per-user overrides.
//! - [`services::AssignmentPolicy`] delegates workflow stages (cash counting,
//!   verification, approval, ...) to staff while keeping signers unique
//!   across the stages of a chain.
//! - [`services::EditSession`] wraps both documents for one load → edit → save
//!   cycle.

pub mod config;
pub mod models;
pub mod services;

pub use models::{
    AppPermissions, AssignmentGlobalPolicy, AssignmentTarget, PermissionCatalog, Role,
    StaffDirectory, StaffMember, UserId, WorkflowAssignments, WorkflowChain, WorkflowRoleKey,
};
pub use services::{
    AccessError, AssignmentPolicy, AssignmentResult, EditSession, PermissionResolver, Resolution,
    TemplateApplier, WorkflowAssignmentStore,
};
