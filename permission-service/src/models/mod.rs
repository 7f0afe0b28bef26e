pub mod catalog;
pub mod permission;
pub mod role;
pub mod settings;
pub mod staff;
pub mod workflow_assignment;
pub mod workflow_role;

pub use catalog::{ActionDefinition, ActionKey, ModuleDefinition, ModuleKey, PermissionCatalog};
pub use permission::{
    ActionGrants, AppPermissions, ModuleGrants, PermissionChange, PermissionSubject, RoleMatrix,
    UserOverrideMatrix,
};
pub use role::Role;
pub use settings::AssignmentGlobalPolicy;
pub use staff::{StaffDirectory, StaffMember, UserId};
pub use workflow_assignment::{
    AssignmentTarget, WorkflowAssignments, WorkflowRoleAssignment, UNASSIGN_ALL_SENTINEL,
};
pub use workflow_role::{WorkflowChain, WorkflowRoleKey};
