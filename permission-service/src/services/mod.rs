//! Services layer for permission-service.
//!
//! Resolution and editing of permissions, role templates, and workflow
//! stage delegation under the assignment policy.

pub mod assignment_policy;
pub mod assignment_store;
pub mod error;
pub mod resolver;
pub mod session;
pub mod template;

pub use assignment_policy::{AssignmentPolicy, SignerConflict};
pub use assignment_store::{AssignmentResult, WorkflowAssignmentStore};
pub use error::{AccessError, CatalogEntry};
pub use resolver::{EffectiveGrant, PermissionResolver, Resolution};
pub use session::{EditSession, SavedDocuments};
pub use template::TemplateApplier;
