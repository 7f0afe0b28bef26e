//! Assignment policy flags carried in the shop settings document.

use serde::{Deserialize, Serialize};

use crate::services::error::AccessError;

/// Process-wide assignment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentGlobalPolicy {
    #[serde(
        default,
        alias = "allow_multiple_assignees_per_role",
        alias = "allowmultipleassigneesperrole"
    )]
    pub allow_multiple_assignees_per_role: bool,
    #[serde(
        default = "default_enforce_unique_signers",
        alias = "enforce_unique_signers",
        alias = "enforceuniquesigners"
    )]
    pub enforce_unique_signers: bool,
}

fn default_enforce_unique_signers() -> bool {
    true
}

impl Default for AssignmentGlobalPolicy {
    fn default() -> Self {
        Self {
            allow_multiple_assignees_per_role: false,
            enforce_unique_signers: default_enforce_unique_signers(),
        }
    }
}

impl AssignmentGlobalPolicy {
    /// Read the flags out of a full settings document; other fields are ignored.
    pub fn from_settings_json(json: &str) -> Result<Self, AccessError> {
        Ok(serde_json::from_str(json)?)
    }
}
