//! Role model - the closed set of back-office staff roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff role. Serialized with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Owner,
    #[serde(rename = "Super Admin")]
    SuperAdmin,
    Manager,
    Cashier,
    SellerAgent,
    BankVerifier,
    Investor,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Owner,
        Role::SuperAdmin,
        Role::Manager,
        Role::Cashier,
        Role::SellerAgent,
        Role::BankVerifier,
        Role::Investor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "Owner",
            Role::SuperAdmin => "Super Admin",
            Role::Manager => "Manager",
            Role::Cashier => "Cashier",
            Role::SellerAgent => "SellerAgent",
            Role::BankVerifier => "BankVerifier",
            Role::Investor => "Investor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.as_str() == s)
    }

    /// Owner and Super Admin are implicitly all-allowed and never edited.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Owner | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
