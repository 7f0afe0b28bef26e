//! Staff roster model - read-only user records supplied by the host application.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Role;
use crate::services::error::AccessError;

/// Identifier of a staff member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Borrow<str> for UserId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn validate_user_id(id: &UserId) -> Result<(), ValidationError> {
    if id.as_str().trim().is_empty() {
        return Err(ValidationError::new("empty_user_id"));
    }
    Ok(())
}

/// Roster record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    #[validate(custom(function = "validate_user_id"))]
    pub id: UserId,
    #[validate(length(min = 1))]
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub avatar_url: Option<String>,
}

impl StaffMember {
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(id),
            name: name.into(),
            role,
            avatar_url: None,
        }
    }
}

/// Roster indexed by user id. Keeps roster order.
#[derive(Debug, Clone, Default)]
pub struct StaffDirectory {
    members: Vec<StaffMember>,
    index: HashMap<UserId, usize>,
}

impl StaffDirectory {
    pub fn new(members: Vec<StaffMember>) -> Result<Self, AccessError> {
        let mut index = HashMap::with_capacity(members.len());
        for (position, member) in members.iter().enumerate() {
            member.validate()?;
            if index.insert(member.id.clone(), position).is_some() {
                let mut errors = ValidationErrors::new();
                let mut error = ValidationError::new("duplicate_user_id");
                error.add_param("id".into(), &member.id.as_str());
                errors.add("id", error);
                return Err(AccessError::InvalidStaffRecord(errors));
            }
        }

        Ok(Self { members, index })
    }

    pub fn from_json(json: &str) -> Result<Self, AccessError> {
        let members: Vec<StaffMember> = serde_json::from_str(json)?;
        Self::new(members)
    }

    pub fn get(&self, user_id: &str) -> Option<&StaffMember> {
        self.index.get(user_id).map(|&position| &self.members[position])
    }

    pub fn role_of(&self, user_id: &str) -> Option<Role> {
        self.get(user_id).map(|member| member.role)
    }

    /// Members that may be delegated workflow stages.
    pub fn assignable_pool(&self) -> impl Iterator<Item = &StaffMember> {
        self.members.iter().filter(|member| !member.role.is_privileged())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaffMember> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
