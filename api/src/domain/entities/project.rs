//! Project domain entity
//!
//! A project belongs to one account and collects sprints and participants.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::account::AccountId;
use super::user::UserId;

/// Minimum length of a project name
pub const MIN_PROJECT_NAME_LEN: usize = 5;

/// Unique identifier for a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProjectId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A project under an account
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: String,
    pub account_id: AccountId,
    pub owner: Option<UserId>,
    pub participants: BTreeSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Check whether the given user owns this project
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner.as_ref() == Some(user)
    }

    /// Participants other than the owner
    pub fn non_owner_participants(&self) -> impl Iterator<Item = &UserId> {
        self.participants
            .iter()
            .filter(move |p| self.owner.as_ref() != Some(*p))
    }
}

/// Data needed to create a new project
///
/// `participants` always contains `owner` when one is set.
#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub account_id: AccountId,
    pub owner: Option<UserId>,
    pub participants: BTreeSet<UserId>,
}

/// Partial update of a project. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<AccountId>,
    pub owner: Option<UserId>,
    pub participants: Option<BTreeSet<UserId>>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.account_id.is_none()
            && self.owner.is_none()
            && self.participants.is_none()
    }
}

/// Check a project name against the naming rules
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() < MIN_PROJECT_NAME_LEN {
        return Err(format!(
            "Project name must be at least {} characters long",
            MIN_PROJECT_NAME_LEN
        ));
    }
    Ok(())
}
