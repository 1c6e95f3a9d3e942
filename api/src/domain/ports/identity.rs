//! Identity store port
//!
//! Users are owned by an external identity collaborator. The tracker only
//! looks them up; it never creates or deletes them.

use async_trait::async_trait;

use crate::domain::entities::{User, UserId};
use crate::error::DomainError;

/// Maximum number of users returned by a name search
pub const USER_SEARCH_LIMIT: u64 = 20;

/// Read-only access to the identity store
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find a user by ID
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Find every user whose ID is in `ids`. Unknown IDs are skipped.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError>;

    /// Case-insensitive substring search on full name.
    ///
    /// An empty query returns no users.
    async fn search_by_name(&self, query: &str) -> Result<Vec<User>, DomainError>;
}
