//! Application layer
//!
//! Contains use cases and service orchestration.
//! Services validate input, enforce uniqueness rules and call the
//! repository ports. Ownership checks live in the HTTP handlers.

pub mod account_service;
pub mod project_service;
pub mod sprint_service;
pub mod task_service;

pub use account_service::AccountService;
pub use project_service::ProjectService;
pub use sprint_service::SprintService;
pub use task_service::{CreateTaskInput, TaskDetails, TaskService, UpdateTaskInput};

use crate::domain::entities::{User, UserId};
use crate::domain::ports::UserDirectory;
use crate::error::DomainError;

/// Look up every ID, failing on the first one the identity store does not know.
///
/// Duplicate IDs are collapsed; the result follows the order of first appearance.
pub(crate) async fn resolve_users<UD>(
    users: &UD,
    ids: &[UserId],
) -> Result<Vec<User>, DomainError>
where
    UD: UserDirectory + ?Sized,
{
    let mut unique: Vec<UserId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    if unique.is_empty() {
        return Ok(Vec::new());
    }

    let found = users.find_many(&unique).await?;

    unique
        .iter()
        .map(|id| {
            found
                .iter()
                .find(|u| u.id == *id)
                .cloned()
                .ok_or_else(|| DomainError::NotFound(format!("User with ID {} not found", id)))
        })
        .collect()
}
