//! HTTP handlers
//!
//! Axum request handlers for the API endpoints.

pub mod accounts;
mod extract;
pub mod projects;
pub mod sprints;
pub mod tasks;
pub mod users;

pub use accounts::{create_account, delete_account, list_account_projects, list_accounts};
pub use projects::{
    create_project, delete_project, get_project, search_participants, update_project,
};
pub use sprints::{create_sprint, delete_sprint, list_sprint_tasks, list_sprints, sprint_exists};
pub use tasks::{create_task, delete_task, get_task, reassign_task, update_task};
pub use users::search_users;

use serde::Serialize;

/// Confirmation returned by mutating endpoints
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: String,
    pub message: String,
}

impl MessageResponse {
    pub fn new(id: impl ToString, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            message: message.into(),
        }
    }
}
