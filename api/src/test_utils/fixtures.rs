//! Test fixtures
//!
//! Factory functions for creating test data with sensible defaults.
//! Each fixture function creates a valid entity that can be customized.

use std::collections::BTreeSet;

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::entities::{
    Account, AccountId, Project, ProjectId, Sprint, SprintId, Task, TaskId, TaskStatus, User,
    UserId,
};

/// Shorthand for a calendar date
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

/// Create a test user whose full name is `full_name`
pub fn test_user(full_name: &str) -> User {
    User {
        id: UserId(Uuid::new_v4()),
        username: full_name.to_lowercase().replace(' ', "."),
        full_name: full_name.to_string(),
    }
}

/// Create a test account with a specific name and owner
pub fn test_account(name: &str, owner: Option<UserId>) -> Account {
    Account {
        id: AccountId(Uuid::new_v4()),
        name: name.to_string(),
        description: format!("{} account", name),
        owner,
        created_at: Utc::now(),
    }
}

/// Create a test project under an account
pub fn test_project(
    account_id: AccountId,
    name: &str,
    owner: Option<UserId>,
    participants: &[UserId],
) -> Project {
    Project {
        id: ProjectId(Uuid::new_v4()),
        name: name.to_string(),
        description: "A test project".to_string(),
        account_id,
        owner,
        participants: participants.iter().copied().collect(),
        created_at: Utc::now(),
    }
}

/// Create a two-week test sprint starting 2024-01-01
pub fn test_sprint(project_id: ProjectId, name: &str) -> Sprint {
    Sprint {
        id: SprintId(Uuid::new_v4()),
        project_id,
        name: name.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 14),
        created_at: Utc::now(),
    }
}

/// Create an unassigned to-do task
pub fn test_task(sprint_id: SprintId, title: &str) -> Task {
    Task {
        id: TaskId(Uuid::new_v4()),
        sprint_id,
        title: title.to_string(),
        description: "A test task".to_string(),
        due_date: Some(date(2024, 1, 10)),
        status: TaskStatus::ToDo,
        assigned_to: BTreeSet::new(),
        comments: String::new(),
        screenshots: None,
        created_at: Utc::now(),
    }
}
