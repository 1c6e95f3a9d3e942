//! Repository port traits
//!
//! These traits define the interface for data persistence.
//! Implementations are provided by adapters (e.g., PostgreSQL).
//!
//! Every `create`/`update` reports a storage-level unique constraint
//! violation as `DomainError::AlreadyExists`, and every `delete` removes
//! the entity's children in the same transaction.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::domain::entities::{
    Account, AccountId, NewAccount, NewProject, NewSprint, NewTask, Project, ProjectId, Sprint,
    SprintId, Task, TaskId, UserId,
};
use crate::error::DomainError;

/// Repository for Account entities
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find an account by ID
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError>;

    /// Find an account by its (globally unique) name
    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, DomainError>;

    /// Find accounts owned by a user
    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, DomainError>;

    /// Create a new account
    async fn create(&self, account: &NewAccount) -> Result<Account, DomainError>;

    /// Delete an account with its projects, sprints and tasks
    async fn delete(&self, id: &AccountId) -> Result<(), DomainError>;
}

/// Repository for Project entities
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Find a project by ID, participants included
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Find a project by name within an account
    async fn find_by_account_and_name(
        &self,
        account_id: &AccountId,
        name: &str,
    ) -> Result<Option<Project>, DomainError>;

    /// Find projects of an account
    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<Project>, DomainError>;

    /// Create a new project together with its participant set
    async fn create(&self, project: &NewProject) -> Result<Project, DomainError>;

    /// Persist all fields of an existing project, replacing its participant set
    async fn update(&self, project: &Project) -> Result<Project, DomainError>;

    /// Delete a project with its sprints and tasks
    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError>;
}

/// Repository for Sprint entities
#[async_trait]
pub trait SprintRepository: Send + Sync {
    /// Find a sprint by ID
    async fn find_by_id(&self, id: &SprintId) -> Result<Option<Sprint>, DomainError>;

    /// Check whether a sprint with this name exists in the project
    async fn exists_by_name(&self, project_id: &ProjectId, name: &str)
        -> Result<bool, DomainError>;

    /// Find sprints of a project
    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<Sprint>, DomainError>;

    /// Create a new sprint
    async fn create(&self, sprint: &NewSprint) -> Result<Sprint, DomainError>;

    /// Create a sprint and one bare task per title atomically.
    ///
    /// Nothing is persisted if any insert fails.
    async fn create_with_tasks(
        &self,
        sprint: &NewSprint,
        task_titles: &[String],
    ) -> Result<(Sprint, Vec<Task>), DomainError>;

    /// Delete a sprint with its tasks
    async fn delete(&self, id: &SprintId) -> Result<(), DomainError>;
}

/// Repository for Task entities
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Find a task by ID, assignees included
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, DomainError>;

    /// Find a task by title within a sprint
    async fn find_by_sprint_and_title(
        &self,
        sprint_id: &SprintId,
        title: &str,
    ) -> Result<Option<Task>, DomainError>;

    /// Find tasks of a sprint
    async fn find_by_sprint(&self, sprint_id: &SprintId) -> Result<Vec<Task>, DomainError>;

    /// Create a new task together with its assignees
    async fn create(&self, task: &NewTask) -> Result<Task, DomainError>;

    /// Persist all fields of an existing task, replacing its assignees
    async fn update(&self, task: &Task) -> Result<Task, DomainError>;

    /// Replace the assignee set of a task
    async fn set_assignees(
        &self,
        id: &TaskId,
        assignees: &BTreeSet<UserId>,
    ) -> Result<Task, DomainError>;

    /// Delete a task
    async fn delete(&self, id: &TaskId) -> Result<(), DomainError>;
}
