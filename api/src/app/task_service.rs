//! Task service
//!
//! Creates, updates, deletes and reassigns tasks. Task titles are unique
//! per sprint and every assignee must exist in the identity store.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::{
    NewTask, SprintId, Task, TaskId, TaskStatus, TaskUpdate, User, UserId,
};
use crate::domain::ports::{SprintRepository, TaskRepository, UserDirectory};
use crate::error::DomainError;

use super::resolve_users;

/// Raw input for creating a task, as received from a client
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    pub sprint_id: Option<SprintId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub assigned_to: Vec<UserId>,
    pub comments: Option<String>,
    pub screenshots: Option<String>,
}

/// Raw input for a partial task update
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskInput {
    pub sprint_id: Option<SprintId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub assigned_to: Option<Vec<UserId>>,
    pub comments: Option<String>,
    pub screenshots: Option<String>,
}

/// A task with its assignees resolved to user records
#[derive(Debug, Clone)]
pub struct TaskDetails {
    pub task: Task,
    pub assignees: Vec<User>,
}

/// Service for managing tasks
pub struct TaskService<SR, TR, UD>
where
    SR: SprintRepository,
    TR: TaskRepository,
    UD: UserDirectory,
{
    sprints: Arc<SR>,
    tasks: Arc<TR>,
    users: Arc<UD>,
}

impl<SR, TR, UD> TaskService<SR, TR, UD>
where
    SR: SprintRepository,
    TR: TaskRepository,
    UD: UserDirectory,
{
    pub fn new(sprints: Arc<SR>, tasks: Arc<TR>, users: Arc<UD>) -> Self {
        Self {
            sprints,
            tasks,
            users,
        }
    }

    /// Create a task
    ///
    /// Checks run in order: required fields, sprint, assignees, status,
    /// then the `(sprint, title)` uniqueness pre-check.
    pub async fn create(&self, input: CreateTaskInput) -> Result<TaskDetails, DomainError> {
        let title = input
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        let (sprint_id, title) = match (input.sprint_id, title) {
            (Some(sprint_id), Some(title)) => (sprint_id, title.to_string()),
            _ => {
                return Err(DomainError::Validation(
                    "Sprint ID and title are required".to_string(),
                ))
            }
        };

        self.ensure_sprint(&sprint_id).await?;
        let assignees = resolve_users(self.users.as_ref(), &input.assigned_to).await?;
        let status = parse_status(input.status.as_deref())?.unwrap_or_default();

        if self
            .tasks
            .find_by_sprint_and_title(&sprint_id, &title)
            .await?
            .is_some()
        {
            tracing::warn!(sprint_id = %sprint_id, title = %title, "Rejected duplicate task title");
            return Err(duplicate_task(&title));
        }

        let task = self
            .tasks
            .create(&NewTask {
                sprint_id,
                title: title.clone(),
                description: input.description.unwrap_or_default(),
                due_date: input.due_date,
                status,
                assigned_to: assignees.iter().map(|u| u.id).collect(),
                comments: input.comments.unwrap_or_default(),
                screenshots: input.screenshots,
            })
            .await
            .map_err(|e| normalize_duplicate(e, &title))?;

        tracing::info!(task_id = %task.id, sprint_id = %sprint_id, "Task created");
        Ok(TaskDetails { task, assignees })
    }

    /// Get a task with its assignees
    pub async fn get(&self, id: &TaskId) -> Result<TaskDetails, DomainError> {
        let task = self.find(id).await?;
        self.with_assignees(task).await
    }

    /// Tasks of a sprint
    pub async fn list_for_sprint(&self, sprint_id: &SprintId) -> Result<Vec<Task>, DomainError> {
        self.ensure_sprint(sprint_id).await?;
        self.tasks.find_by_sprint(sprint_id).await
    }

    /// Apply a partial update
    ///
    /// Uniqueness of `(sprint, title)` is re-checked when either changes.
    pub async fn update(
        &self,
        id: &TaskId,
        input: UpdateTaskInput,
    ) -> Result<TaskDetails, DomainError> {
        let mut task = self.find(id).await?;

        let title = match input.title {
            Some(title) => {
                let title = title.trim().to_string();
                if title.is_empty() {
                    return Err(DomainError::Validation(
                        "Task title cannot be empty".to_string(),
                    ));
                }
                Some(title)
            }
            None => None,
        };

        if let Some(sprint_id) = input.sprint_id {
            if sprint_id != task.sprint_id {
                self.ensure_sprint(&sprint_id).await?;
            }
        }

        let assigned_to = match input.assigned_to {
            Some(ids) => {
                let users = resolve_users(self.users.as_ref(), &ids).await?;
                Some(users.iter().map(|u| u.id).collect::<BTreeSet<_>>())
            }
            None => None,
        };
        let status = parse_status(input.status.as_deref())?;

        let target_sprint = input.sprint_id.unwrap_or(task.sprint_id);
        let target_title = title.clone().unwrap_or_else(|| task.title.clone());
        if target_sprint != task.sprint_id || target_title != task.title {
            if let Some(existing) = self
                .tasks
                .find_by_sprint_and_title(&target_sprint, &target_title)
                .await?
            {
                if existing.id != task.id {
                    return Err(duplicate_task(&target_title));
                }
            }
        }

        TaskUpdate {
            sprint_id: input.sprint_id,
            title,
            description: input.description,
            due_date: input.due_date,
            status,
            assigned_to,
            comments: input.comments,
            screenshots: input.screenshots,
        }
        .apply_to(&mut task);

        let task = self
            .tasks
            .update(&task)
            .await
            .map_err(|e| normalize_duplicate(e, &target_title))?;

        tracing::info!(task_id = %task.id, "Task updated");
        self.with_assignees(task).await
    }

    /// Delete a task
    pub async fn delete(&self, id: &TaskId) -> Result<(), DomainError> {
        self.tasks.delete(id).await?;
        tracing::info!(task_id = %id, "Task deleted");
        Ok(())
    }

    /// Replace the task's assignees with exactly `new_assignees`
    pub async fn reassign(
        &self,
        id: &TaskId,
        new_assignees: &[UserId],
    ) -> Result<TaskDetails, DomainError> {
        self.find(id).await?;
        let assignees = resolve_users(self.users.as_ref(), new_assignees).await?;
        let ids: BTreeSet<UserId> = assignees.iter().map(|u| u.id).collect();

        let task = self.tasks.set_assignees(id, &ids).await?;

        tracing::info!(task_id = %id, assignees = ids.len(), "Task reassigned");
        Ok(TaskDetails { task, assignees })
    }

    async fn find(&self, id: &TaskId) -> Result<Task, DomainError> {
        self.tasks
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Task {} not found", id)))
    }

    async fn ensure_sprint(&self, id: &SprintId) -> Result<(), DomainError> {
        match self.sprints.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("Sprint {} not found", id))),
        }
    }

    async fn with_assignees(&self, task: Task) -> Result<TaskDetails, DomainError> {
        let ids: Vec<UserId> = task.assigned_to.iter().copied().collect();
        let assignees = if ids.is_empty() {
            Vec::new()
        } else {
            self.users.find_many(&ids).await?
        };
        Ok(TaskDetails { task, assignees })
    }
}

fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, DomainError> {
    raw.map(|s| s.parse::<TaskStatus>().map_err(DomainError::Validation))
        .transpose()
}

fn duplicate_task(title: &str) -> DomainError {
    DomainError::AlreadyExists(format!("A task titled '{}' already exists in this sprint", title))
}

fn normalize_duplicate(err: DomainError, title: &str) -> DomainError {
    match err {
        DomainError::AlreadyExists(_) => duplicate_task(title),
        e => e,
    }
}
