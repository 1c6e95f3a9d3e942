//! Sprint service
//!
//! Sprint names are unique per project. Creating a sprint with an initial
//! batch of tasks happens in one storage transaction.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::entities::{
    validate_sprint_dates, validate_sprint_name, NewSprint, ProjectId, Sprint, SprintId, Task,
};
use crate::domain::ports::{ProjectRepository, SprintRepository};
use crate::error::DomainError;

/// Service for managing sprints
pub struct SprintService<PR, SR>
where
    PR: ProjectRepository,
    SR: SprintRepository,
{
    projects: Arc<PR>,
    sprints: Arc<SR>,
}

impl<PR, SR> SprintService<PR, SR>
where
    PR: ProjectRepository,
    SR: SprintRepository,
{
    pub fn new(projects: Arc<PR>, sprints: Arc<SR>) -> Self {
        Self { projects, sprints }
    }

    /// Whether a sprint with this name already exists in the project.
    ///
    /// Advisory only: `create` is still the authority on duplicates.
    pub async fn exists(&self, project_id: &ProjectId, name: &str) -> Result<bool, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }
        self.sprints.exists_by_name(project_id, name).await
    }

    /// Create a sprint
    pub async fn create(
        &self,
        project_id: &ProjectId,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Sprint, DomainError> {
        let new_sprint = self
            .prepare(project_id, name, start_date, end_date)
            .await?;

        let sprint = self
            .sprints
            .create(&new_sprint)
            .await
            .map_err(|e| match e {
                DomainError::AlreadyExists(_) => duplicate_sprint(&new_sprint.name),
                e => e,
            })?;

        tracing::info!(sprint_id = %sprint.id, project_id = %project_id, "Sprint created");
        Ok(sprint)
    }

    /// Create a sprint together with one bare task per title.
    ///
    /// Either everything is created or nothing is.
    pub async fn create_with_tasks(
        &self,
        project_id: &ProjectId,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        task_titles: &[String],
    ) -> Result<(Sprint, Vec<Task>), DomainError> {
        let new_sprint = self
            .prepare(project_id, name, start_date, end_date)
            .await?;

        let mut seen = HashSet::new();
        let mut titles = Vec::with_capacity(task_titles.len());
        for title in task_titles {
            let title = title.trim();
            if title.is_empty() {
                return Err(DomainError::Validation(
                    "Task title cannot be empty".to_string(),
                ));
            }
            if !seen.insert(title.to_string()) {
                return Err(duplicate_task_title(title));
            }
            titles.push(title.to_string());
        }

        let result = self.sprints.create_with_tasks(&new_sprint, &titles).await;
        let (sprint, tasks) = match result {
            Ok(created) => created,
            Err(DomainError::AlreadyExists(detail)) => {
                // The transaction rolled back, so a sprint now present was
                // inserted concurrently by someone else.
                if self
                    .sprints
                    .exists_by_name(project_id, &new_sprint.name)
                    .await?
                {
                    return Err(duplicate_sprint(&new_sprint.name));
                }
                return Err(DomainError::AlreadyExists(detail));
            }
            Err(e) => return Err(e),
        };

        tracing::info!(
            sprint_id = %sprint.id,
            project_id = %project_id,
            tasks = tasks.len(),
            "Sprint created with tasks"
        );
        Ok((sprint, tasks))
    }

    /// Get a sprint by ID
    pub async fn get(&self, id: &SprintId) -> Result<Sprint, DomainError> {
        self.sprints
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Sprint {} not found", id)))
    }

    /// Sprints of a project
    pub async fn list_for_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Sprint>, DomainError> {
        self.sprints.find_by_project(project_id).await
    }

    /// Delete a sprint and its tasks
    pub async fn delete(&self, id: &SprintId) -> Result<(), DomainError> {
        self.sprints.delete(id).await?;
        tracing::info!(sprint_id = %id, "Sprint deleted");
        Ok(())
    }

    /// Validate input and run the duplicate pre-check
    async fn prepare(
        &self,
        project_id: &ProjectId,
        name: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<NewSprint, DomainError> {
        let name = name.trim();
        validate_sprint_name(name).map_err(DomainError::Validation)?;
        validate_sprint_dates(start_date, end_date).map_err(DomainError::Validation)?;

        if self.projects.find_by_id(project_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "Project {} not found",
                project_id
            )));
        }

        if self.sprints.exists_by_name(project_id, name).await? {
            tracing::warn!(project_id = %project_id, name, "Rejected duplicate sprint name");
            return Err(duplicate_sprint(name));
        }

        Ok(NewSprint {
            project_id: *project_id,
            name: name.to_string(),
            start_date,
            end_date,
        })
    }
}

fn duplicate_sprint(name: &str) -> DomainError {
    DomainError::AlreadyExists(format!(
        "The sprint '{}' already exists for this project. Try editing it or choose a different name.",
        name
    ))
}

fn duplicate_task_title(title: &str) -> DomainError {
    DomainError::AlreadyExists(format!("Task '{}' appears more than once", title))
}
