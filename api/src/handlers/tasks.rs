//! Task handlers
//!
//! Endpoints for task management and assignment.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use super::users::UserResponse;
use super::MessageResponse;
use crate::app::{CreateTaskInput, TaskDetails, UpdateTaskInput};
use crate::domain::entities::{SprintId, Task, TaskId, TaskStatus, UserId};
use crate::error::AppError;
use crate::AppState;

/// Response for task endpoints
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub sprint_id: String,
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub status_label: &'static str,
    pub assigned_to: Vec<String>,
    /// Resolved users, present on single-task responses
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<UserResponse>>,
    pub comments: String,
    pub screenshots: Option<String>,
    pub created_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            sprint_id: task.sprint_id.to_string(),
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            status: task.status,
            status_label: task.status.label(),
            assigned_to: task.assigned_to.iter().map(|u| u.to_string()).collect(),
            assignees: None,
            comments: task.comments,
            screenshots: task.screenshots,
            created_at: task.created_at.to_rfc3339(),
        }
    }
}

impl From<TaskDetails> for TaskResponse {
    fn from(details: TaskDetails) -> Self {
        let mut response = TaskResponse::from(details.task);
        response.assignees = Some(
            details
                .assignees
                .into_iter()
                .map(UserResponse::from)
                .collect(),
        );
        response
    }
}

/// Request to create a task
///
/// `sprint_id` and `title` are checked by the service so that a missing
/// value yields a validation error rather than a decode failure.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub sprint_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    #[serde(default)]
    pub assigned_to: Vec<Uuid>,
    pub comments: Option<String>,
    pub screenshots: Option<String>,
}

impl From<CreateTaskRequest> for CreateTaskInput {
    fn from(request: CreateTaskRequest) -> Self {
        CreateTaskInput {
            sprint_id: request.sprint_id.map(SprintId),
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            status: request.status,
            assigned_to: request.assigned_to.into_iter().map(UserId).collect(),
            comments: request.comments,
            screenshots: request.screenshots,
        }
    }
}

/// Request to update a task. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub sprint_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub assigned_to: Option<Vec<Uuid>>,
    pub comments: Option<String>,
    pub screenshots: Option<String>,
}

impl From<UpdateTaskRequest> for UpdateTaskInput {
    fn from(request: UpdateTaskRequest) -> Self {
        UpdateTaskInput {
            sprint_id: request.sprint_id.map(SprintId),
            title: request.title,
            description: request.description,
            due_date: request.due_date,
            status: request.status,
            assigned_to: request
                .assigned_to
                .map(|ids| ids.into_iter().map(UserId).collect()),
            comments: request.comments,
            screenshots: request.screenshots,
        }
    }
}

/// Request to replace a task's assignees
#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    pub assigned_to: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    pub id: String,
    pub message: String,
    pub task: TaskResponse,
}

/// POST /tasks
///
/// Create a task.
pub async fn create_task(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<CreateTaskResponse>), AppError> {
    let details = state.task_service.create(request.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTaskResponse {
            id: details.task.id.to_string(),
            message: format!("Task '{}' created", details.task.title),
            task: details.into(),
        }),
    ))
}

/// GET /tasks/:id
///
/// Get a task with its assignees resolved.
pub async fn get_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<TaskResponse>, AppError> {
    let details = state.task_service.get(&TaskId(id)).await?;

    Ok(Json(details.into()))
}

/// PUT /tasks/:id
///
/// Update a task.
pub async fn update_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    let details = state
        .task_service
        .update(&TaskId(id), request.into())
        .await?;

    Ok(Json(details.into()))
}

/// DELETE /tasks/:id
///
/// Delete a task.
pub async fn delete_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let task_id = TaskId(id);
    state.task_service.delete(&task_id).await?;

    Ok(Json(MessageResponse::new(task_id, "Task deleted")))
}

/// PUT /tasks/:id/assignees
///
/// Replace the task's assignees with exactly the given users.
pub async fn reassign_task(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<ReassignRequest>,
) -> Result<Json<TaskResponse>, AppError> {
    let assignees: Vec<UserId> = request.assigned_to.into_iter().map(UserId).collect();
    let details = state
        .task_service
        .reassign(&TaskId(id), &assignees)
        .await?;

    Ok(Json(details.into()))
}
