//! Sprint handlers
//!
//! Endpoints for sprints, including the sprint-plus-tasks shortcut.

use axum::{extract::State, http::StatusCode, Json};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AppJson, AppPath, AppQuery};
use super::tasks::TaskResponse;
use super::MessageResponse;
use crate::domain::entities::{ProjectId, Sprint, SprintId};
use crate::error::AppError;
use crate::AppState;

/// Response for sprint endpoints
#[derive(Debug, Serialize)]
pub struct SprintResponse {
    pub id: String,
    pub project_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub created_at: String,
}

impl From<Sprint> for SprintResponse {
    fn from(sprint: Sprint) -> Self {
        Self {
            id: sprint.id.to_string(),
            project_id: sprint.project_id.to_string(),
            duration_days: sprint.duration_days(),
            name: sprint.name,
            start_date: sprint.start_date,
            end_date: sprint.end_date,
            created_at: sprint.created_at.to_rfc3339(),
        }
    }
}

/// Request to create a sprint, optionally with bare tasks
#[derive(Debug, Deserialize)]
pub struct CreateSprintRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Titles of tasks to create alongside the sprint
    pub tasks: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct CreateSprintResponse {
    pub id: String,
    pub message: String,
    pub sprint: SprintResponse,
    pub tasks: Vec<TaskResponse>,
}

#[derive(Debug, Deserialize)]
pub struct SprintExistsQuery {
    pub sprint_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SprintExistsResponse {
    pub exists: bool,
}

/// GET /projects/:id/sprints/exists?sprint_name=
///
/// Check whether a sprint name is taken in the project. A missing name is never taken.
pub async fn sprint_exists(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<Uuid>,
    AppQuery(query): AppQuery<SprintExistsQuery>,
) -> Result<Json<SprintExistsResponse>, AppError> {
    let exists = match query.sprint_name {
        Some(name) => {
            state
                .sprint_service
                .exists(&ProjectId(project_id), &name)
                .await?
        }
        None => false,
    };

    Ok(Json(SprintExistsResponse { exists }))
}

/// GET /projects/:id/sprints
///
/// List sprints of a project.
pub async fn list_sprints(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<Uuid>,
) -> Result<Json<Vec<SprintResponse>>, AppError> {
    let project = state.project_service.get(&ProjectId(project_id)).await?;
    let sprints = state.sprint_service.list_for_project(&project.id).await?;

    Ok(Json(sprints.into_iter().map(SprintResponse::from).collect()))
}

/// POST /projects/:id/sprints
///
/// Create a sprint. With `tasks`, the sprint and its tasks are created atomically.
pub async fn create_sprint(
    State(state): State<AppState>,
    AppPath(project_id): AppPath<Uuid>,
    AppJson(request): AppJson<CreateSprintRequest>,
) -> Result<(StatusCode, Json<CreateSprintResponse>), AppError> {
    let project_id = ProjectId(project_id);

    let (sprint, tasks) = match request.tasks {
        Some(titles) if !titles.is_empty() => {
            state
                .sprint_service
                .create_with_tasks(
                    &project_id,
                    &request.name,
                    request.start_date,
                    request.end_date,
                    &titles,
                )
                .await?
        }
        _ => {
            let sprint = state
                .sprint_service
                .create(&project_id, &request.name, request.start_date, request.end_date)
                .await?;
            (sprint, Vec::new())
        }
    };

    let message = match tasks.len() {
        0 => format!("Sprint '{}' created", sprint.name),
        n => format!("Sprint '{}' created with {} tasks", sprint.name, n),
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateSprintResponse {
            id: sprint.id.to_string(),
            message,
            sprint: sprint.into(),
            tasks: tasks.into_iter().map(TaskResponse::from).collect(),
        }),
    ))
}

/// DELETE /sprints/:id
///
/// Delete a sprint and its tasks.
pub async fn delete_sprint(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let sprint = state.sprint_service.get(&SprintId(id)).await?;

    state.sprint_service.delete(&sprint.id).await?;

    Ok(Json(MessageResponse::new(
        sprint.id,
        format!("Sprint '{}' deleted", sprint.name),
    )))
}

/// GET /sprints/:id/tasks
///
/// List tasks of a sprint.
pub async fn list_sprint_tasks(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<TaskResponse>>, AppError> {
    let tasks = state.task_service.list_for_sprint(&SprintId(id)).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use super::*;
    use crate::test_utils::router::{mock_db_for, mock_state, request_as, send};
    use crate::test_utils::{date, test_sprint, test_user};

    // ===== CreateSprintRequest tests =====

    #[test]
    fn parse_create_sprint_without_tasks() {
        let json = r#"{"name": "Sprint 1", "start_date": "2024-01-01", "end_date": "2024-01-14"}"#;
        let request: CreateSprintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Sprint 1");
        assert_eq!(request.start_date, date(2024, 1, 1));
        assert_eq!(request.end_date, date(2024, 1, 14));
        assert!(request.tasks.is_none());
    }

    #[test]
    fn parse_create_sprint_with_tasks() {
        let json = r#"{
            "name": "Sprint 1",
            "start_date": "2024-01-01",
            "end_date": "2024-01-14",
            "tasks": ["Design", "Build"]
        }"#;
        let request: CreateSprintRequest = serde_json::from_str(json).unwrap();
        assert_eq!(
            request.tasks,
            Some(vec!["Design".to_string(), "Build".to_string()])
        );
    }

    #[test]
    fn parse_create_sprint_invalid_date() {
        let json = r#"{"name": "Sprint 1", "start_date": "2024-13-45", "end_date": "2024-01-14"}"#;
        let result: Result<CreateSprintRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn parse_exists_query_without_name() {
        let query: SprintExistsQuery = serde_json::from_str("{}").unwrap();
        assert!(query.sprint_name.is_none());
    }

    // ===== SprintResponse tests =====

    #[test]
    fn sprint_response_counts_days() {
        let sprint = test_sprint(ProjectId::new(), "Sprint 1");
        let json = serde_json::to_value(SprintResponse::from(sprint)).unwrap();

        assert_eq!(json["start_date"], "2024-01-01");
        assert_eq!(json["duration_days"], 14);
    }

    // ===== Routes =====

    #[tokio::test]
    async fn exists_without_name_is_false() {
        let user = test_user("Jane Doe");
        let uri = format!("/projects/{}/sprints/exists", ProjectId::new());

        let (status, body) = send(
            mock_state(mock_db_for(&user)),
            request_as(&user, Method::GET, &uri, None),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);
    }
}
