//! Project handlers
//!
//! Endpoints for project management.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::accounts::authorize_account_use;
use super::extract::{AppJson, AppPath, AppQuery};
use super::users::UserResponse;
use super::MessageResponse;
use crate::domain::entities::{AccountId, Project, ProjectId, ProjectUpdate, User, UserId};
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Response for project endpoints
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub account_id: String,
    pub owner: Option<String>,
    pub participants: Vec<String>,
    pub created_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id.to_string(),
            name: project.name,
            description: project.description,
            account_id: project.account_id.to_string(),
            owner: project.owner.map(|o| o.to_string()),
            participants: project.participants.iter().map(|p| p.to_string()).collect(),
            created_at: project.created_at.to_rfc3339(),
        }
    }
}

/// Request to create a new project
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to the caller
    pub owner: Option<Uuid>,
    #[serde(default)]
    pub participants: Vec<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateProjectResponse {
    pub id: String,
    pub message: String,
    pub project: ProjectResponse,
}

/// Request to update a project. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub account_id: Option<Uuid>,
    pub owner: Option<Uuid>,
    pub participants: Option<Vec<Uuid>>,
}

impl From<UpdateProjectRequest> for ProjectUpdate {
    fn from(request: UpdateProjectRequest) -> Self {
        ProjectUpdate {
            name: request.name,
            description: request.description,
            account_id: request.account_id.map(AccountId),
            owner: request.owner.map(UserId),
            participants: request
                .participants
                .map(|ids| ids.into_iter().map(UserId).collect()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    #[serde(default)]
    pub query: String,
}

/// POST /accounts/:id/projects
///
/// Create a project under an account. The caller must own the account.
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(account_id): AppPath<Uuid>,
    AppJson(request): AppJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<CreateProjectResponse>), AppError> {
    let account = authorize_account_use(&state, &user, &AccountId(account_id)).await?;

    let participants: Vec<UserId> = request.participants.into_iter().map(UserId).collect();
    let project = state
        .project_service
        .create(
            &user.id,
            &account.id,
            &request.name,
            &request.description,
            request.owner.map(UserId),
            &participants,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateProjectResponse {
            id: project.id.to_string(),
            message: format!("Project '{}' created", project.name),
            project: project.into(),
        }),
    ))
}

/// GET /projects/:id
///
/// Get project details.
pub async fn get_project(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    let project = state.project_service.get(&ProjectId(id)).await?;

    Ok(Json(project.into()))
}

/// PATCH /projects/:id
///
/// Update a project. Owner only; moving it requires access to the target account.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
    AppJson(request): AppJson<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    let update = non_empty_update(request)?;
    let project = owned_project(&state, &user, ProjectId(id)).await?;

    if let Some(account_id) = update.account_id {
        if account_id != project.account_id {
            authorize_account_use(&state, &user, &account_id).await?;
        }
    }

    let updated = state.project_service.update(&project.id, update).await?;

    Ok(Json(updated.into()))
}

/// DELETE /projects/:id
///
/// Delete a project with its sprints and tasks. Owner only.
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let project = owned_project(&state, &user, ProjectId(id)).await?;

    state.project_service.delete(&project.id).await?;

    Ok(Json(MessageResponse::new(
        project.id,
        format!("Project '{}' deleted", project.name),
    )))
}

/// GET /projects/:id/participants?query=
///
/// Participant suggestions for assignment, excluding the owner.
pub async fn search_participants(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
    AppQuery(query): AppQuery<ParticipantQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state
        .project_service
        .search_participants(&ProjectId(id), &query.query)
        .await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

fn non_empty_update(request: UpdateProjectRequest) -> Result<ProjectUpdate, AppError> {
    let update = ProjectUpdate::from(request);
    if update.is_empty() {
        return Err(AppError::BadRequest("No fields to update".to_string()));
    }
    Ok(update)
}

/// Load a project and check the caller owns it
async fn owned_project(state: &AppState, user: &User, id: ProjectId) -> Result<Project, AppError> {
    let project = state.project_service.get(&id).await?;
    ensure_project_owner(&project, user)?;

    Ok(project)
}

fn ensure_project_owner(project: &Project, user: &User) -> Result<(), AppError> {
    if project.is_owned_by(&user.id) {
        Ok(())
    } else {
        Err(AppError::Domain(DomainError::Forbidden(
            "Only the project owner can modify it".to_string(),
        )))
    }
}
