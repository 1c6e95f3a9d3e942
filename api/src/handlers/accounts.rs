//! Account handlers
//!
//! Endpoints for account management and the projects under an account.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::extract::{AppJson, AppPath};
use super::projects::ProjectResponse;
use super::MessageResponse;
use crate::domain::entities::{Account, AccountId, User, UserId};
use crate::domain::ports::UserDirectory;
use crate::error::{AppError, DomainError};
use crate::AppState;

/// Response for account endpoints
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: Option<String>,
    pub created_at: String,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name,
            description: account.description,
            owner: account.owner.map(|o| o.to_string()),
            created_at: account.created_at.to_rfc3339(),
        }
    }
}

/// Request to create a new account
#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to the caller
    pub owner: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct CreateAccountResponse {
    pub id: String,
    pub message: String,
    pub account: AccountResponse,
}

/// GET /accounts
///
/// List accounts owned by the caller.
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    let accounts = state.account_service.list_for_owner(&user.id).await?;

    Ok(Json(accounts.into_iter().map(AccountResponse::from).collect()))
}

/// POST /accounts
///
/// Create a new account.
pub async fn create_account(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppJson(request): AppJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<CreateAccountResponse>), AppError> {
    let owner = match request.owner.map(UserId) {
        Some(owner) if owner != user.id => state
            .user_directory
            .find_by_id(&owner)
            .await?
            .map(|u| u.id)
            .ok_or_else(|| {
                DomainError::NotFound(format!("User with ID {} not found", owner))
            })?,
        _ => user.id,
    };

    let account = state
        .account_service
        .create(&request.name, &request.description, Some(owner))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateAccountResponse {
            id: account.id.to_string(),
            message: format!("Account '{}' created", account.name),
            account: account.into(),
        }),
    ))
}

/// DELETE /accounts/:id
///
/// Delete an account with all of its projects, sprints and tasks. Owner only.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let account = state.account_service.get(&AccountId(id)).await?;
    ensure_account_owner(&account, &user)?;

    state.account_service.delete(&account.id).await?;

    Ok(Json(MessageResponse::new(
        account.id,
        format!("Account '{}' deleted", account.name),
    )))
}

/// GET /accounts/:id/projects
///
/// List projects under an account.
pub async fn list_account_projects(
    State(state): State<AppState>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<Vec<ProjectResponse>>, AppError> {
    let account = state.account_service.get(&AccountId(id)).await?;
    let projects = state.project_service.list_for_account(&account.id).await?;

    Ok(Json(projects.into_iter().map(ProjectResponse::from).collect()))
}

/// Fail unless `user` may place projects under the account
pub(crate) async fn authorize_account_use(
    state: &AppState,
    user: &User,
    account_id: &AccountId,
) -> Result<Account, AppError> {
    let account = state.account_service.get(account_id).await?;
    ensure_account_usable(&account, user)?;

    Ok(account)
}

fn ensure_account_owner(account: &Account, user: &User) -> Result<(), AppError> {
    if account.is_owned_by(&user.id) {
        Ok(())
    } else {
        Err(AppError::Domain(DomainError::Forbidden(
            "Only the account owner can delete it".to_string(),
        )))
    }
}

/// Ownerless accounts are open to everyone
fn ensure_account_usable(account: &Account, user: &User) -> Result<(), AppError> {
    match account.owner {
        Some(owner) if owner != user.id => Err(AppError::Domain(DomainError::Forbidden(
            format!("Account '{}' belongs to another user", account.name),
        ))),
        _ => Ok(()),
    }
}
