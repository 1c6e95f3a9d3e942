//! User handlers
//!
//! Read-only lookups against the identity store.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::extract::AppQuery;
use crate::domain::entities::User;
use crate::domain::ports::UserDirectory;
use crate::error::AppError;
use crate::AppState;

/// Public view of a user
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub display_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            display_name: user.display_name().to_string(),
            username: user.username,
            full_name: user.full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchUsersQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /users/search?q=
///
/// Search users by display name. An empty query returns no users.
pub async fn search_users(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<SearchUsersQuery>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = state.user_directory.search_by_name(&query.q).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}
