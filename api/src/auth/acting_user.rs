//! Acting-user middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::domain::entities::UserId;
use crate::domain::ports::UserDirectory;
use crate::error::AppError;
use crate::AppState;

/// Extract the user id from the configured identity header
fn extract_user_id(request: &Request<Body>, header: &str) -> Option<UserId> {
    request
        .headers()
        .get(header)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| Uuid::parse_str(h.trim()).ok())
        .map(UserId)
}

/// Authentication middleware
///
/// Resolves the forwarded user id and injects the `User` into request
/// extensions. Missing, malformed or unknown ids are rejected with 401.
pub async fn acting_user_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let user_id = extract_user_id(&request, &state.config.identity_header)
        .ok_or(AppError::Unauthorized)?;

    let user = state
        .user_directory
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(user_id = %user_id, "Unknown acting user");
            AppError::Unauthorized
        })?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
