//! Router harness
//!
//! Builds `AppState` over SeaORM's mock connection. Each query the request
//! makes pops the next queued result, so a test queues exactly the rows
//! (or errors) the route reads, starting with the acting user lookup.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

use crate::config::{Config, DEFAULT_IDENTITY_HEADER};
use crate::domain::entities::{Account, User};
use crate::entity::{accounts, users};
use crate::AppState;

fn test_config() -> Config {
    Config {
        database_url: String::new(),
        port: 0,
        identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
    }
}

/// State with no database at all; only for requests rejected before storage
pub fn offline_state() -> AppState {
    AppState::new(DatabaseConnection::Disconnected, test_config())
}

/// Empty PostgreSQL mock
pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

/// Mock whose first query resolves `user` as the acting user
pub fn mock_db_for(user: &User) -> MockDatabase {
    mock_db().append_query_results([vec![user_row(user)]])
}

pub fn mock_state(db: MockDatabase) -> AppState {
    AppState::new(db.into_connection(), test_config())
}

pub fn user_row(user: &User) -> users::Model {
    users::Model {
        id: user.id.0,
        username: user.username.clone(),
        full_name: user.full_name.clone(),
    }
}

pub fn account_row(account: &Account) -> accounts::Model {
    accounts::Model {
        id: account.id.0,
        name: account.name.clone(),
        description: account.description.clone(),
        owner_id: account.owner.map(|o| o.0),
        created_at: account.created_at.fixed_offset(),
    }
}

/// Request as `user`, with an optional raw JSON body
pub fn request_as(user: &User, method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(DEFAULT_IDENTITY_HEADER, user.id.to_string());

    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through the full router and decode the JSON reply
pub async fn send(state: AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = crate::router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, body)
}
