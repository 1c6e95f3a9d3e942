//! Tracker API Server
//!
//! Project tracking backend: accounts own projects, projects hold sprints,
//! sprints hold tasks assigned to users from an external identity store.
//! Uses hexagonal (ports & adapters) architecture for clean separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresAccountRepository, PostgresProjectRepository, PostgresSprintRepository,
    PostgresTaskRepository, PostgresUserDirectory,
};
use app::{AccountService, ProjectService, SprintService, TaskService};
use config::Config;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<AccountService<PostgresAccountRepository>>,
    pub project_service: Arc<
        ProjectService<PostgresAccountRepository, PostgresProjectRepository, PostgresUserDirectory>,
    >,
    pub sprint_service: Arc<SprintService<PostgresProjectRepository, PostgresSprintRepository>>,
    pub task_service:
        Arc<TaskService<PostgresSprintRepository, PostgresTaskRepository, PostgresUserDirectory>>,
    pub user_directory: Arc<PostgresUserDirectory>,
    pub config: Config,
}

impl AppState {
    /// Wire every service to its PostgreSQL adapters
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let account_repo = Arc::new(PostgresAccountRepository::new(db.clone()));
        let project_repo = Arc::new(PostgresProjectRepository::new(db.clone()));
        let sprint_repo = Arc::new(PostgresSprintRepository::new(db.clone()));
        let task_repo = Arc::new(PostgresTaskRepository::new(db.clone()));
        let user_directory = Arc::new(PostgresUserDirectory::new(db));

        Self {
            account_service: Arc::new(AccountService::new(account_repo.clone())),
            project_service: Arc::new(ProjectService::new(
                account_repo,
                project_repo.clone(),
                user_directory.clone(),
            )),
            sprint_service: Arc::new(SprintService::new(project_repo, sprint_repo.clone())),
            task_service: Arc::new(TaskService::new(
                sprint_repo,
                task_repo,
                user_directory.clone(),
            )),
            user_directory,
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Build the HTTP router
fn router(state: AppState) -> Router {
    Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Everything else requires the acting user
        .merge(
            Router::new()
                // Accounts
                .route(
                    "/accounts",
                    get(handlers::list_accounts).post(handlers::create_account),
                )
                .route("/accounts/:id", delete(handlers::delete_account))
                .route(
                    "/accounts/:id/projects",
                    get(handlers::list_account_projects).post(handlers::create_project),
                )
                // Projects
                .route(
                    "/projects/:id",
                    get(handlers::get_project)
                        .patch(handlers::update_project)
                        .delete(handlers::delete_project),
                )
                .route(
                    "/projects/:id/participants",
                    get(handlers::search_participants),
                )
                .route(
                    "/projects/:id/sprints/exists",
                    get(handlers::sprint_exists),
                )
                .route(
                    "/projects/:id/sprints",
                    get(handlers::list_sprints).post(handlers::create_sprint),
                )
                // Sprints
                .route("/sprints/:id", delete(handlers::delete_sprint))
                .route("/sprints/:id/tasks", get(handlers::list_sprint_tasks))
                // Tasks
                .route("/tasks", post(handlers::create_task))
                .route(
                    "/tasks/:id",
                    get(handlers::get_task)
                        .put(handlers::update_task)
                        .delete(handlers::delete_task),
                )
                .route("/tasks/:id/assignees", put(handlers::reassign_task))
                // Users
                .route("/users/search", get(handlers::search_users))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::acting_user_middleware,
                )),
        )
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tracker_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tracker API...");

    // Load configuration
    let config = Config::from_env();

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connected");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = router(AppState::new(db, config));

    // Start server
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
