//! PostgreSQL adapters
//!
//! Implementations of repository traits using SeaORM and PostgreSQL.

pub mod account_repo;
mod cascade;
pub mod project_repo;
pub mod sprint_repo;
pub mod task_repo;
pub mod user_repo;


pub use account_repo::PostgresAccountRepository;
pub use project_repo::PostgresProjectRepository;
pub use sprint_repo::PostgresSprintRepository;
pub use task_repo::PostgresTaskRepository;
pub use user_repo::PostgresUserDirectory;

use sea_orm::{DbErr, SqlErr};

use crate::error::DomainError;

/// Map a SeaORM error into the domain, keeping unique violations distinguishable
pub(crate) fn map_db_err(err: DbErr) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::AlreadyExists(msg),
        Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::NotFound(msg),
        _ => DomainError::Database(err.to_string()),
    }
}
