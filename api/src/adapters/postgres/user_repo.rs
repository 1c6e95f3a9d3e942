//! PostgreSQL adapter for UserDirectory
//!
//! Reads the identity store's `users` table. Nothing here writes to it.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

use super::map_db_err;
use crate::domain::entities::{User, UserId};
use crate::domain::ports::{UserDirectory, USER_SEARCH_LIMIT};
use crate::entity::users;
use crate::error::DomainError;

/// PostgreSQL implementation of UserDirectory
pub struct PostgresUserDirectory {
    db: DatabaseConnection,
}

impl PostgresUserDirectory {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards so the query is matched literally
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl UserDirectory for PostgresUserDirectory {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let result = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let results = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().map(|id| id.0)))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<User>, DomainError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let results = users::Entity::find()
            .filter(
                Expr::expr(Func::lower(Expr::col(users::Column::FullName)))
                    .like(like_pattern(query)),
            )
            .order_by_asc(users::Column::FullName)
            .limit(USER_SEARCH_LIMIT)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        User {
            id: UserId(model.id),
            username: model.username,
            full_name: model.full_name,
        }
    }
}
