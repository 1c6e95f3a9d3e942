//! PostgreSQL adapter for AccountRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::cascade::delete_projects;
use super::map_db_err;
use crate::domain::entities::{Account, AccountId, NewAccount, UserId};
use crate::domain::ports::AccountRepository;
use crate::entity::{accounts, projects};
use crate::error::DomainError;

/// PostgreSQL implementation of AccountRepository
pub struct PostgresAccountRepository {
    db: DatabaseConnection,
}

impl PostgresAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        let result = accounts::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, DomainError> {
        let result = accounts::Entity::find()
            .filter(accounts::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, DomainError> {
        let results = accounts::Entity::find()
            .filter(accounts::Column::OwnerId.eq(owner.0))
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, account: &NewAccount) -> Result<Account, DomainError> {
        let model = accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(account.name.clone()),
            description: Set(account.description.clone()),
            owner_id: Set(account.owner.map(|id| id.0)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let project_ids: Vec<Uuid> = projects::Entity::find()
            .select_only()
            .column(projects::Column::Id)
            .filter(projects::Column::AccountId.eq(id.0))
            .into_tuple()
            .all(&txn)
            .await
            .map_err(map_db_err)?;
        let project_count = delete_projects(&txn, project_ids).await?;

        let result = accounts::Entity::delete_by_id(id.0)
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            // dropping the transaction rolls it back
            return Err(DomainError::NotFound(format!("Account {} not found", id)));
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(account_id = %id, projects = project_count, "Account deleted");
        Ok(())
    }
}

/// Convert SeaORM model to domain entity
impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Account {
            id: AccountId(model.id),
            name: model.name,
            description: model.description,
            owner: model.owner_id.map(UserId),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
