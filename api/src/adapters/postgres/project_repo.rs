//! PostgreSQL adapter for ProjectRepository

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::cascade::delete_projects;
use super::map_db_err;
use crate::domain::entities::{AccountId, NewProject, Project, ProjectId, UserId};
use crate::domain::ports::ProjectRepository;
use crate::entity::{project_participants, projects};
use crate::error::DomainError;

/// PostgreSQL implementation of ProjectRepository
pub struct PostgresProjectRepository {
    db: DatabaseConnection,
}

impl PostgresProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load participant sets for the given projects
    async fn participants_of<C: ConnectionTrait>(
        conn: &C,
        project_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, BTreeSet<UserId>>, DomainError> {
        let rows = project_participants::Entity::find()
            .filter(project_participants::Column::ProjectId.is_in(project_ids))
            .all(conn)
            .await
            .map_err(map_db_err)?;

        let mut by_project: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
        for row in rows {
            by_project
                .entry(row.project_id)
                .or_default()
                .insert(UserId(row.user_id));
        }
        Ok(by_project)
    }

    async fn with_participants(
        &self,
        models: Vec<projects::Model>,
    ) -> Result<Vec<Project>, DomainError> {
        let ids = models.iter().map(|m| m.id).collect();
        let mut participants = Self::participants_of(&self.db, ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let set = participants.remove(&m.id).unwrap_or_default();
                to_project(m, set)
            })
            .collect())
    }

    async fn insert_participants<C: ConnectionTrait>(
        conn: &C,
        project_id: Uuid,
        participants: &BTreeSet<UserId>,
    ) -> Result<(), DomainError> {
        if participants.is_empty() {
            return Ok(());
        }

        let rows = participants.iter().map(|user| project_participants::ActiveModel {
            project_id: Set(project_id),
            user_id: Set(user.0),
        });

        project_participants::Entity::insert_many(rows)
            .exec(conn)
            .await
            .map_err(map_db_err)?;

        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            Some(model) => Ok(self.with_participants(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_account_and_name(
        &self,
        account_id: &AccountId,
        name: &str,
    ) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find()
            .filter(projects::Column::AccountId.eq(account_id.0))
            .filter(projects::Column::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            Some(model) => Ok(self.with_participants(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<Project>, DomainError> {
        let results = projects::Entity::find()
            .filter(projects::Column::AccountId.eq(account_id.0))
            .order_by_asc(projects::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_participants(results).await
    }

    async fn create(&self, project: &NewProject) -> Result<Project, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = projects::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(project.name.clone()),
            description: Set(project.description.clone()),
            account_id: Set(project.account_id.0),
            owner_id: Set(project.owner.map(|id| id.0)),
            created_at: Set(Utc::now().fixed_offset()),
        };

        let result = model.insert(&txn).await.map_err(map_db_err)?;
        Self::insert_participants(&txn, result.id, &project.participants).await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(to_project(result, project.participants.clone()))
    }

    async fn update(&self, project: &Project) -> Result<Project, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = projects::ActiveModel {
            id: Set(project.id.0),
            name: Set(project.name.clone()),
            description: Set(project.description.clone()),
            account_id: Set(project.account_id.0),
            owner_id: Set(project.owner.map(|id| id.0)),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => {
                DomainError::NotFound(format!("Project {} not found", project.id))
            }
            other => map_db_err(other),
        })?;

        project_participants::Entity::delete_many()
            .filter(project_participants::Column::ProjectId.eq(project.id.0))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;
        Self::insert_participants(&txn, project.id.0, &project.participants).await?;

        txn.commit().await.map_err(map_db_err)?;

        Ok(to_project(result, project.participants.clone()))
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let deleted = delete_projects(&txn, vec![id.0]).await?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("Project {} not found", id)));
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

/// Convert SeaORM model plus participant rows to domain entity
fn to_project(model: projects::Model, participants: BTreeSet<UserId>) -> Project {
    Project {
        id: ProjectId(model.id),
        name: model.name,
        description: model.description,
        account_id: AccountId(model.account_id),
        owner: model.owner_id.map(UserId),
        participants,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
