//! PostgreSQL adapter for SprintRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::cascade::delete_sprints;
use super::map_db_err;
use super::task_repo::insert_task;
use crate::domain::entities::{NewSprint, NewTask, ProjectId, Sprint, SprintId, Task};
use crate::domain::ports::SprintRepository;
use crate::entity::sprints;
use crate::error::DomainError;

/// PostgreSQL implementation of SprintRepository
pub struct PostgresSprintRepository {
    db: DatabaseConnection,
}

impl PostgresSprintRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SprintRepository for PostgresSprintRepository {
    async fn find_by_id(&self, id: &SprintId) -> Result<Option<Sprint>, DomainError> {
        let result = sprints::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn exists_by_name(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<bool, DomainError> {
        let count = sprints::Entity::find()
            .filter(sprints::Column::ProjectId.eq(project_id.0))
            .filter(sprints::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<Sprint>, DomainError> {
        let results = sprints::Entity::find()
            .filter(sprints::Column::ProjectId.eq(project_id.0))
            .order_by_asc(sprints::Column::StartDate)
            .order_by_asc(sprints::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(&self, sprint: &NewSprint) -> Result<Sprint, DomainError> {
        let model = new_sprint_model(sprint);
        let result = model.insert(&self.db).await.map_err(map_db_err)?;

        Ok(result.into())
    }

    async fn create_with_tasks(
        &self,
        sprint: &NewSprint,
        task_titles: &[String],
    ) -> Result<(Sprint, Vec<Task>), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let created: Sprint = new_sprint_model(sprint)
            .insert(&txn)
            .await
            .map_err(map_db_err)?
            .into();

        let mut tasks = Vec::with_capacity(task_titles.len());
        for title in task_titles {
            let task = insert_task(&txn, &NewTask::bare(created.id, title.clone())).await?;
            tasks.push(task);
        }

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(
            sprint_id = %created.id,
            tasks = tasks.len(),
            "Sprint created with tasks"
        );
        Ok((created, tasks))
    }

    async fn delete(&self, id: &SprintId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let deleted = delete_sprints(&txn, vec![id.0]).await?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("Sprint {} not found", id)));
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

fn new_sprint_model(sprint: &NewSprint) -> sprints::ActiveModel {
    sprints::ActiveModel {
        id: Set(Uuid::new_v4()),
        project_id: Set(sprint.project_id.0),
        name: Set(sprint.name.clone()),
        start_date: Set(sprint.start_date),
        end_date: Set(sprint.end_date),
        created_at: Set(Utc::now().fixed_offset()),
    }
}

/// Convert SeaORM model to domain entity
impl From<sprints::Model> for Sprint {
    fn from(model: sprints::Model) -> Self {
        Sprint {
            id: SprintId(model.id),
            project_id: ProjectId(model.project_id),
            name: model.name,
            start_date: model.start_date,
            end_date: model.end_date,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
