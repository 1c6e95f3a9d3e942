//! PostgreSQL adapter for TaskRepository

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use super::cascade::delete_tasks;
use super::map_db_err;
use crate::domain::entities::{NewTask, SprintId, Task, TaskId, TaskStatus, UserId};
use crate::domain::ports::TaskRepository;
use crate::entity::{task_assignees, tasks};
use crate::error::DomainError;

/// PostgreSQL implementation of TaskRepository
pub struct PostgresTaskRepository {
    db: DatabaseConnection,
}

impl PostgresTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn assignees_of<C: ConnectionTrait>(
        conn: &C,
        task_ids: Vec<Uuid>,
    ) -> Result<HashMap<Uuid, BTreeSet<UserId>>, DomainError> {
        let rows = task_assignees::Entity::find()
            .filter(task_assignees::Column::TaskId.is_in(task_ids))
            .all(conn)
            .await
            .map_err(map_db_err)?;

        let mut by_task: HashMap<Uuid, BTreeSet<UserId>> = HashMap::new();
        for row in rows {
            by_task
                .entry(row.task_id)
                .or_default()
                .insert(UserId(row.user_id));
        }
        Ok(by_task)
    }

    async fn with_assignees(&self, models: Vec<tasks::Model>) -> Result<Vec<Task>, DomainError> {
        let ids = models.iter().map(|m| m.id).collect();
        let mut assignees = Self::assignees_of(&self.db, ids).await?;

        models
            .into_iter()
            .map(|m| {
                let set = assignees.remove(&m.id).unwrap_or_default();
                to_task(m, set)
            })
            .collect()
    }
}

/// Replace the assignee rows of a task on the given connection
async fn replace_assignees<C: ConnectionTrait>(
    conn: &C,
    task_id: Uuid,
    assignees: &BTreeSet<UserId>,
) -> Result<(), DomainError> {
    task_assignees::Entity::delete_many()
        .filter(task_assignees::Column::TaskId.eq(task_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    if assignees.is_empty() {
        return Ok(());
    }

    let rows = assignees.iter().map(|user| task_assignees::ActiveModel {
        task_id: Set(task_id),
        user_id: Set(user.0),
    });

    task_assignees::Entity::insert_many(rows)
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    Ok(())
}

/// Insert a task and its assignees on the given connection
pub(crate) async fn insert_task<C: ConnectionTrait>(
    conn: &C,
    task: &NewTask,
) -> Result<Task, DomainError> {
    let model = tasks::ActiveModel {
        id: Set(Uuid::new_v4()),
        sprint_id: Set(task.sprint_id.0),
        title: Set(task.title.clone()),
        description: Set(task.description.clone()),
        due_date: Set(task.due_date),
        status: Set(task.status.to_string()),
        comments: Set(task.comments.clone()),
        screenshots: Set(task.screenshots.clone()),
        created_at: Set(Utc::now().fixed_offset()),
    };

    let result = model.insert(conn).await.map_err(map_db_err)?;
    replace_assignees(conn, result.id, &task.assigned_to).await?;

    to_task(result, task.assigned_to.clone())
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, DomainError> {
        let result = tasks::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            Some(model) => Ok(self.with_assignees(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_sprint_and_title(
        &self,
        sprint_id: &SprintId,
        title: &str,
    ) -> Result<Option<Task>, DomainError> {
        let result = tasks::Entity::find()
            .filter(tasks::Column::SprintId.eq(sprint_id.0))
            .filter(tasks::Column::Title.eq(title))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match result {
            Some(model) => Ok(self.with_assignees(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_by_sprint(&self, sprint_id: &SprintId) -> Result<Vec<Task>, DomainError> {
        let results = tasks::Entity::find()
            .filter(tasks::Column::SprintId.eq(sprint_id.0))
            .order_by_asc(tasks::Column::CreatedAt)
            .order_by_asc(tasks::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        self.with_assignees(results).await
    }

    async fn create(&self, task: &NewTask) -> Result<Task, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;
        let created = insert_task(&txn, task).await?;
        txn.commit().await.map_err(map_db_err)?;

        Ok(created)
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = tasks::ActiveModel {
            id: Set(task.id.0),
            sprint_id: Set(task.sprint_id.0),
            title: Set(task.title.clone()),
            description: Set(task.description.clone()),
            due_date: Set(task.due_date),
            status: Set(task.status.to_string()),
            comments: Set(task.comments.clone()),
            screenshots: Set(task.screenshots.clone()),
            ..Default::default()
        }
        .update(&txn)
        .await
        .map_err(|e| match e {
            DbErr::RecordNotUpdated => DomainError::NotFound(format!("Task {} not found", task.id)),
            other => map_db_err(other),
        })?;

        replace_assignees(&txn, task.id.0, &task.assigned_to).await?;
        txn.commit().await.map_err(map_db_err)?;

        to_task(result, task.assigned_to.clone())
    }

    async fn set_assignees(
        &self,
        id: &TaskId,
        assignees: &BTreeSet<UserId>,
    ) -> Result<Task, DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let model = tasks::Entity::find_by_id(id.0)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or_else(|| DomainError::NotFound(format!("Task {} not found", id)))?;

        replace_assignees(&txn, id.0, assignees).await?;
        txn.commit().await.map_err(map_db_err)?;

        to_task(model, assignees.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), DomainError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let deleted = delete_tasks(&txn, vec![id.0]).await?;
        if deleted == 0 {
            return Err(DomainError::NotFound(format!("Task {} not found", id)));
        }

        txn.commit().await.map_err(map_db_err)?;
        Ok(())
    }
}

/// Convert SeaORM model plus assignee rows to domain entity
///
/// Fails on a stored status outside the known set.
fn to_task(model: tasks::Model, assigned_to: BTreeSet<UserId>) -> Result<Task, DomainError> {
    let status: TaskStatus = model.status.parse().map_err(|_| {
        DomainError::Database(format!(
            "Task {} has unrecognized status '{}'",
            model.id, model.status
        ))
    })?;

    Ok(Task {
        id: TaskId(model.id),
        sprint_id: SprintId(model.sprint_id),
        title: model.title,
        description: model.description,
        due_date: model.due_date,
        status,
        assigned_to,
        comments: model.comments,
        screenshots: model.screenshots,
        created_at: model.created_at.with_timezone(&Utc),
    })
}
