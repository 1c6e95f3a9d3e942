//! Explicit child deletion shared by the repositories.
//!
//! Every helper runs on the caller's connection so the whole cascade
//! commits or rolls back with the parent delete.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QuerySelect};
use uuid::Uuid;

use super::map_db_err;
use crate::entity::{project_participants, projects, sprints, task_assignees, tasks};
use crate::error::DomainError;

pub(crate) async fn delete_tasks<C: ConnectionTrait>(
    conn: &C,
    task_ids: Vec<Uuid>,
) -> Result<u64, DomainError> {
    if task_ids.is_empty() {
        return Ok(0);
    }

    task_assignees::Entity::delete_many()
        .filter(task_assignees::Column::TaskId.is_in(task_ids.clone()))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    let result = tasks::Entity::delete_many()
        .filter(tasks::Column::Id.is_in(task_ids))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    Ok(result.rows_affected)
}

pub(crate) async fn delete_sprints<C: ConnectionTrait>(
    conn: &C,
    sprint_ids: Vec<Uuid>,
) -> Result<u64, DomainError> {
    if sprint_ids.is_empty() {
        return Ok(0);
    }

    let task_ids: Vec<Uuid> = tasks::Entity::find()
        .select_only()
        .column(tasks::Column::Id)
        .filter(tasks::Column::SprintId.is_in(sprint_ids.clone()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(map_db_err)?;
    delete_tasks(conn, task_ids).await?;

    let result = sprints::Entity::delete_many()
        .filter(sprints::Column::Id.is_in(sprint_ids))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    Ok(result.rows_affected)
}

pub(crate) async fn delete_projects<C: ConnectionTrait>(
    conn: &C,
    project_ids: Vec<Uuid>,
) -> Result<u64, DomainError> {
    if project_ids.is_empty() {
        return Ok(0);
    }

    let sprint_ids: Vec<Uuid> = sprints::Entity::find()
        .select_only()
        .column(sprints::Column::Id)
        .filter(sprints::Column::ProjectId.is_in(project_ids.clone()))
        .into_tuple()
        .all(conn)
        .await
        .map_err(map_db_err)?;
    delete_sprints(conn, sprint_ids).await?;

    project_participants::Entity::delete_many()
        .filter(project_participants::Column::ProjectId.is_in(project_ids.clone()))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    let result = projects::Entity::delete_many()
        .filter(projects::Column::Id.is_in(project_ids))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    Ok(result.rows_affected)
}
