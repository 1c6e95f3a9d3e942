use sea_orm::entity::prelude::*;

/// Unique on (sprint_id, title). `status` holds the kebab-case form.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub sprint_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub due_date: Option<Date>,
    pub status: String,
    #[sea_orm(column_type = "Text")]
    pub comments: String,
    pub screenshots: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::sprints::Entity",
        from = "Column::SprintId",
        to = "super::sprints::Column::Id",
        on_delete = "Cascade"
    )]
    Sprints,
    #[sea_orm(has_many = "super::task_assignees::Entity")]
    TaskAssignees,
}

impl Related<super::sprints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sprints.def()
    }
}

impl Related<super::task_assignees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaskAssignees.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
