use sea_orm::entity::prelude::*;

/// Unique on (account_id, name)
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub account_id: Uuid,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id",
        on_delete = "Cascade"
    )]
    Accounts,
    #[sea_orm(has_many = "super::project_participants::Entity")]
    ProjectParticipants,
    #[sea_orm(has_many = "super::sprints::Entity")]
    Sprints,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::project_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectParticipants.def()
    }
}

impl Related<super::sprints::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sprints.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
