use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// One student's proof-of-presence entry in a session.
///
/// `dedup_key` is the student identity when one exists, otherwise the exact
/// display name. It is part of the primary key, which makes submission
/// naturally idempotent: a second insert for the same key violates the pk
/// instead of racing a separate read-then-write.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, serde::Serialize)]
#[sea_orm(table_name = "attendance_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub dedup_key: String,

    pub student_name: String,
    pub student_identity: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::class_session::Entity",
        from = "Column::SessionId",
        to = "super::class_session::Column::Id"
    )]
    Session,
}

impl Related<super::class_session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
    fn via() -> Option<RelationDef> {
        None
    }
}

impl ActiveModelBehavior for ActiveModel {}
