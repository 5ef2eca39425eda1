use sea_orm::entity::prelude::*;

use crate::models::{RecordStatus, SizeKind};

/// Clothing and shoe sizes share one table, told apart by `kind`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "size_libraries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: SizeKind,
    pub gender_id: Uuid,
    pub size: String,
    pub status: RecordStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::genders::Entity",
        from = "Column::GenderId",
        to = "super::genders::Column::Id"
    )]
    Genders,
}

impl Related<super::genders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
