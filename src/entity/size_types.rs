use sea_orm::entity::prelude::*;

use crate::models::{RecordStatus, SizeKind};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "size_types")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub kind: SizeKind,
    pub size_id: Uuid,
    pub status: RecordStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::size_libraries::Entity",
        from = "Column::SizeId",
        to = "super::size_libraries::Column::Id"
    )]
    SizeLibraries,
}

impl Related<super::size_libraries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SizeLibraries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
