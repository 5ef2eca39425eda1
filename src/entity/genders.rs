use sea_orm::entity::prelude::*;

use crate::models::RecordStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub status: RecordStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::size_libraries::Entity")]
    SizeLibraries,
}

impl Related<super::size_libraries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SizeLibraries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
