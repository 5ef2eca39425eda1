use sea_orm::entity::prelude::*;

use crate::models::RecordStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub zone_id: Uuid,
    pub rack_id: Uuid,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::zones::Entity",
        from = "Column::ZoneId",
        to = "super::zones::Column::Id"
    )]
    Zones,
    #[sea_orm(
        belongs_to = "super::racks::Entity",
        from = "Column::RackId",
        to = "super::racks::Column::Id"
    )]
    Racks,
}

impl ActiveModelBehavior for ActiveModel {}
