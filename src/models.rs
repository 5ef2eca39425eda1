use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity;

/// Two-valued availability flag carried by every master-data record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum RecordStatus {
    #[sea_orm(string_value = "Available")]
    Available,
    #[sea_orm(string_value = "Unavailable")]
    Unavailable,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Available => "Available",
            RecordStatus::Unavailable => "Unavailable",
        }
    }
}

/// Account roles, ordered from least to most privileged.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum Role {
    #[sea_orm(string_value = "Staff")]
    Staff,
    #[sea_orm(string_value = "Admin")]
    Admin,
    #[sea_orm(string_value = "SuperAdmin")]
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Staff => "Staff",
            Role::Admin => "Admin",
            Role::SuperAdmin => "SuperAdmin",
        }
    }

    /// Roles an account with `self` may hand out.
    pub fn assignable(&self) -> Vec<Role> {
        match self {
            Role::SuperAdmin => vec![Role::Staff, Role::Admin, Role::SuperAdmin],
            Role::Admin => vec![Role::Staff],
            Role::Staff => Vec::new(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum MovementType {
    #[sea_orm(string_value = "in")]
    In,
    #[sea_orm(string_value = "out")]
    Out,
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl MovementType {
    pub fn label(&self) -> &'static str {
        match self {
            MovementType::In => "Stock In",
            MovementType::Out => "Stock Out",
            MovementType::Adjustment => "Adjustment",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum SizeKind {
    #[sea_orm(string_value = "clothing")]
    Clothing,
    #[sea_orm(string_value = "shoes")]
    Shoes,
}

impl SizeKind {
    pub fn resource(&self) -> &'static str {
        match self {
            SizeKind::Clothing => "size_clothings",
            SizeKind::Shoes => "size_shoes",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Brand {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::brands::Model> for Brand {
    fn from(model: entity::brands::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image: model.image,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::categories::Model> for Category {
    fn from(model: entity::categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            image: model.image,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Subcategory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::subcategories::Model> for Subcategory {
    fn from(model: entity::subcategories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Mapping {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub subcategory_id: Uuid,
    pub subcategory_name: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::mappings::Model> for Mapping {
    fn from(model: entity::mappings::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            category_name: None,
            subcategory_id: model.subcategory_id,
            subcategory_name: None,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Color {
    pub id: Uuid,
    pub name: String,
    pub hex_code: String,
    pub rgb: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::colors::Model> for Color {
    fn from(model: entity::colors::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            hex_code: model.hex_code,
            rgb: model.rgb,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Gender {
    pub id: Uuid,
    pub name: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::genders::Model> for Gender {
    fn from(model: entity::genders::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::zones::Model> for Zone {
    fn from(model: entity::zones::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Rack {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::racks::Model> for Rack {
    fn from(model: entity::racks::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: Uuid,
    pub zone_id: Uuid,
    pub zone_name: Option<String>,
    pub rack_id: Uuid,
    pub rack_name: Option<String>,
    pub description: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::locations::Model> for Location {
    fn from(model: entity::locations::Model) -> Self {
        Self {
            id: model.id,
            zone_id: model.zone_id,
            zone_name: None,
            rack_id: model.rack_id,
            rack_name: None,
            description: model.description,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// A clothing or shoe size scoped to a gender.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SizeLibrary {
    pub id: Uuid,
    pub kind: SizeKind,
    pub gender_id: Uuid,
    pub gender_name: Option<String>,
    pub size: String,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::size_libraries::Model> for SizeLibrary {
    fn from(model: entity::size_libraries::Model) -> Self {
        Self {
            id: model.id,
            kind: model.kind,
            gender_id: model.gender_id,
            gender_name: None,
            size: model.size,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SizeType {
    pub id: Uuid,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub kind: SizeKind,
    pub size_id: Uuid,
    pub size: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::size_types::Model> for SizeType {
    fn from(model: entity::size_types::Model) -> Self {
        Self {
            id: model.id,
            category_id: model.category_id,
            category_name: None,
            kind: model.kind,
            size_id: model.size_id,
            size: None,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductVariant {
    pub id: Uuid,
    pub product_id: Uuid,
    pub color_id: Option<Uuid>,
    pub size: String,
    pub quantity: i32,
}

impl From<entity::product_variants::Model> for ProductVariant {
    fn from(model: entity::product_variants::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            color_id: model.color_id,
            size: model.size,
            quantity: model.quantity,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub gender_id: Option<Uuid>,
    pub zone_id: Uuid,
    pub rack_id: Uuid,
    pub image: Option<String>,
    pub status: RecordStatus,
    pub created_by: Option<Uuid>,
    pub total_quantity: i64,
    pub variants: Vec<ProductVariant>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn from_parts(
        model: entity::products::Model,
        variants: Vec<entity::product_variants::Model>,
    ) -> Self {
        let variants: Vec<ProductVariant> = variants.into_iter().map(Into::into).collect();
        let total_quantity = variants.iter().map(|v| v.quantity as i64).sum();
        Self {
            id: model.id,
            name: model.name,
            sku: model.sku,
            description: model.description,
            category_id: model.category_id,
            subcategory_id: model.subcategory_id,
            brand_id: model.brand_id,
            gender_id: model.gender_id,
            zone_id: model.zone_id,
            rack_id: model.rack_id,
            image: model.image,
            status: model.status,
            created_by: model.created_by,
            total_quantity,
            variants,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// Account as exposed over the API; the password hash never leaves the service layer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            role: model.role,
            status: model.status,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StockMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Uuid,
    pub user_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub quantity_before: i32,
    pub quantity_after: i32,
    pub reference: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::stock_movements::Model> for StockMovement {
    fn from(model: entity::stock_movements::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            variant_id: model.variant_id,
            user_id: model.user_id,
            movement_type: model.movement_type,
            quantity: model.quantity,
            quantity_before: model.quantity_before,
            quantity_after: model.quantity_after,
            reference: model.reference,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// `{id, name}` pair used to fill select inputs on create/edit forms.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, sea_orm::FromQueryResult)]
pub struct Choice {
    pub id: Uuid,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_are_ordered_by_privilege() {
        assert!(Role::Staff < Role::Admin);
        assert!(Role::Admin < Role::SuperAdmin);
    }

    #[test]
    fn assignable_roles_follow_privilege() {
        assert!(Role::Staff.assignable().is_empty());
        assert_eq!(Role::Admin.assignable(), vec![Role::Staff]);
        assert_eq!(Role::SuperAdmin.assignable().len(), 3);
    }

    #[test]
    fn enums_serialize_as_stored_values() {
        assert_eq!(
            serde_json::to_value(RecordStatus::Unavailable).unwrap(),
            "Unavailable"
        );
        assert_eq!(serde_json::to_value(MovementType::Adjustment).unwrap(), "adjustment");
        assert_eq!(serde_json::to_value(SizeKind::Shoes).unwrap(), "shoes");
    }
}
