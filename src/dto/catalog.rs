//! Requests for brands, categories, subcategories, mappings, colors and genders.

use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Create payload for records identified by a name with an optional description
/// (brands, categories, subcategories, zones, racks).
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateNamedRequest {
    #[validate(length(min = 1, max = 100, message = "The name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(length(max = 500, message = "The description may not be greater than 500 characters."))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateNamedRequest {
    #[validate(length(min = 1, max = 100, message = "The name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    #[validate(length(max = 500, message = "The description may not be greater than 500 characters."))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct GenderRequest {
    #[validate(length(min = 1, max = 50, message = "The name must be between 1 and 50 characters."))]
    pub name: String,
}

/// At least one of `hex_code` / `rgb` is required; the other is derived.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateColorRequest {
    #[validate(length(min = 1, max = 50, message = "The name must be between 1 and 50 characters."))]
    pub name: String,
    pub hex_code: Option<String>,
    pub rgb: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateColorRequest {
    #[validate(length(min = 1, max = 50, message = "The name must be between 1 and 50 characters."))]
    pub name: Option<String>,
    pub hex_code: Option<String>,
    pub rgb: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMappingRequest {
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMappingRequest {
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
}
