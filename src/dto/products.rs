use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct VariantInput {
    pub color_id: Option<Uuid>,
    #[validate(length(min = 1, max = 20, message = "The variant size must be between 1 and 20 characters."))]
    pub size: String,
    #[validate(range(min = 0, message = "The variant quantity must be at least 0."))]
    #[serde(default)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 150, message = "The name must be between 1 and 150 characters."))]
    pub name: String,
    #[validate(length(min = 1, max = 64, message = "The sku must be between 1 and 64 characters."))]
    pub sku: String,
    #[validate(length(max = 2000, message = "The description may not be greater than 2000 characters."))]
    pub description: Option<String>,
    pub category_id: Uuid,
    pub subcategory_id: Uuid,
    pub brand_id: Option<Uuid>,
    pub gender_id: Option<Uuid>,
    pub zone_id: Uuid,
    pub rack_id: Uuid,
    #[validate(nested)]
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

/// Variants listed here replace the product's variant set: matches on `(color, size)`
/// keep their id and quantity, new ones are created, missing ones are removed
/// unless stock movements reference them.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 150, message = "The name must be between 1 and 150 characters."))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 64, message = "The sku must be between 1 and 64 characters."))]
    pub sku: Option<String>,
    #[validate(length(max = 2000, message = "The description may not be greater than 2000 characters."))]
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub subcategory_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub gender_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub rack_id: Option<Uuid>,
    #[validate(nested)]
    pub variants: Option<Vec<VariantInput>>,
}
