use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::SizeKind;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateSizeRequest {
    pub gender_id: Uuid,
    #[validate(length(min = 1, max = 20, message = "The size must be between 1 and 20 characters."))]
    pub size: String,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateSizeRequest {
    pub gender_id: Option<Uuid>,
    #[validate(length(min = 1, max = 20, message = "The size must be between 1 and 20 characters."))]
    pub size: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSizeTypeRequest {
    pub category_id: Uuid,
    pub kind: SizeKind,
    pub size_id: Uuid,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateSizeTypeRequest {
    pub category_id: Option<Uuid>,
    pub kind: Option<SizeKind>,
    pub size_id: Option<Uuid>,
}
