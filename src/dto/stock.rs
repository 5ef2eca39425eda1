use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::MovementType;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateMovementRequest {
    pub variant_id: Uuid,
    pub movement_type: MovementType,
    #[validate(range(min = 0, message = "The quantity must be at least 0."))]
    pub quantity: i32,
    #[validate(length(max = 100, message = "The reference may not be greater than 100 characters."))]
    pub reference: Option<String>,
    #[validate(length(max = 1000, message = "The notes may not be greater than 1000 characters."))]
    pub notes: Option<String>,
}
