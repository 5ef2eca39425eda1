use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateLocationRequest {
    pub zone_id: Uuid,
    pub rack_id: Uuid,
    #[validate(length(max = 500, message = "The description may not be greater than 500 characters."))]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateLocationRequest {
    pub zone_id: Option<Uuid>,
    pub rack_id: Option<Uuid>,
    #[validate(length(max = 500, message = "The description may not be greater than 500 characters."))]
    pub description: Option<String>,
}
