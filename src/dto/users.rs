use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::Role;

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "The name must be between 1 and 100 characters."))]
    pub name: String,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "The name must be between 1 and 100 characters."))]
    pub name: Option<String>,
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: Option<String>,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: Option<String>,
    pub role: Option<Role>,
}
