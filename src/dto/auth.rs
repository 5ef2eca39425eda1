use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::User;

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The password field is required."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The password confirmation does not match."))]
    pub password_confirmation: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "The email must be a valid email address."))]
    pub email: String,
    #[validate(length(min = 1, message = "The token field is required."))]
    pub token: String,
    #[validate(length(min = 8, message = "The password must be at least 8 characters."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "The password confirmation does not match."))]
    pub password_confirmation: String,
}
