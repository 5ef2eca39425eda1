use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::users::Entity as Users,
    error::AppError,
    models::{RecordStatus, Role},
    state::AppState,
};

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

/// Passes when the caller's role is at least `role`.
pub fn ensure_role(user: &AuthUser, role: Role) -> Result<(), AppError> {
    if user.role < role {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    ensure_role(user, Role::Admin)
}

/// Admins manage Staff accounts; only a SuperAdmin may touch Admin or SuperAdmin accounts.
pub fn ensure_can_manage(user: &AuthUser, target_role: Role) -> Result<(), AppError> {
    ensure_admin(user)?;
    if target_role >= Role::Admin && user.role != Role::SuperAdmin {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        let token = auth_str
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;

        let decoded = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized("Invalid or expired token".into()))?;

        let user_id = Uuid::parse_str(&decoded.claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid user id in token".into()))?;

        // Role and status come from the account row, not from the claims.
        let account = Users::find_by_id(user_id)
            .one(&state.orm)
            .await?
            .filter(|account| account.status == RecordStatus::Available)
            .ok_or_else(|| AppError::Unauthorized("Account is not active".into()))?;

        Ok(AuthUser {
            user_id: account.id,
            role: account.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn staff_cannot_pass_admin_gate() {
        assert!(matches!(
            ensure_admin(&user(Role::Staff)),
            Err(AppError::Forbidden)
        ));
        assert!(ensure_admin(&user(Role::Admin)).is_ok());
        assert!(ensure_admin(&user(Role::SuperAdmin)).is_ok());
    }

    #[test]
    fn admins_only_manage_staff_accounts() {
        let admin = user(Role::Admin);
        assert!(ensure_can_manage(&admin, Role::Staff).is_ok());
        assert!(ensure_can_manage(&admin, Role::Admin).is_err());
        assert!(ensure_can_manage(&admin, Role::SuperAdmin).is_err());

        let root = user(Role::SuperAdmin);
        assert!(ensure_can_manage(&root, Role::Admin).is_ok());
        assert!(ensure_can_manage(&root, Role::SuperAdmin).is_ok());

        assert!(ensure_can_manage(&user(Role::Staff), Role::Staff).is_err());
    }
}
