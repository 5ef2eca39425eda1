use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{self, log_audit},
    dto::auth::{
        ChangePasswordRequest, Claims, ForgotPasswordRequest, LoginRequest, LoginResponse,
        ResetPasswordRequest,
    },
    entity::{
        password_reset_tokens::{self, Column as ResetCol, Entity as PasswordResetTokens},
        users::{self, ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{RecordStatus, Role, User},
    response::ApiResponse,
    state::AppState,
};

const FORGOT_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent.";

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string())
}

pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(secret: &str, ttl_hours: i64, user_id: Uuid, role: Role) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub fn reset_token_expired(
    created_at: DateTime<Utc>,
    ttl_minutes: i64,
    now: DateTime<Utc>,
) -> bool {
    now - created_at > Duration::minutes(ttl_minutes)
}

fn invalid_reset_token() -> AppError {
    AppError::field("token", "This password reset token is invalid.")
}

async fn find_by_email(state: &AppState, email: &str) -> AppResult<Option<users::Model>> {
    Ok(Users::find()
        .filter(UserCol::Email.eq(normalize_email(email)))
        .one(&state.orm)
        .await?)
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    payload.validate()?;
    let user = match find_by_email(state, &payload.email).await? {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    if !verify_password(&user.password_hash, &payload.password)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }
    if user.status != RecordStatus::Available {
        return Err(AppError::BadRequest("This account is unavailable".into()));
    }

    let token = issue_token(
        &state.config.jwt_secret,
        state.config.jwt_ttl_hours,
        user.id,
        user.role,
    )?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.id),
        "user_login",
        Some("users"),
        Some(serde_json::json!({ "user_id": user.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let resp = LoginResponse {
        token,
        user: user.into(),
    };
    Ok(ApiResponse::success("Logged in", resp, None))
}

pub async fn current_user(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;
    Ok(ApiResponse::success("Current user", account.into(), None))
}

pub async fn change_password(
    state: &AppState,
    user: &AuthUser,
    payload: ChangePasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.validate()?;
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Account no longer exists".into()))?;

    if !verify_password(&account.password_hash, &payload.current_password)? {
        return Err(AppError::field(
            "current_password",
            "The current password is incorrect.",
        ));
    }

    let mut active: UserActive = account.into();
    active.password_hash = Set(hash_password(&payload.password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "password_change",
        "users",
        serde_json::json!({ "user_id": user.user_id }),
    )
    .await;

    Ok(ApiResponse::empty("Password updated"))
}

/// Issues a reset token for an active account. The reply is identical whether
/// or not the account exists.
pub async fn forgot_password(
    state: &AppState,
    payload: ForgotPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.validate()?;
    let email = normalize_email(&payload.email);
    let account = match find_by_email(state, &email).await? {
        Some(u) if u.status == RecordStatus::Available => u,
        _ => {
            tracing::debug!("password reset requested for unknown or unavailable account");
            return Ok(ApiResponse::empty(FORGOT_MESSAGE));
        }
    };

    let token = Uuid::new_v4().simple().to_string();
    let row = password_reset_tokens::ActiveModel {
        email: Set(email.clone()),
        token_hash: Set(hash_password(&token)?),
        created_at: Set(Utc::now().into()),
    };
    PasswordResetTokens::insert(row)
        .on_conflict(
            OnConflict::column(ResetCol::Email)
                .update_columns([ResetCol::TokenHash, ResetCol::CreatedAt])
                .to_owned(),
        )
        .exec(&state.orm)
        .await?;

    let link = format!(
        "{}/reset-password?token={}&email={}",
        state.config.app_url.trim_end_matches('/'),
        token,
        email
    );
    tracing::info!(user_id = %account.id, %link, "password reset link issued");

    if let Err(err) = log_audit(
        &state.pool,
        Some(account.id),
        "password_forgot",
        Some("users"),
        Some(serde_json::json!({ "user_id": account.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::empty(FORGOT_MESSAGE))
}

pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    payload.validate()?;
    let email = normalize_email(&payload.email);

    let stored = PasswordResetTokens::find_by_id(email.clone())
        .one(&state.orm)
        .await?
        .ok_or_else(invalid_reset_token)?;
    if reset_token_expired(
        stored.created_at.with_timezone(&Utc),
        state.config.reset_token_ttl_minutes,
        Utc::now(),
    ) {
        PasswordResetTokens::delete_by_id(email.clone())
            .exec(&state.orm)
            .await?;
        return Err(invalid_reset_token());
    }
    if !verify_password(&stored.token_hash, payload.token.trim())? {
        return Err(invalid_reset_token());
    }

    let account = find_by_email(state, &email)
        .await?
        .ok_or_else(invalid_reset_token)?;
    let account_id = account.id;

    let mut active: UserActive = account.into();
    active.password_hash = Set(hash_password(&payload.password)?);
    active.updated_at = Set(Utc::now().into());
    active.update(&state.orm).await?;
    PasswordResetTokens::delete_by_id(email).exec(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(account_id),
        "password_reset",
        Some("users"),
        Some(serde_json::json!({ "user_id": account_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::empty("Password has been reset"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(verify_password(&hash, "s3cret-pass").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn token_carries_subject_and_role() {
        let id = Uuid::new_v4();
        let token = issue_token("k", 1, id, Role::Admin).unwrap();
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"k"),
            &Validation::default(),
        )
        .unwrap()
        .claims;
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, "Admin");
    }

    #[test]
    fn reset_tokens_expire_after_ttl() {
        let issued = Utc::now();
        assert!(!reset_token_expired(issued, 60, issued + Duration::minutes(59)));
        assert!(reset_token_expired(issued, 60, issued + Duration::minutes(61)));
    }

    #[test]
    fn emails_are_compared_lower_case() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }
}
