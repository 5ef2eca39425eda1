use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit,
    dto::{
        forms::{EditForm, UserFormOptions},
        users::{CreateUserRequest, UpdateUserRequest},
    },
    entity::{
        products::{Column as ProdCol, Entity as Products},
        stock_movements::{Column as MoveCol, Entity as StockMovements},
        users::{self, ActiveModel, Column, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_can_manage},
    models::{RecordStatus, User},
    response::ApiResponse,
    routes::params::{ListQuery, SortOrder},
    services::{
        auth_service::{hash_password, normalize_email},
        common::{ensure_unique, ensure_unlinked, paginate},
    },
    state::AppState,
};

const RESOURCE: &str = "users";

/// Nobody removes or deactivates their own account.
pub fn ensure_not_self(user: &AuthUser, target: Uuid) -> AppResult<()> {
    if user.user_id == target {
        return Err(AppError::Forbidden);
    }
    Ok(())
}

async fn find_user(state: &AppState, id: Uuid) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_users(state: &AppState, query: ListQuery) -> AppResult<ApiResponse<Vec<User>>> {
    let mut finder = Users::find();
    if let Some(pattern) = query.search() {
        finder = finder.filter(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Email).ilike(pattern)),
        );
    }
    if let Some(status) = query.status {
        finder = finder.filter(Column::Status.eq(status));
    }
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(Column::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(Column::CreatedAt),
    };

    let (items, meta) = paginate(&state.orm, finder, query.pagination()).await?;
    let data = items.into_iter().map(User::from).collect();
    Ok(ApiResponse::paginated("Users", data, meta))
}

pub fn user_form(user: &AuthUser) -> AppResult<ApiResponse<UserFormOptions>> {
    ensure_admin(user)?;
    Ok(ApiResponse::success(
        "User form",
        UserFormOptions {
            roles: user.role.assignable(),
        },
        None,
    ))
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<ApiResponse<User>> {
    let account = find_user(state, id).await?;
    Ok(ApiResponse::success("User", account.into(), None))
}

pub async fn edit_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<EditForm<User, UserFormOptions>>> {
    let account = find_user(state, id).await?;
    ensure_can_manage(user, account.role)?;
    Ok(ApiResponse::success(
        "User form",
        EditForm {
            record: account.into(),
            options: UserFormOptions {
                roles: user.role.assignable(),
            },
        },
        None,
    ))
}

pub async fn create_user(
    state: &AppState,
    user: &AuthUser,
    payload: CreateUserRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_can_manage(user, payload.role)?;
    payload.validate()?;
    let email = normalize_email(&payload.email);
    ensure_unique::<Users, _>(&state.orm, Column::Email, Column::Id, "email", &email, None).await?;

    let account = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(payload.name.trim().to_string()),
        email: Set(email),
        password_hash: Set(hash_password(&payload.password)?),
        role: Set(payload.role),
        status: Set(RecordStatus::Available),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user,
        "user_create",
        RESOURCE,
        serde_json::json!({ "target_id": account.id, "role": account.role }),
    )
    .await;

    Ok(ApiResponse::success("User created", account.into(), None))
}

pub async fn update_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateUserRequest,
) -> AppResult<ApiResponse<User>> {
    let existing = find_user(state, id).await?;
    ensure_can_manage(user, existing.role)?;
    if let Some(role) = payload.role {
        ensure_can_manage(user, role)?;
    }
    payload.validate()?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(email) = payload.email {
        let email = normalize_email(&email);
        ensure_unique::<Users, _>(
            &state.orm,
            Column::Email,
            Column::Id,
            "email",
            &email,
            Some(id),
        )
        .await?;
        active.email = Set(email);
    }
    if let Some(password) = payload.password {
        active.password_hash = Set(hash_password(&password)?);
    }
    if let Some(role) = payload.role {
        active.role = Set(role);
    }
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "user_update",
        RESOURCE,
        serde_json::json!({ "target_id": account.id }),
    )
    .await;

    Ok(ApiResponse::success("User updated", account.into(), None))
}

pub async fn delete_user(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_not_self(user, id)?;
    let account = find_user(state, id).await?;
    ensure_can_manage(user, account.role)?;

    let movements = StockMovements::find()
        .filter(MoveCol::UserId.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(movements, "user", "stock movements")?;
    let products = Products::find()
        .filter(ProdCol::CreatedBy.eq(id))
        .count(&state.orm)
        .await?;
    ensure_unlinked(products, "user", "products")?;

    Users::delete_by_id(id).exec(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "user_delete",
        RESOURCE,
        serde_json::json!({ "target_id": id, "email": account.email }),
    )
    .await;

    Ok(ApiResponse::empty("User deleted"))
}

pub async fn set_user_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: RecordStatus,
) -> AppResult<ApiResponse<User>> {
    if status == RecordStatus::Unavailable {
        ensure_not_self(user, id)?;
    }
    let existing = find_user(state, id).await?;
    ensure_can_manage(user, existing.role)?;

    let mut active: ActiveModel = existing.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().into());
    let account = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user,
        "user_status",
        RESOURCE,
        serde_json::json!({ "target_id": id, "status": status }),
    )
    .await;

    Ok(ApiResponse::success(
        format!("User set to {}", status.as_str()),
        account.into(),
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn accounts_cannot_target_themselves() {
        let me = AuthUser {
            user_id: Uuid::new_v4(),
            role: Role::SuperAdmin,
        };
        assert!(matches!(ensure_not_self(&me, me.user_id), Err(AppError::Forbidden)));
        assert!(ensure_not_self(&me, Uuid::new_v4()).is_ok());
    }
}
