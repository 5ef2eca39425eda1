use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        users::{CreateUserRequest, UpdateUserRequest},
        forms::{EditForm, UserFormOptions},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{RecordStatus, User},
    response::ApiResponse,
    routes::params::ListQuery,
    services::user_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/create", get(user_form))
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/{id}/edit", get(edit_user))
        .route("/{id}/available", patch(mark_user_available))
        .route("/{id}/unavailable", patch(mark_user_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/users",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated user list", body = ApiResponse<Vec<User>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn list_users(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<User>>>> {
    let resp = user_service::list_users(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/create",
    responses(
        (status = 200, description = "Options for the create form", body = ApiResponse<UserFormOptions>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn user_form(user: AuthUser) -> AppResult<Json<ApiResponse<UserFormOptions>>> {
    let resp = user_service::user_form(&user)?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn create_user(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = user_service::create_user(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User detail", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn get_user(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::get_user(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}/edit",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User with edit form options", body = ApiResponse<EditForm<User, UserFormOptions>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn edit_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EditForm<User, UserFormOptions>>>> {
    let resp = user_service::edit_user(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 404, description = "User not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn update_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::update_user(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 404, description = "User not found"),
        (status = 422, description = "User is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = user_service::delete_user(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/available",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User marked available", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn mark_user_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::set_user_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/users/{id}/unavailable",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "User marked unavailable", body = ApiResponse<User>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Role cannot manage this account"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Users"
)]
pub async fn mark_user_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    let resp = user_service::set_user_status(&state, &user, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}
