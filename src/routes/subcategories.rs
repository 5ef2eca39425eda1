use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateNamedRequest, UpdateNamedRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Subcategory, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::subcategory_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_subcategories).post(create_subcategory))
        .route("/{id}", get(get_subcategory).put(update_subcategory).delete(delete_subcategory))
        .route("/{id}/available", patch(mark_subcategory_available))
        .route("/{id}/unavailable", patch(mark_subcategory_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/subcategories",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated subcategory list", body = ApiResponse<Vec<Subcategory>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn list_subcategories(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Subcategory>>>> {
    let resp = subcategory_service::list_subcategories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/subcategories",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Subcategory created", body = ApiResponse<Subcategory>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn create_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNamedRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Subcategory>>)> {
    let resp = subcategory_service::create_subcategory(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Subcategory detail", body = ApiResponse<Subcategory>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Subcategory not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn get_subcategory(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = subcategory_service::get_subcategory(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    request_body = UpdateNamedRequest,
    responses(
        (status = 200, description = "Subcategory updated", body = ApiResponse<Subcategory>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Subcategory not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn update_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedRequest>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = subcategory_service::update_subcategory(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/subcategories/{id}",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Subcategory deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Subcategory not found"),
        (status = 422, description = "Subcategory is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn delete_subcategory(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = subcategory_service::delete_subcategory(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/subcategories/{id}/available",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Subcategory marked available", body = ApiResponse<Subcategory>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Subcategory not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn mark_subcategory_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = subcategory_service::set_subcategory_status(
        &state,
        &user,
        id,
        RecordStatus::Available,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/subcategories/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Subcategory id")),
    responses(
        (status = 200, description = "Subcategory marked unavailable", body = ApiResponse<Subcategory>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Subcategory not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Subcategories"
)]
pub async fn mark_subcategory_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Subcategory>>> {
    let resp = subcategory_service::set_subcategory_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}
