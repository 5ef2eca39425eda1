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
    models::{Zone, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::zone_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_zones).post(create_zone))
        .route("/{id}", get(get_zone).put(update_zone).delete(delete_zone))
        .route("/{id}/available", patch(mark_zone_available))
        .route("/{id}/unavailable", patch(mark_zone_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/zones",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated zone list", body = ApiResponse<Vec<Zone>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn list_zones(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Zone>>>> {
    let resp = zone_service::list_zones(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/zones",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Zone created", body = ApiResponse<Zone>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn create_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNamedRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Zone>>)> {
    let resp = zone_service::create_zone(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Zone detail", body = ApiResponse<Zone>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Zone not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn get_zone(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Zone>>> {
    let resp = zone_service::get_zone(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone id")),
    request_body = UpdateNamedRequest,
    responses(
        (status = 200, description = "Zone updated", body = ApiResponse<Zone>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Zone not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn update_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedRequest>,
) -> AppResult<Json<ApiResponse<Zone>>> {
    let resp = zone_service::update_zone(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/zones/{id}",
    params(("id" = Uuid, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Zone deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Zone not found"),
        (status = 422, description = "Zone is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn delete_zone(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = zone_service::delete_zone(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/zones/{id}/available",
    params(("id" = Uuid, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Zone marked available", body = ApiResponse<Zone>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Zone not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn mark_zone_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Zone>>> {
    let resp = zone_service::set_zone_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/zones/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Zone id")),
    responses(
        (status = 200, description = "Zone marked unavailable", body = ApiResponse<Zone>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Zone not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Zones"
)]
pub async fn mark_zone_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Zone>>> {
    let resp = zone_service::set_zone_status(&state, &user, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}
