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
    models::{Rack, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::rack_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_racks).post(create_rack))
        .route("/{id}", get(get_rack).put(update_rack).delete(delete_rack))
        .route("/{id}/available", patch(mark_rack_available))
        .route("/{id}/unavailable", patch(mark_rack_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/racks",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated rack list", body = ApiResponse<Vec<Rack>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn list_racks(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Rack>>>> {
    let resp = rack_service::list_racks(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/racks",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Rack created", body = ApiResponse<Rack>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn create_rack(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNamedRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Rack>>)> {
    let resp = rack_service::create_rack(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/racks/{id}",
    params(("id" = Uuid, Path, description = "Rack id")),
    responses(
        (status = 200, description = "Rack detail", body = ApiResponse<Rack>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Rack not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn get_rack(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Rack>>> {
    let resp = rack_service::get_rack(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/racks/{id}",
    params(("id" = Uuid, Path, description = "Rack id")),
    request_body = UpdateNamedRequest,
    responses(
        (status = 200, description = "Rack updated", body = ApiResponse<Rack>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rack not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn update_rack(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedRequest>,
) -> AppResult<Json<ApiResponse<Rack>>> {
    let resp = rack_service::update_rack(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/racks/{id}",
    params(("id" = Uuid, Path, description = "Rack id")),
    responses(
        (status = 200, description = "Rack deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rack not found"),
        (status = 422, description = "Rack is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn delete_rack(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = rack_service::delete_rack(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/racks/{id}/available",
    params(("id" = Uuid, Path, description = "Rack id")),
    responses(
        (status = 200, description = "Rack marked available", body = ApiResponse<Rack>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rack not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn mark_rack_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Rack>>> {
    let resp = rack_service::set_rack_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/racks/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Rack id")),
    responses(
        (status = 200, description = "Rack marked unavailable", body = ApiResponse<Rack>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Rack not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Racks"
)]
pub async fn mark_rack_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Rack>>> {
    let resp = rack_service::set_rack_status(&state, &user, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}
