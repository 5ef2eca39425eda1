use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::{CreateColorRequest, UpdateColorRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Color, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::color_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_colors).post(create_color))
        .route("/{id}", get(get_color).put(update_color).delete(delete_color))
        .route("/{id}/available", patch(mark_color_available))
        .route("/{id}/unavailable", patch(mark_color_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/colors",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated color list", body = ApiResponse<Vec<Color>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn list_colors(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Color>>>> {
    let resp = color_service::list_colors(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/colors",
    request_body = CreateColorRequest,
    responses(
        (status = 201, description = "Color created", body = ApiResponse<Color>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn create_color(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateColorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Color>>)> {
    let resp = color_service::create_color(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/colors/{id}",
    params(("id" = Uuid, Path, description = "Color id")),
    responses(
        (status = 200, description = "Color detail", body = ApiResponse<Color>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Color not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn get_color(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Color>>> {
    let resp = color_service::get_color(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/colors/{id}",
    params(("id" = Uuid, Path, description = "Color id")),
    request_body = UpdateColorRequest,
    responses(
        (status = 200, description = "Color updated", body = ApiResponse<Color>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Color not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn update_color(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateColorRequest>,
) -> AppResult<Json<ApiResponse<Color>>> {
    let resp = color_service::update_color(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/colors/{id}",
    params(("id" = Uuid, Path, description = "Color id")),
    responses(
        (status = 200, description = "Color deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Color not found"),
        (status = 422, description = "Color is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn delete_color(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = color_service::delete_color(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/colors/{id}/available",
    params(("id" = Uuid, Path, description = "Color id")),
    responses(
        (status = 200, description = "Color marked available", body = ApiResponse<Color>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Color not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn mark_color_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Color>>> {
    let resp = color_service::set_color_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/colors/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Color id")),
    responses(
        (status = 200, description = "Color marked unavailable", body = ApiResponse<Color>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Color not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Colors"
)]
pub async fn mark_color_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Color>>> {
    let resp = color_service::set_color_status(&state, &user, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}
