use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::catalog::GenderRequest,
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Gender, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::gender_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genders).post(create_gender))
        .route("/{id}", get(get_gender).put(update_gender).delete(delete_gender))
        .route("/{id}/available", patch(mark_gender_available))
        .route("/{id}/unavailable", patch(mark_gender_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/genders",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated gender list", body = ApiResponse<Vec<Gender>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn list_genders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Gender>>>> {
    let resp = gender_service::list_genders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/genders",
    request_body = GenderRequest,
    responses(
        (status = 201, description = "Gender created", body = ApiResponse<Gender>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn create_gender(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<GenderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Gender>>)> {
    let resp = gender_service::create_gender(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/genders/{id}",
    params(("id" = Uuid, Path, description = "Gender id")),
    responses(
        (status = 200, description = "Gender detail", body = ApiResponse<Gender>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Gender not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn get_gender(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Gender>>> {
    let resp = gender_service::get_gender(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/genders/{id}",
    params(("id" = Uuid, Path, description = "Gender id")),
    request_body = GenderRequest,
    responses(
        (status = 200, description = "Gender updated", body = ApiResponse<Gender>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Gender not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn update_gender(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<GenderRequest>,
) -> AppResult<Json<ApiResponse<Gender>>> {
    let resp = gender_service::update_gender(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/genders/{id}",
    params(("id" = Uuid, Path, description = "Gender id")),
    responses(
        (status = 200, description = "Gender deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Gender not found"),
        (status = 422, description = "Gender is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn delete_gender(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = gender_service::delete_gender(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/genders/{id}/available",
    params(("id" = Uuid, Path, description = "Gender id")),
    responses(
        (status = 200, description = "Gender marked available", body = ApiResponse<Gender>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Gender not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn mark_gender_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Gender>>> {
    let resp = gender_service::set_gender_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/genders/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Gender id")),
    responses(
        (status = 200, description = "Gender marked unavailable", body = ApiResponse<Gender>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Gender not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genders"
)]
pub async fn mark_gender_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Gender>>> {
    let resp = gender_service::set_gender_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}
