use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{CreateNamedRequest, UpdateNamedRequest},
        forms::ImageUploadForm,
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    models::{Brand, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::brand_service,
    state::AppState,
    upload,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_brands).post(create_brand))
        .route("/{id}", get(get_brand).put(update_brand).delete(delete_brand))
        .route("/{id}/available", patch(mark_brand_available))
        .route("/{id}/unavailable", patch(mark_brand_unavailable))
        .route("/{id}/image", post(upload_brand_image))
}

#[utoipa::path(
    get,
    path = "/api/brands",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated brand list", body = ApiResponse<Vec<Brand>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn list_brands(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Brand>>>> {
    let resp = brand_service::list_brands(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/brands",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Brand created", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn create_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNamedRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Brand>>)> {
    let resp = brand_service::create_brand(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand detail", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn get_brand(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = brand_service::get_brand(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    request_body = UpdateNamedRequest,
    responses(
        (status = 200, description = "Brand updated", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn update_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedRequest>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = brand_service::update_brand(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Brand is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn delete_brand(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = brand_service::delete_brand(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/brands/{id}/available",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand marked available", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn mark_brand_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = brand_service::set_brand_status(&state, &user, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/brands/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Brand id")),
    responses(
        (status = 200, description = "Brand marked unavailable", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn mark_brand_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Brand>>> {
    let resp = brand_service::set_brand_status(&state, &user, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/brands/{id}/image",
    params(("id" = Uuid, Path, description = "Brand id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<Brand>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Brand not found"),
        (status = 422, description = "Missing or unsupported image"),
    ),
    security(("bearer_auth" = [])),
    tag = "Brands"
)]
pub async fn upload_brand_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Brand>>> {
    ensure_admin(&user)?;
    let image = upload::read_image(multipart).await?;
    let resp = brand_service::upload_brand_image(&state, &user, id, image).await?;
    Ok(Json(resp))
}
