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
    models::{Category, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::category_service,
    state::AppState,
    upload,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", get(get_category).put(update_category).delete(delete_category))
        .route("/{id}/available", patch(mark_category_available))
        .route("/{id}/unavailable", patch(mark_category_unavailable))
        .route("/{id}/image", post(upload_category_image))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated category list", body = ApiResponse<Vec<Category>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Category>>>> {
    let resp = category_service::list_categories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateNamedRequest,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateNamedRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Category>>)> {
    let resp = category_service::create_category(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category detail", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::get_category(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body = UpdateNamedRequest,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateNamedRequest>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::update_category(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Category is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = category_service::delete_category(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/categories/{id}/available",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category marked available", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn mark_category_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::set_category_status(
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
    path = "/api/categories/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category marked unavailable", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn mark_category_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Category>>> {
    let resp = category_service::set_category_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories/{id}/image",
    params(("id" = Uuid, Path, description = "Category id")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<Category>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Category not found"),
        (status = 422, description = "Missing or unsupported image"),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn upload_category_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Category>>> {
    ensure_admin(&user)?;
    let image = upload::read_image(multipart).await?;
    let resp = category_service::upload_category_image(&state, &user, id, image).await?;
    Ok(Json(resp))
}
