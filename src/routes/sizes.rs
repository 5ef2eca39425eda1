//! Size library endpoints. Clothing and shoe sizes share one table and one set
//! of handlers; the `{kind}` segment picks the library.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        forms::{EditForm, SizeFormOptions},
        sizes::{CreateSizeRequest, UpdateSizeRequest},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{RecordStatus, SizeKind, SizeLibrary},
    response::ApiResponse,
    routes::params::ListQuery,
    services::size_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{kind}", get(list_sizes).post(create_size))
        .route("/{kind}/create", get(size_form))
        .route(
            "/{kind}/{id}",
            get(get_size).put(update_size).delete(delete_size),
        )
        .route("/{kind}/{id}/edit", get(edit_size))
        .route("/{kind}/{id}/available", patch(mark_size_available))
        .route("/{kind}/{id}/unavailable", patch(mark_size_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/sizes/{kind}",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Paginated size list", body = ApiResponse<Vec<SizeLibrary>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn list_sizes(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(kind): Path<SizeKind>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<SizeLibrary>>>> {
    let resp = size_service::list_sizes(&state, kind, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sizes/{kind}/create",
    params(("kind" = SizeKind, Path, description = "clothing or shoes")),
    responses(
        (status = 200, description = "Options for the create form", body = ApiResponse<SizeFormOptions>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn size_form(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<SizeKind>,
) -> AppResult<Json<ApiResponse<SizeFormOptions>>> {
    let resp = size_service::size_form(&state, &user, kind).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/sizes/{kind}",
    params(("kind" = SizeKind, Path, description = "clothing or shoes")),
    request_body = CreateSizeRequest,
    responses(
        (status = 201, description = "Size created", body = ApiResponse<SizeLibrary>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn create_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path(kind): Path<SizeKind>,
    Json(payload): Json<CreateSizeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SizeLibrary>>)> {
    let resp = size_service::create_size(&state, &user, kind, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/sizes/{kind}/{id}",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    responses(
        (status = 200, description = "Size detail", body = ApiResponse<SizeLibrary>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Size not found in this library"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn get_size(
    State(state): State<AppState>,
    _user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
) -> AppResult<Json<ApiResponse<SizeLibrary>>> {
    let resp = size_service::get_size(&state, kind, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/sizes/{kind}/{id}/edit",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    responses(
        (status = 200, description = "Size with edit form options", body = ApiResponse<EditForm<SizeLibrary, SizeFormOptions>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size not found in this library"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn edit_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
) -> AppResult<Json<ApiResponse<EditForm<SizeLibrary, SizeFormOptions>>>> {
    let resp = size_service::edit_size(&state, &user, kind, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/sizes/{kind}/{id}",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    request_body = UpdateSizeRequest,
    responses(
        (status = 200, description = "Size updated", body = ApiResponse<SizeLibrary>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size not found in this library"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn update_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
    Json(payload): Json<UpdateSizeRequest>,
) -> AppResult<Json<ApiResponse<SizeLibrary>>> {
    let resp = size_service::update_size(&state, &user, kind, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/sizes/{kind}/{id}",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    responses(
        (status = 200, description = "Size deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size not found in this library"),
        (status = 422, description = "Size is still used by a size type"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn delete_size(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = size_service::delete_size(&state, &user, kind, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sizes/{kind}/{id}/available",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    responses(
        (status = 200, description = "Size marked available", body = ApiResponse<SizeLibrary>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size not found in this library"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn mark_size_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
) -> AppResult<Json<ApiResponse<SizeLibrary>>> {
    let resp =
        size_service::set_size_status(&state, &user, kind, id, RecordStatus::Available).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/sizes/{kind}/{id}/unavailable",
    params(
        ("kind" = SizeKind, Path, description = "clothing or shoes"),
        ("id" = Uuid, Path, description = "Size id")
    ),
    responses(
        (status = 200, description = "Size marked unavailable", body = ApiResponse<SizeLibrary>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size not found in this library"),
    ),
    security(("bearer_auth" = [])),
    tag = "Sizes"
)]
pub async fn mark_size_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path((kind, id)): Path<(SizeKind, Uuid)>,
) -> AppResult<Json<ApiResponse<SizeLibrary>>> {
    let resp =
        size_service::set_size_status(&state, &user, kind, id, RecordStatus::Unavailable).await?;
    Ok(Json(resp))
}
