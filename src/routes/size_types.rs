use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        sizes::{CreateSizeTypeRequest, UpdateSizeTypeRequest},
        forms::{EditForm, SizeTypeFormOptions},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{SizeType, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::size_type_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_size_types).post(create_size_type))
        .route("/create", get(size_type_form))
        .route("/{id}", get(get_size_type).put(update_size_type).delete(delete_size_type))
        .route("/{id}/edit", get(edit_size_type))
        .route("/{id}/available", patch(mark_size_type_available))
        .route("/{id}/unavailable", patch(mark_size_type_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/size-types",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated size type list", body = ApiResponse<Vec<SizeType>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn list_size_types(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<SizeType>>>> {
    let resp = size_type_service::list_size_types(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/size-types/create",
    responses(
        (status = 200, description = "Options for the create form", body = ApiResponse<SizeTypeFormOptions>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn size_type_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SizeTypeFormOptions>>> {
    let resp = size_type_service::size_type_form(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/size-types",
    request_body = CreateSizeTypeRequest,
    responses(
        (status = 201, description = "Size type created", body = ApiResponse<SizeType>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn create_size_type(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateSizeTypeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<SizeType>>)> {
    let resp = size_type_service::create_size_type(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/size-types/{id}",
    params(("id" = Uuid, Path, description = "Size type id")),
    responses(
        (status = 200, description = "Size type detail", body = ApiResponse<SizeType>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Size type not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn get_size_type(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SizeType>>> {
    let resp = size_type_service::get_size_type(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/size-types/{id}/edit",
    params(("id" = Uuid, Path, description = "Size type id")),
    responses(
        (status = 200, description = "Size type with edit form options", body = ApiResponse<EditForm<SizeType, SizeTypeFormOptions>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size type not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn edit_size_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EditForm<SizeType, SizeTypeFormOptions>>>> {
    let resp = size_type_service::edit_size_type(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/size-types/{id}",
    params(("id" = Uuid, Path, description = "Size type id")),
    request_body = UpdateSizeTypeRequest,
    responses(
        (status = 200, description = "Size type updated", body = ApiResponse<SizeType>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size type not found"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn update_size_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSizeTypeRequest>,
) -> AppResult<Json<ApiResponse<SizeType>>> {
    let resp = size_type_service::update_size_type(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/size-types/{id}",
    params(("id" = Uuid, Path, description = "Size type id")),
    responses(
        (status = 200, description = "Size type deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size type not found"),
        (status = 422, description = "Size type is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn delete_size_type(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = size_type_service::delete_size_type(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/size-types/{id}/available",
    params(("id" = Uuid, Path, description = "Size type id")),
    responses(
        (status = 200, description = "Size type marked available", body = ApiResponse<SizeType>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size type not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn mark_size_type_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SizeType>>> {
    let resp = size_type_service::set_size_type_status(
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
    path = "/api/size-types/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Size type id")),
    responses(
        (status = 200, description = "Size type marked unavailable", body = ApiResponse<SizeType>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Size type not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Size Types"
)]
pub async fn mark_size_type_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<SizeType>>> {
    let resp = size_type_service::set_size_type_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}
