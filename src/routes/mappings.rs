use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        catalog::{CreateMappingRequest, UpdateMappingRequest},
        forms::{EditForm, MappingFormOptions},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Mapping, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::mapping_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_mappings).post(create_mapping))
        .route("/create", get(mapping_form))
        .route("/{id}", get(get_mapping).put(update_mapping).delete(delete_mapping))
        .route("/{id}/edit", get(edit_mapping))
        .route("/{id}/available", patch(mark_mapping_available))
        .route("/{id}/unavailable", patch(mark_mapping_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/mappings",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated mapping list", body = ApiResponse<Vec<Mapping>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn list_mappings(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Mapping>>>> {
    let resp = mapping_service::list_mappings(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mappings/create",
    responses(
        (status = 200, description = "Options for the create form", body = ApiResponse<MappingFormOptions>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn mapping_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<MappingFormOptions>>> {
    let resp = mapping_service::mapping_form(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/mappings",
    request_body = CreateMappingRequest,
    responses(
        (status = 201, description = "Mapping created", body = ApiResponse<Mapping>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn create_mapping(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMappingRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Mapping>>)> {
    let resp = mapping_service::create_mapping(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/mappings/{id}",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 200, description = "Mapping detail", body = ApiResponse<Mapping>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Mapping not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn get_mapping(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Mapping>>> {
    let resp = mapping_service::get_mapping(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/mappings/{id}/edit",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 200, description = "Mapping with edit form options", body = ApiResponse<EditForm<Mapping, MappingFormOptions>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Mapping not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn edit_mapping(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EditForm<Mapping, MappingFormOptions>>>> {
    let resp = mapping_service::edit_mapping(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/mappings/{id}",
    params(("id" = Uuid, Path, description = "Mapping id")),
    request_body = UpdateMappingRequest,
    responses(
        (status = 200, description = "Mapping updated", body = ApiResponse<Mapping>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Mapping not found"),
        (status = 422, description = "Validation failed or pair still used by products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn update_mapping(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMappingRequest>,
) -> AppResult<Json<ApiResponse<Mapping>>> {
    let resp = mapping_service::update_mapping(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/mappings/{id}",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 200, description = "Mapping deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Mapping not found"),
        (status = 422, description = "Mapping is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn delete_mapping(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = mapping_service::delete_mapping(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/mappings/{id}/available",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 200, description = "Mapping marked available", body = ApiResponse<Mapping>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Mapping not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn mark_mapping_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Mapping>>> {
    let resp = mapping_service::set_mapping_status(
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
    path = "/api/mappings/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Mapping id")),
    responses(
        (status = 200, description = "Mapping marked unavailable", body = ApiResponse<Mapping>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Mapping not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Mappings"
)]
pub async fn mark_mapping_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Mapping>>> {
    let resp = mapping_service::set_mapping_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}
