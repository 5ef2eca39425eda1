use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        warehouse::{CreateLocationRequest, UpdateLocationRequest},
        forms::{EditForm, LocationFormOptions},
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Location, RecordStatus},
    response::ApiResponse,
    routes::params::ListQuery,
    services::location_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locations).post(create_location))
        .route("/create", get(location_form))
        .route("/{id}", get(get_location).put(update_location).delete(delete_location))
        .route("/{id}/edit", get(edit_location))
        .route("/{id}/available", patch(mark_location_available))
        .route("/{id}/unavailable", patch(mark_location_unavailable))
}

#[utoipa::path(
    get,
    path = "/api/locations",
    params(ListQuery),
    responses(
        (status = 200, description = "Paginated location list", body = ApiResponse<Vec<Location>>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn list_locations(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Location>>>> {
    let resp = location_service::list_locations(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/locations/create",
    responses(
        (status = 200, description = "Options for the create form", body = ApiResponse<LocationFormOptions>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn location_form(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<LocationFormOptions>>> {
    let resp = location_service::location_form(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/locations",
    request_body = CreateLocationRequest,
    responses(
        (status = 201, description = "Location created", body = ApiResponse<Location>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 422, description = "Validation failed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn create_location(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateLocationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Location>>)> {
    let resp = location_service::create_location(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location detail", body = ApiResponse<Location>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn get_location(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let resp = location_service::get_location(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/locations/{id}/edit",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location with edit form options", body = ApiResponse<EditForm<Location, LocationFormOptions>>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn edit_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<EditForm<Location, LocationFormOptions>>>> {
    let resp = location_service::edit_location(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    request_body = UpdateLocationRequest,
    responses(
        (status = 200, description = "Location updated", body = ApiResponse<Location>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
        (status = 422, description = "Validation failed or pair still used by products"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn update_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let resp = location_service::update_location(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/locations/{id}",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location deleted"),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
        (status = 422, description = "Location is still referenced"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn delete_location(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = location_service::delete_location(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/locations/{id}/available",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location marked available", body = ApiResponse<Location>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn mark_location_available(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let resp = location_service::set_location_status(
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
    path = "/api/locations/{id}/unavailable",
    params(("id" = Uuid, Path, description = "Location id")),
    responses(
        (status = 200, description = "Location marked unavailable", body = ApiResponse<Location>),
        (status = 401, description = "Unauthenticated"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Location not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Locations"
)]
pub async fn mark_location_unavailable(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Location>>> {
    let resp = location_service::set_location_status(
        &state,
        &user,
        id,
        RecordStatus::Unavailable,
    )
    .await?;
    Ok(Json(resp))
}
