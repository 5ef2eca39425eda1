use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::{
        forms::{MovementFormOptions, XlsxFile},
        stock::CreateMovementRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::StockMovement,
    response::ApiResponse,
    routes::{params::MovementQuery, products::xlsx_download},
    services::stock_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_movements).post(create_movement))
        .route("/create", get(movement_form))
        .route("/export", get(export_movements))
        .route("/{id}", get(get_movement))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements",
    params(MovementQuery),
    responses(
        (status = 200, description = "Paginated stock ledger", body = ApiResponse<Vec<StockMovement>>),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "date_from is after date_to"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock Movements"
)]
pub async fn list_movements(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<Json<ApiResponse<Vec<StockMovement>>>> {
    let resp = stock_service::list_movements(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements/create",
    responses(
        (status = 200, description = "Products and movement types for the form", body = ApiResponse<MovementFormOptions>),
        (status = 401, description = "Unauthenticated"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock Movements"
)]
pub async fn movement_form(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<MovementFormOptions>>> {
    let resp = stock_service::movement_form(&state).await?;
    Ok(Json(resp))
}

// Every role may record stock; Staff exist for exactly this.
#[utoipa::path(
    post,
    path = "/api/stock-movements",
    request_body = CreateMovementRequest,
    responses(
        (status = 201, description = "Movement applied and recorded", body = ApiResponse<StockMovement>),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "Invalid quantity, unknown variant or insufficient stock"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock Movements"
)]
pub async fn create_movement(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMovementRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<StockMovement>>)> {
    let resp = stock_service::create_movement(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements/export",
    params(MovementQuery),
    responses(
        (status = 200, description = "Filtered ledger as an Excel workbook",
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            body = XlsxFile),
        (status = 401, description = "Unauthenticated"),
        (status = 422, description = "date_from is after date_to"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock Movements"
)]
pub async fn export_movements(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MovementQuery>,
) -> AppResult<impl IntoResponse> {
    let (file_name, bytes) = stock_service::export_movements(&state, query).await?;
    Ok(xlsx_download(file_name, bytes))
}

#[utoipa::path(
    get,
    path = "/api/stock-movements/{id}",
    params(("id" = Uuid, Path, description = "Stock movement id")),
    responses(
        (status = 200, description = "Stock movement detail", body = ApiResponse<StockMovement>),
        (status = 401, description = "Unauthenticated"),
        (status = 404, description = "Stock movement not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stock Movements"
)]
pub async fn get_movement(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<StockMovement>>> {
    let resp = stock_service::get_movement(&state, id).await?;
    Ok(Json(resp))
}
