use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{StatusCode, Uri},
    routing::get,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};

use crate::{response::ApiResponse, state::AppState};

pub mod auth;
pub mod brands;
pub mod categories;
pub mod colors;
pub mod doc;
pub mod genders;
pub mod health;
pub mod locations;
pub mod mappings;
pub mod params;
pub mod products;
pub mod racks;
pub mod size_types;
pub mod sizes;
pub mod stock_movements;
pub mod subcategories;
pub mod users;
pub mod zones;

/// Room for multipart boundaries and headers on top of the image itself.
const BODY_OVERHEAD: usize = 64 * 1024;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/brands", brands::router())
        .nest("/categories", categories::router())
        .nest("/subcategories", subcategories::router())
        .nest("/mappings", mappings::router())
        .nest("/colors", colors::router())
        .nest("/genders", genders::router())
        .nest("/zones", zones::router())
        .nest("/racks", racks::router())
        .nest("/locations", locations::router())
        .nest("/sizes", sizes::router())
        .nest("/size-types", size_types::router())
        .nest("/products", products::router())
        .nest("/stock-movements", stock_movements::router())
        .nest("/users", users::router())
}

/// The whole application minus the tracing and request-id layers, which the
/// binary adds on top.
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_OVERHEAD;
    let assets = ServeDir::new(state.config.public_dir.join("assets"));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .nest_service("/assets", assets)
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(ConcurrencyLimitLayer::new(100))
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse {
        success: false,
        message: "Not Found".to_string(),
        data: Some(serde_json::json!({ "path": uri.path() })),
        meta: None,
    };
    (StatusCode::NOT_FOUND, Json(body))
}
