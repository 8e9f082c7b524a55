//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the inventory API.

pub mod inventario;
pub mod productos;
pub mod types;

use crate::error::ApiError;
use crate::models::ServiceInfo;
use crate::server::AppState;
use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    response::Json,
};
use serde_json::{Value, json};

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

/// Readiness probe, fails while the database is unreachable
#[utoipa::path(
    get,
    path = "/readyz",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Database unavailable", body = ApiError)
    ),
    tag = "root"
)]
pub async fn readyz(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.productos.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        ApiError::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "Base de datos no disponible",
        )
    })?;

    Ok(Json(json!({ "success": true, "status": "ready" })))
}

/// Fallback for unmatched routes
pub async fn not_found(
    State(state): State<AppState>,
    method: Method,
    OriginalUri(uri): OriginalUri,
) -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Endpoint no encontrado")
        .with_field("ruta", uri.to_string())
        .with_field("metodo", method.as_str())
        .with_field("documentacion", state.config.docs_url())
}
