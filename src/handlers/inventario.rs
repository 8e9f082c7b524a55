//! # Inventario API Handlers

use axum::{extract::State, response::Json};

use crate::error::ApiError;
use crate::handlers::types::ApiResponse;
use crate::models::ResumenInventario;
use crate::server::AppState;

/// Aggregate stock statistics over the whole catalogue
#[utoipa::path(
    get,
    path = "/api/inventario",
    responses(
        (status = 200, description = "Resumen obtenido exitosamente", body = ApiResponse<ResumenInventario>),
        (status = 500, description = "Error interno del servidor", body = ApiError)
    ),
    tag = "Inventario"
)]
pub async fn resumen_inventario(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ResumenInventario>>, ApiError> {
    let resumen = state.productos.inventory_summary().await.map_err(|e| {
        tracing::error!(error = %e, "Error al obtener inventario");
        ApiError::internal("Error al obtener inventario", &e, state.config.is_development())
    })?;

    Ok(Json(
        ApiResponse::new("Resumen de inventario obtenido correctamente", resumen).with_timestamp(),
    ))
}
