//! # Server Configuration
//!
//! This module contains the server setup and configuration for the inventory API.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Router,
    response::{IntoResponse, Response},
    routing::get,
};
use sea_orm::DatabaseConnection;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::repositories::{ProductoRepository, ProductoStore};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub productos: Arc<dyn ProductoStore>,
}

impl AppState {
    /// Builds the state around a SeaORM-backed product repository
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        Self {
            config: Arc::new(config),
            productos: Arc::new(ProductoRepository::new(Arc::new(db))),
        }
    }

    /// Builds the state around any product store
    pub fn with_store(config: AppConfig, productos: Arc<dyn ProductoStore>) -> Self {
        Self {
            config: Arc::new(config),
            productos,
        }
    }
}

fn panic_detail(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "panic with non-string payload".to_string()
    }
}

fn panic_handler(expose_details: bool) -> impl Fn(Box<dyn Any + Send + 'static>) -> Response + Clone {
    move |err| {
        let detail = panic_detail(err.as_ref());
        tracing::error!(panic = %detail, "Unhandled error in request handler");
        ApiError::internal("Error del servidor", detail, expose_details).into_response()
    }
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let expose_details = state.config.is_development();

    Router::new()
        .route("/", get(handlers::root))
        .route("/readyz", get(handlers::readyz))
        .route(
            "/api/productos",
            get(handlers::productos::list_productos).post(handlers::productos::create_producto),
        )
        .route("/api/productos/{id}", get(handlers::productos::get_producto))
        .route(
            "/api/inventario",
            get(handlers::inventario::resumen_inventario),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_handler(expose_details)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Starts the server with the given configuration
pub async fn run_server(config: AppConfig, db: DatabaseConnection) -> anyhow::Result<()> {
    let addr = config
        .bind_addr()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;
    let docs_url = config.docs_url();
    let profile = config.profile.clone();

    let app = create_app(AppState::new(config, db));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, %profile, "Server listening");
    tracing::info!(docs = %docs_url, "Swagger documentation available");

    axum::serve(listener, app).await?;

    Ok(())
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::readyz,
        crate::handlers::productos::list_productos,
        crate::handlers::productos::get_producto,
        crate::handlers::productos::create_producto,
        crate::handlers::inventario::resumen_inventario,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::Producto,
            crate::models::ResumenInventario,
            crate::models::ProductoStockBajo,
            crate::handlers::productos::CrearProductoRequest,
            crate::error::ApiError,
        )
    ),
    tags(
        (name = "Productos", description = "Gestión de productos textiles"),
        (name = "Inventario", description = "Resumen y estadísticas del inventario"),
    ),
    info(
        title = "API Sistema de Inventario Textil",
        description = "API REST para la gestión de inventario de una empresa textil",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
