//! Test utilities for database testing.
//!
//! This module provides utilities for setting up in-memory SQLite databases
//! with the products table created, and routers wired to them.

use anyhow::Result;
use axum::Router;
use inventario_textil::{
    config::AppConfig,
    db,
    repositories::{NuevoProducto, ProductoRepository},
    server::{AppState, create_app},
};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

/// Sets up an in-memory SQLite database with the products table.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;
    db::ensure_schema(&db).await?;
    Ok(db)
}

/// Sets up a repository over a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_repository() -> Result<ProductoRepository> {
    let db = setup_test_db().await?;
    Ok(ProductoRepository::new(Arc::new(db)))
}

/// Builds the full application router over a fresh in-memory database.
#[allow(dead_code)]
pub async fn setup_app() -> Result<(Router, DatabaseConnection)> {
    let db = setup_test_db().await?;
    let app = create_app(AppState::new(AppConfig::default(), db.clone()));
    Ok((app, db))
}

/// Product input with sensible defaults for the fields a test does not care about.
#[allow(dead_code)]
pub fn nuevo_producto(codigo: &str, precio: f64, stock_actual: i32, stock_minimo: i32) -> NuevoProducto {
    NuevoProducto {
        codigo: codigo.to_string(),
        nombre: format!("Tela {codigo}"),
        tipo_tela: Some("Algodón".to_string()),
        color: None,
        precio,
        stock_actual,
        stock_minimo,
    }
}
