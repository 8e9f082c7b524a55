//! Database connection, schema bootstrap and raw query access.
//!
//! The pool is built lazily so that an unreachable database does not stop the
//! service from starting; [`test_connection`] reports reachability instead.

use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, FromQueryResult,
    JsonValue, Schema, Statement, Value,
};
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::producto;

/// Errors that can occur during database setup.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {source}")]
    ConnectionFailed {
        #[from]
        source: DbErr,
    },
    #[error("Invalid database configuration: {message}")]
    InvalidConfiguration { message: String },
}

/// Builds the connection pool described by `cfg`.
///
/// Connections are opened on first use, so this only fails on configuration
/// problems (empty or unsupported URL).
///
/// # Examples
///
/// ```no_run
/// use inventario_textil::{config::AppConfig, db::init_pool};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = AppConfig::default();
///     let db = init_pool(&config).await?;
///     let reachable = inventario_textil::db::test_connection(&db).await;
///     println!("database reachable: {reachable}");
///     Ok(())
/// }
/// ```
pub async fn init_pool(cfg: &AppConfig) -> Result<DatabaseConnection> {
    if cfg.database_url.trim().is_empty() {
        return Err(DatabaseError::InvalidConfiguration {
            message: "Database URL cannot be empty".to_string(),
        }
        .into());
    }

    let mut opt = ConnectOptions::new(&cfg.database_url);
    opt.max_connections(cfg.db_max_connections)
        .acquire_timeout(Duration::from_millis(cfg.db_acquire_timeout_ms))
        .idle_timeout(Duration::from_secs(600)) // 10 minutes
        .max_lifetime(Duration::from_secs(1800)) // 30 minutes
        .connect_lazy(true)
        .sqlx_logging(true)
        .sqlx_logging_level(log::LevelFilter::Debug);

    let conn = Database::connect(opt)
        .await
        .map_err(|source| DatabaseError::ConnectionFailed { source })?;

    Ok(conn)
}

/// Acquires one connection and releases it, reporting whether that worked.
///
/// Only used for startup diagnostics; a `false` result is not fatal.
pub async fn test_connection(db: &DatabaseConnection) -> bool {
    match db.ping().await {
        Ok(()) => {
            log::info!("Connected to database");
            true
        }
        Err(e) => {
            log::error!("Error connecting to database: {}", e);
            false
        }
    }
}

/// Creates the `products` table from the entity definition when missing.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let mut table = Schema::new(backend).create_table_from_entity(producto::Entity);
    table.if_not_exists();

    db.execute(backend.build(&table)).await?;
    Ok(())
}

/// Runs `sql` with the ordered bind `values` and returns each row as a JSON
/// object keyed by column name.
///
/// Placeholders must use the syntax of the connected backend (`$1` for
/// Postgres, `?` for SQLite). Database errors are returned unchanged.
pub async fn query<C>(db: &C, sql: &str, values: Vec<Value>) -> Result<Vec<JsonValue>, DbErr>
where
    C: ConnectionTrait,
{
    let stmt = Statement::from_sql_and_values(db.get_database_backend(), sql, values);

    JsonValue::find_by_statement(stmt)
        .all(db)
        .await
        .inspect_err(|error| tracing::error!(%error, sql, "query failed"))
}

/// Health check for the database connection, backing `/readyz`.
pub async fn health_check(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());

    db.query_one(stmt)
        .await
        .inspect_err(|error| tracing::warn!(%error, "database health check failed"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        ensure_schema(&db).await.unwrap();
        db
    }

    #[test]
    fn test_invalid_database_url() {
        let config = AppConfig {
            database_url: "".to_string(),
            ..Default::default()
        };

        let rt = tokio::runtime::Runtime::new().unwrap();
        let result = rt.block_on(init_pool(&config));

        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err().downcast::<DatabaseError>(),
            Ok(DatabaseError::InvalidConfiguration { .. })
        ));
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let db = memory_db().await;
        ensure_schema(&db).await.unwrap();

        let rows = query(&db, "SELECT codigo FROM products", Vec::new())
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_query_binds_values_and_returns_named_columns() {
        let db = memory_db().await;
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "INSERT INTO products (codigo, nombre, precio, stock_actual, stock_minimo, fecha_creacion) \
             VALUES ('TEL001', 'Algodón', 25.5, 10, 5, '2024-01-15T10:30:00+00:00')"
                .to_string(),
        ))
        .await
        .unwrap();

        let rows = query(
            &db,
            "SELECT codigo, stock_actual FROM products WHERE codigo = ?",
            vec![Value::from("TEL001")],
        )
        .await
        .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["codigo"], "TEL001");
        assert_eq!(rows[0]["stock_actual"], 10);
    }

    #[tokio::test]
    async fn test_query_propagates_database_errors() {
        let db = memory_db().await;
        let result = query(&db, "SELECT * FROM missing_table", Vec::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connection_probe_and_health_check() {
        let db = memory_db().await;
        assert!(test_connection(&db).await);
        assert!(health_check(&db).await.is_ok());
    }
}
