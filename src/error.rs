//! # Error Handling
//!
//! Unified error handling for the inventory API. Every failure is rendered as
//! the `{success: false, message, error}` envelope with the matching status.

use std::fmt::Display;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use utoipa::ToSchema;

/// Error tag for request validation failures
pub const VALIDATION_FAILED: &str = "VALIDACION_FALLIDA";
/// Error tag for a product code that already exists
pub const DUPLICATE_CODE: &str = "CODIGO_DUPLICADO";
/// Error tag for an unknown product id
pub const PRODUCT_NOT_FOUND: &str = "PRODUCTO_NO_ENCONTRADO";
/// Error text returned instead of internal details outside development
pub const GENERIC_INTERNAL_ERROR: &str = "Error interno";

/// Error envelope returned by every failing endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiError {
    /// HTTP status code for the response
    #[serde(skip)]
    pub status: StatusCode,
    /// Always `false` for errors
    #[schema(example = false)]
    pub success: bool,
    /// Human-readable error message
    #[schema(example = "Producto con ID 42 no encontrado")]
    pub message: Box<str>,
    /// Machine-readable tag, or error detail for internal errors
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "PRODUCTO_NO_ENCONTRADO")]
    pub error: Option<Box<str>>,
    /// Route-specific top-level fields (e.g. `camposRequeridos`)
    #[serde(skip)]
    pub extra: Map<String, Value>,
}

impl ApiError {
    /// Create a new API error with the given status code and message
    pub fn new<S: Into<String>>(status: StatusCode, message: S) -> Self {
        Self {
            status,
            success: false,
            message: message.into().into_boxed_str(),
            error: None,
            extra: Map::new(),
        }
    }

    /// Set the `error` field
    pub fn with_error<S: Into<String>>(mut self, error: S) -> Self {
        self.error = Some(error.into().into_boxed_str());
        self
    }

    /// Add a top-level field to the envelope
    pub fn with_field<V: Into<Value>>(mut self, key: &str, value: V) -> Self {
        self.extra.insert(key.to_string(), value.into());
        self
    }

    /// 400 for a request that failed validation
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message).with_error(VALIDATION_FAILED)
    }

    /// 404 for an unknown product id
    pub fn not_found(id: i32) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            format!("Producto con ID {} no encontrado", id),
        )
        .with_error(PRODUCT_NOT_FOUND)
    }

    /// 400 for a product code that is already registered
    pub fn duplicate_code() -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "El código del producto ya existe en el sistema",
        )
        .with_error(DUPLICATE_CODE)
    }

    /// 500 whose detail is only exposed when `expose_details` is set
    pub fn internal<S: Into<String>>(message: S, detail: impl Display, expose_details: bool) -> Self {
        let error = if expose_details {
            detail.to_string()
        } else {
            GENERIC_INTERNAL_ERROR.to_string()
        };
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_error(error)
    }

    fn to_body(&self) -> Value {
        let mut body = serde_json::to_value(self).unwrap_or_else(|_| {
            serde_json::json!({ "success": false, "message": self.message.as_ref() })
        });
        if let Value::Object(map) = &mut body {
            for (key, value) in &self.extra {
                map.insert(key.clone(), value.clone());
            }
        }
        body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, axum::Json(self.to_body())).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let message = match rejection {
            JsonRejection::JsonDataError(err) => format!("JSON inválido: {}", err.body_text()),
            JsonRejection::JsonSyntaxError(err) => {
                format!("Error de sintaxis JSON: {}", err.body_text())
            }
            JsonRejection::MissingJsonContentType(_) => {
                "Falta la cabecera 'Content-Type: application/json'".to_string()
            }
            _ => "Cuerpo de la petición inválido".to_string(),
        };

        Self::validation(message)
    }
}

/// Errors raised by the storage layer
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("product code '{codigo}' already exists")]
    CodigoDuplicado { codigo: String },
    #[error("database error: {0}")]
    Database(#[from] DbErr),
    #[error("failed to decode row: {0}")]
    RowDecode(#[from] serde_json::Error),
}

impl RepositoryError {
    /// Maps an insert failure, recognising unique violations on `codigo`.
    pub fn from_insert(error: DbErr, codigo: &str) -> Self {
        if is_unique_violation(&error) {
            tracing::debug!(?error, codigo, "Unique constraint violation detected");
            return Self::CodigoDuplicado {
                codigo: codigo.to_string(),
            };
        }
        Self::Database(error)
    }
}

fn is_unique_violation(error: &DbErr) -> bool {
    const PG_UNIQUE: &str = "23505";
    const SQLITE_DUPLICATE_CODES: &[&str] = &["1555", "2067"];

    let runtime_err = match error {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_err))
        | DbErr::Exec(RuntimeErr::SqlxError(sqlx_err)) => sqlx_err,
        _ => return false,
    };

    let Some(db_error) = runtime_err.as_database_error() else {
        return false;
    };

    if db_error.is_unique_violation() {
        return true;
    }

    db_error.code().is_some_and(|code| {
        let code = code.as_ref();
        code == PG_UNIQUE || SQLITE_DUPLICATE_CODES.contains(&code)
    })
}
