//! # Productos API Handlers
//!
//! Listing, lookup and creation of products.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::error::{ApiError, RepositoryError};
use crate::handlers::types::ApiResponse;
use crate::models::Producto;
use crate::repositories::NuevoProducto;
use crate::server::AppState;

/// `stock_actual` used when the field is absent or not a number
pub const DEFAULT_STOCK_ACTUAL: i32 = 0;
/// `stock_minimo` used when the field is absent or not a number
pub const DEFAULT_STOCK_MINIMO: i32 = 5;

const REQUIRED_FIELDS: [&str; 3] = ["codigo", "nombre", "precio"];

/// Request body for creating a product
///
/// Numeric fields accept either JSON numbers or numeric strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "codigo": "TEL005",
    "nombre": "Algodón Azul Cielo",
    "tipo_tela": "Algodón",
    "color": "Azul Cielo",
    "precio": 28.50,
    "stock_actual": 75,
    "stock_minimo": 15
}))]
pub struct CrearProductoRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tipo_tela: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Price per metre, must be greater than 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<f64>)]
    pub precio: Option<Value>,
    /// Defaults to 0
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub stock_actual: Option<Value>,
    /// Defaults to 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i32>)]
    pub stock_minimo: Option<Value>,
}

impl CrearProductoRequest {
    /// Validates the request and produces the normalized insert.
    ///
    /// Checks run in order: required fields, numeric price, positive price.
    pub fn normalize(self) -> Result<NuevoProducto, ApiError> {
        let codigo = non_blank(self.codigo.as_deref());
        let nombre = non_blank(self.nombre.as_deref());
        let precio_presente = self.precio.as_ref().is_some_and(is_truthy);

        let (Some(codigo), Some(nombre), true) = (codigo, nombre, precio_presente) else {
            return Err(
                ApiError::validation("Los campos código, nombre y precio son obligatorios")
                    .with_field("camposRequeridos", json!(REQUIRED_FIELDS)),
            );
        };

        let precio = self
            .precio
            .as_ref()
            .and_then(as_number)
            .ok_or_else(|| ApiError::validation("El precio debe ser un número válido"))?;
        if precio <= 0.0 {
            return Err(ApiError::validation("El precio debe ser mayor a 0"));
        }

        Ok(NuevoProducto {
            codigo: codigo.to_uppercase(),
            nombre: nombre.to_string(),
            tipo_tela: non_blank(self.tipo_tela.as_deref()).map(str::to_string),
            color: non_blank(self.color.as_deref()).map(str::to_string),
            precio,
            stock_actual: stock_or(self.stock_actual.as_ref(), DEFAULT_STOCK_ACTUAL),
            stock_minimo: stock_or(self.stock_minimo.as_ref(), DEFAULT_STOCK_MINIMO),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Leading-integer coercion: `"12abc"` is 12, `7.9` is 7, `"abc"` is `None`.
fn as_integer(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).ok();
            }
            let truncated = n.as_f64()?.trunc();
            (truncated >= i32::MIN as f64 && truncated <= i32::MAX as f64)
                .then_some(truncated as i32)
        }
        Value::String(s) => {
            let s = s.trim_start();
            let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
            let digits = unsigned
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(unsigned.len());
            if digits == 0 {
                return None;
            }
            let sign_len = s.len() - unsigned.len();
            s[..sign_len + digits].parse::<i32>().ok()
        }
        _ => None,
    }
}

/// A zero or unparseable stock value falls back to `default`.
fn stock_or(value: Option<&Value>, default: i32) -> i32 {
    value
        .and_then(as_integer)
        .filter(|v| *v != 0)
        .unwrap_or(default)
}

fn storage_error(state: &AppState, message: &str, error: RepositoryError) -> ApiError {
    tracing::error!(error = %error, "{}", message);
    ApiError::internal(message, &error, state.config.is_development())
}

/// List every product ordered by id
#[utoipa::path(
    get,
    path = "/api/productos",
    responses(
        (status = 200, description = "Lista de productos obtenida exitosamente", body = ApiResponse<Vec<Producto>>),
        (status = 500, description = "Error interno del servidor", body = ApiError)
    ),
    tag = "Productos"
)]
pub async fn list_productos(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Producto>>>, ApiError> {
    let productos = state
        .productos
        .list()
        .await
        .map_err(|e| storage_error(&state, "Error al obtener productos", e))?;

    Ok(Json(ApiResponse::list(
        "Productos obtenidos desde la base de datos",
        productos,
    )))
}

/// Fetch one product by its id
#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    params(
        ("id" = i32, Path, description = "ID único del producto", example = 1)
    ),
    responses(
        (status = 200, description = "Producto encontrado exitosamente", body = ApiResponse<Producto>),
        (status = 400, description = "ID inválido", body = ApiError),
        (status = 404, description = "Producto no encontrado", body = ApiError),
        (status = 500, description = "Error interno del servidor", body = ApiError)
    ),
    tag = "Productos"
)]
pub async fn get_producto(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ApiResponse<Producto>>, ApiError> {
    let id: i32 = raw_id
        .parse()
        .map_err(|_| ApiError::validation("ID debe ser un número válido"))?;

    let producto = state
        .productos
        .find_by_id(id)
        .await
        .map_err(|e| storage_error(&state, "Error al obtener producto", e))?
        .ok_or_else(|| ApiError::not_found(id))?;

    Ok(Json(ApiResponse::new("Producto encontrado", producto)))
}

/// Register a new product
#[utoipa::path(
    post,
    path = "/api/productos",
    request_body = CrearProductoRequest,
    responses(
        (status = 201, description = "Producto creado exitosamente", body = ApiResponse<Producto>),
        (status = 400, description = "Datos inválidos o código duplicado", body = ApiError),
        (status = 500, description = "Error interno del servidor", body = ApiError)
    ),
    tag = "Productos"
)]
pub async fn create_producto(
    State(state): State<AppState>,
    body: Result<Json<CrearProductoRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Producto>>), ApiError> {
    let Json(request) = body?;
    let nuevo = request.normalize()?;

    match state.productos.create(nuevo).await {
        Ok(producto) => {
            tracing::info!(id = producto.id, codigo = %producto.codigo, "Producto creado");
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::new(
                    "Producto creado exitosamente en la base de datos",
                    producto,
                )),
            ))
        }
        Err(RepositoryError::CodigoDuplicado { codigo }) => {
            tracing::warn!(%codigo, "Código de producto duplicado");
            Err(ApiError::duplicate_code())
        }
        Err(e) => Err(storage_error(&state, "Error al crear producto", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: Value) -> CrearProductoRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_normalize_trims_and_uppercases() {
        let nuevo = request(json!({
            "codigo": "  tel005 ",
            "nombre": " Algodón Azul ",
            "tipo_tela": "   ",
            "color": " Azul ",
            "precio": 28.5,
            "stock_actual": 75,
            "stock_minimo": 15
        }))
        .normalize()
        .unwrap();

        assert_eq!(nuevo.codigo, "TEL005");
        assert_eq!(nuevo.nombre, "Algodón Azul");
        assert_eq!(nuevo.tipo_tela, None);
        assert_eq!(nuevo.color.as_deref(), Some("Azul"));
        assert_eq!(nuevo.precio, 28.5);
        assert_eq!(nuevo.stock_actual, 75);
        assert_eq!(nuevo.stock_minimo, 15);
    }

    #[test]
    fn test_normalize_applies_stock_defaults() {
        let nuevo = request(json!({"codigo": "A1", "nombre": "Lino", "precio": "12.5"}))
            .normalize()
            .unwrap();
        assert_eq!(nuevo.precio, 12.5);
        assert_eq!(nuevo.stock_actual, DEFAULT_STOCK_ACTUAL);
        assert_eq!(nuevo.stock_minimo, DEFAULT_STOCK_MINIMO);

        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1,
            "stock_actual": "abc", "stock_minimo": null
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_actual, 0);
        assert_eq!(nuevo.stock_minimo, 5);
    }

    #[test]
    fn test_zero_minimum_falls_back_to_default() {
        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1, "stock_minimo": 0
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_minimo, DEFAULT_STOCK_MINIMO);

        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1, "stock_minimo": "0"
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_minimo, DEFAULT_STOCK_MINIMO);
    }

    #[test]
    fn test_stock_strings_use_leading_integer() {
        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1,
            "stock_actual": "12abc", "stock_minimo": "-3 unidades"
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_actual, 12);
        assert_eq!(nuevo.stock_minimo, -3);

        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1,
            "stock_actual": "x12", "stock_minimo": "-"
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_actual, DEFAULT_STOCK_ACTUAL);
        assert_eq!(nuevo.stock_minimo, DEFAULT_STOCK_MINIMO);
    }

    #[test]
    fn test_numeric_strings_and_fractions_for_stock() {
        let nuevo = request(json!({
            "codigo": "A1", "nombre": "Lino", "precio": 1,
            "stock_actual": " 40 ", "stock_minimo": 7.9
        }))
        .normalize()
        .unwrap();
        assert_eq!(nuevo.stock_actual, 40);
        assert_eq!(nuevo.stock_minimo, 7);
    }

    #[test]
    fn test_missing_required_fields() {
        for body in [
            json!({"nombre": "Lino", "precio": 10}),
            json!({"codigo": "A1", "precio": 10}),
            json!({"codigo": "A1", "nombre": "Lino"}),
            json!({"codigo": "   ", "nombre": "Lino", "precio": 10}),
            json!({"codigo": "A1", "nombre": "Lino", "precio": 0}),
            json!({"codigo": "A1", "nombre": "Lino", "precio": ""}),
        ] {
            let err = request(body).normalize().unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
            assert_eq!(err.extra["camposRequeridos"], json!(REQUIRED_FIELDS));
        }
    }

    #[test]
    fn test_invalid_and_non_positive_price() {
        let err = request(json!({"codigo": "A1", "nombre": "Lino", "precio": "diez"}))
            .normalize()
            .unwrap_err();
        assert_eq!(err.message.as_ref(), "El precio debe ser un número válido");

        let err = request(json!({"codigo": "A1", "nombre": "Lino", "precio": -3}))
            .normalize()
            .unwrap_err();
        assert_eq!(err.message.as_ref(), "El precio debe ser mayor a 0");

        let err = request(json!({"codigo": "A1", "nombre": "Lino", "precio": "0"}))
            .normalize()
            .unwrap_err();
        assert_eq!(err.message.as_ref(), "El precio debe ser mayor a 0");
    }
}
