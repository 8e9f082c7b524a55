//! Aggregate inventory view types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Inventory summary over every product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenInventario {
    /// Total number of registered products
    #[schema(example = 5)]
    pub total_productos: u64,
    /// Products whose stock is at or below their minimum
    #[schema(example = 2)]
    pub productos_stock_bajo: u64,
    /// Sum of precio * stock_actual, two decimals
    #[schema(example = "15250.75")]
    pub valor_total: String,
    /// Low-stock products, lowest stock first
    pub productos_con_stock_bajo: Vec<ProductoStockBajo>,
}

/// Low-stock row of the inventory summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductoStockBajo {
    #[schema(example = "TEL003")]
    pub codigo: String,
    #[schema(example = "Seda Rosa Natural")]
    pub nombre: String,
    #[schema(example = 3)]
    pub stock_actual: i32,
    #[schema(example = 5)]
    pub stock_minimo: i32,
}

/// Formats the stock value with exactly two decimals, `"0.00"` when absent.
pub fn format_valor_total(valor: Option<f64>) -> String {
    format!("{:.2}", valor.unwrap_or(0.0))
}
