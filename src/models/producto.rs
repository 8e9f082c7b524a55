//! Producto entity model
//!
//! SeaORM entity for the `products` table. The model doubles as the wire
//! representation returned by the API, so it also derives serde and the
//! OpenAPI schema.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One textile item in the inventory
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "products")]
#[schema(as = Producto)]
pub struct Model {
    /// Generated identifier
    #[sea_orm(primary_key)]
    #[schema(example = 1)]
    pub id: i32,

    /// Unique product code, stored upper-cased
    #[sea_orm(unique)]
    #[schema(example = "TEL001")]
    pub codigo: String,

    #[schema(example = "Algodón Blanco Premium")]
    pub nombre: String,

    /// Fabric type, e.g. "Algodón"
    #[schema(example = "Algodón")]
    pub tipo_tela: Option<String>,

    #[schema(example = "Blanco")]
    pub color: Option<String>,

    /// Price per metre in soles
    #[sea_orm(column_type = "Double")]
    #[schema(example = 25.5)]
    pub precio: f64,

    #[schema(example = 100)]
    pub stock_actual: i32,

    #[schema(example = 10)]
    pub stock_minimo: i32,

    #[schema(value_type = String, format = DateTime)]
    pub fecha_creacion: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stock is at or below the configured minimum.
    pub fn stock_bajo(&self) -> bool {
        self.stock_actual <= self.stock_minimo
    }
}
