//! Producto repository for database operations
//!
//! [`ProductoStore`] is the storage seam used by the HTTP handlers;
//! [`ProductoRepository`] implements it over SeaORM.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::sync::Arc;

use crate::db;
use crate::error::RepositoryError;
use crate::models::inventario::{ProductoStockBajo, ResumenInventario, format_valor_total};
use crate::models::producto::{self, Entity as ProductoEntity};

const LOW_STOCK_SQL: &str = "SELECT codigo, nombre, stock_actual, stock_minimo \
     FROM products WHERE stock_actual <= stock_minimo ORDER BY stock_actual ASC";

/// Validated input for a new product. Normalization happens in the handler.
#[derive(Debug, Clone, PartialEq)]
pub struct NuevoProducto {
    pub codigo: String,
    pub nombre: String,
    pub tipo_tela: Option<String>,
    pub color: Option<String>,
    pub precio: f64,
    pub stock_actual: i32,
    pub stock_minimo: i32,
}

/// Storage operations over the product catalogue
#[async_trait]
pub trait ProductoStore: Send + Sync {
    /// All products ordered by id ascending.
    async fn list(&self) -> Result<Vec<producto::Model>, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<producto::Model>, RepositoryError>;

    /// Inserts a product, returning the stored row with its generated id and
    /// creation timestamp. Fails with [`RepositoryError::CodigoDuplicado`]
    /// when the code is already taken.
    async fn create(&self, nuevo: NuevoProducto) -> Result<producto::Model, RepositoryError>;

    async fn inventory_summary(&self) -> Result<ResumenInventario, RepositoryError>;

    /// Round-trips to the backing store.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Repository for product database operations
#[derive(Debug, Clone)]
pub struct ProductoRepository {
    /// Database connection pool
    pub db: Arc<DatabaseConnection>,
}

impl ProductoRepository {
    /// Creates a new ProductoRepository instance
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    async fn count_all(&self) -> Result<u64, RepositoryError> {
        Ok(ProductoEntity::find().count(&*self.db).await?)
    }

    async fn count_low_stock(&self) -> Result<u64, RepositoryError> {
        let count = ProductoEntity::find()
            .filter(
                Expr::col(producto::Column::StockActual)
                    .lte(Expr::col(producto::Column::StockMinimo)),
            )
            .count(&*self.db)
            .await?;
        Ok(count)
    }

    async fn stock_value(&self) -> Result<Option<f64>, RepositoryError> {
        let total = ProductoEntity::find()
            .select_only()
            .column_as(
                SimpleExpr::from(Func::sum(
                    Expr::col(producto::Column::Precio).mul(Expr::col(producto::Column::StockActual)),
                )),
                "valor_total",
            )
            .into_tuple::<Option<f64>>()
            .one(&*self.db)
            .await?;
        Ok(total.flatten())
    }

    async fn low_stock_rows(&self) -> Result<Vec<ProductoStockBajo>, RepositoryError> {
        let rows = db::query(&*self.db, LOW_STOCK_SQL, Vec::new()).await?;
        rows.into_iter()
            .map(|row| serde_json::from_value(row).map_err(RepositoryError::from))
            .collect()
    }
}

#[async_trait]
impl ProductoStore for ProductoRepository {
    async fn list(&self) -> Result<Vec<producto::Model>, RepositoryError> {
        let productos = ProductoEntity::find()
            .order_by_asc(producto::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(productos)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<producto::Model>, RepositoryError> {
        Ok(ProductoEntity::find_by_id(id).one(&*self.db).await?)
    }

    async fn create(&self, nuevo: NuevoProducto) -> Result<producto::Model, RepositoryError> {
        let codigo = nuevo.codigo.clone();
        let active = producto::ActiveModel {
            codigo: Set(nuevo.codigo),
            nombre: Set(nuevo.nombre),
            tipo_tela: Set(nuevo.tipo_tela),
            color: Set(nuevo.color),
            precio: Set(nuevo.precio),
            stock_actual: Set(nuevo.stock_actual),
            stock_minimo: Set(nuevo.stock_minimo),
            fecha_creacion: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        active
            .insert(&*self.db)
            .await
            .map_err(|err| RepositoryError::from_insert(err, &codigo))
    }

    // The four reads are independent statements and may observe different
    // snapshots under concurrent writes.
    async fn inventory_summary(&self) -> Result<ResumenInventario, RepositoryError> {
        let total_productos = self.count_all().await?;
        let productos_stock_bajo = self.count_low_stock().await?;
        let valor_total = format_valor_total(self.stock_value().await?);
        let productos_con_stock_bajo = self.low_stock_rows().await?;

        Ok(ResumenInventario {
            total_productos,
            productos_stock_bajo,
            valor_total,
            productos_con_stock_bajo,
        })
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(db::health_check(&self.db).await?)
    }
}
