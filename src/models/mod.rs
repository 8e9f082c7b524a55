//! # Data Models
//!
//! Entity and view types shared by the API, the repository layer and the client.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod inventario;
pub mod producto;

pub use inventario::{ProductoStockBajo, ResumenInventario};
pub use producto::Entity as ProductoEntity;
pub use producto::Model as Producto;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "inventario-textil".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
