//! Sample catalogue seeding
//!
//! Inserts a small set of textile products so a fresh database has something
//! to list. Codes that already exist are skipped, so seeding is idempotent.

use anyhow::Result;

use crate::error::RepositoryError;
use crate::repositories::{NuevoProducto, ProductoStore};

fn muestra(
    codigo: &str,
    nombre: &str,
    tipo_tela: &str,
    color: &str,
    precio: f64,
    stock_actual: i32,
    stock_minimo: i32,
) -> NuevoProducto {
    NuevoProducto {
        codigo: codigo.to_string(),
        nombre: nombre.to_string(),
        tipo_tela: Some(tipo_tela.to_string()),
        color: Some(color.to_string()),
        precio,
        stock_actual,
        stock_minimo,
    }
}

/// The sample catalogue
pub fn sample_productos() -> Vec<NuevoProducto> {
    vec![
        muestra("TEL001", "Algodón Blanco Premium", "Algodón", "Blanco", 25.50, 100, 10),
        muestra("TEL002", "Poliéster Azul Marino", "Poliéster", "Azul Marino", 18.75, 50, 15),
        muestra("TEL003", "Seda Rosa Natural", "Seda", "Rosa", 45.00, 3, 5),
    ]
}

/// Seeds the sample catalogue, returning how many products were inserted
pub async fn seed_productos(store: &dyn ProductoStore) -> Result<usize> {
    let mut created = 0;

    for producto in sample_productos() {
        let codigo = producto.codigo.clone();
        match store.create(producto).await {
            Ok(_) => {
                log::info!("Created sample product: {}", codigo);
                created += 1;
            }
            Err(RepositoryError::CodigoDuplicado { .. }) => {
                log::info!("Product '{}' already exists, skipping", codigo);
            }
            Err(e) => {
                log::error!("Failed to create sample product '{}': {}", codigo, e);
                return Err(e.into());
            }
        }
    }

    Ok(created)
}
