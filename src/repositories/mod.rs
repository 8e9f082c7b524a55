//! # Repository Layer
//!
//! Repository implementations that encapsulate SeaORM operations for the
//! product catalogue behind the [`ProductoStore`] seam.

pub mod producto;

pub use producto::{NuevoProducto, ProductoRepository, ProductoStore};
