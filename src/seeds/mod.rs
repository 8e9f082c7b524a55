//! Database seeding functionality
//!
//! This module provides functionality to seed the database with initial data
//! when the application starts with seeding enabled.

pub mod productos;

pub use productos::seed_productos;
