//! # Inventario Textil Library
//!
//! This library provides the core functionality for the textile inventory
//! service: the REST API, its storage layer, and a typed client.

pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod seeds;
pub mod server;
pub mod telemetry;
