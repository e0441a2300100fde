//! Catalog module
//!
//! This module contains the system catalog, schema definitions, data
//! types, and the catalog persistence hook.

pub mod catalog;
pub mod persist;
pub mod schema;
pub mod types;

pub use catalog::{Catalog, Database};
pub use persist::{CatalogPersistence, JsonPersistence, NullPersistence};
pub use schema::{Column, Schema};
pub use types::DataType;
