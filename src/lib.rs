//! RelDB - a small in-memory relational statement execution engine
//!
//! This library provides the core components of the engine:
//! - Parsed statement tree (AST)
//! - In-memory storage (rows, tables, constraint enforcement)
//! - Statement execution (engine, predicates, result sets)
//! - System catalog with an optional persistence hook
//!
//! SQL text parsing is out of scope; callers hand the engine
//! already-structured statements and a per-session context.

pub mod catalog;
pub mod error;
pub mod executor;
pub mod session;
pub mod sql;
pub mod storage;

pub use catalog::{Catalog, CatalogPersistence, JsonPersistence, NullPersistence};
pub use error::{Error, Result};
pub use executor::{ExecutionEngine, Outcome, QueryTable};
pub use session::Session;
pub use sql::Statement;
pub use storage::{Cell, Row, Table};
