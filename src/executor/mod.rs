//! Execution module
//!
//! This module contains the statement execution engine, predicate
//! evaluation, and the result types handed back to callers.

pub mod engine;
pub mod predicate;
pub mod result;

pub use engine::ExecutionEngine;
pub use predicate::evaluate;
pub use result::{Outcome, QueryTable};
