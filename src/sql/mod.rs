//! Parsed statement module
//!
//! This module contains the statement tree consumed by the execution
//! engine. Lexing and parsing SQL text into these nodes is left to an
//! external parser.

pub mod ast;

pub use ast::{
    Assignment, ColumnDef, ColumnRef, Comparator, Condition, CreateTableStatement,
    DeleteStatement, InsertStatement, JoinCondition, Literal, SelectStatement, Statement,
    TableConstraint, TableQuery, UpdateStatement,
};
