//! Table storage for RelDB
//!
//! This module combines a schema with an in-memory row collection and
//! enforces the table-level constraints.

use super::row::{Cell, Row};
use crate::catalog::Schema;
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::RwLock;
use tracing::debug;

/// A table combining schema and row storage
#[derive(Debug)]
pub struct Table {
    /// Table name, stored lower-cased
    name: String,
    /// Table schema
    schema: Schema,
    /// Row storage
    rows: RwLock<Vec<Row>>,
    /// Exclusivity gate for structural access across sessions
    occupied: AtomicBool,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into().to_lowercase(),
            schema,
            rows: RwLock::new(Vec::new()),
            occupied: AtomicBool::new(false),
        }
    }

    /// Get table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get table schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Index of the primary key column, if any
    pub fn primary_index(&self) -> Option<usize> {
        self.schema.primary_index()
    }

    /// Get number of rows
    pub fn row_count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Resolve a column name to its positional index (case-insensitive)
    pub fn search_column(&self, name: &str) -> Result<usize> {
        self.schema
            .index_of(name)
            .ok_or_else(|| Error::ColumnNotFound(name.to_lowercase(), self.name.clone()))
    }

    /// Insert a row, enforcing arity, not-null, and primary-key uniqueness
    pub fn insert(&self, row: Row) -> Result<()> {
        self.check_row(&row)?;

        let mut rows = self.rows.write().unwrap();
        if let Some(primary) = self.schema.primary_index() {
            let key = &row.cells()[primary];
            for existing in rows.iter() {
                if existing.cells()[primary] == *key {
                    return Err(Error::DuplicateKey(key.to_string()));
                }
            }
        }

        rows.push(row);
        debug!(table = %self.name, rows = rows.len(), "row inserted");
        Ok(())
    }

    /// Remove the first row equal to the given one; no-op when absent
    pub fn delete(&self, row: &Row) {
        let mut rows = self.rows.write().unwrap();
        if let Some(position) = rows.iter().position(|r| r == row) {
            rows.remove(position);
            debug!(table = %self.name, rows = rows.len(), "row deleted");
        }
    }

    /// Replace the row whose primary cell equals `primary_cell`
    pub fn update(&self, primary_cell: &Cell, new_row: Row) -> Result<()> {
        self.check_row(&new_row)?;

        let primary = self
            .schema
            .primary_index()
            .ok_or_else(|| Error::Internal(format!("table '{}' has no primary key", self.name)))?;

        let mut rows = self.rows.write().unwrap();
        let position = rows
            .iter()
            .position(|r| r.cells()[primary] == *primary_cell)
            .ok_or_else(|| Error::KeyNotExist(primary_cell.to_string()))?;

        // A changed primary cell must not collide with any other row
        let new_key = &new_row.cells()[primary];
        if new_key != primary_cell {
            for (i, existing) in rows.iter().enumerate() {
                if i != position && existing.cells()[primary] == *new_key {
                    return Err(Error::DuplicateKey(new_key.to_string()));
                }
            }
        }

        rows[position] = new_row;
        Ok(())
    }

    /// Replace the row at a position; fallback for tables without a primary key
    pub fn replace_at(&self, position: usize, new_row: Row) -> Result<()> {
        self.check_row(&new_row)?;

        let mut rows = self.rows.write().unwrap();
        if position >= rows.len() {
            return Err(Error::Internal(format!(
                "row position {} out of bounds in table '{}'",
                position, self.name
            )));
        }
        rows[position] = new_row;
        Ok(())
    }

    /// Iterate over a snapshot of the current rows
    ///
    /// Each call takes a fresh snapshot; iteration is forward-only.
    pub fn iter(&self) -> std::vec::IntoIter<Row> {
        self.rows.read().unwrap().clone().into_iter()
    }

    /// Acquire the exclusivity gate; fails immediately when already held
    pub fn acquire(&self) -> Result<()> {
        if self
            .occupied
            .compare_exchange(false, true, AtomicOrdering::AcqRel, AtomicOrdering::Acquire)
            .is_err()
        {
            return Err(Error::TableOccupied(self.name.clone()));
        }
        Ok(())
    }

    /// Release the exclusivity gate
    pub fn release(&self) {
        self.occupied.store(false, AtomicOrdering::Release);
    }

    /// Check if the gate is currently held
    pub fn is_occupied(&self) -> bool {
        self.occupied.load(AtomicOrdering::Acquire)
    }

    fn check_row(&self, row: &Row) -> Result<()> {
        if row.len() != self.schema.column_count() {
            return Err(Error::SchemaLengthMismatch {
                expected: self.schema.column_count(),
                actual: row.len(),
            });
        }

        for (cell, column) in row.cells().iter().zip(self.schema.columns()) {
            if column.not_null && cell.is_null() {
                return Err(Error::NullNotAllowed(column.name.clone()));
            }
        }

        Ok(())
    }
}
