//! Schema definitions for RelDB
//!
//! This module defines table schemas and column metadata.

use super::types::DataType;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column definition in a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    /// Column name, stored lower-cased
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// Is this the primary key column?
    pub primary: bool,
    /// Must values be non-null?
    pub not_null: bool,
}

impl Column {
    /// Create a new column with minimal required fields
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into().to_lowercase(),
            data_type,
            primary: false,
            not_null: false,
        }
    }

    /// Set not-null flag
    pub fn not_null(mut self, not_null: bool) -> Self {
        self.not_null = not_null;
        self
    }

    /// Set primary key flag; primary columns are always not-null
    pub fn primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        if primary {
            self.not_null = true;
        }
        self
    }
}

/// Table schema - the ordered column list plus resolution metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of columns
    columns: Vec<Column>,
    /// Lower-cased column name to index mapping
    name_to_index: HashMap<String, usize>,
    /// Index of the primary key column, if any
    primary: Option<usize>,
}

impl Schema {
    /// Create a schema from a list of columns
    ///
    /// At most one column may be marked primary.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let mut name_to_index = HashMap::new();
        let mut primary = None;

        for (index, column) in columns.iter().enumerate() {
            name_to_index.insert(column.name.clone(), index);
            if column.primary {
                if let Some(first) = primary {
                    let first_name: &Column = &columns[first];
                    return Err(Error::MultiplePrimaryKeys(
                        first_name.name.clone(),
                        column.name.clone(),
                    ));
                }
                primary = Some(index);
            }
        }

        Ok(Self {
            columns,
            name_to_index,
            primary,
        })
    }

    /// Get column index by name (case-insensitive)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(&name.to_lowercase()).copied()
    }

    /// Get column by name (case-insensitive)
    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.index_of(name).map(|idx| &self.columns[idx])
    }

    /// Get all columns
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Get number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Index of the primary key column, if any
    pub fn primary_index(&self) -> Option<usize> {
        self.primary
    }

    /// Get column names in declared order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_creation() {
        let schema = Schema::from_columns(vec![
            Column::new("Id", DataType::Int).primary(true),
            Column::new("Name", DataType::Varchar(100)).not_null(true),
            Column::new("email", DataType::Varchar(255)),
        ])
        .unwrap();

        assert_eq!(schema.column_count(), 3);
        assert_eq!(schema.index_of("ID"), Some(0));
        assert_eq!(schema.index_of("unknown"), None);
        assert_eq!(schema.primary_index(), Some(0));

        let id_col = schema.get_column("id").unwrap();
        assert!(id_col.primary);
        assert!(id_col.not_null);
        assert_eq!(id_col.name, "id");
    }

    #[test]
    fn test_schema_without_primary() {
        let schema = Schema::from_columns(vec![
            Column::new("a", DataType::Int),
            Column::new("b", DataType::Long),
        ])
        .unwrap();
        assert_eq!(schema.primary_index(), None);
    }

    #[test]
    fn test_multiple_primary_keys_rejected() {
        let result = Schema::from_columns(vec![
            Column::new("a", DataType::Int).primary(true),
            Column::new("b", DataType::Int).primary(true),
        ]);
        assert!(matches!(result, Err(Error::MultiplePrimaryKeys(_, _))));
    }
}
