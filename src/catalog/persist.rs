//! Catalog persistence for RelDB
//!
//! The execution engine invokes a persistence hook after DDL statements
//! and on session quit. The hook is a trait so the surrounding layer can
//! substitute its own collaborator; this module ships a no-op default and
//! a JSON metadata writer. Row data is not persisted here.

use super::catalog::Catalog;
use super::schema::{Column, Schema};
use crate::error::Result;
use crate::storage::Table;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Hook invoked after catalog-changing statements
pub trait CatalogPersistence: Send + Sync {
    /// Persist the catalog's current state
    fn persist(&self, catalog: &Catalog) -> Result<()>;
}

/// Persistence that does nothing; the default for in-memory use
#[derive(Debug, Default)]
pub struct NullPersistence;

impl CatalogPersistence for NullPersistence {
    fn persist(&self, _catalog: &Catalog) -> Result<()> {
        Ok(())
    }
}

/// Persistence writing catalog metadata as pretty JSON
#[derive(Debug)]
pub struct JsonPersistence {
    path: PathBuf,
}

impl JsonPersistence {
    /// Create a persistence hook writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load a catalog of empty tables from a metadata file
    pub fn load(path: impl AsRef<Path>) -> Result<Catalog> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let data: CatalogData = serde_json::from_str(&json)?;

        let catalog = Catalog::new();
        for database_data in data.databases {
            let database = catalog.create_database(&database_data.name)?;
            for table_data in database_data.tables {
                let schema = Schema::from_columns(table_data.columns)?;
                database.create_table(Table::new(table_data.name, schema))?;
            }
        }

        info!(path = %path.as_ref().display(), "catalog metadata loaded");
        Ok(catalog)
    }
}

impl CatalogPersistence for JsonPersistence {
    fn persist(&self, catalog: &Catalog) -> Result<()> {
        let databases = catalog
            .database_names()
            .into_iter()
            .filter_map(|name| catalog.get_database(&name).ok())
            .map(|database| DatabaseData {
                name: database.name().to_string(),
                tables: database
                    .table_names()
                    .into_iter()
                    .filter_map(|name| database.get_table(&name).ok())
                    .map(|table| TableData {
                        name: table.name().to_string(),
                        columns: table.schema().columns().to_vec(),
                    })
                    .collect(),
            })
            .collect();

        let data = CatalogData { databases };
        let json = serde_json::to_string_pretty(&data)?;
        std::fs::write(&self.path, json)?;

        info!(path = %self.path.display(), "catalog metadata saved");
        Ok(())
    }
}

/// Serializable proxy for catalog metadata
#[derive(Serialize, Deserialize)]
struct CatalogData {
    databases: Vec<DatabaseData>,
}

#[derive(Serialize, Deserialize)]
struct DatabaseData {
    name: String,
    tables: Vec<TableData>,
}

#[derive(Serialize, Deserialize)]
struct TableData {
    name: String,
    columns: Vec<Column>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DataType;

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let catalog = Catalog::new();
        let database = catalog.create_database_if_absent("school");
        let schema = Schema::from_columns(vec![
            Column::new("id", DataType::Int).primary(true),
            Column::new("name", DataType::Varchar(10)).not_null(true),
        ])
        .unwrap();
        database.create_table(Table::new("student", schema)).unwrap();

        JsonPersistence::new(&path).persist(&catalog).unwrap();

        let loaded = JsonPersistence::load(&path).unwrap();
        assert_eq!(loaded.database_names(), vec!["school"]);

        let database = loaded.get_database("school").unwrap();
        let table = database.get_table("student").unwrap();
        assert_eq!(table.row_count(), 0);
        assert_eq!(table.primary_index(), Some(0));

        let name_col = table.schema().get_column("name").unwrap();
        assert_eq!(name_col.data_type, DataType::Varchar(10));
        assert!(name_col.not_null);
    }

    #[test]
    fn test_null_persistence_is_noop() {
        let catalog = Catalog::new();
        NullPersistence.persist(&catalog).unwrap();
    }
}
