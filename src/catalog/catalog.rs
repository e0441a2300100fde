//! System catalog for RelDB
//!
//! This module manages the process-wide registry of databases and their
//! tables. Database and table names are case-insensitive and stored
//! lower-cased.

use crate::error::{Error, Result};
use crate::storage::Table;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use tracing::info;

/// A named collection of tables
#[derive(Debug)]
pub struct Database {
    /// Database name, stored lower-cased
    name: String,
    /// Tables by name, in creation order
    tables: RwLock<IndexMap<String, Arc<Table>>>,
}

impl Database {
    /// Create a new empty database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            tables: RwLock::new(IndexMap::new()),
        }
    }

    /// Get database name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create a new table
    pub fn create_table(&self, table: Table) -> Result<Arc<Table>> {
        let mut tables = self.tables.write().unwrap();

        let name = table.name().to_string();
        if tables.contains_key(&name) {
            return Err(Error::TableAlreadyExists(name));
        }

        let table = Arc::new(table);
        tables.insert(name.clone(), table.clone());
        info!(database = %self.name, table = %name, "table created");
        Ok(table)
    }

    /// Get a table by name
    pub fn get_table(&self, name: &str) -> Result<Arc<Table>> {
        let tables = self.tables.read().unwrap();
        tables
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::TableNotFound(name.to_lowercase()))
    }

    /// Drop a table
    pub fn drop_table(&self, name: &str) -> Result<()> {
        let mut tables = self.tables.write().unwrap();

        let name = name.to_lowercase();
        if tables.shift_remove(&name).is_none() {
            return Err(Error::TableNotFound(name));
        }

        info!(database = %self.name, table = %name, "table dropped");
        Ok(())
    }

    /// List all table names in creation order
    pub fn table_names(&self) -> Vec<String> {
        let tables = self.tables.read().unwrap();
        tables.keys().cloned().collect()
    }
}

/// System catalog - the registry of all databases
///
/// Shared across sessions behind an `Arc`; the per-session current
/// database lives in the session context, never here.
#[derive(Debug)]
pub struct Catalog {
    /// Databases by name, in creation order
    databases: RwLock<IndexMap<String, Arc<Database>>>,
}

impl Catalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self {
            databases: RwLock::new(IndexMap::new()),
        }
    }

    /// Create a database, failing when the name is taken
    pub fn create_database(&self, name: &str) -> Result<Arc<Database>> {
        let mut databases = self.databases.write().unwrap();

        let name = name.to_lowercase();
        if databases.contains_key(&name) {
            return Err(Error::DatabaseAlreadyExists(name));
        }

        let database = Arc::new(Database::new(&name));
        databases.insert(name.clone(), database.clone());
        info!(database = %name, "database created");
        Ok(database)
    }

    /// Create a database when absent, returning the existing one otherwise
    pub fn create_database_if_absent(&self, name: &str) -> Arc<Database> {
        let mut databases = self.databases.write().unwrap();

        let name = name.to_lowercase();
        if let Some(existing) = databases.get(&name) {
            return existing.clone();
        }

        let database = Arc::new(Database::new(&name));
        databases.insert(name.clone(), database.clone());
        info!(database = %name, "database created");
        database
    }

    /// Get a database by name
    pub fn get_database(&self, name: &str) -> Result<Arc<Database>> {
        let databases = self.databases.read().unwrap();
        databases
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| Error::DatabaseNotFound(name.to_lowercase()))
    }

    /// Drop a database
    pub fn drop_database(&self, name: &str) -> Result<()> {
        let mut databases = self.databases.write().unwrap();

        let name = name.to_lowercase();
        if databases.shift_remove(&name).is_none() {
            return Err(Error::DatabaseNotFound(name));
        }

        info!(database = %name, "database dropped");
        Ok(())
    }

    /// List all database names in creation order
    pub fn database_names(&self) -> Vec<String> {
        let databases = self.databases.read().unwrap();
        databases.keys().cloned().collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, DataType, Schema};

    fn empty_schema() -> Schema {
        Schema::from_columns(vec![Column::new("id", DataType::Int)]).unwrap()
    }

    #[test]
    fn test_create_database_is_idempotent() {
        let catalog = Catalog::new();

        let first = catalog.create_database_if_absent("School");
        let second = catalog.create_database_if_absent("school");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(catalog.database_names(), vec!["school"]);
    }

    #[test]
    fn test_strict_create_database() {
        let catalog = Catalog::new();
        catalog.create_database("test").unwrap();

        let result = catalog.create_database("TEST");
        assert!(matches!(result, Err(Error::DatabaseAlreadyExists(_))));
    }

    #[test]
    fn test_drop_database() {
        let catalog = Catalog::new();
        catalog.create_database_if_absent("test");

        catalog.drop_database("Test").unwrap();
        assert!(matches!(
            catalog.get_database("test"),
            Err(Error::DatabaseNotFound(_))
        ));
        assert!(matches!(
            catalog.drop_database("test"),
            Err(Error::DatabaseNotFound(_))
        ));
    }

    #[test]
    fn test_create_and_get_table() {
        let database = Database::new("db");
        database
            .create_table(Table::new("Users", empty_schema()))
            .unwrap();

        let table = database.get_table("USERS").unwrap();
        assert_eq!(table.name(), "users");

        let result = database.create_table(Table::new("users", empty_schema()));
        assert!(matches!(result, Err(Error::TableAlreadyExists(_))));
    }

    #[test]
    fn test_drop_table() {
        let database = Database::new("db");
        database
            .create_table(Table::new("t", empty_schema()))
            .unwrap();

        database.drop_table("t").unwrap();
        assert!(matches!(
            database.get_table("t"),
            Err(Error::TableNotFound(_))
        ));
    }

    #[test]
    fn test_table_names_keep_creation_order() {
        let database = Database::new("db");
        for name in ["zeta", "alpha", "mid"] {
            database
                .create_table(Table::new(name, empty_schema()))
                .unwrap();
        }
        assert_eq!(database.table_names(), vec!["zeta", "alpha", "mid"]);
    }
}
