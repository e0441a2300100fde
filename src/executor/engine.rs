//! Statement execution engine
//!
//! The engine dispatches parsed statements against the shared catalog.
//! Per-session state (current database, closed flag) is passed in with
//! every call, so one engine serves any number of concurrent sessions.
//!
//! Every statement runs inside a local error boundary: domain errors
//! are rendered to a one-line status outcome and never escape to the
//! caller as a fault.

use super::predicate;
use super::result::{Outcome, QueryTable};
use crate::catalog::{Catalog, CatalogPersistence, Column, Database, NullPersistence, Schema};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::sql::{
    ColumnRef, Comparator, Condition, CreateTableStatement, DeleteStatement, InsertStatement,
    JoinCondition, Literal, SelectStatement, Statement, TableConstraint, TableQuery,
    UpdateStatement,
};
use crate::storage::{Cell, Row, Table};
use std::sync::Arc;
use tracing::debug;

/// Which input of a two-table join an operand refers to
#[derive(Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// A WHERE clause resolved against a concrete table: column index,
/// comparator, and the literal parsed as the column's type
struct ResolvedFilter {
    index: usize,
    comparator: Comparator,
    value: Cell,
}

/// Convert a literal token into a cell typed by the target column
fn literal_to_cell(literal: &Literal, column: &Column) -> Result<Cell> {
    match literal {
        Literal::Null => Ok(Cell::Null),
        Literal::Text(text) => Cell::parse(&column.data_type, text),
    }
}

/// The statement execution engine
pub struct ExecutionEngine {
    catalog: Arc<Catalog>,
    persistence: Arc<dyn CatalogPersistence>,
}

impl ExecutionEngine {
    /// Create an engine over a fresh empty catalog
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(Catalog::new()))
    }

    /// Create an engine over an existing catalog
    pub fn with_catalog(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            persistence: Arc::new(NullPersistence),
        }
    }

    /// Replace the persistence hook invoked after DDL and QUIT
    pub fn with_persistence(mut self, persistence: Arc<dyn CatalogPersistence>) -> Self {
        self.persistence = persistence;
        self
    }

    /// The catalog this engine executes against
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Execute one statement for the given session
    ///
    /// Never fails: domain errors become a status outcome carrying the
    /// error's description.
    pub fn execute(&self, statement: Statement, session: &mut Session) -> Outcome {
        match self.dispatch(statement, session) {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!(%error, "statement failed");
                Outcome::Status(error.to_string())
            }
        }
    }

    fn dispatch(&self, statement: Statement, session: &mut Session) -> Result<Outcome> {
        match statement {
            Statement::CreateDatabase(name) => self.execute_create_database(&name),
            Statement::DropDatabase(name) => self.execute_drop_database(&name, session),
            Statement::UseDatabase(name) => self.execute_use_database(&name, session),
            Statement::CreateTable(stmt) => self.execute_create_table(stmt, session),
            Statement::DropTable(name) => self.execute_drop_table(&name, session),
            Statement::Insert(stmt) => self.execute_insert(stmt, session),
            Statement::Delete(stmt) => self.execute_delete(stmt, session),
            Statement::Update(stmt) => self.execute_update(stmt, session),
            Statement::Select(stmt) => self.execute_select(stmt, session),
            Statement::ShowMeta(name) => self.execute_show_meta(&name, session),
            Statement::Quit => self.execute_quit(session),
        }
    }

    /// Resolve the session's current database
    fn current_database(&self, session: &Session) -> Result<Arc<Database>> {
        let name = session
            .current_database()
            .ok_or(Error::NoDatabaseSelected)?;
        self.catalog.get_database(name)
    }

    fn execute_create_database(&self, name: &str) -> Result<Outcome> {
        match self.catalog.create_database(name) {
            Ok(database) => {
                self.persistence.persist(&self.catalog)?;
                Ok(Outcome::status(format!(
                    "Database '{}' created",
                    database.name()
                )))
            }
            // CREATE DATABASE is idempotent, not an error
            Err(Error::DatabaseAlreadyExists(existing)) => Ok(Outcome::status(format!(
                "Database '{}' already exists",
                existing
            ))),
            Err(error) => Err(error),
        }
    }

    fn execute_drop_database(&self, name: &str, session: &mut Session) -> Result<Outcome> {
        let name = name.to_lowercase();
        self.catalog.drop_database(&name)?;

        if session.current_database() == Some(name.as_str()) {
            session.clear_database();
        }

        self.persistence.persist(&self.catalog)?;
        Ok(Outcome::status(format!("Database '{}' dropped", name)))
    }

    fn execute_use_database(&self, name: &str, session: &mut Session) -> Result<Outcome> {
        let database = self.catalog.get_database(name)?;
        session.use_database(database.name());
        Ok(Outcome::status(format!(
            "Database switched to '{}'",
            database.name()
        )))
    }

    fn execute_create_table(
        &self,
        stmt: CreateTableStatement,
        session: &mut Session,
    ) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let table_name = stmt.table_name.to_lowercase();

        let mut columns: Vec<Column> = stmt
            .columns
            .iter()
            .map(|def| {
                Column::new(&def.name, def.data_type.clone())
                    .not_null(def.not_null)
                    .primary(def.primary_key)
            })
            .collect();

        // A table-level PRIMARY KEY clause promotes the named columns
        // after per-column constraints are read.
        for constraint in &stmt.constraints {
            let TableConstraint::PrimaryKey(names) = constraint;
            for constraint_column in names {
                let target = constraint_column.to_lowercase();
                let column = columns
                    .iter_mut()
                    .find(|c| c.name == target)
                    .ok_or_else(|| Error::ColumnNotFound(target.clone(), table_name.clone()))?;
                column.primary = true;
                column.not_null = true;
            }
        }

        let schema = Schema::from_columns(columns)?;
        database.create_table(Table::new(&table_name, schema))?;

        self.persistence.persist(&self.catalog)?;
        Ok(Outcome::status(format!("Table '{}' created", table_name)))
    }

    fn execute_drop_table(&self, name: &str, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let name = name.to_lowercase();
        database.drop_table(&name)?;

        self.persistence.persist(&self.catalog)?;
        Ok(Outcome::status(format!("Table '{}' dropped", name)))
    }

    fn execute_insert(&self, stmt: InsertStatement, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let table = database.get_table(&stmt.table_name)?;
        let schema = table.schema();

        // Resolve target positions once; either the explicit column
        // list or all columns in declared order.
        let indices: Vec<usize> = match &stmt.columns {
            Some(names) => names
                .iter()
                .map(|name| table.search_column(name))
                .collect::<Result<_>>()?,
            None => (0..schema.column_count()).collect(),
        };

        let mut inserted = 0usize;
        for tuple in &stmt.values {
            if tuple.len() != indices.len() {
                return Err(Error::SchemaLengthMismatch {
                    expected: indices.len(),
                    actual: tuple.len(),
                });
            }

            // Unspecified columns stay NULL; not-null and key checks
            // happen inside the table.
            let mut cells = vec![Cell::Null; schema.column_count()];
            for (literal, &index) in tuple.iter().zip(&indices) {
                cells[index] = literal_to_cell(literal, &schema.columns()[index])?;
            }

            table.insert(Row::new(cells))?;
            inserted += 1;
        }

        Ok(Outcome::status(format!("{} row(s) inserted", inserted)))
    }

    fn execute_delete(&self, stmt: DeleteStatement, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let table = database.get_table(&stmt.table_name)?;

        // Two phases: collect matches first, then apply, so a failure
        // mid-scan never leaves partial deletes behind.
        let matches = Self::collect_matches(&table, stmt.filter.as_ref())?;
        let deleted = matches.len();
        for (_, row) in &matches {
            table.delete(row);
        }

        Ok(Outcome::status(format!("{} row(s) deleted", deleted)))
    }

    fn execute_update(&self, stmt: UpdateStatement, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let table = database.get_table(&stmt.table_name)?;

        let target = table.search_column(&stmt.assignment.column)?;
        if table.primary_index() == Some(target) {
            return Err(Error::PrimaryAssignment(
                stmt.assignment.column.to_lowercase(),
            ));
        }
        let new_cell = literal_to_cell(&stmt.assignment.value, &table.schema().columns()[target])?;

        let matches = Self::collect_matches(&table, stmt.filter.as_ref())?;
        let updated = matches.len();

        match table.primary_index() {
            // Re-match by primary cell; its value is untouched by the
            // assignment, so it still identifies the row.
            Some(primary) => {
                for (_, row) in &matches {
                    let key = row.cells()[primary].clone();
                    table.update(&key, row.with_cell(target, new_cell.clone()))?;
                }
            }
            None => {
                for (position, row) in &matches {
                    table.replace_at(*position, row.with_cell(target, new_cell.clone()))?;
                }
            }
        }

        Ok(Outcome::status(format!("{} row(s) updated", updated)))
    }

    fn execute_select(&self, stmt: SelectStatement, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        match &stmt.from {
            TableQuery::Table(name) => {
                let table = database.get_table(name)?;
                Self::select_single(&table, &stmt)
            }
            TableQuery::Join { left, right, on } => {
                let left_table = database.get_table(left)?;
                let right_table = database.get_table(right)?;
                Self::select_join(&left_table, &right_table, on, &stmt)
            }
        }
    }

    fn select_single(table: &Table, stmt: &SelectStatement) -> Result<Outcome> {
        let mut indices = Vec::with_capacity(stmt.columns.len());
        let mut labels = Vec::with_capacity(stmt.columns.len());
        for column in &stmt.columns {
            if let Some(qualifier) = &column.table {
                if qualifier.to_lowercase() != table.name() {
                    return Err(Error::ColumnNotFound(
                        column.column.to_lowercase(),
                        qualifier.to_lowercase(),
                    ));
                }
            }
            indices.push(table.search_column(&column.column)?);
            labels.push(match &column.table {
                Some(qualifier) => {
                    format!("{}.{}", qualifier.to_lowercase(), column.column.to_lowercase())
                }
                None => column.column.to_lowercase(),
            });
        }

        let filter = stmt
            .filter
            .as_ref()
            .map(|condition| Self::resolve_condition(table, condition))
            .transpose()?;

        let mut rows = Vec::new();
        for row in table.iter() {
            if let Some(resolved) = &filter {
                if !predicate::evaluate(
                    resolved.comparator,
                    &row.cells()[resolved.index],
                    &resolved.value,
                )? {
                    continue;
                }
            }
            rows.push(row.project(&indices));
        }

        Ok(Outcome::Rows(QueryTable::new(labels, rows)))
    }

    fn select_join(
        left: &Table,
        right: &Table,
        on: &JoinCondition,
        stmt: &SelectStatement,
    ) -> Result<Outcome> {
        let left_operand = Self::side_of(&on.left, left, right)?;
        let right_operand = Self::side_of(&on.right, left, right)?;

        let mut projection = Vec::with_capacity(stmt.columns.len());
        let mut labels = Vec::with_capacity(stmt.columns.len());
        for column in &stmt.columns {
            let (side, index) = Self::side_of(column, left, right)?;
            let table_name = match side {
                Side::Left => left.name(),
                Side::Right => right.name(),
            };
            labels.push(format!("{}.{}", table_name, column.column.to_lowercase()));
            projection.push((side, index));
        }

        // An outer WHERE pre-filters only the side it references; the
        // other side contributes all of its rows.
        let filter = match &stmt.filter {
            Some(condition) => {
                let (side, index) = Self::side_of(&condition.column, left, right)?;
                let table = match side {
                    Side::Left => left,
                    Side::Right => right,
                };
                let value = literal_to_cell(&condition.value, &table.schema().columns()[index])?;
                Some((
                    side,
                    ResolvedFilter {
                        index,
                        comparator: condition.comparator,
                        value,
                    },
                ))
            }
            None => None,
        };
        let (left_filter, right_filter) = match &filter {
            Some((Side::Left, resolved)) => (Some(resolved), None),
            Some((Side::Right, resolved)) => (None, Some(resolved)),
            None => (None, None),
        };

        let left_rows = Self::filtered_rows(left, left_filter)?;
        let right_rows = Self::filtered_rows(right, right_filter)?;

        let mut rows = Vec::new();
        for row_left in &left_rows {
            for row_right in &right_rows {
                let a = Self::pick(row_left, row_right, left_operand);
                let b = Self::pick(row_left, row_right, right_operand);
                if !predicate::evaluate(on.comparator, a, b)? {
                    continue;
                }

                let cells = projection
                    .iter()
                    .map(|&operand| Self::pick(row_left, row_right, operand).clone())
                    .collect();
                rows.push(Row::new(cells));
            }
        }

        Ok(Outcome::Rows(QueryTable::new(labels, rows)))
    }

    /// Resolve a join operand to its input table and column index.
    /// The `table.column` qualifier is mandatory in join context.
    fn side_of(column: &ColumnRef, left: &Table, right: &Table) -> Result<(Side, usize)> {
        let qualifier = match &column.table {
            Some(qualifier) => qualifier.to_lowercase(),
            None => {
                return Err(Error::ColumnNotFound(
                    column.column.to_lowercase(),
                    format!("{}/{}", left.name(), right.name()),
                ))
            }
        };

        if qualifier == left.name() {
            Ok((Side::Left, left.search_column(&column.column)?))
        } else if qualifier == right.name() {
            Ok((Side::Right, right.search_column(&column.column)?))
        } else {
            Err(Error::ColumnNotFound(column.column.to_lowercase(), qualifier))
        }
    }

    fn pick<'a>(row_left: &'a Row, row_right: &'a Row, operand: (Side, usize)) -> &'a Cell {
        match operand {
            (Side::Left, index) => &row_left.cells()[index],
            (Side::Right, index) => &row_right.cells()[index],
        }
    }

    /// Resolve a single-table WHERE clause: index, comparator, and the
    /// literal parsed against the column's declared type
    fn resolve_condition(table: &Table, condition: &Condition) -> Result<ResolvedFilter> {
        if let Some(qualifier) = &condition.column.table {
            if qualifier.to_lowercase() != table.name() {
                return Err(Error::ColumnNotFound(
                    condition.column.column.to_lowercase(),
                    qualifier.to_lowercase(),
                ));
            }
        }

        let index = table.search_column(&condition.column.column)?;
        let value = literal_to_cell(&condition.value, &table.schema().columns()[index])?;
        Ok(ResolvedFilter {
            index,
            comparator: condition.comparator,
            value,
        })
    }

    /// Scan once collecting the positions and rows a filter matches
    fn collect_matches(
        table: &Table,
        filter: Option<&Condition>,
    ) -> Result<Vec<(usize, Row)>> {
        let filter = filter
            .map(|condition| Self::resolve_condition(table, condition))
            .transpose()?;

        let mut matches = Vec::new();
        for (position, row) in table.iter().enumerate() {
            if let Some(resolved) = &filter {
                if !predicate::evaluate(
                    resolved.comparator,
                    &row.cells()[resolved.index],
                    &resolved.value,
                )? {
                    continue;
                }
            }
            matches.push((position, row));
        }
        Ok(matches)
    }

    fn filtered_rows(table: &Table, filter: Option<&ResolvedFilter>) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        for row in table.iter() {
            if let Some(resolved) = filter {
                if !predicate::evaluate(
                    resolved.comparator,
                    &row.cells()[resolved.index],
                    &resolved.value,
                )? {
                    continue;
                }
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn execute_show_meta(&self, name: &str, session: &mut Session) -> Result<Outcome> {
        let database = self.current_database(session)?;
        let table = database.get_table(name)?;
        let schema = table.schema();

        let mut text = format!(
            "Show table {}\n-----------------------------------\n",
            table.name()
        );
        for column in schema.columns() {
            let primary = if column.primary { "Primary Key" } else { "" };
            let not_null = if column.not_null { "Not Null" } else { "" };
            text.push_str(&format!(
                " {} \t\t {} \t\t {} \t\t {}\n",
                column.name, column.data_type, primary, not_null
            ));
        }
        text.push_str("-----------------------------------\n");
        match schema.primary_index() {
            Some(primary) => text.push_str(&format!(
                "{} has {} column(s). The primary key is {}.",
                table.name(),
                schema.column_count(),
                schema.columns()[primary].name
            )),
            None => text.push_str(&format!(
                "{} has {} column(s).",
                table.name(),
                schema.column_count()
            )),
        }

        Ok(Outcome::Status(text))
    }

    fn execute_quit(&self, session: &mut Session) -> Result<Outcome> {
        session.close();
        self.persistence.persist(&self.catalog)?;
        Ok(Outcome::status("Quit."))
    }
}

impl Default for ExecutionEngine {
    fn default() -> Self {
        Self::new()
    }
}
