//! Parsed statement tree
//!
//! This module defines the statement nodes the execution engine consumes.
//! Producing them from SQL text is the job of an external parser; the
//! engine only sees already-structured clauses.

use crate::catalog::DataType;
use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A parsed SQL statement
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE DATABASE statement
    CreateDatabase(String),
    /// DROP DATABASE statement
    DropDatabase(String),
    /// USE statement
    UseDatabase(String),
    /// CREATE TABLE statement
    CreateTable(CreateTableStatement),
    /// DROP TABLE statement
    DropTable(String),
    /// INSERT statement
    Insert(InsertStatement),
    /// DELETE statement
    Delete(DeleteStatement),
    /// UPDATE statement
    Update(UpdateStatement),
    /// SELECT statement
    Select(SelectStatement),
    /// SHOW TABLE statement
    ShowMeta(String),
    /// QUIT statement
    Quit,
}

/// CREATE TABLE statement
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableStatement {
    /// Target table name
    pub table_name: String,
    /// Column definitions
    pub columns: Vec<ColumnDef>,
    /// Table-level constraints
    pub constraints: Vec<TableConstraint>,
}

/// A column definition inside CREATE TABLE
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Data type
    pub data_type: DataType,
    /// NOT NULL constraint
    pub not_null: bool,
    /// Per-column PRIMARY KEY constraint
    pub primary_key: bool,
}

/// A table-level constraint inside CREATE TABLE
#[derive(Debug, Clone, PartialEq)]
pub enum TableConstraint {
    /// PRIMARY KEY (columns...)
    PrimaryKey(Vec<String>),
}

/// A literal value token; raw text is typed later against a column
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// NULL literal
    Null,
    /// Any other literal, carried as its token text
    Text(String),
}

/// A possibly-qualified column reference
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    /// Optional table qualifier
    pub table: Option<String>,
    /// Column name
    pub column: String,
}

impl ColumnRef {
    /// An unqualified reference
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            table: None,
            column: column.into(),
        }
    }

    /// A table-qualified reference
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            column: column.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => write!(f, "{}", self.column),
        }
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl FromStr for Comparator {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token {
            "=" => Ok(Comparator::Eq),
            "<>" | "!=" => Ok(Comparator::Ne),
            "<=" => Ok(Comparator::Le),
            ">=" => Ok(Comparator::Ge),
            "<" => Ok(Comparator::Lt),
            ">" => Ok(Comparator::Gt),
            _ => Err(Error::UnsupportedOperator(token.to_string())),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let token = match self {
            Comparator::Eq => "=",
            Comparator::Ne => "<>",
            Comparator::Le => "<=",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Gt => ">",
        };
        write!(f, "{}", token)
    }
}

/// A single-predicate WHERE clause: column vs. literal
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Column operand
    pub column: ColumnRef,
    /// Comparison operator
    pub comparator: Comparator,
    /// Literal operand
    pub value: Literal,
}

/// A join predicate: column vs. column across two tables
#[derive(Debug, Clone, PartialEq)]
pub struct JoinCondition {
    /// Left column operand
    pub left: ColumnRef,
    /// Comparison operator
    pub comparator: Comparator,
    /// Right column operand
    pub right: ColumnRef,
}

/// FROM clause: a single table or a two-table join
#[derive(Debug, Clone, PartialEq)]
pub enum TableQuery {
    /// A single table scan
    Table(String),
    /// A two-table join with an ON condition
    Join {
        left: String,
        right: String,
        on: JoinCondition,
    },
}

/// INSERT statement
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    /// Target table name
    pub table_name: String,
    /// Column names (all columns in declared order when omitted)
    pub columns: Option<Vec<String>>,
    /// Value tuples to insert
    pub values: Vec<Vec<Literal>>,
}

/// SET clause of an UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Target column name
    pub column: String,
    /// New value
    pub value: Literal,
}

/// UPDATE statement
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    /// Target table name
    pub table_name: String,
    /// SET clause
    pub assignment: Assignment,
    /// WHERE clause (all rows when absent)
    pub filter: Option<Condition>,
}

/// DELETE statement
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    /// Target table name
    pub table_name: String,
    /// WHERE clause (all rows when absent)
    pub filter: Option<Condition>,
}

/// SELECT statement
#[derive(Debug, Clone, PartialEq)]
pub struct SelectStatement {
    /// Projected columns
    pub columns: Vec<ColumnRef>,
    /// FROM clause
    pub from: TableQuery,
    /// WHERE clause
    pub filter: Option<Condition>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_from_str() {
        assert_eq!("=".parse::<Comparator>().unwrap(), Comparator::Eq);
        assert_eq!("<>".parse::<Comparator>().unwrap(), Comparator::Ne);
        assert_eq!("!=".parse::<Comparator>().unwrap(), Comparator::Ne);
        assert_eq!("<=".parse::<Comparator>().unwrap(), Comparator::Le);
        assert_eq!(">".parse::<Comparator>().unwrap(), Comparator::Gt);

        assert!(matches!(
            "~".parse::<Comparator>(),
            Err(Error::UnsupportedOperator(_))
        ));
    }

    #[test]
    fn test_column_ref_display() {
        assert_eq!(ColumnRef::new("name").to_string(), "name");
        assert_eq!(ColumnRef::qualified("t", "id").to_string(), "t.id");
    }
}
