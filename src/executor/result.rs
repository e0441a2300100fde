//! Execution results
//!
//! Every statement produces an [`Outcome`]: either a one-line status
//! message or a query table. A query table carries projected column
//! labels plus rows in production order and is consumed once by
//! iterating it.

use crate::storage::Row;
use serde::Serialize;
use std::fmt;

/// Rows produced by a SELECT, in production order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl QueryTable {
    /// Create a result table from projected column labels and rows
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Projected column labels
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Result rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of result rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl IntoIterator for QueryTable {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Result of executing one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Outcome {
    /// A one-line status message
    Status(String),
    /// A table of rows from a SELECT
    Rows(QueryTable),
}

impl Outcome {
    /// Create a status outcome from a message
    pub fn status(message: impl Into<String>) -> Self {
        Outcome::Status(message.into())
    }

    /// Extract the query table, if any
    pub fn into_rows(self) -> Option<QueryTable> {
        match self {
            Outcome::Rows(table) => Some(table),
            Outcome::Status(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Status(message) => writeln!(f, "{}", message),
            Outcome::Rows(table) => write!(f, "{}", table),
        }
    }
}

impl fmt::Display for QueryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Calculate column widths
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (i, cell) in row.cells().iter().enumerate() {
                if i < widths.len() {
                    let cell_len = format!("{}", cell).len();
                    widths[i] = widths[i].max(cell_len);
                }
            }
        }

        let separator: String = widths
            .iter()
            .map(|w| "-".repeat(*w + 2))
            .collect::<Vec<String>>()
            .join("+");

        writeln!(f, "+{}+", separator)?;

        let header: String = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!(" {:^width$} ", c, width = *w))
            .collect::<Vec<String>>()
            .join("|");
        writeln!(f, "|{}|", header)?;
        writeln!(f, "+{}+", separator)?;

        for row in &self.rows {
            let row_str: String = row
                .cells()
                .iter()
                .zip(&widths)
                .map(|(v, w)| format!(" {:>width$} ", v, width = *w))
                .collect::<Vec<String>>()
                .join("|");
            writeln!(f, "|{}|", row_str)?;
        }

        if !self.rows.is_empty() {
            writeln!(f, "+{}+", separator)?;
        }

        writeln!(f, "{} row(s) returned", self.rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Cell;

    #[test]
    fn test_rows_consumed_in_production_order() {
        let table = QueryTable::new(
            vec!["id".to_string()],
            vec![
                Row::new(vec![Cell::Int(3)]),
                Row::new(vec![Cell::Int(1)]),
                Row::new(vec![Cell::Int(2)]),
            ],
        );

        let ids: Vec<Cell> = table
            .into_iter()
            .map(|row| row.get(0).cloned().unwrap())
            .collect();
        assert_eq!(ids, vec![Cell::Int(3), Cell::Int(1), Cell::Int(2)]);
    }

    #[test]
    fn test_status_display_ends_with_newline() {
        let outcome = Outcome::status("1 row(s) inserted");
        assert_eq!(outcome.to_string(), "1 row(s) inserted\n");
    }

    #[test]
    fn test_table_display() {
        let table = QueryTable::new(
            vec!["id".to_string(), "name".to_string()],
            vec![
                Row::new(vec![Cell::Int(1), Cell::from("alice")]),
                Row::new(vec![Cell::Int(2), Cell::from("bob")]),
            ],
        );

        let rendered = Outcome::Rows(table).to_string();
        assert!(rendered.starts_with("+----+-------+\n"));
        assert!(rendered.contains("| id | name  |"));
        assert!(rendered.contains("|  1 | alice |"));
        assert!(rendered.contains("|  2 |   bob |"));
        assert!(rendered.ends_with("2 row(s) returned\n"));
    }

    #[test]
    fn test_empty_table_display() {
        let table = QueryTable::new(vec!["id".to_string()], vec![]);
        let rendered = table.to_string();
        assert!(rendered.ends_with("0 row(s) returned\n"));
        // no trailing separator when there are no rows
        assert_eq!(rendered.matches("+----+").count(), 2);
    }

    #[test]
    fn test_into_rows() {
        let table = QueryTable::new(vec!["id".to_string()], vec![]);
        assert!(Outcome::Rows(table).into_rows().is_some());
        assert!(Outcome::status("ok").into_rows().is_none());
    }
}
