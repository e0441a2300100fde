//! Predicate evaluation
//!
//! WHERE clauses and join conditions reduce to a single comparison
//! between two cells. The comparator is mapped onto the cell total
//! order, so NULL handling and type checking live in one place.

use crate::error::Result;
use crate::sql::Comparator;
use crate::storage::Cell;

/// Evaluate `left comparator right` against the cell ordering
pub fn evaluate(comparator: Comparator, left: &Cell, right: &Cell) -> Result<bool> {
    let ordering = left.compare(right)?;
    let holds = match comparator {
        Comparator::Eq => ordering.is_eq(),
        Comparator::Ne => !ordering.is_eq(),
        Comparator::Le => ordering.is_le(),
        Comparator::Ge => ordering.is_ge(),
        Comparator::Lt => ordering.is_lt(),
        Comparator::Gt => ordering.is_gt(),
    };
    Ok(holds)
}
