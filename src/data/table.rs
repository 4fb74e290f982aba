use crate::data::event::{EventKind, TableListener};
use crate::data::schema::Schema;
use crate::data::tuple::Tuple;
use crate::error::RustyTableError;
use std::rc::Rc;
use thiserror::Error;

/// Errors related to table access and mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Row {row} out of bounds for {rows} rows")]
    InvalidRow { row: usize, rows: usize },

    #[error("Unknown column '{0}'")]
    InvalidColumn(String),

    #[error("Column {0} is already being edited")]
    AlreadyEditing(usize),

    #[error("Column {0} is not being edited")]
    NotEditing(usize),

    #[error("Value '{value}' is not a valid {kind} for column {column}")]
    TypeMismatch {
        column: usize,
        kind: &'static str,
        value: String,
    },

    #[error("Table does not support {0}")]
    UnsupportedOperation(&'static str),
}

/// Iterator over the row ids of a table.
///
/// The end is captured at creation, so rows added afterwards are not
/// yielded. Ids are not stable across mutation; callers re-create the
/// iterator after structural changes.
#[derive(Clone, Debug)]
pub struct RowIter {
    next: usize,
    end: usize,
}

impl RowIter {
    /// Creates an iterator over `0..rows`.
    pub fn new(rows: usize) -> Self {
        Self { next: 0, end: rows }
    }

    /// Restarts the iteration from the first row.
    pub fn reset(&mut self) {
        self.next = 0;
    }
}

impl Iterator for RowIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next < self.end {
            let row = self.next;
            self.next += 1;
            Some(row)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

/// Contract for row/column tabular storage with change notification.
///
/// Cell values cross the boundary as strings; the schema's column kinds
/// decide which strings are accepted. Mutations notify registered
/// listeners synchronously before returning.
pub trait Table {
    /// Returns the column layout.
    fn schema(&self) -> &dyn Schema;

    /// Returns the number of rows.
    fn row_count(&self) -> usize;

    /// Reports whether `row` addresses an existing row.
    fn is_valid_row(&self, row: usize) -> bool {
        row < self.row_count()
    }

    /// Iterates the current row ids.
    fn row_ids(&self) -> RowIter {
        RowIter::new(self.row_count())
    }

    /// Returns the cell value at `(row, col)`.
    fn value_at(&self, row: usize, col: usize) -> Result<&str, RustyTableError>;

    /// Returns the cell value at `row` in the named column.
    fn value(&self, row: usize, field: &str) -> Result<&str, RustyTableError>;

    /// Returns the validity flag at `(row, col)`; false for invalid
    /// coordinates, never an error.
    fn is_value_valid(&self, row: usize, col: usize) -> bool;

    /// Writes the cell at `(row, col)` after validating the value against
    /// the column kind.
    fn set_at(&mut self, row: usize, col: usize, value: &str) -> Result<(), RustyTableError>;

    /// Writes the cell at `row` in the named column.
    fn set(&mut self, row: usize, field: &str, value: &str) -> Result<(), RustyTableError>;

    /// Opens an edit session on `col`; writes to the column are coalesced
    /// into one update event until the session ends.
    fn begin_edit(&mut self, col: usize) -> Result<(), RustyTableError>;

    /// Closes the edit session on `col`, replaying the coalesced update.
    /// Returns true when the session committed.
    fn end_edit(&mut self, col: usize) -> Result<bool, RustyTableError>;

    /// Returns true while `col` has an open edit session.
    fn is_editing(&self, col: usize) -> bool;

    /// Reports whether rows can be added.
    fn can_add_row(&self) -> bool;

    /// Reports whether rows can be removed.
    fn can_remove_row(&self) -> bool;

    /// Appends a row of default values, returning the new row id.
    fn add_row(&mut self) -> Result<usize, RustyTableError>;

    /// Appends a row populated from the tuple; unmentioned columns get
    /// their defaults. Nothing is written when any value is rejected.
    fn add_row_from(&mut self, tuple: &Tuple) -> Result<usize, RustyTableError>;

    /// Removes `row`, shifting later ids down. Returns false when the row
    /// does not exist.
    fn remove_row(&mut self, row: usize) -> Result<bool, RustyTableError>;

    /// Removes every row, keeping the schema.
    fn remove_all_rows(&mut self) -> Result<(), RustyTableError>;

    /// Registers a listener. The table keeps a weak back-reference only;
    /// the caller owns the listener's lifetime.
    fn add_table_listener(&mut self, listener: &Rc<dyn TableListener>);

    /// Unregisters the first matching registration of `listener`.
    /// Unknown listeners are ignored.
    fn remove_table_listener(&mut self, listener: &Rc<dyn TableListener>);

    /// Notifies listeners of a change over the inclusive row range.
    fn fire_table_event(
        &mut self,
        start_row: usize,
        end_row: usize,
        column: Option<usize>,
        kind: EventKind,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_iter_captures_end_and_resets() {
        let mut iter = RowIter::new(3);
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.by_ref().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(iter.next(), None);
        iter.reset();
        assert_eq!(iter.next(), Some(0));
    }

    #[test]
    fn row_iter_over_empty_table() {
        let mut iter = RowIter::new(0);
        assert_eq!(iter.next(), None);
    }
}
