/// Kinds of table change.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// Rows were added
    Insert,
    /// Rows were removed
    Delete,
    /// Cell values or table structure changed
    Update,
}

/// Describes one change to a table: an inclusive row range, the affected
/// column (None means the whole row range changed), and the change kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TableEvent {
    /// First affected row
    pub start_row: usize,
    /// Last affected row, inclusive
    pub end_row: usize,
    /// Affected column, or None for all columns
    pub column: Option<usize>,
    /// Change kind
    pub kind: EventKind,
}

impl TableEvent {
    /// Creates an event over the inclusive row range.
    pub fn new(start_row: usize, end_row: usize, column: Option<usize>, kind: EventKind) -> Self {
        Self {
            start_row,
            end_row,
            column,
            kind,
        }
    }
}

/// Observer of table changes.
///
/// Notification is synchronous on the mutating call; listeners needing
/// mutable state use interior mutability.
pub trait TableListener {
    /// Called after the table has changed.
    fn table_changed(&self, event: &TableEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_carries_coordinates() {
        let event = TableEvent::new(2, 5, Some(1), EventKind::Update);
        assert_eq!(event.start_row, 2);
        assert_eq!(event.end_row, 5);
        assert_eq!(event.column, Some(1));
        assert_eq!(event.kind, EventKind::Update);
        let whole = TableEvent::new(0, 0, None, EventKind::Insert);
        assert_eq!(whole.column, None);
    }
}
