use crate::data::kind::DataKind;
use crate::data::schema::ColumnSpec;

/// Dirty row range accumulated while a column edit session is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct EditRange {
    min_row: usize,
    max_row: usize,
}

impl EditRange {
    fn record(&mut self, row: usize) {
        self.min_row = self.min_row.min(row);
        self.max_row = self.max_row.max(row);
    }
}

/// One column of cells: string-encoded values paired with validity flags.
///
/// Values and flags always have the same length. A cell whose flag is
/// cleared still holds a placeholder string so row indices stay aligned.
#[derive(Clone, Debug)]
pub struct ColumnStore {
    /// Value kind accepted by this column
    kind: DataKind,
    /// String-encoded cell values, one per row
    values: Vec<String>,
    /// Per-cell validity flags, aligned with `values`
    valid: Vec<bool>,
    /// Open edit session, if any
    edit: Option<Option<EditRange>>,
}

impl ColumnStore {
    /// Creates an empty store for the given value kind.
    pub fn new(kind: DataKind) -> Self {
        Self {
            kind,
            values: Vec::new(),
            valid: Vec::new(),
            edit: None,
        }
    }

    /// Returns the value kind accepted by this column.
    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the column holds no cells.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Appends a cell per the descriptor's default: the default value with
    /// the flag set, or an empty placeholder with the flag cleared.
    pub fn push_default(&mut self, spec: &ColumnSpec) {
        match spec.default_value() {
            Some(value) => {
                self.values.push(value.to_owned());
                self.valid.push(true);
            }
            None => {
                self.values.push(String::new());
                self.valid.push(false);
            }
        }
    }

    /// Appends a valid cell with the given value.
    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
        self.valid.push(true);
    }

    /// Returns the cell value at `row`, or None when out of range.
    pub fn get(&self, row: usize) -> Option<&str> {
        self.values.get(row).map(String::as_str)
    }

    /// Overwrites the cell at `row` and stamps it valid.
    /// Out-of-range writes are ignored; callers validate rows first.
    pub fn set(&mut self, row: usize, value: impl Into<String>) {
        if row < self.values.len() {
            self.values[row] = value.into();
            self.valid[row] = true;
        }
    }

    /// Returns the validity flag at `row`; false when out of range.
    pub fn is_valid(&self, row: usize) -> bool {
        self.valid.get(row).copied().unwrap_or(false)
    }

    /// Removes the cell at `row`, shifting later cells down.
    pub fn remove(&mut self, row: usize) {
        if row < self.values.len() {
            self.values.remove(row);
            self.valid.remove(row);
        }
    }

    /// Removes every cell.
    pub fn clear(&mut self) {
        self.values.clear();
        self.valid.clear();
    }

    /// Opens an edit session. Returns false when one is already open.
    pub fn begin_edit(&mut self) -> bool {
        if self.edit.is_some() {
            return false;
        }
        self.edit = Some(None);
        true
    }

    /// Closes the edit session, yielding the dirty range written during it.
    /// Returns None when no session was open; `Some(None)` when the session
    /// saw no writes.
    pub fn end_edit(&mut self) -> Option<Option<(usize, usize)>> {
        self.edit
            .take()
            .map(|dirty| dirty.map(|range| (range.min_row, range.max_row)))
    }

    /// Returns true while an edit session is open.
    pub fn is_editing(&self) -> bool {
        self.edit.is_some()
    }

    /// Folds a write at `row` into the open session's dirty range.
    /// Returns false when no session is open.
    pub fn record_edit(&mut self, row: usize) -> bool {
        match self.edit.as_mut() {
            Some(dirty) => {
                match dirty {
                    Some(range) => range.record(row),
                    None => {
                        *dirty = Some(EditRange {
                            min_row: row,
                            max_row: row,
                        })
                    }
                }
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> ColumnSpec {
        ColumnSpec::new("name", DataKind::Varchar).with_default("unknown")
    }

    #[test]
    fn push_default_respects_spec() {
        let mut store = ColumnStore::new(DataKind::Varchar);
        store.push_default(&names());
        store.push_default(&ColumnSpec::new("note", DataKind::Varchar));
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0), Some("unknown"));
        assert!(store.is_valid(0));
        assert_eq!(store.get(1), Some(""));
        assert!(!store.is_valid(1));
    }

    #[test]
    fn set_stamps_validity() {
        let mut store = ColumnStore::new(DataKind::Varchar);
        store.push_default(&ColumnSpec::new("note", DataKind::Varchar));
        assert!(!store.is_valid(0));
        store.set(0, "hello");
        assert_eq!(store.get(0), Some("hello"));
        assert!(store.is_valid(0));
        assert!(!store.is_valid(7));
    }

    #[test]
    fn remove_shifts_cells_down() {
        let mut store = ColumnStore::new(DataKind::Varchar);
        store.push("a");
        store.push("b");
        store.push("c");
        store.remove(1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(1), Some("c"));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn edit_session_tracks_dirty_range() {
        let mut store = ColumnStore::new(DataKind::BigInt);
        for value in ["1", "2", "3", "4", "5"] {
            store.push(value);
        }
        assert!(!store.record_edit(0));
        assert!(store.begin_edit());
        assert!(!store.begin_edit());
        assert!(store.is_editing());
        assert!(store.record_edit(3));
        assert!(store.record_edit(1));
        assert_eq!(store.end_edit(), Some(Some((1, 3))));
        assert!(!store.is_editing());
        assert_eq!(store.end_edit(), None);
    }

    #[test]
    fn empty_edit_session_has_no_dirty_range() {
        let mut store = ColumnStore::new(DataKind::BigInt);
        assert!(store.begin_edit());
        assert_eq!(store.end_edit(), Some(None));
    }
}
