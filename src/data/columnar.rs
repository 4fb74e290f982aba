use crate::data::column::ColumnStore;
use crate::data::event::{EventKind, TableEvent, TableListener};
use crate::data::schema::{ColumnSchema, ColumnSpec, Schema};
use crate::data::table::{Table, TableError};
use crate::data::tuple::Tuple;
use crate::error::RustyTableError;
use crate::helpers::handle::{RefCount, RefCounted};
use std::rc::{Rc, Weak};

/// In-memory columnar table: one [`ColumnStore`] per schema column, all
/// kept at the same length as rows come and go.
///
/// Embeds a [`RefCount`] so instances can be identity-shared through
/// [`crate::helpers::handle::Handle`].
pub struct ColumnarTable {
    /// Column layout
    schema: ColumnSchema,
    /// Cell storage, aligned with the schema
    columns: Vec<ColumnStore>,
    /// Number of rows; every column holds exactly this many cells
    rows: usize,
    /// Registered observers, weakly held
    listeners: Vec<Weak<dyn TableListener>>,
    /// Rows can be added
    addable: bool,
    /// Rows can be removed
    removable: bool,
    /// Intrusive reference count
    refs: RefCount,
}

impl ColumnarTable {
    /// Creates an empty, addable and removable table over the schema.
    pub fn new(schema: ColumnSchema) -> Self {
        Self::with_capabilities(schema, true, true)
    }

    /// Creates an empty table with explicit row mutation capabilities.
    pub fn with_capabilities(schema: ColumnSchema, addable: bool, removable: bool) -> Self {
        let columns = schema.iter().map(|spec| ColumnStore::new(spec.kind())).collect();
        Self {
            schema,
            columns,
            rows: 0,
            listeners: Vec::new(),
            addable,
            removable,
            refs: RefCount::new(),
        }
    }

    /// Appends a column, backfilling existing rows with its default.
    pub fn add_column(&mut self, spec: ColumnSpec) -> Result<usize, RustyTableError> {
        let mut store = ColumnStore::new(spec.kind());
        for _ in 0..self.rows {
            store.push_default(&spec);
        }
        let col = self.schema.add_column(spec)?;
        self.columns.push(store);
        if self.rows > 0 {
            self.fire_table_event(0, self.rows - 1, None, EventKind::Update);
        }
        Ok(col)
    }

    /// Removes the column at `col` from schema and storage together.
    /// Returns false when the index does not exist.
    pub fn remove_column(&mut self, col: usize) -> bool {
        if !self.schema.remove_column(col) {
            return false;
        }
        self.columns.remove(col);
        if self.rows > 0 {
            self.fire_table_event(0, self.rows - 1, None, EventKind::Update);
        }
        true
    }

    /// Removes the column with the given name.
    pub fn remove_column_named(&mut self, field: &str) -> bool {
        match self.schema.column_index(field) {
            Some(col) => self.remove_column(col),
            None => false,
        }
    }

    /// Returns the live registered listeners in registration order.
    pub fn table_listeners(&self) -> Vec<Rc<dyn TableListener>> {
        self.listeners.iter().filter_map(Weak::upgrade).collect()
    }

    /// Returns the number of live listener registrations.
    pub fn listener_count(&self) -> usize {
        self.listeners
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    fn ensure_row(&self, row: usize) -> Result<(), TableError> {
        if row < self.rows {
            Ok(())
        } else {
            Err(TableError::InvalidRow {
                row,
                rows: self.rows,
            })
        }
    }

    fn resolve_field(&self, field: &str) -> Result<usize, TableError> {
        self.schema
            .column_index(field)
            .ok_or_else(|| TableError::InvalidColumn(field.to_owned()))
    }

    fn ensure_value(&self, col: usize, value: &str) -> Result<(), RustyTableError> {
        let kind = self.schema.column_kind(col)?;
        if kind.validates(value) {
            Ok(())
        } else {
            Err(TableError::TypeMismatch {
                column: col,
                kind: kind.as_str(),
                value: value.to_owned(),
            }
            .into())
        }
    }
}

impl Table for ColumnarTable {
    fn schema(&self) -> &dyn Schema {
        &self.schema
    }

    fn row_count(&self) -> usize {
        self.rows
    }

    fn value_at(&self, row: usize, col: usize) -> Result<&str, RustyTableError> {
        self.ensure_row(row)?;
        self.schema.spec(col)?;
        Ok(self.columns[col].get(row).unwrap_or_default())
    }

    fn value(&self, row: usize, field: &str) -> Result<&str, RustyTableError> {
        let col = self.resolve_field(field)?;
        self.value_at(row, col)
    }

    fn is_value_valid(&self, row: usize, col: usize) -> bool {
        self.columns
            .get(col)
            .map(|store| store.is_valid(row))
            .unwrap_or(false)
    }

    fn set_at(&mut self, row: usize, col: usize, value: &str) -> Result<(), RustyTableError> {
        self.ensure_row(row)?;
        self.schema.spec(col)?;
        self.ensure_value(col, value)?;
        let store = &mut self.columns[col];
        store.set(row, value);
        if store.record_edit(row) {
            return Ok(());
        }
        self.fire_table_event(row, row, Some(col), EventKind::Update);
        Ok(())
    }

    fn set(&mut self, row: usize, field: &str, value: &str) -> Result<(), RustyTableError> {
        let col = self.resolve_field(field)?;
        self.set_at(row, col, value)
    }

    fn begin_edit(&mut self, col: usize) -> Result<(), RustyTableError> {
        self.schema.spec(col)?;
        if !self.columns[col].begin_edit() {
            return Err(TableError::AlreadyEditing(col).into());
        }
        Ok(())
    }

    fn end_edit(&mut self, col: usize) -> Result<bool, RustyTableError> {
        self.schema.spec(col)?;
        match self.columns[col].end_edit() {
            None => Err(TableError::NotEditing(col).into()),
            Some(None) => Ok(true),
            Some(Some((start, end))) => {
                self.fire_table_event(start, end, Some(col), EventKind::Update);
                Ok(true)
            }
        }
    }

    fn is_editing(&self, col: usize) -> bool {
        self.columns
            .get(col)
            .map(ColumnStore::is_editing)
            .unwrap_or(false)
    }

    fn can_add_row(&self) -> bool {
        self.addable
    }

    fn can_remove_row(&self) -> bool {
        self.removable
    }

    fn add_row(&mut self) -> Result<usize, RustyTableError> {
        if !self.addable {
            return Err(TableError::UnsupportedOperation("row addition").into());
        }
        for (col, store) in self.columns.iter_mut().enumerate() {
            let spec = self.schema.spec(col)?;
            store.push_default(spec);
        }
        let row = self.rows;
        self.rows += 1;
        self.fire_table_event(row, row, None, EventKind::Insert);
        Ok(row)
    }

    fn add_row_from(&mut self, tuple: &Tuple) -> Result<usize, RustyTableError> {
        if !self.addable {
            return Err(TableError::UnsupportedOperation("row addition").into());
        }
        // Resolve and validate everything before touching storage.
        let mut pending: Vec<Option<&str>> = vec![None; self.schema.column_count()];
        for (field, value) in tuple.fields() {
            let col = self.resolve_field(field)?;
            self.ensure_value(col, value)?;
            if pending[col].is_none() {
                pending[col] = Some(value);
            }
        }
        for (col, store) in self.columns.iter_mut().enumerate() {
            match pending[col] {
                Some(value) => store.push(value),
                None => store.push_default(self.schema.spec(col)?),
            }
        }
        let row = self.rows;
        self.rows += 1;
        self.fire_table_event(row, row, None, EventKind::Insert);
        Ok(row)
    }

    fn remove_row(&mut self, row: usize) -> Result<bool, RustyTableError> {
        if !self.removable {
            return Err(TableError::UnsupportedOperation("row removal").into());
        }
        if row >= self.rows {
            return Ok(false);
        }
        for store in &mut self.columns {
            store.remove(row);
        }
        self.rows -= 1;
        self.fire_table_event(row, row, None, EventKind::Delete);
        Ok(true)
    }

    fn remove_all_rows(&mut self) -> Result<(), RustyTableError> {
        if !self.removable {
            return Err(TableError::UnsupportedOperation("row removal").into());
        }
        if self.rows == 0 {
            return Ok(());
        }
        for store in &mut self.columns {
            store.clear();
        }
        let last = self.rows - 1;
        self.rows = 0;
        self.fire_table_event(0, last, None, EventKind::Delete);
        Ok(())
    }

    fn add_table_listener(&mut self, listener: &Rc<dyn TableListener>) {
        self.listeners.push(Rc::downgrade(listener));
    }

    fn remove_table_listener(&mut self, listener: &Rc<dyn TableListener>) {
        let position = self.listeners.iter().position(|weak| {
            weak.upgrade()
                .map(|live| Rc::ptr_eq(&live, listener))
                .unwrap_or(false)
        });
        if let Some(index) = position {
            self.listeners.remove(index);
        }
    }

    fn fire_table_event(
        &mut self,
        start_row: usize,
        end_row: usize,
        column: Option<usize>,
        kind: EventKind,
    ) {
        let event = TableEvent::new(start_row, end_row, column, kind);
        self.listeners.retain(|weak| weak.strong_count() > 0);
        // Snapshot before dispatch; registrations made by listeners take
        // effect from the next event.
        let snapshot: Vec<_> = self.listeners.iter().filter_map(Weak::upgrade).collect();
        for listener in snapshot {
            listener.table_changed(&event);
        }
    }
}

impl RefCounted for ColumnarTable {
    fn retain(&self) -> usize {
        self.refs.retain()
    }

    fn release(&self) -> usize {
        self.refs.release()
    }

    fn ref_count(&self) -> usize {
        self.refs.ref_count()
    }
}
