//! Grid model: column definitions, caller-supplied row values, and the owned
//! per-cell display texts the edit session mutates.
//!
//! The model is the source of truth for cell content. The rendering surface
//! is a derived view kept in sync through explicit hooks; nothing in this
//! crate reaches out to a surface. Cells are addressed by `(row, col)` index
//! pairs over the *editable* (non-pinned) column subset only; pinned columns
//! render in a separate read-only header region and are not addressable.
//!
//! Field-key resolution follows `field → name`: a column with no explicit
//! data field binds to the row value whose key equals the column name. A
//! column that resolves to an empty key would silently bind every lookup to
//! nothing, so construction rejects it up front instead of deferring the
//! defect to commit time.

use thiserror::Error;
use tracing::debug;

pub mod caret;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Column definition resolves to no usable field key (empty name, no field).
    #[error("column {0} has no usable field key")]
    UnkeyedColumn(usize),
    /// Every column is pinned; the grid would have no editable cells.
    #[error("grid has no editable columns")]
    NoEditableColumns,
}

/// Column definition. A bare string is shorthand for a non-pinned column
/// whose field key equals its display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    name: String,
    field: Option<String>,
    pinned: bool,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            pinned: false,
        }
    }

    /// Pinned columns render in the read-only header region and are excluded
    /// from addressing and navigation.
    pub fn pinned(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field: None,
            pinned: true,
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    /// Resolved lookup key into row values: `field` if present, else `name`.
    pub fn field_key(&self) -> &str {
        self.field.as_deref().unwrap_or(&self.name)
    }
}

impl From<&str> for ColumnDef {
    fn from(name: &str) -> Self {
        ColumnDef::new(name)
    }
}

/// Ordered key→text mapping supplied by the caller, one per row. The model
/// reads it to seed cell texts and hands a reference back out in the change
/// callback; it never writes into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowValues {
    entries: Vec<(String, String)>,
}

impl RowValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RowValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Address of an editable cell: row index plus index into the editable
/// column subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddr {
    pub row: usize,
    pub col: usize,
}

impl CellAddr {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Owned grid-of-cells model over the editable column subset.
#[derive(Debug, Clone)]
pub struct GridModel {
    columns: Vec<ColumnDef>,
    /// Resolved field keys of the editable columns, in column order.
    fields: Vec<String>,
    rows: Vec<RowValues>,
    /// Display text per editable cell, `cells[row][col]`.
    cells: Vec<Vec<String>>,
}

impl GridModel {
    /// Build the model, validating column definitions up front.
    pub fn new(
        columns: Vec<ColumnDef>,
        rows: Vec<RowValues>,
    ) -> Result<Self, GridError> {
        let mut fields = Vec::new();
        for (index, col) in columns.iter().enumerate() {
            if col.is_pinned() {
                continue;
            }
            let key = col.field_key();
            if key.is_empty() {
                return Err(GridError::UnkeyedColumn(index));
            }
            fields.push(key.to_string());
        }
        if fields.is_empty() {
            return Err(GridError::NoEditableColumns);
        }
        let cells = rows
            .iter()
            .map(|row| {
                fields
                    .iter()
                    .map(|f| row.get(f).unwrap_or_default().to_string())
                    .collect()
            })
            .collect();
        debug!(
            target: "model",
            rows = rows.len(),
            editable_columns = fields.len(),
            pinned_columns = columns.len() - fields.len(),
            "grid_model_built"
        );
        Ok(Self {
            columns,
            fields,
            rows,
            cells,
        })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn editable_column_count(&self) -> usize {
        self.fields.len()
    }

    /// All column definitions in declaration order, pinned included.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn pinned_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.is_pinned())
    }

    pub fn editable_columns(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| !c.is_pinned())
    }

    /// Field key of an editable column, `None` past the end.
    pub fn field(&self, col: usize) -> Option<&str> {
        self.fields.get(col).map(String::as_str)
    }

    pub fn row_values(&self, row: usize) -> Option<&RowValues> {
        self.rows.get(row)
    }

    pub fn contains(&self, addr: CellAddr) -> bool {
        addr.row < self.row_count() && addr.col < self.editable_column_count()
    }

    /// Validate a raw `(row, col)` pair coming off the surface.
    pub fn checked(&self, row: usize, col: usize) -> Option<CellAddr> {
        let addr = CellAddr::new(row, col);
        self.contains(addr).then_some(addr)
    }

    pub fn cell_text(&self, addr: CellAddr) -> Option<&str> {
        self.cells
            .get(addr.row)
            .and_then(|r| r.get(addr.col))
            .map(String::as_str)
    }

    /// Replace a cell's display text. Returns false (no mutation) for an
    /// out-of-grid address.
    pub fn set_cell_text(&mut self, addr: CellAddr, text: impl Into<String>) -> bool {
        match self
            .cells
            .get_mut(addr.row)
            .and_then(|r| r.get_mut(addr.col))
        {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    /// Bounds-checked neighbor arithmetic. No wraparound: a destination
    /// outside the grid yields `None`.
    pub fn neighbor(&self, addr: CellAddr, d_row: isize, d_col: isize) -> Option<CellAddr> {
        let row = addr.row.checked_add_signed(d_row)?;
        let col = addr.col.checked_add_signed(d_col)?;
        self.checked(row, col)
    }

    pub fn row_start(&self, addr: CellAddr) -> CellAddr {
        CellAddr::new(addr.row, 0)
    }

    pub fn row_end(&self, addr: CellAddr) -> CellAddr {
        CellAddr::new(addr.row, self.editable_column_count().saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn model() -> GridModel {
        let columns = vec![
            ColumnDef::pinned("name"),
            ColumnDef::from("Breed"),
            ColumnDef::new("Age").with_field("age_years"),
        ];
        let rows = vec![
            RowValues::new()
                .with("name", "Knocky")
                .with("Breed", "Jack Russell")
                .with("age_years", "16"),
            RowValues::new()
                .with("name", "Flor")
                .with("Breed", "Poodle")
                .with("age_years", "9"),
        ];
        GridModel::new(columns, rows).unwrap()
    }

    #[test]
    fn shorthand_column_uses_name_as_field_key() {
        let col = ColumnDef::from("Breed");
        assert_eq!(col.field_key(), "Breed");
        assert!(!col.is_pinned());
    }

    #[test]
    fn explicit_field_takes_priority_over_name() {
        let col = ColumnDef::new("Age").with_field("age_years");
        assert_eq!(col.field_key(), "age_years");
    }

    #[test]
    fn pinned_columns_are_excluded_from_addressing() {
        let m = model();
        assert_eq!(m.editable_column_count(), 2);
        assert_eq!(m.field(0), Some("Breed"));
        assert_eq!(m.field(1), Some("age_years"));
        assert_eq!(m.field(2), None);
        assert_eq!(m.pinned_columns().count(), 1);
    }

    #[test]
    fn cells_seed_from_row_values_via_field_keys() {
        let m = model();
        assert_eq!(m.cell_text(CellAddr::new(0, 0)), Some("Jack Russell"));
        assert_eq!(m.cell_text(CellAddr::new(1, 1)), Some("9"));
    }

    #[test]
    fn missing_row_value_seeds_empty_text() {
        let columns = vec![ColumnDef::from("Breed"), ColumnDef::from("Owner")];
        let rows = vec![RowValues::new().with("Breed", "Poodle")];
        let m = GridModel::new(columns, rows).unwrap();
        assert_eq!(m.cell_text(CellAddr::new(0, 1)), Some(""));
    }

    #[test]
    fn unkeyed_column_is_rejected_at_construction() {
        let err = GridModel::new(vec![ColumnDef::new("")], vec![]).unwrap_err();
        assert_eq!(err, GridError::UnkeyedColumn(0));
    }

    #[test]
    fn all_pinned_grid_is_rejected() {
        let err = GridModel::new(vec![ColumnDef::pinned("name")], vec![]).unwrap_err();
        assert_eq!(err, GridError::NoEditableColumns);
    }

    #[test]
    fn neighbor_clamps_at_grid_edges() {
        let m = model();
        let origin = CellAddr::new(0, 0);
        assert_eq!(m.neighbor(origin, -1, 0), None);
        assert_eq!(m.neighbor(origin, 0, -1), None);
        assert_eq!(m.neighbor(origin, 1, 0), Some(CellAddr::new(1, 0)));
        assert_eq!(m.neighbor(origin, 0, 1), Some(CellAddr::new(0, 1)));
        let corner = CellAddr::new(1, 1);
        assert_eq!(m.neighbor(corner, 1, 0), None);
        assert_eq!(m.neighbor(corner, 0, 1), None);
    }

    #[test]
    fn row_extremes() {
        let m = model();
        let mid = CellAddr::new(1, 1);
        assert_eq!(m.row_start(mid), CellAddr::new(1, 0));
        assert_eq!(m.row_end(CellAddr::new(0, 0)), CellAddr::new(0, 1));
    }

    #[test]
    fn set_cell_text_rejects_out_of_grid_address() {
        let mut m = model();
        assert!(m.set_cell_text(CellAddr::new(0, 0), "P"));
        assert_eq!(m.cell_text(CellAddr::new(0, 0)), Some("P"));
        assert!(!m.set_cell_text(CellAddr::new(9, 9), "x"));
    }

    #[test]
    fn row_values_preserve_caller_order() {
        let row = RowValues::new().with("b", "2").with("a", "1");
        assert_eq!(row.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(row.get("a"), Some("1"));
        assert_eq!(row.get("missing"), None);
    }
}
