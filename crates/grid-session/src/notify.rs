//! Change notification surface: the only data the core emits to the outside
//! world.

use grid_model::RowValues;

/// One committed cell change. `old_text` is the session snapshot, `new_text`
/// the resolved final text; the notifier only fires when they differ.
#[derive(Debug, Clone, Copy)]
pub struct CellChange<'a> {
    /// The caller-owned row mapping the edited cell binds to.
    pub row_values: &'a RowValues,
    /// Resolved data-field key of the edited column.
    pub field: &'a str,
    pub row: usize,
    pub col: usize,
    pub new_text: &'a str,
    pub old_text: &'a str,
}

/// External change hook. Invoked at most once per commit, only when the text
/// actually changed, never on cancel, and never for pinned columns (which
/// cannot become current).
pub trait ChangeObserver {
    /// The return value is reserved for validation-driven rejection of an
    /// edit; no code path inspects it yet.
    fn on_value_changed(&self, change: &CellChange<'_>) -> bool;
}
