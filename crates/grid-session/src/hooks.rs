//! Surface synchronization hooks.
//!
//! The rendering surface is a derived view of the model: the session pushes
//! every visual side effect through this trait (marker toggles, caret
//! placement, text write-back, scroll-into-view) and never reads the surface
//! back. Implementations map these onto whatever the host renders: DOM
//! class toggles and Range placement, a TUI repaint, a test recorder.

use grid_model::CellAddr;

/// Hooks should not block; they are invoked synchronously inside dispatch.
pub trait SurfaceHooks {
    /// The "current cell" marker moved. `current` is `None` when the grid
    /// lost focus entirely. Exactly one cell, or none, carries the marker.
    fn current_cell_changed(
        &mut self,
        _previous: Option<CellAddr>,
        _current: Option<CellAddr>,
    ) {
    }

    /// The editable region's "editing" marker toggled.
    fn editing_changed(&mut self, _editing: bool) {}

    /// The text-insertion caret landed at a byte offset inside a cell.
    fn caret_moved(&mut self, _addr: CellAddr, _byte: usize) {}

    /// A cell's display text changed and must be redrawn.
    fn cell_text_updated(&mut self, _addr: CellAddr, _text: &str) {}

    /// The current cell should be brought into view.
    fn scroll_to(&mut self, _addr: CellAddr) {}
}

/// Default no-op hooks implementation.
pub struct NoopSurfaceHooks;

impl SurfaceHooks for NoopSurfaceHooks {}
