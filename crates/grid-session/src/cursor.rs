//! Cursor controller: the only paths that change the current cell.
//!
//! Every programmatic move ends with the caret at byte offset 0 of the
//! destination, never at the end, never mid-content, regardless of which
//! direction the move came from. Composed (multi-stage) input inserts at the
//! caret; any other placement desynchronizes where the next composed
//! character lands relative to where the user perceives the caret.

use grid_model::CellAddr;
use tracing::trace;

use crate::GridSession;

impl GridSession {
    /// Move the current cell by a row/column offset. Returns `false` and
    /// performs no mutation when the destination falls outside the grid (no
    /// wraparound) or when no cell is current.
    pub fn move_by(&mut self, d_row: isize, d_col: isize) -> bool {
        let Some(cur) = self.current else {
            return false;
        };
        let Some(dest) = self.model.neighbor(cur, d_row, d_col) else {
            trace!(target: "session.cursor", d_row, d_col, "move_blocked_at_edge");
            return false;
        };
        self.activate_cell(dest);
        true
    }

    /// Move to the first editable cell of the current row.
    pub fn move_to_row_start(&mut self) -> bool {
        let Some(cur) = self.current else {
            return false;
        };
        let dest = self.model.row_start(cur);
        self.activate_cell(dest);
        true
    }

    /// Move to the last editable cell of the current row.
    pub fn move_to_row_end(&mut self) -> bool {
        let Some(cur) = self.current else {
            return false;
        };
        let dest = self.model.row_end(cur);
        self.activate_cell(dest);
        true
    }

    /// Make `dest` current. An active session on the previous cell is
    /// committed first and completes fully (state reset, notifier invoked if
    /// applicable) before the new cell is marked current. Landing on the
    /// cell that is already current renormalizes the caret without
    /// committing.
    pub(crate) fn activate_cell(&mut self, dest: CellAddr) {
        let prev = self.current;
        if let Some(p) = prev
            && p != dest
            && self.state.is_editing()
        {
            self.end_editing(p);
        }
        if prev != Some(dest) {
            self.current = Some(dest);
            self.hooks.current_cell_changed(prev, Some(dest));
            self.hooks.scroll_to(dest);
        }
        self.caret = 0;
        self.hooks.caret_moved(dest, 0);
    }
}
