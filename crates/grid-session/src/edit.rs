//! Edit-session lifecycle (start, commit, cancel) and caret-local text
//! mutation.
//!
//! Commit resolves the final text in priority order: the cached
//! end-of-composition value if one is pending, else live cell content. The
//! resolved text is written back into the cell unconditionally, so a cached
//! composed value, once used for the diff, also becomes the persisted
//! display value. The notifier fires exactly once per genuine change.

use grid_model::{CellAddr, caret};
use tracing::debug;
use unicode_normalization::UnicodeNormalization;

use crate::{DispatchResult, EditState, GridSession, notify::CellChange};

impl GridSession {
    /// Begin a session on `addr`, capturing the snapshot. Overwrite mode
    /// clears the cell first (quick-edit by typing); append mode keeps the
    /// text and puts the caret at its end (explicit edit command).
    pub(crate) fn start_editing(&mut self, addr: CellAddr, overwrite: bool) {
        debug_assert!(
            matches!(self.state, EditState::Idle),
            "sessions are strictly non-overlapping"
        );
        let text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        self.snapshot = Some(text.clone());
        if overwrite {
            self.model.set_cell_text(addr, "");
            self.hooks.cell_text_updated(addr, "");
            self.caret = 0;
            self.state = EditState::OverwriteEdit;
        } else {
            self.caret = text.len();
            self.state = EditState::AppendEdit;
        }
        self.hooks.editing_changed(true);
        self.hooks.caret_moved(addr, self.caret);
        debug!(target: "session.edit", row = addr.row, col = addr.col, overwrite, "start_editing");
    }

    /// Commit the active session on `addr`: resolve the final text, write it
    /// back, notify on a genuine change, return to Idle.
    pub(crate) fn end_editing(&mut self, addr: CellAddr) {
        let old_text = self.snapshot.take().unwrap_or_default();
        let live = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        // Prefer the text captured at composition end over live content so a
        // commit racing a late composition artifact stays deterministic.
        let resolved = self.composer.take_last_composed().unwrap_or(live);
        let new_text: String = resolved.nfc().collect();
        self.model.set_cell_text(addr, new_text.as_str());
        self.hooks.cell_text_updated(addr, &new_text);
        self.state = EditState::Idle;
        self.hooks.editing_changed(false);
        self.composer.invalidate();
        let changed = new_text != old_text;
        if changed {
            self.notify_change(addr, &old_text, &new_text);
        }
        debug!(target: "session.edit", row = addr.row, col = addr.col, changed, "end_editing");
    }

    /// Discard the active session on `addr`: restore the snapshot verbatim,
    /// return to Idle. No notification fires.
    pub(crate) fn cancel_editing(&mut self, addr: CellAddr) {
        let snapshot = self.snapshot.take().unwrap_or_default();
        self.model.set_cell_text(addr, snapshot.as_str());
        self.hooks.cell_text_updated(addr, &snapshot);
        self.caret = 0;
        self.hooks.caret_moved(addr, 0);
        self.state = EditState::Idle;
        self.hooks.editing_changed(false);
        self.composer.invalidate();
        debug!(target: "session.edit", row = addr.row, col = addr.col, "cancel_editing");
    }

    fn notify_change(&self, addr: CellAddr, old_text: &str, new_text: &str) {
        let (Some(field), Some(row_values)) = (
            self.model.field(addr.col),
            self.model.row_values(addr.row),
        ) else {
            return;
        };
        debug!(target: "session.commit", row = addr.row, col = addr.col, field, "value_changed");
        let change = CellChange {
            row_values,
            field,
            row: addr.row,
            col: addr.col,
            new_text,
            old_text,
        };
        for obs in &self.observers {
            // Return value reserved for validation-driven rejection.
            let _ = obs.on_value_changed(&change);
        }
    }

    /// Delete on an idle cell. Default: an immediate commit of the empty
    /// string so the owner observes the clear. The legacy behavior is a raw
    /// content clear the change callback never sees.
    pub(crate) fn clear_idle_cell(&mut self, addr: CellAddr) -> DispatchResult {
        if self.options.delete_notifies {
            self.start_editing(addr, true);
            self.end_editing(addr);
        } else {
            self.model.set_cell_text(addr, "");
            self.caret = 0;
            self.hooks.cell_text_updated(addr, "");
            self.hooks.caret_moved(addr, 0);
            debug!(target: "session.edit", row = addr.row, col = addr.col, "silent_clear");
        }
        DispatchResult::dirty()
    }

    pub(crate) fn insert_at_caret(&mut self, addr: CellAddr, s: &str) {
        let mut text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        self.caret = caret::insert(&mut text, self.caret, s);
        self.model.set_cell_text(addr, text.as_str());
        self.hooks.cell_text_updated(addr, &text);
        self.hooks.caret_moved(addr, self.caret);
    }

    pub(crate) fn delete_before_caret(&mut self, addr: CellAddr) {
        let mut text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        self.caret = caret::delete_before(&mut text, self.caret);
        self.model.set_cell_text(addr, text.as_str());
        self.hooks.cell_text_updated(addr, &text);
        self.hooks.caret_moved(addr, self.caret);
    }

    pub(crate) fn delete_after_caret(&mut self, addr: CellAddr) {
        let mut text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        self.caret = caret::delete_after(&mut text, self.caret);
        self.model.set_cell_text(addr, text.as_str());
        self.hooks.cell_text_updated(addr, &text);
        self.hooks.caret_moved(addr, self.caret);
    }

    /// Step the caret one grapheme within the cell text. Intercepted at the
    /// text boundaries so the caret cannot leave the cell mid-text.
    pub(crate) fn caret_step(&mut self, addr: CellAddr, dir: isize) -> DispatchResult {
        let text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        let next = if dir < 0 {
            if self.caret == 0 {
                return DispatchResult::consumed();
            }
            caret::prev_boundary(&text, self.caret)
        } else {
            if self.caret >= text.len() {
                return DispatchResult::consumed();
            }
            caret::next_boundary(&text, self.caret)
        };
        self.caret = next;
        self.hooks.caret_moved(addr, next);
        DispatchResult::dirty()
    }

    /// Jump the caret to the start or end of the cell text.
    pub(crate) fn caret_jump(&mut self, addr: CellAddr, to_start: bool) -> DispatchResult {
        let len = self.model.cell_text(addr).unwrap_or_default().len();
        self.caret = if to_start { 0 } else { len };
        self.hooks.caret_moved(addr, self.caret);
        DispatchResult::dirty()
    }
}
