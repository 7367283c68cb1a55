//! Event dispatch: the single entry point through which the hosting surface
//! drives the state machine.
//!
//! Per-state key handling mirrors the spreadsheet conventions:
//!
//! * Idle: keys navigate between cells; a printable key or Backspace drops
//!   into an overwrite quick-edit, F2 into an append edit.
//! * OverwriteEdit: text keys edit in place; directional keys still move
//!   the current *cell* (committing implicitly), Home/End jump to the row's
//!   first/last cell.
//! * AppendEdit: text keys edit in place; Left/Right move the caret within
//!   the text and stop at its boundaries, Up/Down never leave the cell,
//!   Home/End jump within the text.
//!
//! Enter and Tab always attempt the down/right move; when the grid edge
//! blocks it they commit in place instead.

use grid_events::{InputEvent, KeyCode, KeyEvent};
use grid_model::CellAddr;
use tracing::trace;

use crate::{DispatchResult, EditState, GridSession};

impl GridSession {
    /// Apply one input event and return whether it was intercepted and
    /// whether the surface should refresh.
    pub fn dispatch(&mut self, event: InputEvent) -> DispatchResult {
        trace!(
            target: "session.dispatch",
            state = ?self.state,
            event = event.kind(),
            "dispatch"
        );
        let result = if self.suppresses_cell_change(&event) {
            // Selection/pointer movement reported mid-composition is an IME
            // artifact; the current cell must not change under it.
            trace!(target: "session.dispatch", event = event.kind(), "suppressed_during_composition");
            DispatchResult::consumed()
        } else {
            match event {
                InputEvent::KeyPress(key) => self.on_key(key),
                InputEvent::CompositionStarted => self.on_composition_started(),
                InputEvent::CompositionUpdate { preedit } => {
                    self.on_composition_update(&preedit)
                }
                InputEvent::CompositionEnded { text } => self.on_composition_ended(&text),
                InputEvent::CellFocused { row, col } => self.on_cell_focused(row, col),
                InputEvent::CellBlurred => self.on_cell_blurred(),
                InputEvent::PointerDown { row, col } => self.on_pointer_down(row, col),
            }
        };
        debug_assert_eq!(
            self.snapshot.is_some(),
            self.state.is_editing(),
            "snapshot must exist exactly while a session is active"
        );
        result
    }

    fn on_key(&mut self, key: KeyEvent) -> DispatchResult {
        if self.composer.is_composing() {
            return self.composition_key_guard(&key);
        }
        // Any key outside an active composition invalidates the cached
        // composed text; a later commit must see live content.
        self.composer.invalidate();

        let Some(addr) = self.current else {
            return DispatchResult::pass();
        };
        match self.state {
            EditState::Idle => self.key_idle(addr, key),
            EditState::OverwriteEdit => self.key_overwrite(addr, key),
            EditState::AppendEdit => self.key_append(addr, key),
        }
    }

    fn key_idle(&mut self, addr: CellAddr, key: KeyEvent) -> DispatchResult {
        if key.is_printable() {
            let KeyCode::Char(c) = key.code else {
                return DispatchResult::consumed();
            };
            self.start_editing(addr, true);
            let mut buf = [0u8; 4];
            self.insert_at_caret(addr, c.encode_utf8(&mut buf));
            return DispatchResult::dirty();
        }
        match key.code {
            KeyCode::Up => self.arrow_move(-1, 0),
            KeyCode::Down | KeyCode::Enter => self.arrow_move(1, 0),
            KeyCode::Left => self.arrow_move(0, -1),
            KeyCode::Right | KeyCode::Tab => self.arrow_move(0, 1),
            KeyCode::Home => self.row_extreme(true),
            KeyCode::End => self.row_extreme(false),
            KeyCode::F(2) => {
                self.start_editing(addr, false);
                DispatchResult::dirty()
            }
            KeyCode::Backspace => {
                // Enters overwrite mode with the backspace already applied
                // (a no-op on the freshly cleared text).
                self.start_editing(addr, true);
                self.delete_before_caret(addr);
                DispatchResult::dirty()
            }
            KeyCode::Delete => self.clear_idle_cell(addr),
            _ => DispatchResult::consumed(),
        }
    }

    fn key_overwrite(&mut self, addr: CellAddr, key: KeyEvent) -> DispatchResult {
        if key.is_printable() {
            let KeyCode::Char(c) = key.code else {
                return DispatchResult::consumed();
            };
            let mut buf = [0u8; 4];
            self.insert_at_caret(addr, c.encode_utf8(&mut buf));
            return DispatchResult::dirty();
        }
        match key.code {
            KeyCode::Backspace => {
                self.delete_before_caret(addr);
                DispatchResult::dirty()
            }
            KeyCode::Delete => {
                self.delete_after_caret(addr);
                DispatchResult::dirty()
            }
            KeyCode::Esc => {
                self.cancel_editing(addr);
                DispatchResult::dirty()
            }
            KeyCode::Enter => self.move_or_commit(addr, 1, 0),
            KeyCode::Tab => self.move_or_commit(addr, 0, 1),
            // Directional keys leave the cell (the move commits implicitly);
            // a blocked move keeps the session alive.
            KeyCode::Up => self.arrow_move(-1, 0),
            KeyCode::Down => self.arrow_move(1, 0),
            KeyCode::Left => self.arrow_move(0, -1),
            KeyCode::Right => self.arrow_move(0, 1),
            KeyCode::Home => self.row_extreme(true),
            KeyCode::End => self.row_extreme(false),
            _ => DispatchResult::consumed(),
        }
    }

    fn key_append(&mut self, addr: CellAddr, key: KeyEvent) -> DispatchResult {
        if key.is_printable() {
            let KeyCode::Char(c) = key.code else {
                return DispatchResult::consumed();
            };
            let mut buf = [0u8; 4];
            self.insert_at_caret(addr, c.encode_utf8(&mut buf));
            return DispatchResult::dirty();
        }
        match key.code {
            KeyCode::Backspace => {
                self.delete_before_caret(addr);
                DispatchResult::dirty()
            }
            KeyCode::Delete => {
                self.delete_after_caret(addr);
                DispatchResult::dirty()
            }
            KeyCode::Esc => {
                self.cancel_editing(addr);
                DispatchResult::dirty()
            }
            KeyCode::Enter => self.move_or_commit(addr, 1, 0),
            KeyCode::Tab => self.move_or_commit(addr, 0, 1),
            KeyCode::Left => self.caret_step(addr, -1),
            KeyCode::Right => self.caret_step(addr, 1),
            // Never change cell while typing.
            KeyCode::Up | KeyCode::Down => DispatchResult::consumed(),
            KeyCode::Home => self.caret_jump(addr, true),
            KeyCode::End => self.caret_jump(addr, false),
            _ => DispatchResult::consumed(),
        }
    }

    fn arrow_move(&mut self, d_row: isize, d_col: isize) -> DispatchResult {
        if self.move_by(d_row, d_col) {
            DispatchResult::dirty()
        } else {
            DispatchResult::consumed()
        }
    }

    fn row_extreme(&mut self, start: bool) -> DispatchResult {
        let moved = if start {
            self.move_to_row_start()
        } else {
            self.move_to_row_end()
        };
        if moved {
            DispatchResult::dirty()
        } else {
            DispatchResult::consumed()
        }
    }

    /// Enter/Tab: attempt the boundary move (which itself commits the active
    /// session); when the grid edge blocks the move, commit in place.
    fn move_or_commit(&mut self, addr: CellAddr, d_row: isize, d_col: isize) -> DispatchResult {
        if !self.move_by(d_row, d_col) {
            self.end_editing(addr);
        }
        DispatchResult::dirty()
    }

    fn on_cell_focused(&mut self, row: usize, col: usize) -> DispatchResult {
        let Some(addr) = self.model.checked(row, col) else {
            return DispatchResult::pass();
        };
        if self.current == Some(addr) {
            return DispatchResult::pass();
        }
        self.activate_cell(addr);
        DispatchResult::dirty()
    }

    fn on_cell_blurred(&mut self) -> DispatchResult {
        let Some(prev) = self.current else {
            return DispatchResult::pass();
        };
        if self.state.is_editing() {
            // Commits even mid-composition; the composed-text cache keeps
            // the result deterministic once composition has ended.
            self.end_editing(prev);
        }
        self.current = None;
        self.caret = 0;
        self.hooks.current_cell_changed(Some(prev), None);
        DispatchResult::dirty()
    }

    fn on_pointer_down(&mut self, row: usize, col: usize) -> DispatchResult {
        let Some(addr) = self.model.checked(row, col) else {
            return DispatchResult::pass();
        };
        if self.state.is_editing() && self.current == Some(addr) {
            // In-cell selection while editing is the host's business.
            return DispatchResult::pass();
        }
        self.activate_cell(addr);
        DispatchResult::dirty()
    }
}
