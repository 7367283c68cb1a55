//! Composition tracking: multi-stage text input (IME) support.
//!
//! A composition spans multiple events (start → preedit updates → end) and
//! the state machine must stay consistent across that span. The tracker
//! records the cell text and caret at composition start (the *base*), so
//! every preedit update re-derives the displayed text from the base instead
//! of trusting whatever the previous update left behind. On end, the full
//! cell text is cached as the authoritative "just finished composing" value;
//! a commit that races ahead of the surface's own finalization (cell blurred
//! before the platform settles) resolves from the cache, not from live
//! content that a late artifact may have clobbered.
//!
//! Preedit payloads are user text and are never logged verbatim; handlers
//! log character counts only.

use grid_events::InputEvent;
use grid_model::caret;
use tracing::{debug, trace};

use crate::{DispatchResult, EditState, GridSession};

#[derive(Debug, Default)]
pub(crate) struct CompositionTracker {
    composing: bool,
    /// Cell text and caret captured when the composition began. Retained
    /// after the composition ends so a stray late update still re-derives
    /// from the same base.
    base: Option<(String, usize)>,
    /// Full cell text captured at composition end; consumed by the next
    /// commit, invalidated by the next non-composing key event.
    last_composed: Option<String>,
}

impl CompositionTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_composing(&self) -> bool {
        self.composing
    }

    pub(crate) fn begin(&mut self, text: String, caret: usize) {
        self.composing = true;
        self.base = Some((text, caret));
        self.last_composed = None;
    }

    pub(crate) fn base_snapshot(&self) -> Option<(String, usize)> {
        self.base.clone()
    }

    pub(crate) fn finish(&mut self, full_text: String) {
        self.composing = false;
        self.last_composed = Some(full_text);
    }

    pub(crate) fn take_last_composed(&mut self) -> Option<String> {
        self.last_composed.take()
    }

    /// Drop all transient composition state. Called on every key event that
    /// is not part of an active composition and when a session ends.
    pub(crate) fn invalidate(&mut self) {
        self.composing = false;
        self.base = None;
        self.last_composed = None;
    }
}

impl GridSession {
    pub(crate) fn on_composition_started(&mut self) -> DispatchResult {
        let Some(addr) = self.current else {
            return DispatchResult::pass();
        };
        let started = self.state == EditState::Idle;
        if started {
            // A bare composition start is itself an edit trigger, symmetric
            // with a printable keystroke.
            self.start_editing(addr, true);
        }
        let text = self
            .model
            .cell_text(addr)
            .unwrap_or_default()
            .to_string();
        self.composer.begin(text, self.caret);
        debug!(target: "session.compose", row = addr.row, col = addr.col, "composition_started");
        if started {
            DispatchResult::dirty()
        } else {
            DispatchResult::pass()
        }
    }

    pub(crate) fn on_composition_update(&mut self, preedit: &str) -> DispatchResult {
        let Some(addr) = self.current else {
            return DispatchResult::pass();
        };
        let Some((base, base_caret)) = self.composer.base_snapshot() else {
            // Update with no preceding start: nothing to derive from.
            return DispatchResult::pass();
        };
        let mut text = base;
        let new_caret = caret::insert(&mut text, base_caret, preedit);
        self.model.set_cell_text(addr, text.as_str());
        self.caret = new_caret;
        self.hooks.cell_text_updated(addr, &text);
        self.hooks.caret_moved(addr, new_caret);
        trace!(
            target: "session.compose",
            preedit_chars = preedit.chars().count(),
            "composition_update"
        );
        DispatchResult::dirty()
    }

    pub(crate) fn on_composition_ended(&mut self, committed: &str) -> DispatchResult {
        let Some(addr) = self.current else {
            // Focus left (and committed) before the composition finalized.
            self.composer.invalidate();
            return DispatchResult::pass();
        };
        let Some((base, base_caret)) = self.composer.base_snapshot() else {
            self.composer.invalidate();
            return DispatchResult::pass();
        };
        let mut text = base;
        let new_caret = caret::insert(&mut text, base_caret, committed);
        self.model.set_cell_text(addr, text.as_str());
        self.caret = new_caret;
        self.hooks.cell_text_updated(addr, &text);
        self.hooks.caret_moved(addr, new_caret);
        self.composer.finish(text);
        debug!(
            target: "session.compose",
            committed_chars = committed.chars().count(),
            "composition_ended"
        );
        DispatchResult::dirty()
    }

    /// Key guard while a composition is active: only the platform's own
    /// composition-advancing key passes; everything else is intercepted so
    /// the caret cannot jump mid-conversion (a known IME timing defect on
    /// some platforms leaks cursor keys through).
    pub(crate) fn composition_key_guard(&self, key: &grid_events::KeyEvent) -> DispatchResult {
        if self.options.guard_composition_keys
            && key.code != grid_events::KeyCode::Process
        {
            trace!(target: "session.dispatch", key = %key, "suppressed_during_composition");
            return DispatchResult::consumed();
        }
        DispatchResult::pass()
    }

    /// Events that must not move the current cell while composing.
    pub(crate) fn suppresses_cell_change(&self, event: &InputEvent) -> bool {
        self.composer.is_composing()
            && matches!(
                event,
                InputEvent::CellFocused { .. } | InputEvent::PointerDown { .. }
            )
    }
}
