//! Cell-editing state machine over a [`grid_model::GridModel`].
//!
//! A session owns the single "current cell" reference and the three-state
//! edit lifecycle around it:
//!
//! * `Idle`: keys navigate between cells.
//! * `OverwriteEdit`: entered by a printable keystroke, Backspace, or a bare
//!   composition start while idle; the cell's prior text is cleared first.
//! * `AppendEdit`: entered by the explicit edit command (F2); prior text is
//!   preserved and the caret starts at its end.
//!
//! Core invariants (must hold after every dispatch):
//! * At most one cell is ever mid-edit; moving the current cell commits the
//!   old session *before* the new cell is marked current.
//! * The pre-edit snapshot exists exactly while a session is active; commit
//!   and cancel both clear it.
//! * After any programmatic cell change the caret sits at byte offset 0 of
//!   the destination. Multi-stage composition inserts at the caret, and any
//!   other placement desynchronizes where composed text lands.
//! * All state mutation happens inside [`GridSession::dispatch`]; the
//!   hosting surface posts typed events and consumes hook callbacks, nothing
//!   else.
//!
//! Failure modes are no-ops or boolean returns (navigation past an edge,
//! stale coordinates off the surface); the dispatch path never panics and
//! never raises to the caller.

mod compose;
mod cursor;
mod dispatch;
mod edit;
mod hooks;
mod notify;

use compose::CompositionTracker;
use grid_model::{CellAddr, GridModel};

pub use hooks::{NoopSurfaceHooks, SurfaceHooks};
pub use notify::{CellChange, ChangeObserver};

/// Closed edit-state variant; every event handler matches it exhaustively so
/// an unreachable state combination cannot silently fall through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    OverwriteEdit,
    AppendEdit,
}

impl EditState {
    pub fn is_editing(self) -> bool {
        !matches!(self, EditState::Idle)
    }
}

/// Behavior knobs applied by the embedding host (typically from
/// `grid-config`). Plain data so the session crate stays config-format
/// agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Route Delete-on-an-idle-cell through the commit path (the owner
    /// observes the clear). `false` restores the legacy silent raw clear.
    pub delete_notifies: bool,
    /// Intercept every key except the composition-advancing Process key
    /// while a composition is active.
    pub guard_composition_keys: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            delete_notifies: true,
            guard_composition_keys: true,
        }
    }
}

/// Result of dispatching a single input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchResult {
    /// The event was intercepted; the host must not apply its own default
    /// handling for it.
    pub consumed: bool,
    /// Model or marker state changed; the host should refresh its surface.
    pub dirty: bool,
}

impl DispatchResult {
    /// Event not handled here; the host's default behavior applies.
    pub fn pass() -> Self {
        Self {
            consumed: false,
            dirty: false,
        }
    }
    /// Intercepted with no visible effect.
    pub fn consumed() -> Self {
        Self {
            consumed: true,
            dirty: false,
        }
    }
    /// Intercepted and state changed.
    pub fn dirty() -> Self {
        Self {
            consumed: true,
            dirty: true,
        }
    }
}

/// The editing session: current cell, edit state, snapshot, composition
/// tracking, change observers, and surface hooks, all mutated only through
/// [`GridSession::dispatch`].
pub struct GridSession {
    model: GridModel,
    current: Option<CellAddr>,
    /// Byte offset of the text-insertion caret within the current cell.
    caret: usize,
    state: EditState,
    /// Text captured when the active session started; present iff editing.
    snapshot: Option<String>,
    composer: CompositionTracker,
    observers: Vec<Box<dyn ChangeObserver>>,
    hooks: Box<dyn SurfaceHooks>,
    options: SessionOptions,
}

impl GridSession {
    pub fn new(model: GridModel) -> Self {
        Self::with_hooks(model, Box::new(NoopSurfaceHooks))
    }

    pub fn with_hooks(model: GridModel, hooks: Box<dyn SurfaceHooks>) -> Self {
        Self {
            model,
            current: None,
            caret: 0,
            state: EditState::Idle,
            snapshot: None,
            composer: CompositionTracker::new(),
            observers: Vec::new(),
            hooks,
            options: SessionOptions::default(),
        }
    }

    pub fn set_options(&mut self, options: SessionOptions) {
        self.options = options;
    }

    pub fn options(&self) -> SessionOptions {
        self.options
    }

    pub fn add_observer(&mut self, observer: Box<dyn ChangeObserver>) {
        self.observers.push(observer);
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn current_cell(&self) -> Option<CellAddr> {
        self.current
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn edit_state(&self) -> EditState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn is_composing(&self) -> bool {
        self.composer.is_composing()
    }
}
