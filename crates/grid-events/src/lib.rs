//! Typed input events consumed by the grid session.
//!
//! The hosting surface (DOM table, TUI view, test harness) translates its
//! native input into these events and posts them into the session's single
//! dispatch entry point. Keeping the vocabulary in a leaf crate means the
//! model and session layers agree on one normalized representation and no
//! other code path can feed the state machine.
//!
//! Cell coordinates in focus/pointer events are raw `(row, col)` pairs over
//! the *editable* column subset; the session validates them against the live
//! grid before acting, so a stale event from the surface degrades to a no-op
//! instead of a panic.

use std::fmt;

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

/// Normalized logical key representations consumed by the session.
///
/// `Process` is the platform's composition-advancing key (the key value IMEs
/// report while a multi-stage composition is converting). It is the only key
/// allowed through while a composition is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Backspace,
    Tab,
    Delete,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    F(u8),
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    /// Key press with no modifiers held.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: KeyModifiers::empty(),
        }
    }

    pub fn with_mods(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    /// True for a single-character key that should reach the cell text.
    /// SHIFT is part of ordinary typing; CTRL/ALT chords are command keys
    /// and never insert.
    pub fn is_printable(&self) -> bool {
        matches!(self.code, KeyCode::Char(_))
            && !self.mods.intersects(KeyModifiers::CTRL | KeyModifiers::ALT)
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}

/// Input events posted by the hosting surface.
///
/// Composition events mirror the platform's multi-stage text input:
/// `CompositionUpdate` carries transient preedit text that must never be
/// mistaken for a final value; `CompositionEnded` carries the committed text.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    KeyPress(KeyEvent),
    CompositionStarted,
    CompositionUpdate { preedit: String },
    CompositionEnded { text: String },
    /// A cell became current through focus or selection movement.
    CellFocused { row: usize, col: usize },
    /// The editable region lost focus entirely.
    CellBlurred,
    /// Direct pointer interaction on a cell.
    PointerDown { row: usize, col: usize },
}

impl InputEvent {
    /// Stable discriminant name for logging. Composition payloads are user
    /// text and are never logged verbatim; log this instead.
    pub fn kind(&self) -> &'static str {
        match self {
            InputEvent::KeyPress(_) => "key_press",
            InputEvent::CompositionStarted => "composition_started",
            InputEvent::CompositionUpdate { .. } => "composition_update",
            InputEvent::CompositionEnded { .. } => "composition_ended",
            InputEvent::CellFocused { .. } => "cell_focused",
            InputEvent::CellBlurred => "cell_blurred",
            InputEvent::PointerDown { .. } => "pointer_down",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn key_event_display() {
        let k = KeyEvent::with_mods(KeyCode::Char('x'), KeyModifiers::CTRL);
        let s = format!("{}", k);
        assert!(s.contains("Char"));
    }

    #[test]
    fn plain_char_is_printable() {
        assert!(KeyEvent::new(KeyCode::Char('a')).is_printable());
        assert!(KeyEvent::with_mods(KeyCode::Char('A'), KeyModifiers::SHIFT).is_printable());
    }

    #[test]
    fn chords_and_named_keys_are_not_printable() {
        assert!(!KeyEvent::with_mods(KeyCode::Char('a'), KeyModifiers::CTRL).is_printable());
        assert!(!KeyEvent::with_mods(KeyCode::Char('a'), KeyModifiers::ALT).is_printable());
        assert!(!KeyEvent::new(KeyCode::Enter).is_printable());
        assert!(!KeyEvent::new(KeyCode::Process).is_printable());
    }

    #[test]
    fn event_kind_names_are_stable() {
        assert_eq!(
            InputEvent::KeyPress(KeyEvent::new(KeyCode::Tab)).kind(),
            "key_press"
        );
        assert_eq!(
            InputEvent::CompositionUpdate {
                preedit: "にほんご".into()
            }
            .kind(),
            "composition_update"
        );
        assert_eq!(
            InputEvent::CellFocused { row: 0, col: 0 }.kind(),
            "cell_focused"
        );
    }
}
