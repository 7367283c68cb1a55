//! Cursor navigation: boundary behavior, caret normalization, and the
//! single-current-marker invariant, observed through recording surface hooks.

use std::cell::RefCell;
use std::rc::Rc;

use grid_events::{InputEvent, KeyCode, KeyEvent};
use grid_model::{CellAddr, ColumnDef, GridModel, RowValues};
use grid_session::{GridSession, SurfaceHooks};

#[derive(Debug, Clone, PartialEq)]
enum Hook {
    Marker(Option<CellAddr>, Option<CellAddr>),
    Editing(bool),
    Caret(CellAddr, usize),
    Text(CellAddr, String),
    Scroll(CellAddr),
}

#[derive(Clone, Default)]
struct RecordingHooks {
    events: Rc<RefCell<Vec<Hook>>>,
}

impl SurfaceHooks for RecordingHooks {
    fn current_cell_changed(&mut self, previous: Option<CellAddr>, current: Option<CellAddr>) {
        self.events.borrow_mut().push(Hook::Marker(previous, current));
    }
    fn editing_changed(&mut self, editing: bool) {
        self.events.borrow_mut().push(Hook::Editing(editing));
    }
    fn caret_moved(&mut self, addr: CellAddr, byte: usize) {
        self.events.borrow_mut().push(Hook::Caret(addr, byte));
    }
    fn cell_text_updated(&mut self, addr: CellAddr, text: &str) {
        self.events
            .borrow_mut()
            .push(Hook::Text(addr, text.to_string()));
    }
    fn scroll_to(&mut self, addr: CellAddr) {
        self.events.borrow_mut().push(Hook::Scroll(addr));
    }
}

fn model_3x3() -> GridModel {
    let columns = vec![
        ColumnDef::pinned("id"),
        ColumnDef::from("a"),
        ColumnDef::from("b"),
        ColumnDef::from("c"),
    ];
    let rows = (0..3)
        .map(|r| {
            RowValues::new()
                .with("id", format!("row{r}"))
                .with("a", format!("a{r}"))
                .with("b", format!("b{r}"))
                .with("c", format!("c{r}"))
        })
        .collect();
    GridModel::new(columns, rows).unwrap()
}

fn session_with_hooks() -> (GridSession, Rc<RefCell<Vec<Hook>>>) {
    let hooks = RecordingHooks::default();
    let events = hooks.events.clone();
    (
        GridSession::with_hooks(model_3x3(), Box::new(hooks)),
        events,
    )
}

fn press(session: &mut GridSession, code: KeyCode) -> grid_session::DispatchResult {
    session.dispatch(InputEvent::KeyPress(KeyEvent::new(code)))
}

fn focus(session: &mut GridSession, row: usize, col: usize) {
    session.dispatch(InputEvent::CellFocused { row, col });
}

#[test]
fn moves_without_a_current_cell_fail() {
    let (mut s, _) = session_with_hooks();
    assert!(!s.move_by(1, 0));
    assert!(!s.move_to_row_start());
    assert!(!s.move_to_row_end());
}

#[test]
fn boundary_moves_never_change_the_current_cell() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 0, 0);
    assert!(!s.move_by(-1, 0));
    assert!(!s.move_by(0, -1));
    assert_eq!(s.current_cell(), Some(CellAddr::new(0, 0)));

    focus(&mut s, 2, 2);
    assert!(!s.move_by(1, 0));
    assert!(!s.move_by(0, 1));
    assert_eq!(s.current_cell(), Some(CellAddr::new(2, 2)));
}

#[test]
fn successful_moves_land_with_caret_at_offset_zero() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 1, 1);
    press(&mut s, KeyCode::Down);
    press(&mut s, KeyCode::Right);
    press(&mut s, KeyCode::Up);
    press(&mut s, KeyCode::Left);

    assert_eq!(s.caret(), 0);
    let carets: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Hook::Caret(addr, byte) => Some((*addr, *byte)),
            _ => None,
        })
        .collect();
    assert!(!carets.is_empty());
    assert!(carets.iter().all(|(_, byte)| *byte == 0));
}

#[test]
fn enter_and_tab_navigate_while_idle() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 0, 0);
    press(&mut s, KeyCode::Enter);
    assert_eq!(s.current_cell(), Some(CellAddr::new(1, 0)));
    press(&mut s, KeyCode::Tab);
    assert_eq!(s.current_cell(), Some(CellAddr::new(1, 1)));
}

#[test]
fn enter_and_tab_at_the_edge_are_noops_while_idle() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 2, 2);
    let r = press(&mut s, KeyCode::Enter);
    assert!(r.consumed && !r.dirty);
    let r = press(&mut s, KeyCode::Tab);
    assert!(r.consumed && !r.dirty);
    assert_eq!(s.current_cell(), Some(CellAddr::new(2, 2)));
}

#[test]
fn home_and_end_jump_to_row_extremes_while_idle() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 1, 1);
    press(&mut s, KeyCode::Home);
    assert_eq!(s.current_cell(), Some(CellAddr::new(1, 0)));
    press(&mut s, KeyCode::End);
    assert_eq!(s.current_cell(), Some(CellAddr::new(1, 2)));
}

#[test]
fn row_extreme_onto_the_same_cell_renormalizes_without_commit() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 1, 0);
    press(&mut s, KeyCode::Char('x'));
    // Home while overwrite-editing the first cell of the row: destination is
    // the cell itself, so the session survives and the caret resets.
    press(&mut s, KeyCode::Home);
    assert!(s.is_editing());
    assert_eq!(s.caret(), 0);
    assert_eq!(s.current_cell(), Some(CellAddr::new(1, 0)));
}

#[test]
fn focus_event_moves_the_marker_exactly_once() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 0, 0);
    focus(&mut s, 1, 2);

    let markers: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Hook::Marker(prev, cur) => Some((*prev, *cur)),
            _ => None,
        })
        .collect();
    assert_eq!(
        markers,
        vec![
            (None, Some(CellAddr::new(0, 0))),
            (Some(CellAddr::new(0, 0)), Some(CellAddr::new(1, 2))),
        ]
    );
}

#[test]
fn refocusing_the_current_cell_is_a_noop() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 0, 0);
    let before = events.borrow().len();
    let r = s.dispatch(InputEvent::CellFocused { row: 0, col: 0 });
    assert!(!r.consumed && !r.dirty);
    assert_eq!(events.borrow().len(), before);
}

#[test]
fn stale_surface_coordinates_are_ignored() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 0, 0);
    let r = s.dispatch(InputEvent::CellFocused { row: 9, col: 0 });
    assert!(!r.consumed && !r.dirty);
    let r = s.dispatch(InputEvent::PointerDown { row: 0, col: 9 });
    assert!(!r.consumed && !r.dirty);
    assert_eq!(s.current_cell(), Some(CellAddr::new(0, 0)));
}

#[test]
fn pointer_down_sets_current_with_caret_at_zero() {
    let (mut s, _) = session_with_hooks();
    s.dispatch(InputEvent::PointerDown { row: 2, col: 1 });
    assert_eq!(s.current_cell(), Some(CellAddr::new(2, 1)));
    assert_eq!(s.caret(), 0);
}

#[test]
fn pointer_down_on_the_editing_cell_is_left_to_the_host() {
    let (mut s, _) = session_with_hooks();
    focus(&mut s, 0, 0);
    press(&mut s, KeyCode::F(2));
    let r = s.dispatch(InputEvent::PointerDown { row: 0, col: 0 });
    assert!(!r.consumed);
    assert!(s.is_editing());
}

#[test]
fn blur_clears_the_current_cell() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 1, 1);
    s.dispatch(InputEvent::CellBlurred);
    assert_eq!(s.current_cell(), None);
    let last_marker = events
        .borrow()
        .iter()
        .rev()
        .find_map(|e| match e {
            Hook::Marker(prev, cur) => Some((*prev, *cur)),
            _ => None,
        })
        .unwrap();
    assert_eq!(last_marker, (Some(CellAddr::new(1, 1)), None));
}

#[test]
fn at_most_one_cell_carries_the_marker() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 0, 0);
    press(&mut s, KeyCode::Down);
    press(&mut s, KeyCode::Right);
    press(&mut s, KeyCode::Char('x'));
    press(&mut s, KeyCode::Enter);
    press(&mut s, KeyCode::Tab);
    s.dispatch(InputEvent::CellBlurred);

    // Replay the marker stream: each transition must hand the marker off
    // from the previous holder, never minting a second one.
    let mut holder: Option<CellAddr> = None;
    for e in events.borrow().iter() {
        if let Hook::Marker(prev, cur) = e {
            assert_eq!(*prev, holder, "marker handed off from the wrong cell");
            holder = *cur;
        }
    }
    assert_eq!(holder, None);
}

#[test]
fn hooks_mirror_text_and_editing_state() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 0, 0);
    press(&mut s, KeyCode::Char('z'));
    press(&mut s, KeyCode::Esc);

    let texts: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Hook::Text(addr, text) => Some((*addr, text.clone())),
            _ => None,
        })
        .collect();
    // Overwrite clear, the insertion, then the cancel write-back.
    assert_eq!(
        texts,
        vec![
            (CellAddr::new(0, 0), String::new()),
            (CellAddr::new(0, 0), "z".to_string()),
            (CellAddr::new(0, 0), "a0".to_string()),
        ]
    );
    let editing: Vec<bool> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Hook::Editing(editing) => Some(*editing),
            _ => None,
        })
        .collect();
    assert_eq!(editing, vec![true, false]);
}

#[test]
fn scroll_hook_follows_the_current_cell() {
    let (mut s, events) = session_with_hooks();
    focus(&mut s, 0, 0);
    press(&mut s, KeyCode::Down);
    let scrolls: Vec<_> = events
        .borrow()
        .iter()
        .filter_map(|e| match e {
            Hook::Scroll(addr) => Some(*addr),
            _ => None,
        })
        .collect();
    assert_eq!(
        scrolls,
        vec![CellAddr::new(0, 0), CellAddr::new(1, 0)]
    );
}
