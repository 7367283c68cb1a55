//! Caret arithmetic over a cell's text.
//!
//! Offsets are byte indices that must land on extended grapheme cluster
//! boundaries; a caret inside a cluster would split composed characters
//! (emoji sequences, Hangul jamo) on the next edit. All mutation helpers
//! clamp first, so a stale offset degrades to the nearest boundary at or
//! before it.

use unicode_segmentation::UnicodeSegmentation;

/// Previous grapheme boundary (returns 0 if already at or below the first).
pub fn prev_boundary(text: &str, byte: usize) -> usize {
    if byte == 0 || byte > text.len() {
        return 0;
    }
    let mut last = 0;
    for (idx, _) in text.grapheme_indices(true) {
        if idx >= byte {
            break;
        }
        last = idx;
    }
    last
}

/// Next grapheme boundary (returns `text.len()` if at or beyond the end).
pub fn next_boundary(text: &str, byte: usize) -> usize {
    if byte >= text.len() {
        return text.len();
    }
    for (idx, _) in text.grapheme_indices(true) {
        if idx > byte {
            return idx;
        }
    }
    text.len()
}

/// Snap an offset to the nearest grapheme boundary at or before it.
pub fn clamp(text: &str, byte: usize) -> usize {
    if byte >= text.len() {
        return text.len();
    }
    let mut last = 0;
    for (idx, _) in text.grapheme_indices(true) {
        if idx > byte {
            break;
        }
        last = idx;
    }
    last
}

/// Insert `s` at the caret; returns the caret position after the insertion.
pub fn insert(text: &mut String, at: usize, s: &str) -> usize {
    let at = clamp(text, at);
    text.insert_str(at, s);
    at + s.len()
}

/// Delete the grapheme before the caret; returns the new caret position.
/// No-op at offset 0.
pub fn delete_before(text: &mut String, at: usize) -> usize {
    let at = clamp(text, at);
    if at == 0 {
        return 0;
    }
    let start = prev_boundary(text, at);
    text.replace_range(start..at, "");
    start
}

/// Delete the grapheme after the caret; the caret does not move. No-op at
/// the end of the text.
pub fn delete_after(text: &mut String, at: usize) -> usize {
    let at = clamp(text, at);
    if at >= text.len() {
        return at;
    }
    let end = next_boundary(text, at);
    text.replace_range(at..end, "");
    at
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn boundaries_on_ascii() {
        assert_eq!(prev_boundary("abc", 2), 1);
        assert_eq!(prev_boundary("abc", 0), 0);
        assert_eq!(next_boundary("abc", 1), 2);
        assert_eq!(next_boundary("abc", 3), 3);
    }

    #[test]
    fn boundaries_on_cjk() {
        let s = "日本語";
        assert_eq!(next_boundary(s, 0), 3);
        assert_eq!(prev_boundary(s, 6), 3);
        assert_eq!(prev_boundary(s, 9), 6);
    }

    #[test]
    fn clamp_snaps_into_multibyte_cluster() {
        let s = "日本語";
        assert_eq!(clamp(s, 1), 0);
        assert_eq!(clamp(s, 4), 3);
        assert_eq!(clamp(s, 99), 9);
    }

    #[test]
    fn insert_returns_advanced_caret() {
        let mut s = String::from("Pdle");
        let caret = insert(&mut s, 1, "oo");
        assert_eq!(s, "Poodle");
        assert_eq!(caret, 3);
    }

    #[test]
    fn delete_before_removes_whole_cluster() {
        // Family emoji: one grapheme, many bytes.
        let mut s = String::from("a👨‍👩‍👧b");
        let b_at = s.len() - 1;
        let caret = delete_before(&mut s, b_at);
        assert_eq!(s, "ab");
        assert_eq!(caret, 1);
    }

    #[test]
    fn delete_before_at_start_is_noop() {
        let mut s = String::from("x");
        assert_eq!(delete_before(&mut s, 0), 0);
        assert_eq!(s, "x");
    }

    #[test]
    fn delete_after_keeps_caret() {
        let mut s = String::from("日本語");
        let caret = delete_after(&mut s, 3);
        assert_eq!(s, "日語");
        assert_eq!(caret, 3);
    }

    #[test]
    fn delete_after_at_end_is_noop() {
        let mut s = String::from("ab");
        assert_eq!(delete_after(&mut s, 2), 2);
        assert_eq!(s, "ab");
    }
}
