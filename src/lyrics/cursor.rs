//! Playback position to current lyric line resolution.

use super::parser::LyricLine;

/// Index of the last line starting at or before `position_ms`.
///
/// Returns `None` for an empty sequence or a position before the first line.
/// Past the final line, the final line stays current.
pub fn current_index(lines: &[LyricLine], position_ms: i64) -> Option<usize> {
    let position = u64::try_from(position_ms).ok()?;
    lines
        .partition_point(|line| line.time_ms <= position)
        .checked_sub(1)
}

/// Outcome of feeding a position to a [`LyricsCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorUpdate {
    /// The resolved line is the same as before.
    Unchanged,
    /// A different line (or none) is now current.
    Changed(Option<usize>),
}

/// Edge-triggered tracker of the current lyric line.
///
/// Holds only the last resolved index; the lines are borrowed read-only on
/// every update so polling can never trigger a reparse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LyricsCursor {
    current: Option<usize>,
}

impl LyricsCursor {
    /// Create a cursor with no current line.
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Currently resolved line.
    pub const fn current(&self) -> Option<usize> {
        self.current
    }

    /// Resolve `position_ms` against `lines`, reporting only transitions.
    pub fn update(&mut self, lines: &[LyricLine], position_ms: i64) -> CursorUpdate {
        let next = current_index(lines, position_ms);
        if next == self.current {
            CursorUpdate::Unchanged
        } else {
            self.current = next;
            CursorUpdate::Changed(next)
        }
    }

    /// Return to "no current line", e.g. when playback stops or ends.
    ///
    /// Returns whether the cursor was pointing at a line.
    pub fn reset(&mut self) -> bool {
        self.current.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_lines() -> Vec<LyricLine> {
        vec![LyricLine::new(0, "A"), LyricLine::new(2_000, "B")]
    }

    #[test]
    fn test_last_at_or_before() {
        let lines = two_lines();
        assert_eq!(current_index(&lines, 500), Some(0));
        assert_eq!(current_index(&lines, 2_000), Some(1));
        assert_eq!(current_index(&lines, 2_500), Some(1));
        assert_eq!(current_index(&lines, -1), None);
        assert_eq!(current_index(&[], 1_000), None);
    }

    #[test]
    fn test_before_first_line() {
        let lines = vec![LyricLine::new(1_000, "late")];
        assert_eq!(current_index(&lines, 999), None);
        assert_eq!(current_index(&lines, 1_000), Some(0));
    }

    #[test]
    fn test_duplicate_times_resolve_to_last() {
        let lines = vec![
            LyricLine::new(0, "a"),
            LyricLine::new(1_000, "b"),
            LyricLine::new(1_000, "c"),
        ];
        assert_eq!(current_index(&lines, 1_000), Some(2));
    }

    #[test]
    fn test_cursor_is_edge_triggered() {
        let lines = two_lines();
        let mut cursor = LyricsCursor::new();

        assert_eq!(cursor.update(&lines, 0), CursorUpdate::Changed(Some(0)));
        assert_eq!(cursor.update(&lines, 100), CursorUpdate::Unchanged);
        assert_eq!(cursor.update(&lines, 1_900), CursorUpdate::Unchanged);
        assert_eq!(cursor.update(&lines, 2_000), CursorUpdate::Changed(Some(1)));
        assert_eq!(cursor.update(&lines, 90_000), CursorUpdate::Unchanged);
        assert_eq!(cursor.current(), Some(1));
    }

    #[test]
    fn test_seek_backwards_before_first_line() {
        let lines = vec![LyricLine::new(500, "x")];
        let mut cursor = LyricsCursor::new();
        assert_eq!(cursor.update(&lines, 600), CursorUpdate::Changed(Some(0)));
        assert_eq!(cursor.update(&lines, 100), CursorUpdate::Changed(None));
        assert_eq!(cursor.update(&lines, 200), CursorUpdate::Unchanged);
    }

    #[test]
    fn test_reset() {
        let lines = two_lines();
        let mut cursor = LyricsCursor::new();
        assert!(!cursor.reset());
        cursor.update(&lines, 2_100);
        assert!(cursor.reset());
        assert_eq!(cursor.current(), None);
        assert_eq!(cursor.update(&lines, 2_100), CursorUpdate::Changed(Some(1)));
    }
}
