//! Cursor coordinates and the modal column rules.

/// Logical position in a document: `row` is the line index, `col` the
/// character offset within that line's live text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

impl Cursor {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// The two editing modes governing cursor boundary rules.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The cursor rests on an existing character, vim-style.
    #[default]
    Normal,
    /// The cursor may sit one past the last character, for appending.
    Insert,
}

/// The largest column the cursor may occupy on a line of `line_len`
/// characters in `mode`.
pub fn max_column(mode: Mode, line_len: usize) -> usize {
    match mode {
        Mode::Insert => line_len,
        Mode::Normal => line_len.saturating_sub(1),
    }
}

/// Clamps `col` into `[0, max]`. Saturating: values past `max` land on it.
pub fn clamp_column(col: usize, max: usize) -> usize {
    col.min(max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normal_mode_rests_on_the_last_character() {
        assert_eq!(max_column(Mode::Normal, 5), 4);
        assert_eq!(max_column(Mode::Normal, 1), 0);
        assert_eq!(max_column(Mode::Normal, 0), 0);
    }

    #[test]
    fn insert_mode_allows_one_past_the_end() {
        assert_eq!(max_column(Mode::Insert, 5), 5);
        assert_eq!(max_column(Mode::Insert, 0), 0);
    }

    proptest! {
        #[test]
        fn clamped_columns_stay_in_bounds(col in any::<usize>(), max in 0usize..10_000) {
            let clamped = clamp_column(col, max);
            prop_assert!(clamped <= max);
            // Values already in range pass through unchanged.
            if col <= max {
                prop_assert_eq!(clamped, col);
            }
        }
    }
}
