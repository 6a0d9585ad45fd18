//! The editing session: document, cursor, viewport and history together.
//!
//! One session owns one document. Edit intents arrive one at a time (the
//! application is single-threaded and event-driven), mutate the document and
//! cursor, and mark the session dirty; the dirty state is committed to
//! history lazily, once per draw cycle, rather than on every keystroke.

use std::io::BufRead;

use crate::cursor::{clamp_column, max_column, Cursor, Mode};
use crate::document::Document;
use crate::error::Result;
use crate::history::{History, Snapshot, DEFAULT_MAX_UNDO};

/// Rows kept between the cursor and the window edge before the viewport
/// scrolls instead of the cursor moving within the window.
pub const DEFAULT_SCROLL_MARGIN: usize = 10;

/// A single editing session over one document.
#[derive(Debug)]
pub struct Editor {
    document: Document,
    cursor: Cursor,
    mode: Mode,
    // First visible row; kept separate from the cursor so the window can
    // scroll while the logical position stays put.
    top_row: usize,
    view_height: usize,
    scroll_margin: usize,
    history: History,
    // Edited since the last history commit.
    dirty: bool,
    // Edited since the last successful save.
    modified: bool,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    pub fn from_str(text: &str) -> Self {
        Self::with_document(Document::from_str(text))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        Ok(Self::with_document(Document::from_reader(reader)?))
    }

    fn with_document(document: Document) -> Self {
        let cursor = Cursor::default();
        let history = History::new(
            Snapshot {
                document: document.clone(),
                cursor,
            },
            DEFAULT_MAX_UNDO,
        );
        Self {
            document,
            cursor,
            mode: Mode::Normal,
            top_row: 0,
            view_height: 24,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            history,
            dirty: false,
            modified: false,
        }
    }

    /// Replaces the document wholesale, resetting cursor, viewport and
    /// history. Used when opening a file into an existing session. Session
    /// settings (view height, scroll margin, history limit) carry over.
    pub fn set_content(&mut self, text: &str) {
        let view_height = self.view_height;
        let scroll_margin = self.scroll_margin;
        let max_undo = self.history.max_undo();
        *self = Self::with_document(Document::from_str(text));
        self.view_height = view_height;
        self.scroll_margin = scroll_margin;
        self.history.set_max_undo(max_undo);
    }

    // --- query surface for rendering and status collaborators ---

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The full text, suitable for direct write-back.
    pub fn text(&self) -> String {
        self.document.text()
    }

    pub fn line_count(&self) -> usize {
        self.document.len()
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn top_row(&self) -> usize {
        self.top_row
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag after a successful save.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn set_view_height(&mut self, height: usize) {
        self.view_height = height;
    }

    pub fn set_scroll_margin(&mut self, margin: usize) {
        self.scroll_margin = margin;
    }

    pub fn set_history_limit(&mut self, max_undo: usize) {
        self.history.set_max_undo(max_undo);
    }

    /// Text of the rows currently inside the viewport.
    pub fn visible_lines(&self) -> Vec<String> {
        let end = (self.top_row + self.view_height).min(self.document.len());
        (self.top_row..end)
            .filter_map(|row| self.document.line(row).ok())
            .map(|line| line.text())
            .collect()
    }

    /// The cursor as rendering should place it: the stored column clamped to
    /// the mode-correct maximum for the current line.
    pub fn display_cursor(&self) -> Cursor {
        Cursor::new(self.cursor.row, clamp_column(self.cursor.col, self.max_col()))
    }

    // The cursor row is kept in range by every mutation, so a miss here can
    // only mean an internal inconsistency; render as an empty line rather
    // than aborting.
    fn line_len(&self, row: usize) -> usize {
        self.document.line_len(row).unwrap_or(0)
    }

    fn max_col_at(&self, row: usize) -> usize {
        max_column(self.mode, self.line_len(row))
    }

    fn max_col(&self) -> usize {
        self.max_col_at(self.cursor.row)
    }

    // Pulls a stale sticky column back onto the current line before an edit.
    fn snap_column(&mut self) {
        self.cursor.col = clamp_column(self.cursor.col, self.max_col());
    }

    // --- mode transitions ---

    pub fn enter_insert_mode(&mut self) {
        self.mode = Mode::Insert;
    }

    /// Leaves insert mode. The one-past-end column allowed while inserting
    /// is invalid in normal mode, so the column re-clamps.
    pub fn enter_normal_mode(&mut self) {
        self.mode = Mode::Normal;
        self.snap_column();
    }

    // --- single-step navigation ---

    pub fn move_left(&mut self) {
        self.snap_column();
        if self.cursor.col == 0 && self.cursor.row == 0 {
            return;
        }
        if self.cursor.col == 0 {
            self.cursor.row -= 1;
            self.cursor.col = self.max_col();
            return;
        }
        self.cursor.col -= 1;
    }

    pub fn move_right(&mut self) {
        let last_row = self.cursor.row + 1 >= self.document.len();
        if self.cursor.col >= self.max_col() {
            if last_row {
                return;
            }
            self.cursor.row += 1;
            self.cursor.col = 0;
            return;
        }
        self.cursor.col += 1;
    }

    pub fn move_up(&mut self) {
        if self.cursor.row == 0 {
            return;
        }
        // Inside the top margin with document above the window: scroll the
        // window instead of moving the cursor within it.
        if self.cursor.row - self.top_row < self.scroll_margin && self.top_row > 0 {
            self.top_row -= 1;
        }
        self.cursor.row -= 1;
    }

    pub fn move_down(&mut self) {
        if self.cursor.row + 1 >= self.document.len() {
            return;
        }
        let window_row = self.cursor.row - self.top_row;
        if self.view_height.saturating_sub(window_row) < self.scroll_margin
            && self.top_row + self.view_height < self.document.len()
        {
            self.top_row += 1;
        }
        self.cursor.row += 1;
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor.col = self.max_col();
    }

    // --- boundary predicates for word/paragraph navigation to build on ---

    pub fn at_line_start(&self) -> bool {
        self.display_cursor().col == 0
    }

    pub fn at_line_end(&self) -> bool {
        self.display_cursor().col == self.max_col()
    }

    pub fn at_text_start(&self) -> bool {
        self.cursor.row == 0
    }

    pub fn at_text_end(&self) -> bool {
        self.cursor.row + 1 == self.document.len()
    }

    // --- edit intents ---

    fn touch(&mut self) {
        self.dirty = true;
        self.modified = true;
    }

    /// Inserts `ch` at the cursor and advances it.
    pub fn insert_char(&mut self, ch: char) -> Result<()> {
        self.snap_column();
        self.document
            .insert_char(self.cursor.row, self.cursor.col, ch)?;
        self.touch();
        self.move_right();
        Ok(())
    }

    /// Deletes the character under the cursor. Nothing under it (empty line,
    /// or one past the end in insert mode) is a no-op.
    pub fn delete_char(&mut self) -> Result<()> {
        self.snap_column();
        if self.cursor.col >= self.line_len(self.cursor.row) {
            return Ok(());
        }
        self.document.delete_char(self.cursor.row, self.cursor.col)?;
        self.touch();
        Ok(())
    }

    /// Splits the current line at the cursor; the cursor lands at the start
    /// of the new line below.
    pub fn line_break(&mut self) -> Result<()> {
        self.snap_column();
        self.document.split_line(self.cursor.row, self.cursor.col)?;
        self.touch();
        self.move_down();
        self.cursor.col = 0;
        Ok(())
    }

    /// Deletes the character before the cursor; at a line start, merges the
    /// current line into the one above.
    pub fn backspace(&mut self) -> Result<()> {
        self.snap_column();
        if self.cursor.col == 0 && self.cursor.row == 0 {
            return Ok(());
        }
        if self.cursor.col == 0 {
            let row = self.cursor.row;
            let above_len = self.document.line_len(row - 1)?;
            let tail = self.document.line(row)?.clone();
            self.document.append_line(row - 1, &tail)?;
            self.document.delete_line(row)?;
            self.touch();
            self.move_up();
            self.cursor.col = above_len;
            return Ok(());
        }
        self.move_left();
        self.delete_char()
    }

    /// Removes the current line; the cursor clamps onto the remaining rows.
    pub fn delete_line(&mut self) -> Result<()> {
        self.document.delete_line(self.cursor.row)?;
        self.touch();
        self.cursor.row = self.cursor.row.min(self.document.len() - 1);
        self.adjust_viewport();
        Ok(())
    }

    // --- history ---

    /// Records the current state if anything changed since the last commit.
    /// Called once per edit batch, just before a draw, so a burst of
    /// keystrokes becomes a single undo step.
    pub fn commit(&mut self) {
        if !self.dirty {
            return;
        }
        self.history.record(Snapshot {
            document: self.document.clone(),
            cursor: self.cursor,
        });
        self.dirty = false;
    }

    /// Steps back to the previous recorded state. Returns whether anything
    /// was undone.
    pub fn undo(&mut self) -> bool {
        self.commit();
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.document = snapshot.document.clone();
        self.cursor = snapshot.cursor;
        self.modified = true;
        self.adjust_viewport();
        true
    }

    /// Steps forward along the redo branch. Returns whether anything was
    /// redone.
    pub fn redo(&mut self) -> bool {
        self.commit();
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.document = snapshot.document.clone();
        self.cursor = snapshot.cursor;
        self.modified = true;
        self.adjust_viewport();
        true
    }

    // Brings the viewport back over the cursor after a jump (undo, redo,
    // line deletion near the end of the document).
    fn adjust_viewport(&mut self) {
        if self.cursor.row < self.top_row {
            self.top_row = self.cursor.row;
        } else if self.cursor.row >= self.top_row + self.view_height {
            self.top_row = self.cursor.row + 1 - self.view_height;
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor(text: &str) -> Editor {
        Editor::from_str(text)
    }

    #[test]
    fn starts_in_normal_mode_at_the_origin() {
        let e = Editor::new();
        assert_eq!(e.mode(), Mode::Normal);
        assert_eq!(e.cursor(), Cursor::new(0, 0));
        assert_eq!(e.line_count(), 1);
        assert!(!e.is_modified());
    }

    #[test]
    fn insert_advances_the_cursor() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        e.insert_char('H').unwrap();
        e.insert_char('i').unwrap();
        assert_eq!(e.text(), "Hi");
        assert_eq!(e.cursor(), Cursor::new(0, 2));
        assert!(e.is_modified());
    }

    #[test]
    fn line_break_opens_a_new_line() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        for ch in "Hi".chars() {
            e.insert_char(ch).unwrap();
        }
        e.line_break().unwrap();
        e.insert_char('!').unwrap();
        assert_eq!(e.text(), "Hi\n!");
        assert_eq!(e.cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn backspace_merges_lines_at_line_start() {
        let mut e = editor("hello\nworld");
        e.enter_insert_mode();
        e.move_down();
        e.backspace().unwrap();
        assert_eq!(e.text(), "helloworld");
        assert_eq!(e.cursor(), Cursor::new(0, 5));
    }

    #[test]
    fn backspace_at_document_start_is_a_noop() {
        let mut e = editor("hello");
        e.enter_insert_mode();
        e.backspace().unwrap();
        assert_eq!(e.text(), "hello");
    }

    #[test]
    fn delete_under_cursor() {
        let mut e = editor("hello");
        e.delete_char().unwrap();
        assert_eq!(e.text(), "ello");
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn delete_line_clamps_the_cursor() {
        let mut e = editor("hello\nworld");
        e.move_down();
        e.delete_line().unwrap();
        assert_eq!(e.text(), "hello");
        assert_eq!(e.cursor().row, 0);
    }

    #[test]
    fn normal_mode_caps_the_column_one_short() {
        let e = editor("hello");
        assert_eq!(e.max_col(), 4);
    }

    #[test]
    fn insert_mode_allows_the_append_column() {
        let mut e = editor("hello");
        e.enter_insert_mode();
        assert_eq!(e.max_col(), 5);
    }

    #[test]
    fn leaving_insert_mode_reclamps_the_column() {
        let mut e = editor("hello");
        e.enter_insert_mode();
        e.move_to_line_end();
        assert_eq!(e.cursor().col, 5);
        e.enter_normal_mode();
        assert_eq!(e.cursor().col, 4);
    }

    #[test]
    fn move_right_stops_at_the_last_column_of_the_last_row() {
        let mut e = editor("hello");
        for _ in 0..10 {
            e.move_right();
        }
        assert_eq!(e.cursor(), Cursor::new(0, 4));
    }

    #[test]
    fn move_right_wraps_to_the_next_line() {
        let mut e = editor("hi\nworld");
        e.move_right();
        e.move_right();
        assert_eq!(e.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn move_left_wraps_to_the_previous_line_end() {
        let mut e = editor("hello\nworld");
        e.move_down();
        e.move_left();
        assert_eq!(e.cursor(), Cursor::new(0, 4));
    }

    #[test]
    fn move_left_at_the_origin_is_a_noop() {
        let mut e = editor("hello");
        e.move_left();
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn sticky_column_clamps_before_moving_left() {
        let mut e = editor("hello\nhi");
        e.move_to_line_end();
        e.move_down();
        // The stored column (4) exceeds the short line; left first clamps
        // onto it, then steps.
        e.move_left();
        assert_eq!(e.cursor(), Cursor::new(1, 0));
    }

    #[test]
    fn vertical_moves_clamp_at_document_bounds() {
        let mut e = editor("a\nb");
        e.move_up();
        assert_eq!(e.cursor().row, 0);
        e.move_down();
        e.move_down();
        assert_eq!(e.cursor().row, 1);
    }

    #[test]
    fn moving_down_scrolls_inside_the_bottom_margin() {
        let text: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let mut e = editor(&text.join("\n"));
        e.set_view_height(30);
        for _ in 0..21 {
            e.move_down();
        }
        assert_eq!(e.cursor().row, 21);
        assert_eq!(e.top_row(), 0);
        // The next step enters the margin: the window scrolls with the
        // cursor so the on-screen row stays fixed.
        e.move_down();
        assert_eq!(e.cursor().row, 22);
        assert_eq!(e.top_row(), 1);
        e.move_down();
        assert_eq!(e.top_row(), 2);
    }

    #[test]
    fn moving_up_scrolls_inside_the_top_margin() {
        let text: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let mut e = editor(&text.join("\n"));
        e.set_view_height(30);
        for _ in 0..40 {
            e.move_down();
        }
        let scrolled = e.top_row();
        assert!(scrolled > 0);
        // Walk back until the cursor sits inside the top margin.
        while e.cursor().row - e.top_row() >= e.scroll_margin {
            e.move_up();
        }
        let before = e.top_row();
        e.move_up();
        assert_eq!(e.top_row(), before - 1);
    }

    #[test]
    fn visible_lines_track_the_viewport() {
        let text: Vec<String> = (0..50).map(|i| format!("line {i}")).collect();
        let mut e = editor(&text.join("\n"));
        e.set_view_height(5);
        assert_eq!(e.visible_lines(), vec!["line 0", "line 1", "line 2", "line 3", "line 4"]);
    }

    #[test]
    fn boundary_predicates() {
        let mut e = editor("hello\nworld");
        assert!(e.at_line_start() && e.at_text_start());
        assert!(!e.at_line_end() && !e.at_text_end());
        e.move_to_line_end();
        assert!(e.at_line_end());
        e.move_down();
        assert!(e.at_text_end());
    }

    #[test]
    fn display_cursor_clamps_a_sticky_column() {
        let mut e = editor("hello\nhi");
        e.move_to_line_end();
        e.move_down();
        assert_eq!(e.cursor().col, 4);
        assert_eq!(e.display_cursor(), Cursor::new(1, 1));
    }

    #[test]
    fn an_edit_batch_is_one_undo_step() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        for ch in "abc".chars() {
            e.insert_char(ch).unwrap();
        }
        e.commit();
        for ch in "def".chars() {
            e.insert_char(ch).unwrap();
        }
        e.commit();
        assert_eq!(e.text(), "abcdef");
        assert!(e.undo());
        assert_eq!(e.text(), "abc");
        assert!(e.undo());
        assert_eq!(e.text(), "");
        assert!(!e.undo());
    }

    #[test]
    fn undo_restores_the_cursor_with_the_text() {
        let mut e = editor("hello");
        e.commit();
        e.enter_insert_mode();
        e.move_to_line_end();
        e.insert_char('!').unwrap();
        e.commit();
        assert!(e.undo());
        assert_eq!(e.text(), "hello");
        assert_eq!(e.cursor(), Cursor::new(0, 0));
    }

    #[test]
    fn redo_reapplies_an_undone_batch() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        e.insert_char('a').unwrap();
        e.commit();
        e.insert_char('b').unwrap();
        e.commit();
        e.undo();
        assert_eq!(e.text(), "a");
        assert!(e.redo());
        assert_eq!(e.text(), "ab");
        assert!(!e.redo());
    }

    #[test]
    fn undo_commits_a_pending_batch_first() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        e.insert_char('a').unwrap();
        // No draw happened, so nothing is committed yet; undo must still
        // step back over the pending edit.
        assert!(e.undo());
        assert_eq!(e.text(), "");
        assert!(e.redo());
        assert_eq!(e.text(), "a");
    }

    #[test]
    fn set_content_resets_history() {
        let mut e = Editor::new();
        e.enter_insert_mode();
        e.insert_char('a').unwrap();
        e.commit();
        e.set_content("fresh");
        assert_eq!(e.text(), "fresh");
        assert!(!e.is_modified());
        assert!(!e.undo());
    }

    #[test]
    fn snapshots_share_unedited_lines() {
        let text: Vec<String> = (0..1000).map(|i| format!("line {i}")).collect();
        let mut e = editor(&text.join("\n"));
        e.commit();
        e.enter_insert_mode();
        e.insert_char('x').unwrap();
        e.commit();
        // A thousand-line document with fifty snapshots would be ruinous if
        // each snapshot deep-copied every line; sharing keeps this instant.
        for _ in 0..50 {
            e.insert_char('y').unwrap();
            e.commit();
        }
        assert!(e.undo());
    }
}
