//! The in-memory representation of the file being edited.
//!
//! A document is itself a gap buffer, one level up: its elements are shared
//! line handles instead of characters, so inserting, splitting, merging and
//! deleting lines near the last edit point is amortized O(1), exactly like
//! character edits within a line.
//!
//! Lines are held behind `Arc`, which makes cloning a document a cheap,
//! structurally shared snapshot: the clone keeps every untouched line, and a
//! later edit copies only the one line it rewrites.

use std::io::BufRead;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::line::Line;

// Gap opened for new and freshly grown documents.
const MIN_GAP: usize = 16;

/// An ordered collection of [`Line`]s stored in a gap buffer.
///
/// A document never holds zero lines: an empty input yields exactly one
/// empty line, and deleting the last remaining line re-seeds one.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Arc<Line>>,
    gap_start: usize,
    gap_end: usize,
}

impl Document {
    /// Creates a document holding a single empty line.
    pub fn new() -> Self {
        Self::from_lines(vec![Line::new()])
    }

    /// Builds a document from `text` split on line breaks.
    pub fn from_str(text: &str) -> Self {
        Self::from_lines(text.lines().map(Line::from_str).collect())
    }

    /// Builds a document by reading `reader` to the end, splitting on line
    /// breaks. An empty stream yields one empty line.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            lines.push(Line::from_str(&line?));
        }
        Ok(Self::from_lines(lines))
    }

    fn from_lines(mut lines: Vec<Line>) -> Self {
        if lines.is_empty() {
            lines.push(Line::new());
        }
        let len = lines.len();
        let empty = Arc::new(Line::new());
        let mut handles: Vec<Arc<Line>> = lines.into_iter().map(Arc::new).collect();
        handles.extend(std::iter::repeat_with(|| Arc::clone(&empty)).take(MIN_GAP));
        Self {
            lines: handles,
            gap_start: len,
            gap_end: len + MIN_GAP,
        }
    }

    /// Number of live lines. Always at least one.
    pub fn len(&self) -> usize {
        self.lines.len() - (self.gap_end - self.gap_start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 1 && self.lines[self.physical(0)].is_empty()
    }

    // Translates a logical row to its slot in the backing array.
    fn physical(&self, row: usize) -> usize {
        if row < self.gap_start {
            row
        } else {
            row + (self.gap_end - self.gap_start)
        }
    }

    fn check_row(&self, row: usize) -> Result<usize> {
        if row >= self.len() {
            return Err(Error::IndexOutOfRange {
                index: row,
                len: self.len(),
            });
        }
        Ok(self.physical(row))
    }

    /// Returns the line at `row`.
    pub fn line(&self, row: usize) -> Result<&Line> {
        let idx = self.check_row(row)?;
        Ok(&self.lines[idx])
    }

    /// Character count of the line at `row`.
    pub fn line_len(&self, row: usize) -> Result<usize> {
        Ok(self.line(row)?.len())
    }

    /// The full document text, lines joined with `\n`.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for row in 0..self.len() {
            if row > 0 {
                out.push('\n');
            }
            out.push_str(&self.lines[self.physical(row)].text());
        }
        out
    }

    // Clone-on-write access to a line. Copies the line only when a snapshot
    // still shares it.
    fn line_mut(&mut self, row: usize) -> Result<&mut Line> {
        let idx = self.check_row(row)?;
        Ok(Arc::make_mut(&mut self.lines[idx]))
    }

    /// Inserts `ch` before column `col` of the line at `row`.
    pub fn insert_char(&mut self, row: usize, col: usize, ch: char) -> Result<()> {
        self.line_mut(row)?.insert(col, ch)
    }

    /// Deletes the character at `(row, col)`. Deleting in an empty line is a
    /// defined no-op.
    pub fn delete_char(&mut self, row: usize, col: usize) -> Result<()> {
        self.line_mut(row)?.delete(col)
    }

    /// Inserts `line` so it becomes the line at `row`; rows at and past it
    /// shift down. A row past the end appends.
    pub fn insert_line(&mut self, row: usize, line: Line) {
        if self.gap_start == self.gap_end {
            self.grow();
        }
        self.move_gap(row);
        self.lines[self.gap_start] = Arc::new(line);
        self.gap_start += 1;
    }

    /// Removes the line at `row`. Removing the last remaining line leaves
    /// one empty line behind; a document never holds zero lines.
    pub fn delete_line(&mut self, row: usize) -> Result<()> {
        self.check_row(row)?;
        self.move_gap(row + 1);
        self.gap_start -= 1;
        if self.len() == 0 {
            self.insert_line(0, Line::new());
        }
        Ok(())
    }

    /// Splits the line at `row` into two at column `col`: the first half
    /// stays at `row`, the second half becomes the line below it.
    pub fn split_line(&mut self, row: usize, col: usize) -> Result<()> {
        let (left, right) = self.line(row)?.split(col);
        let idx = self.physical(row);
        self.lines[idx] = Arc::new(left);
        self.insert_line(row + 1, right);
        Ok(())
    }

    /// Replaces the line at `row` with itself plus `other`, used to merge
    /// the following line into the current one.
    pub fn append_line(&mut self, row: usize, other: &Line) -> Result<()> {
        let merged = self.line(row)?.append(other);
        let idx = self.physical(row);
        self.lines[idx] = Arc::new(merged);
        Ok(())
    }

    /// Moves the gap so it starts at `target`, one handle swap at a time,
    /// saturating at both ends.
    fn move_gap(&mut self, target: usize) {
        while self.gap_start != target {
            if self.gap_start < target {
                if self.gap_end == self.lines.len() {
                    return;
                }
                self.lines.swap(self.gap_start, self.gap_end);
                self.gap_start += 1;
                self.gap_end += 1;
            } else {
                if self.gap_start == 0 {
                    return;
                }
                self.lines.swap(self.gap_start - 1, self.gap_end - 1);
                self.gap_start -= 1;
                self.gap_end -= 1;
            }
        }
    }

    fn grow(&mut self) {
        let added = self.lines.len().max(MIN_GAP);
        let empty = Arc::new(Line::new());
        self.lines.splice(
            self.gap_start..self.gap_start,
            std::iter::repeat_with(|| Arc::clone(&empty)).take(added),
        );
        self.gap_end += added;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
