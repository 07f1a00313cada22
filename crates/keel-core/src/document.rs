//! Document — the ordered row store and its edit operations.
//!
//! A `Document` owns every [`Row`] exclusively; nothing outside the crate
//! touches a row except through it. Insertion order is line order: row 0
//! is the topmost line. The document also owns the resolved [`Grammar`]
//! (or none), so every mutation can rebuild the affected row's derived
//! state before returning — the row invariant never leaks.
//!
//! # Dirty tracking
//!
//! Every operation that mutates raw text sets the `dirty` flag. Only
//! [`mark_saved`](Document::mark_saved) clears it — the document has no
//! idea what "saved" means; the caller tells it after a successful write.
//!
//! # Cursor-aware operations
//!
//! The character-level operations take `&mut Cursor` and move it the way
//! an editor expects: insert advances the column, newline lands on column
//! 0 of the next row, backspace at column 0 merges into the previous row
//! and leaves the cursor at the join point. The cursor's row may equal
//! `row_count()` — the virtual row past the end, a valid insertion anchor
//! that materializes on first insert.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::row::Row;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// An ordered sequence of rows with edit operations and dirty tracking.
#[derive(Debug, Default)]
pub struct Document {
    rows: Vec<Row>,
    grammar: Option<Grammar>,
    dirty: bool,
}

impl Document {
    // -- Construction -------------------------------------------------------

    /// Create an empty document with no grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from already-split lines (newline- and CR-stripped
    /// by the loading collaborator). The document starts clean.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: lines.into_iter().map(|line| Row::new(line, None)).collect(),
            grammar: None,
            dirty: false,
        }
    }

    // -- Read access --------------------------------------------------------

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// True when the document has no rows.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a row by index.
    #[inline]
    #[must_use]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// All rows, in line order (for the paint collaborator).
    #[inline]
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// True when the document has unsaved modifications.
    #[inline]
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag. Called by the persistence collaborator after
    /// a successful write.
    #[inline]
    pub const fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// The active grammar, if any.
    #[inline]
    #[must_use]
    pub const fn grammar(&self) -> Option<&Grammar> {
        self.grammar.as_ref()
    }

    /// Install a grammar (resolved externally from the filename) and
    /// reclassify every row under it.
    pub fn set_grammar(&mut self, grammar: Option<Grammar>) {
        self.grammar = grammar;
        for row in &mut self.rows {
            row.rebuild(self.grammar.as_ref());
        }
    }

    /// Serialize: every row's raw text followed by a newline.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = String::new();
        for row in &self.rows {
            text.push_str(row.raw());
            text.push('\n');
        }
        text
    }

    // -- Row-level operations -----------------------------------------------

    /// Insert a row at `at` (0 ..= `row_count()`).
    ///
    /// # Errors
    ///
    /// `InvalidIndex` when `at` is past the end-insertion position.
    pub fn insert_row(&mut self, at: usize, text: impl Into<String>) -> Result<()> {
        if at > self.rows.len() {
            return Err(Error::InvalidIndex {
                index: at,
                len: self.rows.len(),
            });
        }
        self.rows.insert(at, Row::new(text, self.grammar.as_ref()));
        self.dirty = true;
        Ok(())
    }

    /// Delete the row at `at`.
    ///
    /// # Errors
    ///
    /// `EmptyDocument` when there are no rows; `InvalidIndex` when `at`
    /// is out of range.
    pub fn delete_row(&mut self, at: usize) -> Result<()> {
        if self.rows.is_empty() {
            return Err(Error::EmptyDocument);
        }
        if at >= self.rows.len() {
            return Err(Error::InvalidIndex {
                index: at,
                len: self.rows.len(),
            });
        }
        self.rows.remove(at);
        self.dirty = true;
        Ok(())
    }

    /// Append a string to the end of the row at `at`.
    ///
    /// # Errors
    ///
    /// `EmptyDocument` / `InvalidIndex` as for [`delete_row`](Self::delete_row).
    pub fn append_to_row(&mut self, at: usize, s: &str) -> Result<()> {
        if self.rows.is_empty() {
            return Err(Error::EmptyDocument);
        }
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(at)
            .ok_or(Error::InvalidIndex { index: at, len })?;
        row.append(s, self.grammar.as_ref());
        self.dirty = true;
        Ok(())
    }

    // -- Cursor-level operations --------------------------------------------

    /// Insert a character at the cursor, materializing the virtual row
    /// past the end when needed. Advances the cursor past the insertion.
    pub fn insert_char(&mut self, cursor: &mut Cursor, ch: char) {
        if cursor.row == self.rows.len() {
            self.rows.push(Row::new("", self.grammar.as_ref()));
        }
        self.rows[cursor.row].insert_char(cursor.col, ch, self.grammar.as_ref());
        cursor.col += ch.len_utf8();
        self.dirty = true;
    }

    /// Insert a newline at the cursor.
    ///
    /// At column 0 an empty row is inserted above and the current row is
    /// untouched; otherwise the current row is split at the cursor. Either
    /// way the cursor lands on column 0 of the following row.
    pub fn insert_newline(&mut self, cursor: &mut Cursor) {
        if cursor.col == 0 {
            self.rows
                .insert(cursor.row, Row::new("", self.grammar.as_ref()));
        } else {
            let suffix = self.rows[cursor.row].split_off(cursor.col, self.grammar.as_ref());
            self.rows
                .insert(cursor.row + 1, Row::new(suffix, self.grammar.as_ref()));
        }
        cursor.row += 1;
        cursor.col = 0;
        self.dirty = true;
    }

    /// Delete the character before the cursor (backspace semantics).
    ///
    /// No-op at the very start of the document or on the virtual row past
    /// the end. At column 0 the current row merges into the previous one
    /// and the cursor lands at the join point.
    pub fn delete_char(&mut self, cursor: &mut Cursor) {
        if cursor.row == self.rows.len() {
            return;
        }
        if cursor.col == 0 && cursor.row == 0 {
            return;
        }

        if cursor.col > 0 {
            self.rows[cursor.row].delete_char(cursor.col - 1, self.grammar.as_ref());
            cursor.col -= 1;
        } else {
            let merged = self.rows.remove(cursor.row);
            let prev = &mut self.rows[cursor.row - 1];
            cursor.col = prev.len();
            prev.append(merged.raw(), self.grammar.as_ref());
            cursor.row -= 1;
        }
        self.dirty = true;
    }

    // -- Search overlay plumbing --------------------------------------------

    /// Mutable row access for the search engine's overlay. Not part of the
    /// external surface; edits must go through the operations above.
    pub(crate) fn row_mut(&mut self, at: usize) -> Option<&mut Row> {
        self.rows.get_mut(at)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
