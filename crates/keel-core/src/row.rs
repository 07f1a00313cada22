//! Row — one line of text and its derived display state.
//!
//! A `Row` owns three parallel pieces of data:
//!
//! - `raw` — the literal stored bytes, the source of truth
//! - `render` — `raw` with tabs expanded to spaces for fixed-width display
//! - `highlight` — one [`HighlightClass`] per rendered byte
//!
//! # Invariant
//!
//! `render` and `highlight` are always in sync with `raw`:
//! `render.len() == highlight.len()`, and both are rebuilt before any
//! mutating method returns. Callers never observe a row mid-update.
//!
//! # Coordinate spaces
//!
//! Columns come in two flavors. A *raw* column is a byte offset into
//! `raw`; a *rendered* column is a byte offset into `render`. They differ
//! only where tabs expand. [`raw_to_rendered`](Row::raw_to_rendered) maps
//! between them; the mapping is monotonic and deterministic, which is what
//! lets the search engine translate a raw match offset into a rendered
//! highlight span.

use crate::grammar::Grammar;
use crate::highlight::{self, HighlightClass};

/// Number of rendered columns per tab stop.
pub const TAB_STOP: usize = 8;

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One line of text with cached rendered text and highlight classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    raw: String,
    render: String,
    highlight: Vec<HighlightClass>,
}

impl Row {
    // -- Construction -------------------------------------------------------

    /// Create a row from raw text, building the derived state immediately.
    #[must_use]
    pub fn new(raw: impl Into<String>, grammar: Option<&Grammar>) -> Self {
        let mut row = Self {
            raw: raw.into(),
            render: String::new(),
            highlight: Vec::new(),
        };
        row.rebuild(grammar);
        row
    }

    // -- Access -------------------------------------------------------------

    /// The stored raw text.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The rendered text (tabs expanded).
    #[inline]
    #[must_use]
    pub fn render(&self) -> &str {
        &self.render
    }

    /// Highlight classes, one per rendered byte.
    #[inline]
    #[must_use]
    pub fn highlight(&self) -> &[HighlightClass] {
        &self.highlight
    }

    /// Byte length of the raw text.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    /// True when the raw text is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    // -- Coordinate mapping -------------------------------------------------

    /// Map a raw column (byte offset into `raw`) to the corresponding
    /// rendered column.
    ///
    /// `col` may equal `len()` — the cursor-past-last-character position —
    /// in which case this returns the rendered length. Columns beyond that
    /// clamp the same way rather than failing. Monotonic in `col`.
    #[must_use]
    pub fn raw_to_rendered(&self, col: usize) -> usize {
        let mut rendered = 0;
        for &byte in self.raw.as_bytes().iter().take(col) {
            if byte == b'\t' {
                rendered += (TAB_STOP - 1) - (rendered % TAB_STOP);
            }
            rendered += 1;
        }
        rendered
    }

    // -- Editing ------------------------------------------------------------
    //
    // Every mutation rebuilds `render` and `highlight` before returning, so
    // the invariant holds across call boundaries. Column arguments clamp to
    // the row length — the sane default for a one-byte-off caller.

    /// Insert a character at a raw column (clamped to the row length).
    pub fn insert_char(&mut self, at: usize, ch: char, grammar: Option<&Grammar>) {
        let at = at.min(self.raw.len());
        self.raw.insert(at, ch);
        self.rebuild(grammar);
    }

    /// Delete the byte at a raw column. Out-of-range columns are a no-op.
    pub fn delete_char(&mut self, at: usize, grammar: Option<&Grammar>) {
        if at >= self.raw.len() {
            return;
        }
        self.raw.remove(at);
        self.rebuild(grammar);
    }

    /// Append a string to the end of the raw text (row-merge support).
    pub fn append(&mut self, s: &str, grammar: Option<&Grammar>) {
        self.raw.push_str(s);
        self.rebuild(grammar);
    }

    /// Split the row at a raw column: the row keeps the prefix and the
    /// suffix is returned (for insertion as the next row).
    pub fn split_off(&mut self, at: usize, grammar: Option<&Grammar>) -> String {
        let at = at.min(self.raw.len());
        let suffix = self.raw.split_off(at);
        self.rebuild(grammar);
        suffix
    }

    /// Rebuild the derived state after a raw mutation or grammar change.
    pub(crate) fn rebuild(&mut self, grammar: Option<&Grammar>) {
        self.render = expand_tabs(&self.raw);
        self.highlight = highlight::classify(&self.render, grammar);
        debug_assert_eq!(self.render.len(), self.highlight.len());
    }

    // -- Search overlay support ---------------------------------------------

    /// Overwrite the rendered span `[start, end)` with the `Match` class.
    /// The span clamps to the highlight length.
    pub(crate) fn overlay_match(&mut self, start: usize, end: usize) {
        let end = end.min(self.highlight.len());
        for slot in &mut self.highlight[start.min(end)..end] {
            *slot = HighlightClass::Match;
        }
    }

    /// Replace the highlight sequence wholesale (overlay restore). The
    /// saved sequence must match the current rendered length — the search
    /// engine guarantees the raw text did not change in between.
    pub(crate) fn restore_highlight(&mut self, saved: Vec<HighlightClass>) {
        debug_assert_eq!(saved.len(), self.render.len());
        self.highlight = saved;
    }
}

// ---------------------------------------------------------------------------
// Tab expansion
// ---------------------------------------------------------------------------

/// Expand tabs to spaces: each tab advances to the next multiple of
/// [`TAB_STOP`], consuming between 1 and `TAB_STOP` rendered columns.
fn expand_tabs(raw: &str) -> String {
    let mut render = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch == '\t' {
            render.push(' ');
            while render.len() % TAB_STOP != 0 {
                render.push(' ');
            }
        } else {
            render.push(ch);
        }
    }
    render
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
