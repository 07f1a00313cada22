//! Search — incremental literal matching with a restorable overlay.
//!
//! The engine is driven by the prompt loop one event at a time: the query
//! text changed, the user asked for the next/previous match, or the
//! session ended. Every event goes through [`SearchEngine::update`], and
//! every update starts the same way: if a match overlay is applied
//! somewhere, restore that row's saved highlight sequence first,
//! unconditionally. That single rule is what guarantees no `Match` class
//! ever outlives the event that painted it.
//!
//! Matching is a literal substring search over each row's **raw** text
//! (`memchr::memmem` — no regex, by design). The scan is circular: at most
//! `row_count` rows, starting one step past the previous match (or row 0
//! going forward / the last row going backward when there is none), and
//! wrapping at the ends.
//!
//! On a match the cursor moves to the match's raw offset, and the match
//! span — translated to rendered coordinates — is overwritten with
//! [`HighlightClass::Match`]. The engine never mutates raw text and never
//! touches the dirty flag.
//!
//! Saving and restoring the cursor/viewport around a cancelled session is
//! the prompt loop's job, not the engine's.

use memchr::memmem;

use crate::cursor::Cursor;
use crate::document::Document;
use crate::highlight::HighlightClass;

// ---------------------------------------------------------------------------
// Events & direction
// ---------------------------------------------------------------------------

/// Scan direction through the row sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Top to bottom, wrapping from the last row to row 0.
    #[default]
    Forward,
    /// Bottom to top, wrapping from row 0 to the last row.
    Backward,
}

/// What happened to the search session since the last update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    /// The query text changed — restart matching from scratch.
    Edited,
    /// Navigate to the next match (forward).
    Next,
    /// Navigate to the previous match (backward).
    Prev,
    /// The session ended (confirm or cancel): restore the overlay and
    /// reset. No new match is computed.
    Cancel,
}

// ---------------------------------------------------------------------------
// SearchEngine
// ---------------------------------------------------------------------------

/// A saved highlight sequence, owed back to its row.
#[derive(Debug)]
struct Overlay {
    row: usize,
    highlight: Vec<HighlightClass>,
}

/// Incremental search state across one session's events.
#[derive(Debug, Default)]
pub struct SearchEngine {
    /// Row of the most recent match, the anchor for the next scan.
    last_match: Option<usize>,
    /// Current scan direction.
    direction: Direction,
    /// Highlight sequence saved before the current overlay was painted.
    saved: Option<Overlay>,
}

impl SearchEngine {
    /// Create an idle engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Row of the most recent match, if any.
    #[inline]
    #[must_use]
    pub const fn last_match(&self) -> Option<usize> {
        self.last_match
    }

    /// Current scan direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Forget all session state. For session start; mid-session, use a
    /// [`SearchStep::Cancel`] update instead so the overlay is restored.
    pub fn reset(&mut self) {
        debug_assert!(self.saved.is_none(), "reset would leak an applied overlay");
        self.last_match = None;
        self.direction = Direction::Forward;
        self.saved = None;
    }

    /// Process one session event against the document.
    ///
    /// Restores any applied overlay, interprets the event, and — except on
    /// cancel — runs one circular scan for `query`, moving the cursor and
    /// painting the overlay on a hit. A miss (or an empty query) leaves
    /// `last_match` unset; that is a normal outcome, not an error.
    pub fn update(
        &mut self,
        doc: &mut Document,
        cursor: &mut Cursor,
        query: &str,
        step: SearchStep,
    ) {
        self.restore_overlay(doc);

        match step {
            SearchStep::Cancel => {
                self.last_match = None;
                self.direction = Direction::Forward;
                return;
            }
            SearchStep::Next => self.direction = Direction::Forward,
            SearchStep::Prev => self.direction = Direction::Backward,
            SearchStep::Edited => {
                self.last_match = None;
                self.direction = Direction::Forward;
            }
        }

        if query.is_empty() || doc.is_empty() {
            self.last_match = None;
            return;
        }

        let row_count = doc.row_count();
        let mut current = self.last_match;

        for _ in 0..row_count {
            let idx = next_index(current, self.direction, row_count);
            current = Some(idx);

            let Some(row) = doc.row(idx) else { break };
            if let Some(col) = memmem::find(row.raw().as_bytes(), query.as_bytes()) {
                self.last_match = Some(idx);
                cursor.row = idx;
                cursor.col = col;
                self.apply_overlay(doc, idx, col, query.len());
                return;
            }
        }

        self.last_match = None;
    }

    // -- Overlay ------------------------------------------------------------

    /// Put back the highlight sequence saved by the previous update, if
    /// one is outstanding. Always the first thing an update does.
    fn restore_overlay(&mut self, doc: &mut Document) {
        if let Some(overlay) = self.saved.take() {
            if let Some(row) = doc.row_mut(overlay.row) {
                row.restore_highlight(overlay.highlight);
            }
        }
    }

    /// Save the matched row's highlight sequence, then paint the match
    /// span (in rendered coordinates) with `Match`.
    fn apply_overlay(&mut self, doc: &mut Document, row_idx: usize, col: usize, len: usize) {
        let Some(row) = doc.row_mut(row_idx) else {
            return;
        };
        self.saved = Some(Overlay {
            row: row_idx,
            highlight: row.highlight().to_vec(),
        });
        let start = row.raw_to_rendered(col);
        let end = row.raw_to_rendered(col + len);
        row.overlay_match(start, end);
    }
}

/// One step through the circular row sequence. With no anchor the scan
/// enters at row 0 (forward) or the last row (backward).
const fn next_index(current: Option<usize>, direction: Direction, row_count: usize) -> usize {
    match (current, direction) {
        (None, Direction::Forward) => 0,
        (None, Direction::Backward) => row_count - 1,
        (Some(i), Direction::Forward) => (i + 1) % row_count,
        (Some(i), Direction::Backward) => (i + row_count - 1) % row_count,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
