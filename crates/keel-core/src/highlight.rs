//! The lexical classifier — one highlight class per rendered character.
//!
//! [`classify`] walks a row's rendered text once, left to right, assigning
//! a [`HighlightClass`] to every byte. The only look-behind is the previous
//! character's class and a "was the previous character a separator" flag,
//! and there is no cross-row state: comments and strings never span rows.
//! That restriction is part of the grammar's design, which keeps every row
//! independently reclassifiable after an edit.
//!
//! Priority order per character:
//!
//! 1. Comment marker (outside strings) — rest of the row is `Comment`
//! 2. Inside a string — `String`, closing on the opening quote byte
//! 3. Opening quote — `String`
//! 4. Digits after a separator or another number byte, and `.` inside a
//!    number — `Number`
//! 5. Keyword from the grammar list, if preceded and followed by
//!    separators — `Keyword1` / `Keyword2`
//! 6. Everything else — `Normal`
//!
//! [`HighlightClass::Match`] is never produced here; only the search
//! engine's transient overlay writes it.

use crate::grammar::{Grammar, GrammarFlags};

// ---------------------------------------------------------------------------
// HighlightClass
// ---------------------------------------------------------------------------

/// The semantic token category of one rendered character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightClass {
    /// Unclassified text.
    #[default]
    Normal,
    /// Single-line comment, from the marker to end of row.
    Comment,
    /// Primary keyword (control flow).
    Keyword1,
    /// Secondary keyword (types, storage classes).
    Keyword2,
    /// String literal, quotes included.
    String,
    /// Numeric literal.
    Number,
    /// Search-match overlay. Transient: applied and restored by the
    /// search engine, never produced by classification.
    Match,
}

// ---------------------------------------------------------------------------
// Separators
// ---------------------------------------------------------------------------

/// Punctuation bytes that delimit keyword and number tokens.
const SEPARATOR_PUNCT: &[u8] = b",.()+-/*=~%<>[];";

/// True for bytes that end a token: whitespace, NUL, or one of the fixed
/// punctuation set. Used both for keyword boundary checks and for the
/// "previous character was a separator" flag — the two must agree.
#[inline]
#[must_use]
pub fn is_separator(byte: u8) -> bool {
    byte.is_ascii_whitespace() || byte == b'\0' || SEPARATOR_PUNCT.contains(&byte)
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a row's rendered text.
///
/// Returns one class per byte of `render` — the caller stores the result
/// alongside the rendered text and must keep the two in sync. With no
/// grammar every byte is `Normal`.
#[must_use]
pub fn classify(render: &str, grammar: Option<&Grammar>) -> Vec<HighlightClass> {
    let bytes = render.as_bytes();
    let mut hl = vec![HighlightClass::Normal; bytes.len()];

    let Some(grammar) = grammar else {
        return hl;
    };

    let mut prev_sep = true;
    let mut in_string: Option<u8> = None;

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let prev_hl = if i > 0 { hl[i - 1] } else { HighlightClass::Normal };

        // Comment marker: everything to the end of the row, unless we are
        // inside a string.
        if grammar.has_comments()
            && in_string.is_none()
            && bytes[i..].starts_with(grammar.comment_start.as_bytes())
        {
            for slot in &mut hl[i..] {
                *slot = HighlightClass::Comment;
            }
            break;
        }

        if grammar.flags.contains(GrammarFlags::STRINGS) {
            if let Some(quote) = in_string {
                hl[i] = HighlightClass::String;
                if c == quote {
                    in_string = None;
                }
                i += 1;
                prev_sep = true;
                continue;
            }
            if c == b'"' || c == b'\'' {
                in_string = Some(c);
                hl[i] = HighlightClass::String;
                i += 1;
                continue;
            }
        }

        if grammar.flags.contains(GrammarFlags::NUMBERS)
            && ((c.is_ascii_digit() && (prev_sep || prev_hl == HighlightClass::Number))
                || (c == b'.' && prev_hl == HighlightClass::Number))
        {
            hl[i] = HighlightClass::Number;
            i += 1;
            prev_sep = false;
            continue;
        }

        // Keywords start only after a separator and must end at one (or at
        // end of row). First match in list order wins.
        if prev_sep {
            let matched = grammar.keywords().find(|kw| {
                let end = i + kw.text.len();
                end <= bytes.len()
                    && &bytes[i..end] == kw.text.as_bytes()
                    && (end == bytes.len() || is_separator(bytes[end]))
            });
            if let Some(kw) = matched {
                let class = if kw.secondary {
                    HighlightClass::Keyword2
                } else {
                    HighlightClass::Keyword1
                };
                let end = i + kw.text.len();
                for slot in &mut hl[i..end] {
                    *slot = class;
                }
                i = end;
                prev_sep = false;
                continue;
            }
        }

        prev_sep = is_separator(c);
        i += 1;
    }

    hl
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
