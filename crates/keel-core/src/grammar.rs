//! Grammar — the immutable highlight configuration for one file type.
//!
//! A `Grammar` is a flat description of what the classifier should look
//! for: an ordered keyword list, a single-line comment marker, and flags
//! for number/string literals. It is selected once when a file is opened
//! (by the binary's filename registry — the core never inspects paths)
//! and shared read-only by every row's classification pass.
//!
//! Keywords are stored as plain string literals so grammar tables can be
//! `static`. A trailing `|` marks a keyword as *secondary* (types and
//! storage classes, highlighted differently from control-flow keywords);
//! [`Grammar::keywords`] strips the marker and yields `(text, secondary)`
//! pairs. List order is priority order: the classifier takes the first
//! keyword that matches with a separator boundary.

use bitflags::bitflags;

bitflags! {
    /// Which literal kinds a grammar wants highlighted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GrammarFlags: u8 {
        /// Highlight numeric literals (digits, decimal points).
        const NUMBERS = 1 << 0;
        /// Highlight single- and double-quoted string literals.
        const STRINGS = 1 << 1;
    }
}

/// A keyword entry after stripping the secondary marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    /// The keyword text as it appears in source.
    pub text: &'static str,
    /// True for secondary keywords (trailing `|` in the table).
    pub secondary: bool,
}

/// Highlight configuration for one file type.
///
/// Immutable by construction: all fields borrow `'static` table data, and
/// the type is `Copy` so a document can hold its resolved grammar by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    /// Display name for the status bar (e.g. `"c"`, `"rust"`).
    pub name: &'static str,
    /// Ordered keyword list. A trailing `|` marks a secondary keyword.
    pub keywords: &'static [&'static str],
    /// Single-line comment marker (empty = no comment highlighting).
    pub comment_start: &'static str,
    /// Which literal kinds to highlight.
    pub flags: GrammarFlags,
}

impl Grammar {
    /// Iterate the keyword list in priority order, with the secondary
    /// marker stripped.
    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.keywords.iter().map(|raw| match raw.strip_suffix('|') {
            Some(text) => Keyword {
                text,
                secondary: true,
            },
            None => Keyword {
                text: raw,
                secondary: false,
            },
        })
    }

    /// True when this grammar defines a single-line comment marker.
    #[inline]
    #[must_use]
    pub const fn has_comments(&self) -> bool {
        !self.comment_start.is_empty()
    }
}
