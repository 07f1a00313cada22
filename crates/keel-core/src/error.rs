//! Core error taxonomy.
//!
//! Index-range violations are caller bugs: operations clamp where a sane
//! default exists (a column past the end of a row clamps to the row length)
//! and fail fast with [`Error::InvalidIndex`] otherwise, so a bad index can
//! never leave a row's derived state out of sync with its raw text.
//!
//! A search that finds nothing is **not** an error — it is signaled by
//! leaving the engine's match state unset.

use thiserror::Error;

/// Errors reported by core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A row index outside the document's valid range.
    #[error("row index {index} out of range (document has {len} rows)")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// The document's row count at the time of the call.
        len: usize,
    },

    /// An operation that needs a current row ran against an empty document.
    #[error("document has no rows")]
    EmptyDocument,
}

/// Convenience alias for core results.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_index_display() {
        let err = Error::InvalidIndex { index: 7, len: 3 };
        assert_eq!(
            err.to_string(),
            "row index 7 out of range (document has 3 rows)"
        );
    }

    #[test]
    fn empty_document_display() {
        assert_eq!(Error::EmptyDocument.to_string(), "document has no rows");
    }

    #[test]
    fn errors_are_comparable() {
        assert_eq!(
            Error::InvalidIndex { index: 1, len: 0 },
            Error::InvalidIndex { index: 1, len: 0 }
        );
        assert_ne!(
            Error::EmptyDocument,
            Error::InvalidIndex { index: 0, len: 0 }
        );
    }
}
