//! # keel-core — Editor core for keel
//!
//! This crate contains the in-memory text engine behind the editor:
//!
//! - **[`row`]** — `Row`, the unit of storage: raw text plus derived
//!   rendered text (tabs expanded) and per-character highlight classes
//! - **[`document`]** — `Document`, an ordered row store with edit
//!   operations, dirty tracking, and load/serialize entry points
//! - **[`cursor`]** — `Cursor` with movement and end-of-line clamping
//! - **[`grammar`]** — `Grammar`, the immutable highlight configuration
//!   (keyword list, comment marker, feature flags)
//! - **[`highlight`]** — the single-pass lexical classifier
//! - **[`search`]** — `SearchEngine`, incremental match navigation with a
//!   restorable highlight overlay
//! - **[`viewport`]** — scroll-offset clamping for a fixed-size window
//!
//! Everything here is synchronous, single-threaded, and terminal-free:
//! no escape sequences, no file descriptors, no key parsing. Those live
//! in `keel-term` and the binary.

pub mod cursor;
pub mod document;
pub mod error;
pub mod grammar;
pub mod highlight;
pub mod row;
pub mod search;
pub mod viewport;

pub use error::Error;
