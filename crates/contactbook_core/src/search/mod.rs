//! Contact filtering and free-text search.
//!
//! # Responsibility
//! - Compute the visible subset of contacts from criteria plus search text.
//! - Keep predicate semantics inside core, independent of any table widget.

pub mod filter;
