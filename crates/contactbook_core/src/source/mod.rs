//! Initial contact data sources.
//!
//! # Responsibility
//! - Decode the one-shot `{ contacts: [...] }` document handed to the store.

pub mod json_source;
