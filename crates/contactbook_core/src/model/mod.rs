//! Contact directory domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep one structured shape per field regardless of input shape.
//!
//! # Invariants
//! - Every stored contact is identified by a store-assigned `ContactId`.
//! - Nested blocks are owned by their record and replaced, never shared.

pub mod contact;
pub mod patch;
