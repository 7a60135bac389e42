//! Repository layer abstractions and storage implementations.
//!
//! # Responsibility
//! - Define primitive data access contracts for contact records.
//! - Keep storage layout details out of the store/use-case layer.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateId`)
//!   instead of silently ignoring bad targets.

pub mod contact_repo;
