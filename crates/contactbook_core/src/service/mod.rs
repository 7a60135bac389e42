//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the store-to-UI surface.
//! - Reconcile transient form state into storable records.

pub mod contact_store;
pub mod form_reconciler;
