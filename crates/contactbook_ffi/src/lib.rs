//! Flutter-facing bindings for the contact directory core.

pub mod api;
