//! Core domain logic for the contact directory.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod source;

pub use config::CoreConfig;
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::contact::{
    or_not_available, BillingInformation, ContactDetails, ContactId, ContactRecord, ContactType,
    EmailAddress, EmailType, MailingAddress, PhoneNumber, PhoneType, PreferredLanguage,
    UNASSIGNED_CONTACT_ID,
};
pub use model::patch::ContactPatch;
pub use repo::contact_repo::{
    ContactRepository, InMemoryContactRepository, RepoError, RepoResult,
};
pub use search::filter::{
    filter_contacts, unique_tags, ActiveFilter, CriteriaError, FilterCriteria, TagFilter,
    TypeFilter,
};
pub use service::contact_store::{ContactStore, SelectTarget, StoreError, StoreResult};
pub use service::form_reconciler::{
    BillingInput, ContactDraft, EmailEntry, FieldError, FormReconciler, MailingAddressInput,
    PhoneEntry, RowKey, ValidationErrors,
};
pub use source::json_source::{
    parse_contact_document, read_contact_file, to_contact_document_json, ContactDocument,
    SourceError, SourceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
