//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose contact store use-cases to Dart via FRB.
//! - Carry records across the boundary as JSON in the document shape.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One process-wide store backs every call; calls are serialized by a mutex.
//! - Validation failures come back as field errors, never as a bare message.

use contactbook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ContactDraft,
    ContactPatch, ContactRecord, ContactStore, FieldError, FilterCriteria, StoreError,
};
use log::warn;
use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard, PoisonError};

static CONTACT_STORE: Lazy<Mutex<ContactStore>> =
    Lazy::new(|| Mutex::new(ContactStore::in_memory()));

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Field-scoped validation failure for form display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactFieldError {
    /// Field path such as `firstName` or `phones[0].number`.
    pub field: String,
    /// Session row key for phone/email rows.
    pub row_key: Option<String>,
    pub message: String,
}

/// Action response envelope for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the affected record.
    pub contact_id: Option<u64>,
    /// Affected record as JSON, on success.
    pub contact_json: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
    /// Populated only when a form draft failed validation.
    pub field_errors: Vec<ContactFieldError>,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, record: &ContactRecord) -> Self {
        Self {
            ok: true,
            contact_id: Some(record.id),
            contact_json: serde_json::to_string(record).ok(),
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            contact_json: None,
            message: message.into(),
            field_errors: Vec::new(),
        }
    }

    fn from_store_error(op: &str, err: StoreError) -> Self {
        let field_errors = match &err {
            StoreError::Validation(errors) => {
                errors.errors.iter().map(to_ffi_field_error).collect()
            }
            _ => Vec::new(),
        };
        Self {
            field_errors,
            ..Self::failure(format!("{op} failed: {err}"))
        }
    }
}

/// List response envelope for collection reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    /// JSON array of records in display order.
    pub contacts_json: String,
    /// Number of records in `contacts_json`.
    pub count: u32,
    pub message: String,
}

impl ContactListResponse {
    fn from_records(records: &[&ContactRecord]) -> Self {
        match serde_json::to_string(records) {
            Ok(contacts_json) => Self {
                ok: true,
                contacts_json,
                count: u32::try_from(records.len()).unwrap_or(u32::MAX),
                message: format!("{} contact(s).", records.len()),
            },
            Err(err) => Self::failure(format!("encoding contacts failed: {err}")),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contacts_json: "[]".to_string(),
            count: 0,
            message: message.into(),
        }
    }
}

/// Replaces the store contents with a `{ "contacts": [...] }` document.
///
/// # FFI contract
/// - A malformed document, or one whose missing ids cannot be assigned,
///   loads an empty collection and reports failure.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_load_json(document_json: String) -> ContactListResponse {
    let records = match contactbook_core::parse_contact_document(&document_json) {
        Ok(records) => records,
        Err(err) => {
            lock_store().load_or_empty(Err(err.to_string()));
            return ContactListResponse::failure(format!("contacts_load_json failed: {err}"));
        }
    };

    let mut store = lock_store();
    if let Err(err) = store.load(records) {
        store.load_or_empty(Err(err.to_string()));
        return ContactListResponse::failure(format!("contacts_load_json failed: {err}"));
    }
    ContactListResponse::from_records(&store.get_all().iter().collect::<Vec<_>>())
}

/// Returns the full collection in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_get_all() -> ContactListResponse {
    let store = lock_store();
    ContactListResponse::from_records(&store.get_all().iter().collect::<Vec<_>>())
}

/// Returns the visible subset for `criteria_json` and `search_term`.
///
/// Input semantics:
/// - `criteria_json`: `{ "contactType", "tags", "activeContact", "mainContact" }`,
///   every key optional; an empty string means no structural filter.
/// - `search_term`: case-insensitive substring of `"<first> <last>"`.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_get_filtered(criteria_json: String, search_term: String) -> ContactListResponse {
    let criteria = if criteria_json.trim().is_empty() {
        FilterCriteria::default()
    } else {
        match serde_json::from_str::<FilterCriteria>(&criteria_json) {
            Ok(criteria) => criteria,
            Err(err) => {
                return ContactListResponse::failure(format!(
                    "contacts_get_filtered failed: {err}"
                ))
            }
        }
    };

    let store = lock_store();
    ContactListResponse::from_records(&store.get_filtered(&criteria, &search_term))
}

/// Returns the selected record as JSON, or `None` when nothing is selected.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_get_selected() -> Option<String> {
    let store = lock_store();
    store
        .get_selected()
        .and_then(|record| serde_json::to_string(record).ok())
}

/// Marks the record with `id` as selected.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_select(id: u64) -> ContactActionResponse {
    let mut store = lock_store();
    if let Err(err) = store.select(id) {
        return ContactActionResponse::from_store_error("contacts_select", err);
    }
    match store.get_selected() {
        Some(record) => ContactActionResponse::success("Contact selected.", record),
        None => ContactActionResponse::failure("contacts_select failed: selection lost"),
    }
}

/// Clears the selection, e.g. when the detail view closes.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_clear_selection() {
    lock_store().clear_selection();
}

/// Adds a record given in document JSON shape; `id` may be omitted.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_add(record_json: String) -> ContactActionResponse {
    let record = match serde_json::from_str::<ContactRecord>(&record_json) {
        Ok(record) => record,
        Err(err) => return ContactActionResponse::failure(format!("contacts_add failed: {err}")),
    };
    match lock_store().add(record) {
        Ok(record) => ContactActionResponse::success("Contact added.", &record),
        Err(err) => ContactActionResponse::from_store_error("contacts_add", err),
    }
}

/// Shallow-merges a patch carrying `id` onto the stored record.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_update(patch_json: String) -> ContactActionResponse {
    let patch = match serde_json::from_str::<ContactPatch>(&patch_json) {
        Ok(patch) => patch,
        Err(err) => {
            return ContactActionResponse::failure(format!("contacts_update failed: {err}"))
        }
    };
    match lock_store().update(&patch) {
        Ok(record) => ContactActionResponse::success("Contact updated.", &record),
        Err(err) => ContactActionResponse::from_store_error("contacts_update", err),
    }
}

/// Sets the main-contact flag of one record.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_set_main_contact(id: u64, flag: bool) -> ContactActionResponse {
    match lock_store().set_main_contact(id, flag) {
        Ok(record) => ContactActionResponse::success("Main contact updated.", &record),
        Err(err) => ContactActionResponse::from_store_error("contacts_set_main_contact", err),
    }
}

/// Removes one record.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_remove(id: u64) -> ContactActionResponse {
    match lock_store().remove(id) {
        Ok(record) => ContactActionResponse::success("Contact removed.", &record),
        Err(err) => ContactActionResponse::from_store_error("contacts_remove", err),
    }
}

/// Validates a form draft and stores the rebuilt record.
///
/// Input semantics:
/// - `draft_json`: serialized `ContactDraft`; row keys may be omitted.
/// - `editing_id`: id of the record being edited, `None` to create.
///
/// # FFI contract
/// - On validation failure nothing is stored and `field_errors` lists every
///   failing field.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_save_form(draft_json: String, editing_id: Option<u64>) -> ContactActionResponse {
    let draft = match serde_json::from_str::<ContactDraft>(&draft_json) {
        Ok(draft) => draft,
        Err(err) => {
            return ContactActionResponse::failure(format!("contacts_save_form failed: {err}"))
        }
    };
    match lock_store().save_draft(&draft, editing_id) {
        Ok(record) => ContactActionResponse::success("Contact saved.", &record),
        Err(err) => ContactActionResponse::from_store_error("contacts_save_form", err),
    }
}

/// Blank create-form draft as JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_blank_draft() -> String {
    serde_json::to_string(&ContactDraft::blank()).unwrap_or_default()
}

/// Edit-form draft for the record with `id`, or `None` when it is not stored.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_edit_draft(id: u64) -> Option<String> {
    let store = lock_store();
    store
        .get(id)
        .map(ContactDraft::from_record)
        .and_then(|draft| serde_json::to_string(&draft).ok())
}

/// Distinct tags for the tag filter menu.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_unique_tags() -> Vec<String> {
    lock_store().unique_tags()
}

fn lock_store() -> MutexGuard<'static, ContactStore> {
    CONTACT_STORE.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
        warn!("event=store_lock module=ffi status=recovered_poison");
        poisoned.into_inner()
    })
}

fn to_ffi_field_error(error: &FieldError) -> ContactFieldError {
    ContactFieldError {
        field: error.field.clone(),
        row_key: error.row_key.map(|key| key.to_string()),
        message: error.message.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        contacts_add, contacts_blank_draft, contacts_clear_selection, contacts_edit_draft, contacts_get_all,
        contacts_get_filtered, contacts_get_selected, contacts_load_json, contacts_remove,
        contacts_save_form, contacts_select, contacts_set_main_contact, contacts_unique_tags,
        contacts_update, core_version, init_logging,
    };
    use serde_json::{json, Value};

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn malformed_payloads_fail_without_touching_store() {
        assert!(!contacts_add("{".to_string()).ok);
        assert!(!contacts_update("[]".to_string()).ok);
        assert!(!contacts_save_form("nope".to_string(), None).ok);
        let criteria = "{\"contactType\":\"Pilot\"}".to_string();
        assert!(!contacts_get_filtered(criteria, String::new()).ok);
    }

    #[test]
    fn blank_draft_round_trips_through_json() {
        let draft: Value = serde_json::from_str(&contacts_blank_draft()).unwrap();
        assert_eq!(draft["phones"].as_array().unwrap().len(), 1);
        assert_eq!(draft["emails"].as_array().unwrap().len(), 1);
        assert_eq!(draft["contactType"], "Employee");
    }

    // Every call below shares the process-wide store, so the flow stays in one test.
    #[test]
    fn contact_store_flow_over_ffi() {
        let document = json!({
            "contacts": [
                {
                    "id": 1,
                    "firstName": "Ana",
                    "lastName": "Levi",
                    "role": "Clerk",
                    "contactType": "Employee",
                    "contactDetails": {
                        "preferredLanguage": "Hebrew",
                        "phoneNumbers": [{ "type": "Work", "number": "0501234567" }],
                        "emails": []
                    },
                    "tags": "vip"
                },
                {
                    "id": 2,
                    "firstName": "Ben",
                    "lastName": "Cohen",
                    "role": "Driver",
                    "contactType": "Contractor",
                    "contactDetails": {
                        "preferredLanguage": "English",
                        "phoneNumbers": [{ "type": "Personal", "number": "0521234567" }],
                        "emails": []
                    },
                    "tags": "north"
                }
            ]
        });
        let loaded = contacts_load_json(document.to_string());
        assert!(loaded.ok, "{}", loaded.message);
        assert_eq!(loaded.count, 2);

        let bad = contacts_load_json("{".to_string());
        assert!(!bad.ok);
        assert_eq!(contacts_get_all().count, 0);
        assert!(contacts_load_json(document.to_string()).ok);

        let employees = contacts_get_filtered(
            json!({ "contactType": "Employee" }).to_string(),
            String::new(),
        );
        assert_eq!(employees.count, 1);
        let searched = contacts_get_filtered(String::new(), "COH".to_string());
        assert_eq!(searched.count, 1);
        assert!(searched.contacts_json.contains("\"firstName\":\"Ben\""));

        let selected = contacts_select(2);
        assert!(selected.ok, "{}", selected.message);
        assert!(!contacts_select(99).ok);
        contacts_clear_selection();
        assert!(contacts_get_selected().is_none());
        assert!(contacts_select(2).ok);

        let updated = contacts_update(json!({ "id": 2, "role": "Dispatcher" }).to_string());
        assert!(updated.ok, "{}", updated.message);
        let live: Value = serde_json::from_str(&contacts_get_selected().unwrap()).unwrap();
        assert_eq!(live["role"], "Dispatcher");

        let main = contacts_set_main_contact(1, true);
        assert!(main.ok);
        assert!(contacts_set_main_contact(2, true).ok);
        let main_only =
            contacts_get_filtered(json!({ "mainContact": true }).to_string(), String::new());
        assert_eq!(main_only.count, 2);

        let added = contacts_add(
            json!({ "firstName": "Cal", "lastName": "Roe", "role": "Chef" }).to_string(),
        );
        assert_eq!(added.contact_id, Some(3));
        assert!(!contacts_add(json!({ "id": 3, "firstName": "Dup" }).to_string()).ok);

        let mut invalid: Value = serde_json::from_str(&contacts_blank_draft()).unwrap();
        invalid["firstName"] = json!("Dana");
        let rejected = contacts_save_form(invalid.to_string(), None);
        assert!(!rejected.ok);
        assert!(rejected
            .field_errors
            .iter()
            .any(|error| error.field == "lastName"));
        assert_eq!(contacts_get_all().count, 3);

        let mut draft: Value = serde_json::from_str(&contacts_edit_draft(1).unwrap()).unwrap();
        draft["role"] = json!("Manager");
        let saved = contacts_save_form(draft.to_string(), Some(1));
        assert!(saved.ok, "{}", saved.message);
        let saved_record: Value =
            serde_json::from_str(saved.contact_json.as_deref().unwrap()).unwrap();
        assert_eq!(saved_record["role"], "Manager");
        assert_eq!(saved_record["mainContact"], true);

        assert_eq!(contacts_unique_tags(), vec!["vip".to_string(), "north".to_string()]);

        assert!(contacts_remove(2).ok);
        assert!(contacts_get_selected().is_none());
        assert!(!contacts_remove(2).ok);
        let reused = contacts_add(json!({ "id": 2, "firstName": "Bea" }).to_string());
        assert!(!reused.ok);
        assert!(reused.message.contains("cannot be reused"));

        let exhausted = json!({
            "contacts": [
                { "id": u64::MAX, "firstName": "Max" },
                { "firstName": "Ben" }
            ]
        });
        let overflow = contacts_load_json(exhausted.to_string());
        assert!(!overflow.ok);
        assert_eq!(contacts_get_all().count, 0);
        assert!(contacts_load_json(json!({ "contacts": [{ "id": u64::MAX }] }).to_string()).ok);
        let full = contacts_add(json!({ "firstName": "Ben" }).to_string());
        assert!(!full.ok);
        assert!(full.message.contains("no contact id left"));
    }
}
