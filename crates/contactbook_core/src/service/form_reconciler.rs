//! Form draft and save-time reconciliation.
//!
//! # Responsibility
//! - Hold every editable field of one add/edit session in a single draft.
//! - Validate the draft with field-scoped messages.
//! - Rebuild a well-formed `ContactRecord` from the draft on save.
//!
//! # Invariants
//! - Row keys identify phone/email rows for the session only and never reach
//!   the stored record.
//! - Nested blocks are rebuilt fully; nothing is deep-merged.
//! - `id`, `mainContact`, `tags` and `isActive` are never edited by the form
//!   and are carried over from the existing record.
//! - Validation failures never produce a record.

use crate::model::contact::{
    non_blank, BillingInformation, ContactDetails, ContactRecord, ContactType, EmailAddress,
    EmailType, MailingAddress, PhoneNumber, PhoneType, PreferredLanguage, IMAGE_ASSET_EXTENSION,
    IMAGE_ASSET_PREFIX, UNASSIGNED_CONTACT_ID,
};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static PHONE_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{7,15}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

const OBJECT_URL_PREFIX: &str = "blob:";

/// Session-local identity of one phone/email row.
pub type RowKey = Uuid;

/// One editable phone row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneEntry {
    #[serde(default = "Uuid::new_v4")]
    pub key: RowKey,
    #[serde(default)]
    pub number: String,
    #[serde(rename = "type", default)]
    pub kind: PhoneType,
}

impl PhoneEntry {
    pub fn new(number: impl Into<String>, kind: PhoneType) -> Self {
        Self {
            key: Uuid::new_v4(),
            number: number.into(),
            kind,
        }
    }
}

/// One editable email row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailEntry {
    #[serde(default = "Uuid::new_v4")]
    pub key: RowKey,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "type", default)]
    pub kind: EmailType,
}

impl EmailEntry {
    pub fn new(email: impl Into<String>, kind: EmailType) -> Self {
        Self {
            key: Uuid::new_v4(),
            email: email.into(),
            kind,
        }
    }
}

/// Mailing address as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MailingAddressInput {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub comment: String,
}

/// Billing fields as typed into the form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingInput {
    #[serde(default)]
    pub name_for_invoice: String,
    #[serde(default)]
    pub accounting_ref: String,
    #[serde(default, rename = "VATNumber", alias = "vatNumber")]
    pub vat_number: String,
}

/// Unified draft record for one add/edit session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub contact_type: ContactType,
    #[serde(default)]
    pub preferred_language: PreferredLanguage,
    #[serde(default)]
    pub phones: Vec<PhoneEntry>,
    #[serde(default)]
    pub emails: Vec<EmailEntry>,
    /// Final image reference chosen in this session, if any.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub mailing_address: MailingAddressInput,
    #[serde(default)]
    pub billing: BillingInput,
}

impl ContactDraft {
    /// Draft for the create form: one empty phone row and one empty email row.
    pub fn blank() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            role: String::new(),
            contact_type: ContactType::Employee,
            preferred_language: PreferredLanguage::English,
            phones: vec![PhoneEntry::new("", PhoneType::Personal)],
            emails: vec![EmailEntry::new("", EmailType::Private)],
            image: None,
            mailing_address: MailingAddressInput::default(),
            billing: BillingInput::default(),
        }
    }

    /// Renders an existing record into edit-form state.
    ///
    /// `image` starts empty: no new upload has happened yet.
    pub fn from_record(record: &ContactRecord) -> Self {
        let details = &record.contact_details;
        let mailing_address = record
            .mailing_address
            .as_ref()
            .map(|address| MailingAddressInput {
                address: address.address.clone(),
                comment: address.comment.clone().unwrap_or_default(),
            })
            .unwrap_or_default();
        let billing = record
            .billing_information
            .as_ref()
            .map(|billing| BillingInput {
                name_for_invoice: billing.name_for_invoice.clone().unwrap_or_default(),
                accounting_ref: billing.accounting_ref.clone().unwrap_or_default(),
                vat_number: billing.vat_number.clone().unwrap_or_default(),
            })
            .unwrap_or_default();

        Self {
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            role: record.role.clone(),
            contact_type: record.contact_type,
            preferred_language: details.preferred_language,
            phones: details
                .phone_numbers
                .iter()
                .map(|phone| PhoneEntry::new(phone.number.clone(), phone.kind))
                .collect(),
            emails: details
                .emails
                .iter()
                .map(|email| EmailEntry::new(email.email.clone(), email.kind))
                .collect(),
            image: None,
            mailing_address,
            billing,
        }
    }

    /// Appends an empty phone row and returns its key.
    pub fn add_phone(&mut self) -> RowKey {
        let entry = PhoneEntry::new("", PhoneType::Personal);
        let key = entry.key;
        self.phones.push(entry);
        key
    }

    /// Removes the phone row with `key`. Returns whether a row was removed.
    pub fn remove_phone(&mut self, key: RowKey) -> bool {
        let before = self.phones.len();
        self.phones.retain(|entry| entry.key != key);
        self.phones.len() != before
    }

    /// Edits the phone row with `key`. Returns whether the row exists.
    pub fn update_phone(&mut self, key: RowKey, number: &str, kind: PhoneType) -> bool {
        match self.phones.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.number = number.to_string();
                entry.kind = kind;
                true
            }
            None => false,
        }
    }

    pub fn add_email(&mut self) -> RowKey {
        let entry = EmailEntry::new("", EmailType::Private);
        let key = entry.key;
        self.emails.push(entry);
        key
    }

    pub fn remove_email(&mut self, key: RowKey) -> bool {
        let before = self.emails.len();
        self.emails.retain(|entry| entry.key != key);
        self.emails.len() != before
    }

    pub fn update_email(&mut self, key: RowKey, email: &str, kind: EmailType) -> bool {
        match self.emails.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.email = email.to_string();
                entry.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Records the final image reference produced by the upload step.
    pub fn set_image(&mut self, reference: impl Into<String>) {
        self.image = Some(reference.into());
    }
}

impl Default for ContactDraft {
    fn default() -> Self {
        Self::blank()
    }
}

/// One validation failure bound to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path such as `firstName` or `phones[1].number`.
    pub field: String,
    /// Row the field belongs to, for list fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_key: Option<RowKey>,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            row_key: None,
            message: message.into(),
        }
    }

    fn for_row(field: String, row_key: RowKey, message: impl Into<String>) -> Self {
        Self {
            field,
            row_key: Some(row_key),
            message: message.into(),
        }
    }
}

/// All validation failures of one submit attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First message reported for `field`.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message.as_str())
    }

    fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self
            .errors
            .iter()
            .map(|error| error.field.as_str())
            .collect::<Vec<_>>();
        write!(f, "invalid contact form fields: {}", fields.join(", "))
    }
}

impl Error for ValidationErrors {}

/// Converts drafts into records ready for `ContactStore::add`/`update`.
pub struct FormReconciler;

impl FormReconciler {
    /// Validates `draft` and rebuilds a full record.
    ///
    /// `existing` is the record being edited, or `None` on create.
    ///
    /// # Errors
    /// - Returns every field-level failure when the draft does not validate.
    pub fn build(
        draft: &ContactDraft,
        existing: Option<&ContactRecord>,
    ) -> Result<ContactRecord, ValidationErrors> {
        Self::validate(draft)?;

        let mut record = ContactRecord {
            id: existing.map_or(UNASSIGNED_CONTACT_ID, |record| record.id),
            first_name: draft.first_name.trim().to_string(),
            last_name: draft.last_name.trim().to_string(),
            role: draft.role.trim().to_string(),
            contact_type: draft.contact_type,
            image: resolve_image(draft.image.as_deref(), existing),
            main_contact: existing.is_some_and(|record| record.main_contact),
            contact_details: ContactDetails {
                preferred_language: draft.preferred_language,
                phone_numbers: draft
                    .phones
                    .iter()
                    .map(|entry| PhoneNumber {
                        kind: entry.kind,
                        number: entry.number.trim().to_string(),
                    })
                    .collect(),
                emails: draft
                    .emails
                    .iter()
                    .map(|entry| EmailAddress {
                        kind: entry.kind,
                        email: entry.email.trim().to_string(),
                    })
                    .collect(),
            },
            mailing_address: MailingAddress::new(
                &draft.mailing_address.address,
                Some(draft.mailing_address.comment.as_str()),
            ),
            billing_information: BillingInformation::new(
                Some(draft.billing.name_for_invoice.as_str()),
                Some(draft.billing.accounting_ref.as_str()),
                Some(draft.billing.vat_number.as_str()),
            ),
            tags: existing.and_then(|record| record.tags.clone()),
            is_active: existing.and_then(|record| record.is_active),
        };
        record.canonicalize();
        Ok(record)
    }

    /// Runs every field rule and collects all failures.
    pub fn validate(draft: &ContactDraft) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, value, label) in [
            ("firstName", &draft.first_name, "First name"),
            ("lastName", &draft.last_name, "Last name"),
            ("role", &draft.role, "Role"),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::new(field, format!("{label} is required")));
            }
        }

        if draft.phones.is_empty() {
            errors.push(FieldError::new(
                "phones",
                "At least one phone number is required",
            ));
        }
        for (index, entry) in draft.phones.iter().enumerate() {
            let field = format!("phones[{index}].number");
            let number = entry.number.trim();
            if number.is_empty() {
                errors.push(FieldError::for_row(
                    field,
                    entry.key,
                    "Phone number is required",
                ));
            } else if !PHONE_NUMBER_RE.is_match(number) {
                errors.push(FieldError::for_row(
                    field,
                    entry.key,
                    "Phone number must contain 7 to 15 digits",
                ));
            }
        }

        for (index, entry) in draft.emails.iter().enumerate() {
            let field = format!("emails[{index}].email");
            let email = entry.email.trim();
            if email.is_empty() {
                errors.push(FieldError::for_row(field, entry.key, "Email is required"));
            } else if !EMAIL_RE.is_match(email) {
                errors.push(FieldError::for_row(
                    field,
                    entry.key,
                    "Email address is invalid",
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            debug!(
                "event=form_validate module=reconciler status=rejected error_count={}",
                errors.errors.len()
            );
            Err(errors)
        }
    }
}

/// Chooses the image reference to persist.
///
/// Object URLs only exist for the current page and are never persisted.
fn resolve_image(candidate: Option<&str>, existing: Option<&ContactRecord>) -> Option<String> {
    let carried = || existing.and_then(|record| record.image.clone());
    match candidate.and_then(non_blank) {
        Some(reference) if reference.starts_with(OBJECT_URL_PREFIX) => carried(),
        Some(reference) => Some(normalize_image_reference(&reference)),
        None => carried(),
    }
}

/// Reduces `/img/<stem>.jpg` asset paths to `<stem>`; other references pass through.
pub fn normalize_image_reference(reference: &str) -> String {
    reference
        .strip_prefix(IMAGE_ASSET_PREFIX)
        .and_then(|rest| rest.strip_suffix(IMAGE_ASSET_EXTENSION))
        .filter(|stem| !stem.is_empty())
        .unwrap_or(reference)
        .to_string()
}
