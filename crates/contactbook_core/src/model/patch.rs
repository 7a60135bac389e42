//! Shallow-merge patch for contact updates.
//!
//! # Invariants
//! - Absent fields keep the record's prior value.
//! - Nested blocks (`contactDetails`, `mailingAddress`, `billingInformation`)
//!   are replaced wholesale, never deep-merged.
//! - Applying the same patch twice yields the same record as applying it once.

use crate::model::contact::{
    blank_as_none, deserialize_billing_information, deserialize_mailing_address, non_blank,
    BillingInformation, ContactDetails, ContactId, ContactRecord, ContactType, MailingAddress,
};
use serde::{Deserialize, Deserializer, Serialize};

/// Patch targeting one existing record by `id`.
///
/// Nullable fields use a double option: `Some(None)` clears the field,
/// `None` leaves it untouched. In JSON that is `null` versus a missing key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    pub id: ContactId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_type: Option<ContactType>,
    #[serde(
        default,
        deserialize_with = "present_image",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_contact: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<ContactDetails>,
    #[serde(
        default,
        deserialize_with = "present_mailing_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub mailing_address: Option<Option<MailingAddress>>,
    #[serde(
        default,
        deserialize_with = "present_billing_information",
        skip_serializing_if = "Option::is_none"
    )]
    pub billing_information: Option<Option<BillingInformation>>,
    #[serde(
        default,
        deserialize_with = "present_tags",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<Option<String>>,
    #[serde(
        default,
        alias = "activeContact",
        deserialize_with = "present_flag",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_active: Option<Option<bool>>,
}

impl ContactPatch {
    /// Creates an empty patch; applying it changes nothing.
    pub fn new(id: ContactId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::new(self.id)
    }

    /// Merges present fields onto `record`. The record's `id` is never changed.
    pub fn apply_to(&self, record: &mut ContactRecord) {
        if let Some(first_name) = &self.first_name {
            record.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            record.last_name = last_name.clone();
        }
        if let Some(role) = &self.role {
            record.role = role.clone();
        }
        if let Some(contact_type) = self.contact_type {
            record.contact_type = contact_type;
        }
        if let Some(image) = &self.image {
            record.image = image.as_deref().and_then(non_blank);
        }
        if let Some(main_contact) = self.main_contact {
            record.main_contact = main_contact;
        }
        if let Some(contact_details) = &self.contact_details {
            record.contact_details = contact_details.clone();
        }
        if let Some(mailing_address) = &self.mailing_address {
            record.mailing_address = mailing_address.clone();
        }
        if let Some(billing_information) = &self.billing_information {
            record.billing_information = billing_information.clone();
        }
        if let Some(tags) = &self.tags {
            record.tags = tags.clone();
        }
        if let Some(is_active) = self.is_active {
            record.is_active = is_active;
        }
        record.canonicalize();
    }
}

impl From<ContactRecord> for ContactPatch {
    /// Full-replacement patch carrying every field of `record`.
    fn from(record: ContactRecord) -> Self {
        Self {
            id: record.id,
            first_name: Some(record.first_name),
            last_name: Some(record.last_name),
            role: Some(record.role),
            contact_type: Some(record.contact_type),
            image: Some(record.image),
            main_contact: Some(record.main_contact),
            contact_details: Some(record.contact_details),
            mailing_address: Some(record.mailing_address),
            billing_information: Some(record.billing_information),
            tags: Some(record.tags),
            is_active: Some(record.is_active),
        }
    }
}

// A key that is present (even as `null`) deserializes to `Some(..)`; missing
// keys fall back to `Default`, i.e. `None`.

fn present_image<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(Some)
}

fn present_tags<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    blank_as_none(deserializer).map(Some)
}

fn present_flag<'de, D>(deserializer: D) -> Result<Option<Option<bool>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<bool>::deserialize(deserializer).map(Some)
}

fn present_mailing_address<'de, D>(
    deserializer: D,
) -> Result<Option<Option<MailingAddress>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_mailing_address(deserializer).map(Some)
}

fn present_billing_information<'de, D>(
    deserializer: D,
) -> Result<Option<Option<BillingInformation>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_billing_information(deserializer).map(Some)
}
