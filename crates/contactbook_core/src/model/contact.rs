//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its nested sub-records.
//! - Accept the loose/legacy input shapes found in contact documents and
//!   canonicalize them on the way in.
//!
//! # Invariants
//! - `id` is unique within a store and never reused once assigned.
//! - Blank optional values are `None`, never `Some("")`.
//! - A billing block with no populated field is `None` on the record.
//! - Mailing address always uses the structured shape internally.

use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned contact identifier.
pub type ContactId = u64;

/// Sentinel for records that have not been assigned an id yet.
///
/// Contact documents may omit `id`; such records deserialize to this value.
pub const UNASSIGNED_CONTACT_ID: ContactId = 0;

/// Path prefix for image stems resolved as static assets.
pub const IMAGE_ASSET_PREFIX: &str = "/img/";
/// File extension for image stems resolved as static assets.
pub const IMAGE_ASSET_EXTENSION: &str = ".jpg";
/// Asset shown when a record has no image.
pub const DEFAULT_AVATAR_ASSET: &str = "/img/default.jpg";
/// Placeholder rendered for absent optional values.
pub const NOT_AVAILABLE: &str = "N/A";

const DATA_URI_PREFIX: &str = "data:";

/// Relationship of a contact to the directory owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContactType {
    #[serde(alias = "contractor")]
    Contractor,
    #[default]
    #[serde(alias = "employee")]
    Employee,
    #[serde(alias = "freelancer")]
    Freelancer,
}

impl ContactType {
    /// All variants in menu order.
    pub const ALL: [ContactType; 3] = [Self::Contractor, Self::Employee, Self::Freelancer];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contractor => "Contractor",
            Self::Employee => "Employee",
            Self::Freelancer => "Freelancer",
        }
    }

    /// Parses a label case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }
}

/// Language a contact prefers to be addressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PreferredLanguage {
    #[serde(alias = "hebrew")]
    Hebrew,
    #[default]
    #[serde(alias = "english")]
    English,
    #[serde(alias = "spanish")]
    Spanish,
    #[serde(alias = "french")]
    French,
}

impl PreferredLanguage {
    pub const ALL: [PreferredLanguage; 4] =
        [Self::Hebrew, Self::English, Self::Spanish, Self::French];

    /// Display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hebrew => "Hebrew",
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
        }
    }

    /// ISO 3166 country code used for the flag next to the label.
    pub fn flag_country_code(self) -> &'static str {
        match self {
            Self::Hebrew => "IL",
            Self::English => "US",
            Self::Spanish => "ES",
            Self::French => "FR",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|language| language.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PhoneType {
    #[serde(alias = "work")]
    Work,
    #[default]
    #[serde(alias = "personal")]
    Personal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmailType {
    #[default]
    #[serde(alias = "private")]
    Private,
    #[serde(alias = "work")]
    Work,
}

/// One phone entry. List position is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhoneNumber {
    /// Serialized as `type` to match the contact document.
    #[serde(rename = "type", default)]
    pub kind: PhoneType,
    #[serde(default)]
    pub number: String,
}

/// One email entry. List position is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EmailAddress {
    #[serde(rename = "type", default)]
    pub kind: EmailType,
    #[serde(default)]
    pub email: String,
}

/// Contact methods and language preference.
///
/// Lists are only ever replaced wholesale; there is no per-entry mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDetails {
    #[serde(default)]
    pub preferred_language: PreferredLanguage,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    pub emails: Vec<EmailAddress>,
}

/// Structured mailing address.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MailingAddress {
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl MailingAddress {
    /// Builds a canonical address, returning `None` when both parts are blank.
    pub fn new(address: &str, comment: Option<&str>) -> Option<Self> {
        let address = address.trim();
        let comment = comment.and_then(non_blank);
        if address.is_empty() && comment.is_none() {
            return None;
        }
        Some(Self {
            address: address.to_string(),
            comment,
        })
    }

    /// Adapts the legacy plain-string address shape.
    pub fn from_legacy(value: &str) -> Option<Self> {
        Self::new(value, None)
    }

    pub fn is_blank(&self) -> bool {
        self.address.trim().is_empty() && self.comment.as_deref().and_then(non_blank).is_none()
    }
}

/// Invoicing details. Each field is independently optional.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingInformation {
    #[serde(
        rename = "nameForInvoice",
        alias = "invoiceName",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub name_for_invoice: Option<String>,
    #[serde(
        rename = "accountingRef",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub accounting_ref: Option<String>,
    #[serde(
        rename = "VATNumber",
        alias = "vatNumber",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub vat_number: Option<String>,
}

impl BillingInformation {
    /// Builds a canonical billing block, returning `None` when every field is blank.
    pub fn new(
        name_for_invoice: Option<&str>,
        accounting_ref: Option<&str>,
        vat_number: Option<&str>,
    ) -> Option<Self> {
        let billing = Self {
            name_for_invoice: name_for_invoice.and_then(non_blank),
            accounting_ref: accounting_ref.and_then(non_blank),
            vat_number: vat_number.and_then(non_blank),
        };
        if billing.is_empty() {
            None
        } else {
            Some(billing)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name_for_invoice.is_none() && self.accounting_ref.is_none() && self.vat_number.is_none()
    }

    fn canonicalize(self) -> Option<Self> {
        Self::new(
            self.name_for_invoice.as_deref(),
            self.accounting_ref.as_deref(),
            self.vat_number.as_deref(),
        )
    }
}

/// Canonical contact record.
///
/// Serialized in the camelCase shape of the `{ contacts: [...] }` document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRecord {
    /// `UNASSIGNED_CONTACT_ID` until the store assigns one.
    #[serde(default)]
    pub id: ContactId,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub contact_type: ContactType,
    /// File-name stem or inline data URI. Replaced wholesale on edit.
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    /// Not mutually exclusive across records.
    #[serde(default)]
    pub main_contact: bool,
    #[serde(default)]
    pub contact_details: ContactDetails,
    #[serde(
        default,
        deserialize_with = "deserialize_mailing_address",
        skip_serializing_if = "Option::is_none"
    )]
    pub mailing_address: Option<MailingAddress>,
    #[serde(
        default,
        deserialize_with = "deserialize_billing_information",
        skip_serializing_if = "Option::is_none"
    )]
    pub billing_information: Option<BillingInformation>,
    /// Comma-separated tag list, parsed lazily by [`ContactRecord::tags`].
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<String>,
    #[serde(default, alias = "activeContact", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl ContactRecord {
    /// Creates an unassigned record with default type, language and no contact methods.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            role: role.into(),
            ..Self::default()
        }
    }

    pub fn has_id(&self) -> bool {
        self.id != UNASSIGNED_CONTACT_ID
    }

    /// `"<first> <last>"`, the string free-text search matches against.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Trimmed, non-empty tag tokens in declaration order.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags().any(|candidate| candidate == tag)
    }

    /// Resolves `image` to a displayable asset path.
    ///
    /// Inline data URIs are returned unchanged; absence yields the default avatar.
    pub fn image_asset_path(&self) -> String {
        match self.image.as_deref() {
            Some(image) if image.starts_with(DATA_URI_PREFIX) => image.to_string(),
            Some(image) => format!("{IMAGE_ASSET_PREFIX}{image}{IMAGE_ASSET_EXTENSION}"),
            None => DEFAULT_AVATAR_ASSET.to_string(),
        }
    }

    /// Applies blank-value rules to records built outside deserialization.
    pub fn canonicalize(&mut self) {
        self.image = self.image.as_deref().and_then(non_blank);
        self.tags = self.tags.as_deref().and_then(non_blank);
        if self
            .mailing_address
            .as_ref()
            .is_some_and(MailingAddress::is_blank)
        {
            self.mailing_address = None;
        }
        self.billing_information = self
            .billing_information
            .take()
            .and_then(BillingInformation::canonicalize);
    }
}

/// Returns `value` or the `N/A` placeholder.
pub fn or_not_available(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => NOT_AVAILABLE,
    }
}

pub(crate) fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(non_blank))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MailingAddressInput {
    Legacy(String),
    Structured {
        #[serde(default)]
        address: Option<String>,
        #[serde(default)]
        comment: Option<String>,
    },
}

pub(crate) fn deserialize_mailing_address<'de, D>(
    deserializer: D,
) -> Result<Option<MailingAddress>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<MailingAddressInput>::deserialize(deserializer)?;
    Ok(input.and_then(|input| match input {
        MailingAddressInput::Legacy(value) => MailingAddress::from_legacy(&value),
        MailingAddressInput::Structured { address, comment } => {
            MailingAddress::new(address.as_deref().unwrap_or_default(), comment.as_deref())
        }
    }))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BillingInput {
    // Older documents store `""` when no billing block exists.
    Blank(String),
    Block(BillingInformation),
}

pub(crate) fn deserialize_billing_information<'de, D>(
    deserializer: D,
) -> Result<Option<BillingInformation>, D::Error>
where
    D: Deserializer<'de>,
{
    let input = Option::<BillingInput>::deserialize(deserializer)?;
    Ok(input.and_then(|input| match input {
        BillingInput::Blank(_) => None,
        BillingInput::Block(block) => block.canonicalize(),
    }))
}

#[cfg(test)]
mod tests {
    use super::{or_not_available, ContactRecord, ContactType, MailingAddress, PreferredLanguage};

    #[test]
    fn parse_labels_case_insensitively() {
        assert_eq!(ContactType::parse(" freelancer "), Some(ContactType::Freelancer));
        assert_eq!(PreferredLanguage::parse("HEBREW"), Some(PreferredLanguage::Hebrew));
        assert_eq!(ContactType::parse("Boss"), None);
    }

    #[test]
    fn tags_are_trimmed_and_blank_tokens_dropped() {
        let mut record = ContactRecord::new("Ana", "Levi", "Clerk");
        record.tags = Some(" vip, ,north ,".to_string());
        assert_eq!(record.tags().collect::<Vec<_>>(), vec!["vip", "north"]);
        assert!(record.has_tag("north"));
        assert!(!record.has_tag("North"));
    }

    #[test]
    fn image_asset_path_covers_stem_data_uri_and_absence() {
        let mut record = ContactRecord::new("Ana", "Levi", "Clerk");
        assert_eq!(record.image_asset_path(), "/img/default.jpg");

        record.image = Some("ana".to_string());
        assert_eq!(record.image_asset_path(), "/img/ana.jpg");

        record.image = Some("data:image/png;base64,AAAA".to_string());
        assert_eq!(record.image_asset_path(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn canonicalize_drops_blank_blocks() {
        let mut record = ContactRecord::new("Ana", "Levi", "Clerk");
        record.image = Some("  ".to_string());
        record.mailing_address = Some(MailingAddress::default());
        record.billing_information = Some(Default::default());
        record.canonicalize();

        assert_eq!(record.image, None);
        assert_eq!(record.mailing_address, None);
        assert_eq!(record.billing_information, None);
    }

    #[test]
    fn not_available_placeholder_applies_to_blank_values() {
        assert_eq!(or_not_available(None), "N/A");
        assert_eq!(or_not_available(Some(" ")), "N/A");
        assert_eq!(or_not_available(Some("ACME")), "ACME");
    }
}
