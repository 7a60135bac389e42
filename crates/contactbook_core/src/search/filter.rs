//! Composable filter predicates over the contact collection.
//!
//! # Responsibility
//! - Evaluate structural criteria (type, tag, active flag, main-only).
//! - Evaluate case-insensitive name search.
//!
//! # Invariants
//! - Every evaluation starts from the full collection; results are never
//!   derived from a previously filtered subset.
//! - Predicates are conjunctive and pure, so their order does not matter.
//! - Output preserves collection order; nothing is sorted.

use crate::model::contact::{ContactRecord, ContactType};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

const ALL_SENTINEL: &str = "All";

/// Invalid criteria value received from a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CriteriaError {
    pub field: &'static str,
    pub value: String,
}

impl Display for CriteriaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported {} filter value `{}`",
            self.field, self.value
        )
    }
}

impl Error for CriteriaError {}

/// Contact type criterion. `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TypeFilter {
    #[default]
    All,
    Only(ContactType),
}

impl TryFrom<String> for TypeFilter {
    type Error = CriteriaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_all(&value) {
            return Ok(Self::All);
        }
        ContactType::parse(&value)
            .map(Self::Only)
            .ok_or(CriteriaError {
                field: "contactType",
                value,
            })
    }
}

impl From<TypeFilter> for String {
    fn from(value: TypeFilter) -> Self {
        match value {
            TypeFilter::All => ALL_SENTINEL.to_string(),
            TypeFilter::Only(kind) => kind.as_str().to_string(),
        }
    }
}

/// Tag criterion. Matched exactly against trimmed tag tokens.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagFilter {
    #[default]
    All,
    Only(String),
}

impl From<String> for TagFilter {
    fn from(value: String) -> Self {
        if is_all(&value) {
            Self::All
        } else {
            Self::Only(value.trim().to_string())
        }
    }
}

impl From<TagFilter> for String {
    fn from(value: TagFilter) -> Self {
        match value {
            TagFilter::All => ALL_SENTINEL.to_string(),
            TagFilter::Only(tag) => tag,
        }
    }
}

/// Active-flag criterion, exchanged as `"All" | "true" | "false"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActiveFilter {
    #[default]
    All,
    Active,
    Inactive,
}

impl TryFrom<String> for ActiveFilter {
    type Error = CriteriaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if is_all(&value) {
            return Ok(Self::All);
        }
        match value.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(Self::Active),
            "false" => Ok(Self::Inactive),
            _ => Err(CriteriaError {
                field: "activeContact",
                value,
            }),
        }
    }
}

impl From<ActiveFilter> for String {
    fn from(value: ActiveFilter) -> Self {
        match value {
            ActiveFilter::All => ALL_SENTINEL,
            ActiveFilter::Active => "true",
            ActiveFilter::Inactive => "false",
        }
        .to_string()
    }
}

/// Discrete filter selections, applied independently of the search term.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub contact_type: TypeFilter,
    #[serde(default, rename = "tags", alias = "tag")]
    pub tag: TagFilter,
    #[serde(default)]
    pub active_contact: ActiveFilter,
    #[serde(default, rename = "mainContact", alias = "mainContactOnly")]
    pub main_contact_only: bool,
}

impl FilterCriteria {
    /// Returns whether every predicate is disabled.
    pub fn is_pass_through(&self) -> bool {
        *self == Self::default()
    }

    /// Evaluates all structural predicates for one record.
    pub fn matches(&self, record: &ContactRecord) -> bool {
        matches_type(record, self.contact_type)
            && matches_tag(record, &self.tag)
            && matches_active(record, self.active_contact)
            && matches_main(record, self.main_contact_only)
    }
}

/// Returns the visible subset of `contacts` in collection order.
///
/// An empty `search_term` disables name search.
pub fn filter_contacts<'a>(
    contacts: &'a [ContactRecord],
    criteria: &FilterCriteria,
    search_term: &str,
) -> Vec<&'a ContactRecord> {
    let needle = normalize_search_term(search_term);
    contacts
        .iter()
        .filter(|record| criteria.matches(record) && matches_search(record, needle.as_deref()))
        .collect()
}

/// Distinct trimmed tags across `contacts`, in first-seen order.
pub fn unique_tags(contacts: &[ContactRecord]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in contacts.iter().flat_map(ContactRecord::tags) {
        if !tags.iter().any(|known| known == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn is_all(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_SENTINEL)
}

// Matched verbatim: surrounding whitespace is part of the needle.
fn normalize_search_term(search_term: &str) -> Option<String> {
    if search_term.is_empty() {
        None
    } else {
        Some(search_term.to_lowercase())
    }
}

fn matches_type(record: &ContactRecord, filter: TypeFilter) -> bool {
    match filter {
        TypeFilter::All => true,
        TypeFilter::Only(kind) => record.contact_type == kind,
    }
}

fn matches_tag(record: &ContactRecord, filter: &TagFilter) -> bool {
    match filter {
        TagFilter::All => true,
        TagFilter::Only(tag) => record.has_tag(tag),
    }
}

fn matches_active(record: &ContactRecord, filter: ActiveFilter) -> bool {
    match filter {
        ActiveFilter::All => true,
        ActiveFilter::Active => record.is_active == Some(true),
        ActiveFilter::Inactive => record.is_active == Some(false),
    }
}

fn matches_main(record: &ContactRecord, main_only: bool) -> bool {
    !main_only || record.main_contact
}

fn matches_search(record: &ContactRecord, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => record.display_name().to_lowercase().contains(needle),
    }
}

#[cfg(test)]
mod tests {
    use super::{ActiveFilter, FilterCriteria, TagFilter, TypeFilter};
    use crate::model::contact::ContactType;

    #[test]
    fn criteria_deserialize_from_popover_shape() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "contactType": "Employee",
            "tags": "vip",
            "activeContact": "false",
            "mainContact": true
        }))
        .unwrap();

        assert_eq!(criteria.contact_type, TypeFilter::Only(ContactType::Employee));
        assert_eq!(criteria.tag, TagFilter::Only("vip".to_string()));
        assert_eq!(criteria.active_contact, ActiveFilter::Inactive);
        assert!(criteria.main_contact_only);
    }

    #[test]
    fn all_sentinels_and_missing_keys_are_pass_through() {
        let criteria: FilterCriteria = serde_json::from_value(serde_json::json!({
            "contactType": "All",
            "tags": "All"
        }))
        .unwrap();
        assert!(criteria.is_pass_through());
    }

    #[test]
    fn unknown_contact_type_is_rejected() {
        let err = serde_json::from_value::<FilterCriteria>(serde_json::json!({
            "contactType": "Intern"
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Intern"), "unexpected error: {err}");
    }

    #[test]
    fn criteria_serialize_back_to_popover_shape() {
        let criteria = FilterCriteria {
            active_contact: ActiveFilter::Active,
            ..FilterCriteria::default()
        };
        let json = serde_json::to_value(&criteria).unwrap();
        assert_eq!(json["contactType"], "All");
        assert_eq!(json["tags"], "All");
        assert_eq!(json["activeContact"], "true");
        assert_eq!(json["mainContact"], false);
    }
}
