//! JSON contact document reader.
//!
//! # Invariants
//! - Decoding is all-or-nothing: a malformed record fails the whole document.
//! - Decoded records are canonical (see `model::contact`).

use crate::model::contact::ContactRecord;
use log::debug;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub type SourceResult<T> = Result<T, SourceError>;

/// Error reading or decoding a contact document.
#[derive(Debug)]
pub enum SourceError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(serde_json::Error),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read contacts from `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid contacts document: {err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Top-level shape of the contacts document.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDocument {
    #[serde(default)]
    pub contacts: Vec<ContactRecord>,
}

/// Decodes a contacts document from JSON text.
pub fn parse_contact_document(text: &str) -> SourceResult<Vec<ContactRecord>> {
    let document: ContactDocument = serde_json::from_str(text)?;
    debug!(
        "event=contacts_decode module=source status=ok count={}",
        document.contacts.len()
    );
    Ok(document.contacts)
}

/// Reads and decodes a contacts document file.
pub fn read_contact_file(path: impl AsRef<Path>) -> SourceResult<Vec<ContactRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_contact_document(&text)
}

/// Encodes records back into the document shape.
pub fn to_contact_document_json(records: &[ContactRecord]) -> SourceResult<String> {
    let document = ContactDocument {
        contacts: records.to_vec(),
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::{parse_contact_document, SourceError};

    #[test]
    fn missing_contacts_key_decodes_as_empty() {
        let records = parse_contact_document("{}").unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let err = parse_contact_document("{\"contacts\": [").unwrap_err();
        assert!(matches!(err, SourceError::Parse(_)));
    }
}
