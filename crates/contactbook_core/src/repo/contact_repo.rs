//! Contact repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Provide primitive insert/replace/get/list/remove over contact records.
//! - Preserve insertion order, which is also display order.
//!
//! # Invariants
//! - Stored ids are unique and never `UNASSIGNED_CONTACT_ID`.
//! - `replace` keeps the record at its original position.

use crate::model::contact::{ContactId, ContactRecord, UNASSIGNED_CONTACT_ID};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for contact storage operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    NotFound(ContactId),
    DuplicateId(ContactId),
    /// Write attempted with a record that has no id yet.
    UnassignedId,
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::DuplicateId(id) => write!(f, "contact id already exists: {id}"),
            Self::UnassignedId => write!(f, "contact has no assigned id"),
        }
    }
}

impl Error for RepoError {}

/// Repository interface for contact records.
pub trait ContactRepository {
    /// Replaces every stored record. Callers guarantee unique assigned ids.
    fn replace_all(&mut self, records: Vec<ContactRecord>);
    fn insert(&mut self, record: ContactRecord) -> RepoResult<()>;
    fn replace(&mut self, record: ContactRecord) -> RepoResult<()>;
    fn get(&self, id: ContactId) -> Option<&ContactRecord>;
    /// All records in insertion order.
    fn list(&self) -> &[ContactRecord];
    fn remove(&mut self, id: ContactId) -> RepoResult<ContactRecord>;

    fn contains(&self, id: ContactId) -> bool {
        self.get(id).is_some()
    }

    fn max_id(&self) -> Option<ContactId> {
        self.list().iter().map(|record| record.id).max()
    }
}

/// Insertion-ordered in-memory repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryContactRepository {
    records: Vec<ContactRecord>,
}

impl InMemoryContactRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: ContactId) -> Option<usize> {
        self.records.iter().position(|record| record.id == id)
    }
}

impl ContactRepository for InMemoryContactRepository {
    fn replace_all(&mut self, records: Vec<ContactRecord>) {
        self.records = records;
    }

    fn insert(&mut self, record: ContactRecord) -> RepoResult<()> {
        if record.id == UNASSIGNED_CONTACT_ID {
            return Err(RepoError::UnassignedId);
        }
        if self.contains(record.id) {
            return Err(RepoError::DuplicateId(record.id));
        }
        self.records.push(record);
        Ok(())
    }

    fn replace(&mut self, record: ContactRecord) -> RepoResult<()> {
        let index = self
            .position(record.id)
            .ok_or(RepoError::NotFound(record.id))?;
        self.records[index] = record;
        Ok(())
    }

    fn get(&self, id: ContactId) -> Option<&ContactRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    fn list(&self) -> &[ContactRecord] {
        &self.records
    }

    fn remove(&mut self, id: ContactId) -> RepoResult<ContactRecord> {
        let index = self.position(id).ok_or(RepoError::NotFound(id))?;
        Ok(self.records.remove(index))
    }
}
