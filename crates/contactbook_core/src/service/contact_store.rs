//! Contact store use-case service.
//!
//! # Responsibility
//! - Own the contact collection and the "selected contact" reference.
//! - Assign identifiers and expose CRUD, selection and filtered reads.
//!
//! # Invariants
//! - Ids are unique and never reused, even after `remove`.
//! - Without removals, a newly assigned id is `max(existing ids) + 1`, or `1`
//!   for an empty store.
//! - The selection is an id re-resolved on every read; it always names a
//!   stored record or is empty.
//! - `set_main_contact` never touches other records' flags.
//! - Logs carry ids and counts only, never contact content.

use crate::model::contact::{ContactId, ContactRecord, UNASSIGNED_CONTACT_ID};
use crate::model::patch::ContactPatch;
use crate::repo::contact_repo::{ContactRepository, InMemoryContactRepository, RepoError};
use crate::search::filter::{filter_contacts, unique_tags, FilterCriteria};
use crate::service::form_reconciler::{ContactDraft, FormReconciler, ValidationErrors};
use log::{error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level error surfaced to UI callers.
#[derive(Debug)]
pub enum StoreError {
    /// Target id is not in the store.
    NotFound(ContactId),
    /// Explicit id on create collides with a stored record.
    DuplicateId(ContactId),
    /// Explicit id on create belonged to a removed record.
    IdRetired(ContactId),
    /// No id above the current maximum is left to assign.
    IdSpaceExhausted,
    /// Form draft failed field validation.
    Validation(ValidationErrors),
    /// Unexpected repository failure.
    Repo(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::DuplicateId(id) => write!(f, "contact id already exists: {id}"),
            Self::IdRetired(id) => {
                write!(f, "contact id was removed and cannot be reused: {id}")
            }
            Self::IdSpaceExhausted => write!(f, "no contact id left to assign"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NotFound(id),
            RepoError::DuplicateId(id) => Self::DuplicateId(id),
            other => Self::Repo(other),
        }
    }
}

impl From<ValidationErrors> for StoreError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value)
    }
}

/// What to select: a bare id or a record carrying one.
#[derive(Debug, Clone, Copy)]
pub enum SelectTarget<'a> {
    Id(ContactId),
    Record(&'a ContactRecord),
}

impl From<ContactId> for SelectTarget<'_> {
    fn from(value: ContactId) -> Self {
        Self::Id(value)
    }
}

impl<'a> From<&'a ContactRecord> for SelectTarget<'a> {
    fn from(value: &'a ContactRecord) -> Self {
        Self::Record(value)
    }
}

/// Contact store facade over a repository implementation.
pub struct ContactStore<R: ContactRepository = InMemoryContactRepository> {
    repo: R,
    selected: Option<ContactId>,
    /// Highest id ever held since the last `load`.
    high_water: ContactId,
    /// Ids removed since the last `load`.
    retired: HashSet<ContactId>,
}

impl ContactStore<InMemoryContactRepository> {
    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(InMemoryContactRepository::new())
    }
}

impl Default for ContactStore<InMemoryContactRepository> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<R: ContactRepository> ContactStore<R> {
    /// Creates a store using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        let high_water = repo.max_id().unwrap_or(UNASSIGNED_CONTACT_ID);
        Self {
            repo,
            selected: None,
            high_water,
            retired: HashSet::new(),
        }
    }

    /// Replaces the entire collection.
    ///
    /// Records without an id, or repeating an id already seen earlier in the
    /// list, are given fresh ids above every id in `records`. The selection is
    /// cleared when its id is no longer present.
    ///
    /// # Errors
    /// - `IdSpaceExhausted` when a fresh id would overflow; the store is left
    ///   unchanged.
    pub fn load(&mut self, records: Vec<ContactRecord>) -> StoreResult<()> {
        let max_assigned = records
            .iter()
            .map(|record| record.id)
            .max()
            .unwrap_or(UNASSIGNED_CONTACT_ID);
        let mut next = max_assigned;
        let mut seen = HashSet::with_capacity(records.len());
        let mut reassigned = 0usize;

        let records = records
            .into_iter()
            .map(|mut record| {
                record.canonicalize();
                if record.id == UNASSIGNED_CONTACT_ID || !seen.insert(record.id) {
                    if record.has_id() {
                        warn!(
                            "event=contacts_load module=store status=duplicate_id id={}",
                            record.id
                        );
                    }
                    next = next.checked_add(1).ok_or(StoreError::IdSpaceExhausted)?;
                    record.id = next;
                    seen.insert(next);
                    reassigned += 1;
                }
                Ok(record)
            })
            .collect::<StoreResult<Vec<_>>>()
            .inspect_err(|_| {
                error!("event=contacts_load module=store status=id_space_exhausted");
            })?;

        let count = records.len();
        self.repo.replace_all(records);
        self.high_water = next;
        self.retired.clear();
        if let Some(selected) = self.selected {
            if !self.repo.contains(selected) {
                self.selected = None;
            }
        }

        info!(
            "event=contacts_load module=store status=ok count={} reassigned={}",
            count, reassigned
        );
        Ok(())
    }

    /// Loads the result of a data-source read, or an empty collection on failure.
    ///
    /// Load failures are logged and never propagated. Returns whether the
    /// records were loaded.
    pub fn load_or_empty<E: Display>(
        &mut self,
        result: Result<Vec<ContactRecord>, E>,
    ) -> bool {
        let failure = match result {
            Ok(records) => match self.load(records) {
                Ok(()) => return true,
                Err(err) => err.to_string(),
            },
            Err(err) => err.to_string(),
        };
        error!(
            "event=contacts_load module=store status=error message={}",
            failure
        );
        self.clear();
        false
    }

    /// Id the next `add` without an explicit id will receive.
    ///
    /// # Errors
    /// - `IdSpaceExhausted` when the highest id is `ContactId::MAX`.
    pub fn next_id(&self) -> StoreResult<ContactId> {
        let max_existing = self.repo.max_id().unwrap_or(UNASSIGNED_CONTACT_ID);
        self.high_water
            .max(max_existing)
            .checked_add(1)
            .ok_or(StoreError::IdSpaceExhausted)
    }

    fn clear(&mut self) {
        self.repo.replace_all(Vec::new());
        self.selected = None;
        self.high_water = UNASSIGNED_CONTACT_ID;
        self.retired.clear();
    }

    /// Inserts a record at the end of the collection and returns it as stored.
    ///
    /// # Errors
    /// - `DuplicateId` when `record.id` is set and already stored.
    /// - `IdRetired` when `record.id` belonged to a removed record.
    /// - `IdSpaceExhausted` when no fresh id is left.
    pub fn add(&mut self, mut record: ContactRecord) -> StoreResult<ContactRecord> {
        if record.has_id() {
            if self.repo.contains(record.id) {
                warn!(
                    "event=contact_add module=store status=duplicate_id id={}",
                    record.id
                );
                return Err(StoreError::DuplicateId(record.id));
            }
            if self.retired.contains(&record.id) {
                warn!(
                    "event=contact_add module=store status=id_retired id={}",
                    record.id
                );
                return Err(StoreError::IdRetired(record.id));
            }
        } else {
            record.id = self.next_id()?;
        }

        record.canonicalize();
        self.repo.insert(record.clone())?;
        self.high_water = self.high_water.max(record.id);
        info!("event=contact_add module=store status=ok id={}", record.id);
        Ok(record)
    }

    /// Shallow-merges `patch` onto the stored record with the same id.
    ///
    /// # Errors
    /// - `NotFound` when no record has `patch.id`.
    pub fn update(&mut self, patch: &ContactPatch) -> StoreResult<ContactRecord> {
        let Some(mut record) = self.repo.get(patch.id).cloned() else {
            warn!(
                "event=contact_update module=store status=not_found id={}",
                patch.id
            );
            return Err(StoreError::NotFound(patch.id));
        };

        patch.apply_to(&mut record);
        self.repo.replace(record.clone())?;
        info!("event=contact_update module=store status=ok id={}", record.id);
        Ok(record)
    }

    /// Marks a stored record as selected.
    ///
    /// # Errors
    /// - `NotFound` when the target id is not stored.
    pub fn select<'a>(&mut self, target: impl Into<SelectTarget<'a>>) -> StoreResult<()> {
        let id = match target.into() {
            SelectTarget::Id(id) => id,
            SelectTarget::Record(record) => record.id,
        };
        if !self.repo.contains(id) {
            return Err(StoreError::NotFound(id));
        }
        self.selected = Some(id);
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Live record for the current selection.
    pub fn get_selected(&self) -> Option<&ContactRecord> {
        self.selected.and_then(|id| self.repo.get(id))
    }

    /// Sets `mainContact` on one record; other records are left untouched.
    pub fn set_main_contact(&mut self, id: ContactId, flag: bool) -> StoreResult<ContactRecord> {
        let mut patch = ContactPatch::new(id);
        patch.main_contact = Some(flag);
        self.update(&patch)
    }

    pub fn get(&self, id: ContactId) -> Option<&ContactRecord> {
        self.repo.get(id)
    }

    /// Full collection in display order.
    pub fn get_all(&self) -> &[ContactRecord] {
        self.repo.list()
    }

    /// Visible subset recomputed from the full collection.
    pub fn get_filtered(
        &self,
        criteria: &FilterCriteria,
        search_term: &str,
    ) -> Vec<&ContactRecord> {
        filter_contacts(self.repo.list(), criteria, search_term)
    }

    /// Tag menu entries across all contacts.
    pub fn unique_tags(&self) -> Vec<String> {
        unique_tags(self.repo.list())
    }

    /// Removes a record. Its id is never handed out again.
    pub fn remove(&mut self, id: ContactId) -> StoreResult<ContactRecord> {
        let removed = self.repo.remove(id)?;
        self.retired.insert(id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        info!("event=contact_remove module=store status=ok id={}", id);
        Ok(removed)
    }

    /// Reconciles a form draft and stores the result.
    ///
    /// `editing` is the id of the record being edited, or `None` to create.
    pub fn save_draft(
        &mut self,
        draft: &ContactDraft,
        editing: Option<ContactId>,
    ) -> StoreResult<ContactRecord> {
        match editing {
            Some(id) => {
                let existing = self.repo.get(id).cloned().ok_or(StoreError::NotFound(id))?;
                let record = FormReconciler::build(draft, Some(&existing))?;
                self.update(&ContactPatch::from(record))
            }
            None => {
                let record = FormReconciler::build(draft, None)?;
                self.add(record)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.repo.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.repo.list().is_empty()
    }
}
