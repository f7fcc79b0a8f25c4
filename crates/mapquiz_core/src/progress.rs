//! Previously guessed regions and the store that keeps them between sessions.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Names of regions guessed correctly in earlier sessions.
///
/// Adding a name that is already present changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedProgress(BTreeSet<String>);

impl PersistedProgress {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name. Returns false if it was already there.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.0.insert(name.into())
    }

    /// Returns true if the name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    /// Number of names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been guessed yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PersistedProgress {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Failure reported by a [`ProgressStore`].
#[derive(Debug, Clone, Display, Error)]
#[display("Progress store error: {}", message)]
pub struct StoreError {
    /// What went wrong.
    pub message: String,
}

impl StoreError {
    /// Creates a store error.
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Durable home for [`PersistedProgress`].
///
/// Stores are best-effort: the session logs failures and carries on.
pub trait ProgressStore {
    /// Reads the saved set.
    fn load(&mut self) -> Result<PersistedProgress, StoreError>;

    /// Writes the full set.
    fn save(&mut self, progress: &PersistedProgress) -> Result<(), StoreError>;
}

/// In-process store. Clones share the same set, so a caller can keep a
/// handle after giving one to a session.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    inner: Rc<RefCell<PersistedProgress>>,
    saves: Rc<RefCell<usize>>,
}

impl MemoryProgressStore {
    /// Creates a store that starts with `progress`.
    pub fn with_progress(progress: PersistedProgress) -> Self {
        Self {
            inner: Rc::new(RefCell::new(progress)),
            saves: Rc::default(),
        }
    }

    /// Copy of the saved set.
    pub fn snapshot(&self) -> PersistedProgress {
        self.inner.borrow().clone()
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.borrow()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&mut self) -> Result<PersistedProgress, StoreError> {
        Ok(self.inner.borrow().clone())
    }

    fn save(&mut self, progress: &PersistedProgress) -> Result<(), StoreError> {
        *self.inner.borrow_mut() = progress.clone();
        *self.saves.borrow_mut() += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_is_idempotent() {
        let mut progress = PersistedProgress::new();
        assert!(progress.insert("Kano"));
        assert!(!progress.insert("Kano"));
        assert_eq!(progress.len(), 1);
    }

    #[test]
    fn test_memory_store_clones_share_state() {
        let handle = MemoryProgressStore::default();
        let mut store = handle.clone();
        let progress: PersistedProgress = ["Ogun", "Oyo"].into_iter().collect();
        store.save(&progress).unwrap();
        assert_eq!(handle.snapshot(), progress);
        assert_eq!(handle.save_count(), 1);
    }
}
