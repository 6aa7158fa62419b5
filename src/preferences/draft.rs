use super::favorites::{diff_keys, FavoriteKeySet, KeyDiff};
use super::weights::{diff_weights, WeightDiff, WeightMap};

/// State that can be reconciled against a persisted copy of itself.
pub trait Reconcile: Clone + PartialEq {
    type Diff;

    fn reconcile(committed: &Self, desired: &Self) -> Self::Diff;
}

impl Reconcile for WeightMap {
    type Diff = WeightDiff;

    fn reconcile(committed: &Self, desired: &Self) -> WeightDiff {
        diff_weights(committed, desired)
    }
}

impl Reconcile for FavoriteKeySet {
    type Diff = KeyDiff;

    fn reconcile(committed: &Self, desired: &Self) -> KeyDiff {
        diff_keys(committed, desired)
    }
}

/// A last-known persisted value paired with the copy being edited.
///
/// Edits only ever touch the draft. `commit` takes the value the store
/// returned after a save; `discard` rolls the draft back.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft<T: Reconcile> {
    committed: T,
    draft: T,
}

impl<T: Reconcile> Draft<T> {
    pub fn new(committed: T) -> Self {
        Self {
            draft: committed.clone(),
            committed,
        }
    }

    pub fn committed(&self) -> &T {
        &self.committed
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    pub fn replace_draft(&mut self, desired: T) {
        self.draft = desired;
    }

    pub fn dirty(&self) -> bool {
        self.committed != self.draft
    }

    pub fn diff(&self) -> T::Diff {
        T::reconcile(&self.committed, &self.draft)
    }

    pub fn commit(&mut self, persisted: T) {
        self.draft = persisted.clone();
        self.committed = persisted;
    }

    pub fn discard(&mut self) {
        self.draft = self.committed.clone();
    }
}

/// Distinguishes "never loaded" and "failed to load" from "loaded but empty".
#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoadState<T> {
    #[default]
    Unloaded,
    Loaded(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => LoadState::Loaded(value),
            Err(error) => LoadState::Failed(error.to_string()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadState::Loaded(_))
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(value) => Some(value),
            _ => None,
        }
    }
}
