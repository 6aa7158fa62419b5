use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

/// Stat keys a user has starred for one player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Value>", into = "Vec<String>")]
pub struct FavoriteKeySet(BTreeSet<String>);

impl FavoriteKeySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the key is blank or already present.
    pub fn insert(&mut self, key: &str) -> bool {
        match clean_key(key) {
            Some(key) => self.0.insert(key),
            None => false,
        }
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.0.remove(key.trim())
    }

    /// Flips the key and reports whether it is now a favorite.
    pub fn toggle(&mut self, key: &str) -> bool {
        if self.remove(key) {
            false
        } else {
            self.insert(key)
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn apply(&self, diff: &KeyDiff) -> FavoriteKeySet {
        let mut next = self.clone();
        for key in &diff.to_delete {
            next.remove(key);
        }
        for key in &diff.to_insert {
            next.insert(key);
        }
        next
    }
}

fn clean_key(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Turns an arbitrary JSON value into a key. Strings and numbers are kept,
/// anything else is dropped.
pub fn normalize_key(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_key(s),
        Value::Number(n) => clean_key(&n.to_string()),
        _ => None,
    }
}

/// Trims, drops blanks and deduplicates.
pub fn normalize_keys<I, S>(keys: I) -> FavoriteKeySet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut set = FavoriteKeySet::new();
    for key in keys {
        set.insert(key.as_ref());
    }
    set
}

impl From<Vec<Value>> for FavoriteKeySet {
    fn from(values: Vec<Value>) -> Self {
        FavoriteKeySet(values.iter().filter_map(normalize_key).collect())
    }
}

impl From<FavoriteKeySet> for Vec<String> {
    fn from(set: FavoriteKeySet) -> Self {
        set.0.into_iter().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FavoriteKeySet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        normalize_keys(iter)
    }
}

/// Insert/delete sets that reconcile a persisted key set with a desired one.
/// The two lists are disjoint and sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyDiff {
    pub to_insert: Vec<String>,
    pub to_delete: Vec<String>,
}

impl KeyDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

pub fn diff_keys(current: &FavoriteKeySet, desired: &FavoriteKeySet) -> KeyDiff {
    KeyDiff {
        to_insert: desired.0.difference(&current.0).cloned().collect(),
        to_delete: current.0.difference(&desired.0).cloned().collect(),
    }
}
