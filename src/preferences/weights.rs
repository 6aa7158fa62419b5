use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::stats::normalizer::normalize_value;

/// Sparse stat-key → weight mapping owned by one (user, club) pair.
///
/// Zero and non-finite weights are never stored: setting one removes the key.
/// A zero-weighted key and a missing key are therefore the same thing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>")]
pub struct WeightMap(BTreeMap<String, f64>);

impl WeightMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` to `weight`. Blank keys are ignored; a zero weight unsets.
    pub fn set(&mut self, key: &str, weight: f64) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }

        if weight == 0.0 || !weight.is_finite() {
            self.0.remove(key);
        } else {
            self.0.insert(key.to_string(), weight);
        }
    }

    pub fn unset(&mut self, key: &str) -> Option<f64> {
        self.0.remove(key.trim())
    }

    /// Weight for `key`, 0 when unconfigured.
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, weight)| (key.as_str(), *weight))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Applies a diff, producing the state the store should end up in.
    pub fn apply(&self, diff: &WeightDiff) -> WeightMap {
        let mut next = self.clone();
        for key in &diff.to_delete {
            next.unset(key);
        }
        for (key, weight) in diff.to_insert.iter() {
            next.set(key, weight);
        }
        next
    }
}

impl From<BTreeMap<String, Value>> for WeightMap {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        raw.iter()
            .map(|(key, value)| (key.clone(), normalize_value(value)))
            .collect()
    }
}

impl<K: AsRef<str>> FromIterator<(K, f64)> for WeightMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut map = WeightMap::new();
        for (key, weight) in iter {
            map.set(key.as_ref(), weight);
        }
        map
    }
}

/// Changes needed to move a persisted weight map to a desired one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeightDiff {
    /// New or changed weights, written as upserts.
    pub to_insert: WeightMap,
    pub to_delete: Vec<String>,
}

impl WeightDiff {
    pub fn is_empty(&self) -> bool {
        self.to_insert.is_empty() && self.to_delete.is_empty()
    }
}

pub fn diff_weights(current: &WeightMap, desired: &WeightMap) -> WeightDiff {
    let to_insert = desired
        .iter()
        .filter(|(key, weight)| current.0.get(*key) != Some(weight))
        .collect();

    let to_delete = current
        .keys()
        .filter(|key| !desired.contains(key))
        .map(str::to_string)
        .collect();

    WeightDiff {
        to_insert,
        to_delete,
    }
}
