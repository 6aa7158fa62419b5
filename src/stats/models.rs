use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::keys::StatKey;

/// Normalized statistic values keyed by column name.
pub type StatValues = BTreeMap<String, f64>;

/// A persisted stat row as it comes back from storage, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatRow {
    pub entity_id: String,
    pub match_id: String,
    #[serde(default)]
    pub values: Map<String, Value>,
}

/// One player's (or team's) statistics for one match, every value numeric.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatRow {
    pub entity_id: String,
    pub match_id: String,
    pub values: StatValues,
}

impl StatRow {
    pub fn new(entity_id: impl Into<String>, match_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            match_id: match_id.into(),
            values: StatValues::new(),
        }
    }

    /// Builder-style setter, mostly useful for fixtures.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

/// Optional narrowing applied before summation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFilter {
    pub entity_id: Option<String>,
    pub match_id: Option<String>,
}

impl RowFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn entity(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: Some(entity_id.into()),
            match_id: None,
        }
    }

    pub fn match_id(match_id: impl Into<String>) -> Self {
        Self {
            entity_id: None,
            match_id: Some(match_id.into()),
        }
    }

    pub fn matches(&self, row: &StatRow) -> bool {
        let entity_ok = self
            .entity_id
            .as_deref()
            .map_or(true, |id| id == row.entity_id);
        let match_ok = self
            .match_id
            .as_deref()
            .map_or(true, |id| id == row.match_id);
        entity_ok && match_ok
    }
}

/// Query shape accepted by the stats repository. Always club-scoped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRowQuery {
    pub club_id: String,
    pub entity_id: Option<String>,
    pub match_id: Option<String>,
}

impl StatRowQuery {
    pub fn club(club_id: impl Into<String>) -> Self {
        Self {
            club_id: club_id.into(),
            entity_id: None,
            match_id: None,
        }
    }

    pub fn for_entity(mut self, entity_id: impl Into<String>) -> Self {
        self.entity_id = Some(entity_id.into());
        self
    }

    pub fn for_match(mut self, match_id: impl Into<String>) -> Self {
        self.match_id = Some(match_id.into());
        self
    }
}

/// Summed statistics across a set of rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedTotals {
    pub totals: StatValues,
    /// Rows that survived the filter.
    pub row_count: usize,
    /// Distinct matches among those rows.
    pub match_count: usize,
}

impl AggregatedTotals {
    pub fn get(&self, key: &str) -> f64 {
        self.totals.get(key).copied().unwrap_or(0.0)
    }

    pub fn stat(&self, key: StatKey) -> f64 {
        self.get(key.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: String,
    pub club_id: String,
    pub name: String,
    #[serde(default)]
    pub cap_number: Option<u8>,
    #[serde(default)]
    pub is_goalkeeper: bool,
}

/// Match metadata needed to build a comparison record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchInfo {
    pub id: String,
    pub club_id: String,
    pub opponent: String,
    #[serde(default)]
    pub jornada: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
    /// True when the tracked club played at home.
    pub is_home: bool,
    #[serde(default)]
    pub played_on: Option<NaiveDate>,
}

impl MatchInfo {
    pub fn goals_against(&self) -> u32 {
        if self.is_home {
            self.away_score
        } else {
            self.home_score
        }
    }
}
