use serde::{Serialize, Serializer};
use std::cmp::Ordering;

use super::models::{AggregatedTotals, PlayerInfo};
use crate::preferences::WeightMap;

/// Result of scoring totals against a user's weights.
///
/// `Unconfigured` means the user has no weights at all. Because zero weights
/// are never stored, weighting every key with 0 also lands here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightedScore {
    Unconfigured,
    Score(f64),
}

impl WeightedScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            WeightedScore::Unconfigured => None,
            WeightedScore::Score(score) => Some(*score),
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, WeightedScore::Score(_))
    }
}

impl Serialize for WeightedScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Σ totals[key] × weight over the weighted keys only.
///
/// Keys present in `totals` but not in `weights` contribute nothing however
/// large they are.
pub fn weighted_score(totals: &AggregatedTotals, weights: &WeightMap) -> WeightedScore {
    if weights.is_empty() {
        return WeightedScore::Unconfigured;
    }

    let score = weights
        .iter()
        .map(|(key, weight)| totals.get(key) * weight)
        .sum::<f64>();

    WeightedScore::Score(score)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPlayer {
    pub rank: usize,
    pub player_id: String,
    pub name: String,
    pub score: WeightedScore,
    pub matches_played: usize,
}

/// Orders players by score, highest first.
///
/// Ties, and every unconfigured score, fall back to name and then id so the
/// order never depends on input order. Names compare byte-wise, not by
/// locale: "Álvaro" sorts after "Zoe" and uppercase before lowercase.
pub fn rank_players(
    players: Vec<(PlayerInfo, AggregatedTotals)>,
    weights: &WeightMap,
) -> Vec<RankedPlayer> {
    let mut scored: Vec<(PlayerInfo, WeightedScore, usize)> = players
        .into_iter()
        .map(|(player, totals)| {
            let score = weighted_score(&totals, weights);
            (player, score, totals.match_count)
        })
        .collect();

    scored.sort_by(|(a, a_score, _), (b, b_score, _)| {
        compare_scores(a_score, b_score)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(index, (player, score, matches_played))| RankedPlayer {
            rank: index + 1,
            player_id: player.id,
            name: player.name,
            score,
            matches_played,
        })
        .collect()
}

fn compare_scores(a: &WeightedScore, b: &WeightedScore) -> Ordering {
    match (a, b) {
        (WeightedScore::Score(a), WeightedScore::Score(b)) => b.total_cmp(a),
        (WeightedScore::Score(_), WeightedScore::Unconfigured) => Ordering::Less,
        (WeightedScore::Unconfigured, WeightedScore::Score(_)) => Ordering::Greater,
        (WeightedScore::Unconfigured, WeightedScore::Unconfigured) => Ordering::Equal,
    }
}
