use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    aggregator::{aggregate, summarize_player, PlayerSummary},
    comparator::{compare_match, compare_matches, MatchTotals},
    models::{AggregatedTotals, PlayerInfo, RowFilter, StatRow, StatRowQuery},
    normalizer::normalize_rows,
    repository::StatsRepository,
    scorer::{rank_players, RankedPlayer},
    shot_map::{build_shot_map, ShotMap},
    StatsError,
};
use crate::preferences::WeightMap;

/// Fetches rows from the store and runs them through the pure stat pipeline.
pub struct StatsService {
    repository: Arc<dyn StatsRepository>,
}

impl StatsService {
    pub fn new(repository: Arc<dyn StatsRepository>) -> Self {
        Self { repository }
    }

    /// Fetches and normalizes rows; the only place raw values are coerced.
    #[instrument(skip(self))]
    pub async fn load_rows(&self, query: &StatRowQuery) -> Result<Vec<StatRow>, StatsError> {
        if query.club_id.trim().is_empty() {
            return Err(StatsError::Validation("club id must not be blank".to_string()));
        }

        let raw = self.repository.fetch_stat_rows(query).await?;
        Ok(normalize_rows(&raw))
    }

    #[instrument(skip(self))]
    pub async fn player_totals(
        &self,
        club_id: &str,
        player_id: &str,
    ) -> Result<AggregatedTotals, StatsError> {
        let rows = self
            .load_rows(&StatRowQuery::club(club_id).for_entity(player_id))
            .await?;
        Ok(aggregate(&rows, &RowFilter::entity(player_id)))
    }

    #[instrument(skip(self))]
    pub async fn player_summary(
        &self,
        club_id: &str,
        player_id: &str,
    ) -> Result<PlayerSummary, StatsError> {
        let rows = self
            .load_rows(&StatRowQuery::club(club_id).for_entity(player_id))
            .await?;
        let summary = summarize_player(player_id, &rows);

        info!(
            player_id = %player_id,
            matches_played = summary.matches_played,
            "Player summary built"
        );
        Ok(summary)
    }

    #[instrument(skip(self))]
    pub async fn match_totals(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<MatchTotals, StatsError> {
        let info = self
            .repository
            .fetch_match(club_id, match_id)
            .await?
            .ok_or_else(|| {
                warn!(match_id = %match_id, "Match not found");
                StatsError::NotFound(format!("match {match_id}"))
            })?;

        let rows = self
            .load_rows(&StatRowQuery::club(club_id).for_match(match_id))
            .await?;
        Ok(compare_match(&info, &rows))
    }

    /// Totals for several matches in the requested order. An empty id list
    /// compares every match of the club.
    #[instrument(skip(self))]
    pub async fn compare_matches(
        &self,
        club_id: &str,
        match_ids: &[String],
    ) -> Result<Vec<MatchTotals>, StatsError> {
        let matches = self.repository.fetch_matches(club_id).await?;

        let selected = if match_ids.is_empty() {
            matches
        } else {
            let mut selected = Vec::with_capacity(match_ids.len());
            for id in match_ids {
                let info = matches
                    .iter()
                    .find(|info| &info.id == id)
                    .cloned()
                    .ok_or_else(|| StatsError::NotFound(format!("match {id}")))?;
                selected.push(info);
            }
            selected
        };

        let rows = self.load_rows(&StatRowQuery::club(club_id)).await?;
        let compared = compare_matches(&selected, &rows);

        info!(match_count = compared.len(), "Match comparison built");
        Ok(compared)
    }

    #[instrument(skip(self))]
    pub async fn shot_map(
        &self,
        club_id: &str,
        match_id: &str,
        goalkeeper_id: Option<&str>,
    ) -> Result<ShotMap, StatsError> {
        if self.repository.fetch_match(club_id, match_id).await?.is_none() {
            return Err(StatsError::NotFound(format!("match {match_id}")));
        }

        let shots = self.repository.fetch_shots(club_id, match_id).await?;
        Ok(build_shot_map(&shots, goalkeeper_id))
    }

    /// Scores every club player against `weights`.
    ///
    /// Each player's rows are fetched independently and concurrently.
    #[instrument(skip(self, weights))]
    pub async fn ranking(
        &self,
        club_id: &str,
        weights: &WeightMap,
    ) -> Result<Vec<RankedPlayer>, StatsError> {
        let players = self.repository.fetch_players(club_id).await?;

        let scored: Vec<(PlayerInfo, AggregatedTotals)> =
            try_join_all(players.into_iter().map(|player| async move {
                let totals = self.player_totals(club_id, &player.id).await?;
                Ok::<_, StatsError>((player, totals))
            }))
            .await?;

        let ranked = rank_players(scored, weights);
        info!(
            player_count = ranked.len(),
            configured = !weights.is_empty(),
            "Ranking built"
        );
        Ok(ranked)
    }
}
