use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    aggregator::PlayerSummary, comparator::MatchTotals, scorer::RankedPlayer,
    service::StatsService, shot_map::ShotMap,
};
use crate::preferences::PreferencesService;
use crate::shared::{AppError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct CompareQuery {
    /// Comma separated match ids; omitted means every match.
    pub ids: Option<String>,
}

impl CompareQuery {
    fn match_ids(&self) -> Vec<String> {
        self.ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ShotMapQuery {
    pub goalkeeper_id: Option<String>,
}

/// GET /clubs/:club_id/players/:player_id/summary
#[instrument(name = "player_summary", skip(state))]
pub async fn player_summary(
    State(state): State<AppState>,
    Path((club_id, player_id)): Path<(String, String)>,
) -> Result<Json<PlayerSummary>, AppError> {
    let service = StatsService::new(Arc::clone(&state.stats_repository));
    let summary = service.player_summary(&club_id, &player_id).await?;
    Ok(Json(summary))
}

/// GET /clubs/:club_id/matches/:match_id/totals
#[instrument(name = "match_totals", skip(state))]
pub async fn match_totals(
    State(state): State<AppState>,
    Path((club_id, match_id)): Path<(String, String)>,
) -> Result<Json<MatchTotals>, AppError> {
    let service = StatsService::new(Arc::clone(&state.stats_repository));
    let totals = service.match_totals(&club_id, &match_id).await?;
    Ok(Json(totals))
}

/// GET /clubs/:club_id/matches/compare?ids=a,b
#[instrument(name = "compare_matches", skip(state))]
pub async fn compare_matches(
    State(state): State<AppState>,
    Path(club_id): Path<String>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Vec<MatchTotals>>, AppError> {
    let service = StatsService::new(Arc::clone(&state.stats_repository));
    let compared = service
        .compare_matches(&club_id, &query.match_ids())
        .await?;

    info!(match_count = compared.len(), "Matches compared");
    Ok(Json(compared))
}

/// GET /clubs/:club_id/matches/:match_id/shot-map
#[instrument(name = "shot_map", skip(state))]
pub async fn shot_map(
    State(state): State<AppState>,
    Path((club_id, match_id)): Path<(String, String)>,
    Query(query): Query<ShotMapQuery>,
) -> Result<Json<ShotMap>, AppError> {
    let service = StatsService::new(Arc::clone(&state.stats_repository));
    let map = service
        .shot_map(&club_id, &match_id, query.goalkeeper_id.as_deref())
        .await?;
    Ok(Json(map))
}

/// GET /clubs/:club_id/users/:user_id/ranking
///
/// Scores come back as `null` when the user has no weights configured.
#[instrument(name = "ranking", skip(state))]
pub async fn ranking(
    State(state): State<AppState>,
    Path((club_id, user_id)): Path<(String, String)>,
) -> Result<Json<Vec<RankedPlayer>>, AppError> {
    let preferences = PreferencesService::new(Arc::clone(&state.preferences_repository));
    let weights = preferences.load_weights(&user_id, &club_id).await?;

    let service = StatsService::new(Arc::clone(&state.stats_repository));
    let ranked = service.ranking(&club_id, &weights).await?;
    Ok(Json(ranked))
}
