use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Map, Value};
use sqlx::{postgres::PgRow, PgPool, Row};
use std::str::FromStr;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

use super::{
    models::{MatchInfo, PlayerInfo, RawStatRow, StatRowQuery},
    shot_map::{ShotOutcome, ShotRecord},
    StatsError,
};

/// Read side of the stats store. Every call is club-scoped.
///
/// Implementations return either the complete row set or an error; partial
/// results are not something callers try to detect.
#[async_trait]
pub trait StatsRepository: Send + Sync {
    async fn fetch_stat_rows(&self, query: &StatRowQuery) -> Result<Vec<RawStatRow>, StatsError>;
    async fn fetch_players(&self, club_id: &str) -> Result<Vec<PlayerInfo>, StatsError>;
    async fn fetch_matches(&self, club_id: &str) -> Result<Vec<MatchInfo>, StatsError>;
    async fn fetch_match(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<Option<MatchInfo>, StatsError>;
    async fn fetch_shots(&self, club_id: &str, match_id: &str)
        -> Result<Vec<ShotRecord>, StatsError>;
}

#[derive(Debug, Default)]
struct StatsStore {
    players: Vec<PlayerInfo>,
    matches: Vec<MatchInfo>,
    rows: Vec<(String, RawStatRow)>,
    shots: Vec<(String, ShotRecord)>,
}

/// In-memory implementation of StatsRepository for development and testing
#[derive(Debug, Default)]
pub struct InMemoryStatsRepository {
    store: RwLock<StatsStore>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player(mut self, player: PlayerInfo) -> Self {
        self.store.get_mut().players.push(player);
        self
    }

    pub fn with_match(mut self, info: MatchInfo) -> Self {
        self.store.get_mut().matches.push(info);
        self
    }

    pub fn with_stat_row(mut self, club_id: &str, row: RawStatRow) -> Self {
        self.store.get_mut().rows.push((club_id.to_string(), row));
        self
    }

    pub fn with_shot(mut self, club_id: &str, shot: ShotRecord) -> Self {
        self.store.get_mut().shots.push((club_id.to_string(), shot));
        self
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    #[instrument(skip(self))]
    async fn fetch_stat_rows(&self, query: &StatRowQuery) -> Result<Vec<RawStatRow>, StatsError> {
        let store = self.store.read().await;
        let rows: Vec<RawStatRow> = store
            .rows
            .iter()
            .filter(|(club_id, _)| *club_id == query.club_id)
            .map(|(_, row)| row)
            .filter(|row| query.entity_id.as_ref().map_or(true, |id| *id == row.entity_id))
            .filter(|row| query.match_id.as_ref().map_or(true, |id| *id == row.match_id))
            .cloned()
            .collect();

        debug!(row_count = rows.len(), "Stat rows fetched from memory");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn fetch_players(&self, club_id: &str) -> Result<Vec<PlayerInfo>, StatsError> {
        let store = self.store.read().await;
        Ok(store
            .players
            .iter()
            .filter(|player| player.club_id == club_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_matches(&self, club_id: &str) -> Result<Vec<MatchInfo>, StatsError> {
        let store = self.store.read().await;
        Ok(store
            .matches
            .iter()
            .filter(|info| info.club_id == club_id)
            .cloned()
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_match(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<Option<MatchInfo>, StatsError> {
        let store = self.store.read().await;
        Ok(store
            .matches
            .iter()
            .find(|info| info.club_id == club_id && info.id == match_id)
            .cloned())
    }

    #[instrument(skip(self))]
    async fn fetch_shots(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<Vec<ShotRecord>, StatsError> {
        let store = self.store.read().await;
        Ok(store
            .shots
            .iter()
            .filter(|(club, shot)| club == club_id && shot.match_id == match_id)
            .map(|(_, shot)| shot.clone())
            .collect())
    }
}

/// PostgreSQL implementation of stats repository
///
/// Per-match stats live in `match_stats.stats` as a JSONB object so the stat
/// vocabulary can grow without migrations.
pub struct PostgresStatsRepository {
    pool: PgPool,
}

impl PostgresStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn repository_error(error: sqlx::Error) -> StatsError {
    warn!(error = %error, "Stats query failed");
    StatsError::Repository(error.to_string())
}

fn match_from_row(row: &PgRow) -> MatchInfo {
    MatchInfo {
        id: row.get("id"),
        club_id: row.get("club_id"),
        opponent: row.get("opponent"),
        jornada: row.get("jornada"),
        home_score: u32::try_from(row.get::<i32, _>("home_score")).unwrap_or_default(),
        away_score: u32::try_from(row.get::<i32, _>("away_score")).unwrap_or_default(),
        is_home: row.get("is_home"),
        played_on: row.get::<Option<NaiveDate>, _>("played_on"),
    }
}

const MATCH_COLUMNS: &str =
    "id, club_id, opponent, jornada, home_score, away_score, is_home, played_on";

#[async_trait]
impl StatsRepository for PostgresStatsRepository {
    #[instrument(skip(self))]
    async fn fetch_stat_rows(&self, query: &StatRowQuery) -> Result<Vec<RawStatRow>, StatsError> {
        let rows = sqlx::query(
            "SELECT player_id, match_id, stats FROM match_stats \
             WHERE club_id = $1 \
               AND ($2::text IS NULL OR player_id = $2) \
               AND ($3::text IS NULL OR match_id = $3)",
        )
        .bind(&query.club_id)
        .bind(query.entity_id.as_deref())
        .bind(query.match_id.as_deref())
        .fetch_all(&self.pool)
        .await
        .map_err(repository_error)?;

        let raw: Vec<RawStatRow> = rows
            .iter()
            .map(|row| {
                let values = match row.get::<Option<Value>, _>("stats") {
                    Some(Value::Object(map)) => map,
                    _ => Map::new(),
                };
                RawStatRow {
                    entity_id: row.get("player_id"),
                    match_id: row.get("match_id"),
                    values,
                }
            })
            .collect();

        debug!(row_count = raw.len(), "Stat rows fetched from database");
        Ok(raw)
    }

    #[instrument(skip(self))]
    async fn fetch_players(&self, club_id: &str) -> Result<Vec<PlayerInfo>, StatsError> {
        let rows = sqlx::query(
            "SELECT id, club_id, name, cap_number, is_goalkeeper FROM players WHERE club_id = $1 ORDER BY name",
        )
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repository_error)?;

        Ok(rows
            .iter()
            .map(|row| PlayerInfo {
                id: row.get("id"),
                club_id: row.get("club_id"),
                name: row.get("name"),
                cap_number: row
                    .get::<Option<i16>, _>("cap_number")
                    .and_then(|n| u8::try_from(n).ok()),
                is_goalkeeper: row.get("is_goalkeeper"),
            })
            .collect())
    }

    #[instrument(skip(self))]
    async fn fetch_matches(&self, club_id: &str) -> Result<Vec<MatchInfo>, StatsError> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE club_id = $1 ORDER BY played_on NULLS LAST, id"
        );
        let rows = sqlx::query(&sql)
            .bind(club_id)
            .fetch_all(&self.pool)
            .await
            .map_err(repository_error)?;

        Ok(rows.iter().map(match_from_row).collect())
    }

    #[instrument(skip(self))]
    async fn fetch_match(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<Option<MatchInfo>, StatsError> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE club_id = $1 AND id = $2");
        let row = sqlx::query(&sql)
            .bind(club_id)
            .bind(match_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repository_error)?;

        Ok(row.as_ref().map(match_from_row))
    }

    #[instrument(skip(self))]
    async fn fetch_shots(
        &self,
        club_id: &str,
        match_id: &str,
    ) -> Result<Vec<ShotRecord>, StatsError> {
        let rows = sqlx::query(
            "SELECT match_id, goalkeeper_id, zone, outcome FROM goalkeeper_shots WHERE club_id = $1 AND match_id = $2",
        )
        .bind(club_id)
        .bind(match_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repository_error)?;

        let mut shots = Vec::with_capacity(rows.len());
        for row in &rows {
            let raw_outcome: String = row.get("outcome");
            let Ok(outcome) = ShotOutcome::from_str(raw_outcome.trim()) else {
                warn!(outcome = %raw_outcome, "Skipping shot with unknown outcome");
                continue;
            };
            shots.push(ShotRecord {
                match_id: row.get("match_id"),
                goalkeeper_id: row.get("goalkeeper_id"),
                zone: row
                    .get::<Option<i16>, _>("zone")
                    .and_then(|z| u8::try_from(z).ok()),
                outcome,
            });
        }

        debug!(shot_count = shots.len(), "Shots fetched from database");
        Ok(shots)
    }
}
