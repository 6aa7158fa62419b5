use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{PreferencesError, WeightMap};

/// A persisted favorite, one per (user, player, club, stat key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteRecord {
    pub id: String,
    pub stat_key: String,
}

/// Storage boundary for stat weights and favorites.
///
/// Writes carry no concurrency token: two overlapping saves for the same
/// key set race and the last one to complete wins.
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    async fn fetch_weight_map(
        &self,
        user_id: &str,
        club_id: &str,
    ) -> Result<WeightMap, PreferencesError>;

    /// Upserts `to_insert` and removes `to_delete` keys.
    async fn persist_weight_diff(
        &self,
        user_id: &str,
        club_id: &str,
        to_insert: &WeightMap,
        to_delete: &[String],
    ) -> Result<(), PreferencesError>;

    async fn fetch_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
    ) -> Result<Vec<FavoriteRecord>, PreferencesError>;

    /// Inserts new keys and deletes existing records by id.
    async fn persist_favorite_diff(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
        to_insert: &[String],
        to_delete_ids: &[String],
    ) -> Result<(), PreferencesError>;
}

type WeightScope = (String, String);
type FavoriteScope = (String, String, String);

/// In-memory implementation of PreferencesRepository for development and testing
#[derive(Default)]
pub struct InMemoryPreferencesRepository {
    weights: Mutex<HashMap<WeightScope, BTreeMap<String, f64>>>,
    favorites: Mutex<HashMap<FavoriteScope, Vec<FavoriteRecord>>>,
}

impl InMemoryPreferencesRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_weights(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<WeightScope, BTreeMap<String, f64>>>, PreferencesError>
    {
        self.weights
            .lock()
            .map_err(|_| PreferencesError::Persistence("weight store poisoned".to_string()))
    }

    fn lock_favorites(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<FavoriteScope, Vec<FavoriteRecord>>>, PreferencesError>
    {
        self.favorites
            .lock()
            .map_err(|_| PreferencesError::Persistence("favorite store poisoned".to_string()))
    }
}

#[async_trait]
impl PreferencesRepository for InMemoryPreferencesRepository {
    #[instrument(skip(self))]
    async fn fetch_weight_map(
        &self,
        user_id: &str,
        club_id: &str,
    ) -> Result<WeightMap, PreferencesError> {
        let weights = self.lock_weights()?;
        let map: WeightMap = weights
            .get(&(user_id.to_string(), club_id.to_string()))
            .map(|stored| stored.iter().map(|(k, w)| (k.as_str(), *w)).collect())
            .unwrap_or_default();

        debug!(weight_count = map.len(), "Weights fetched from memory");
        Ok(map)
    }

    #[instrument(skip(self, to_insert, to_delete))]
    async fn persist_weight_diff(
        &self,
        user_id: &str,
        club_id: &str,
        to_insert: &WeightMap,
        to_delete: &[String],
    ) -> Result<(), PreferencesError> {
        let mut weights = self.lock_weights()?;
        let stored = weights
            .entry((user_id.to_string(), club_id.to_string()))
            .or_default();

        // Keys load trimmed, so match stored spellings by their trimmed form.
        stored.retain(|key, _| {
            let trimmed = key.trim();
            let deleted = to_delete.iter().any(|d| d == trimmed);
            let respelled = key.as_str() != trimmed && to_insert.contains(trimmed);
            !deleted && !respelled
        });
        for (key, weight) in to_insert.iter() {
            stored.insert(key.to_string(), weight);
        }

        debug!(
            inserted = to_insert.len(),
            deleted = to_delete.len(),
            "Weight diff persisted in memory"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
    ) -> Result<Vec<FavoriteRecord>, PreferencesError> {
        let favorites = self.lock_favorites()?;
        let records = favorites
            .get(&(user_id.to_string(), entity_id.to_string(), club_id.to_string()))
            .cloned()
            .unwrap_or_default();

        debug!(favorite_count = records.len(), "Favorites fetched from memory");
        Ok(records)
    }

    #[instrument(skip(self, to_insert, to_delete_ids))]
    async fn persist_favorite_diff(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
        to_insert: &[String],
        to_delete_ids: &[String],
    ) -> Result<(), PreferencesError> {
        let mut favorites = self.lock_favorites()?;
        let records = favorites
            .entry((user_id.to_string(), entity_id.to_string(), club_id.to_string()))
            .or_default();

        records.retain(|record| !to_delete_ids.contains(&record.id));

        for key in to_insert {
            if records.iter().any(|record| &record.stat_key == key) {
                warn!(stat_key = %key, "Favorite already stored, skipping insert");
                continue;
            }
            records.push(FavoriteRecord {
                id: Uuid::new_v4().to_string(),
                stat_key: key.clone(),
            });
        }

        debug!(
            inserted = to_insert.len(),
            deleted = to_delete_ids.len(),
            "Favorite diff persisted in memory"
        );
        Ok(())
    }
}

/// PostgreSQL implementation of preferences repository
///
/// Expects `stat_weights (user_id, club_id, stat_key, weight)` and
/// `favorite_stats (id, user_id, player_id, club_id, stat_key)`, both unique on
/// their scope columns plus `stat_key`.
pub struct PostgresPreferencesRepository {
    pool: PgPool,
}

impl PostgresPreferencesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn persistence_error(error: sqlx::Error) -> PreferencesError {
    warn!(error = %error, "Preferences query failed");
    PreferencesError::Persistence(error.to_string())
}

#[async_trait]
impl PreferencesRepository for PostgresPreferencesRepository {
    #[instrument(skip(self))]
    async fn fetch_weight_map(
        &self,
        user_id: &str,
        club_id: &str,
    ) -> Result<WeightMap, PreferencesError> {
        let rows = sqlx::query(
            "SELECT stat_key, weight FROM stat_weights WHERE user_id = $1 AND club_id = $2",
        )
        .bind(user_id)
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_error)?;

        let map: WeightMap = rows
            .iter()
            .map(|row| (row.get::<String, _>("stat_key"), row.get::<f64, _>("weight")))
            .collect();

        debug!(weight_count = map.len(), "Weights fetched from database");
        Ok(map)
    }

    #[instrument(skip(self, to_insert, to_delete))]
    async fn persist_weight_diff(
        &self,
        user_id: &str,
        club_id: &str,
        to_insert: &WeightMap,
        to_delete: &[String],
    ) -> Result<(), PreferencesError> {
        let mut tx = self.pool.begin().await.map_err(persistence_error)?;

        // Keys load trimmed, so match stored spellings by their trimmed form.
        if !to_delete.is_empty() {
            sqlx::query(
                "DELETE FROM stat_weights WHERE user_id = $1 AND club_id = $2 AND btrim(stat_key) = ANY($3)",
            )
            .bind(user_id)
            .bind(club_id)
            .bind(to_delete)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error)?;
        }

        let upserted: Vec<String> = to_insert.keys().map(str::to_string).collect();
        if !upserted.is_empty() {
            sqlx::query(
                "DELETE FROM stat_weights WHERE user_id = $1 AND club_id = $2 \
                 AND btrim(stat_key) = ANY($3) AND stat_key <> btrim(stat_key)",
            )
            .bind(user_id)
            .bind(club_id)
            .bind(&upserted)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error)?;
        }

        for (key, weight) in to_insert.iter() {
            sqlx::query(
                "INSERT INTO stat_weights (user_id, club_id, stat_key, weight) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (user_id, club_id, stat_key) DO UPDATE SET weight = EXCLUDED.weight",
            )
            .bind(user_id)
            .bind(club_id)
            .bind(key)
            .bind(weight)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error)?;
        }

        tx.commit().await.map_err(persistence_error)?;

        debug!(
            inserted = to_insert.len(),
            deleted = to_delete.len(),
            "Weight diff persisted in database"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn fetch_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
    ) -> Result<Vec<FavoriteRecord>, PreferencesError> {
        let rows = sqlx::query(
            "SELECT id, stat_key FROM favorite_stats WHERE user_id = $1 AND player_id = $2 AND club_id = $3 ORDER BY stat_key",
        )
        .bind(user_id)
        .bind(entity_id)
        .bind(club_id)
        .fetch_all(&self.pool)
        .await
        .map_err(persistence_error)?;

        let records: Vec<FavoriteRecord> = rows
            .iter()
            .map(|row| FavoriteRecord {
                id: row.get("id"),
                stat_key: row.get("stat_key"),
            })
            .collect();

        debug!(favorite_count = records.len(), "Favorites fetched from database");
        Ok(records)
    }

    #[instrument(skip(self, to_insert, to_delete_ids))]
    async fn persist_favorite_diff(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
        to_insert: &[String],
        to_delete_ids: &[String],
    ) -> Result<(), PreferencesError> {
        let mut tx = self.pool.begin().await.map_err(persistence_error)?;

        if !to_delete_ids.is_empty() {
            sqlx::query(
                "DELETE FROM favorite_stats WHERE user_id = $1 AND club_id = $2 AND id = ANY($3)",
            )
            .bind(user_id)
            .bind(club_id)
            .bind(to_delete_ids)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error)?;
        }

        for key in to_insert {
            sqlx::query(
                "INSERT INTO favorite_stats (id, user_id, player_id, club_id, stat_key) VALUES ($1, $2, $3, $4, $5) \
                 ON CONFLICT (user_id, player_id, club_id, stat_key) DO NOTHING",
            )
            .bind(Uuid::new_v4().to_string())
            .bind(user_id)
            .bind(entity_id)
            .bind(club_id)
            .bind(key)
            .execute(&mut *tx)
            .await
            .map_err(persistence_error)?;
        }

        tx.commit().await.map_err(persistence_error)?;

        debug!(
            inserted = to_insert.len(),
            deleted = to_delete_ids.len(),
            "Favorite diff persisted in database"
        );
        Ok(())
    }
}
