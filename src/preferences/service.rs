use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{
    draft::{Draft, LoadState},
    favorites::{normalize_keys, FavoriteKeySet},
    repository::PreferencesRepository,
    PreferencesError, WeightMap,
};

/// Loads and saves per-user stat weights and favorites.
///
/// Saves take the caller's `Draft` by mutable reference and only commit it
/// once the store has confirmed the write and been re-read. On failure the
/// draft is left exactly as it was.
pub struct PreferencesService {
    repository: Arc<dyn PreferencesRepository>,
}

impl PreferencesService {
    pub fn new(repository: Arc<dyn PreferencesRepository>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn load_weights(
        &self,
        user_id: &str,
        club_id: &str,
    ) -> Result<WeightMap, PreferencesError> {
        validate_scope(&[user_id, club_id])?;
        self.repository.fetch_weight_map(user_id, club_id).await
    }

    /// Loads weights into a fresh draft, keeping failures visible.
    pub async fn weight_draft(&self, user_id: &str, club_id: &str) -> LoadState<Draft<WeightMap>> {
        LoadState::from_result(self.load_weights(user_id, club_id).await.map(Draft::new))
    }

    #[instrument(skip(self, draft))]
    pub async fn save_weights(
        &self,
        user_id: &str,
        club_id: &str,
        draft: &mut Draft<WeightMap>,
    ) -> Result<WeightMap, PreferencesError> {
        validate_scope(&[user_id, club_id])?;

        if !draft.dirty() {
            return Ok(draft.committed().clone());
        }

        let diff = draft.diff();
        info!(
            inserted = diff.to_insert.len(),
            deleted = diff.to_delete.len(),
            "Saving weight changes"
        );

        if let Err(error) = self
            .repository
            .persist_weight_diff(user_id, club_id, &diff.to_insert, &diff.to_delete)
            .await
        {
            warn!(error = %error, "Weight save failed, draft kept");
            return Err(error);
        }

        let persisted = self.repository.fetch_weight_map(user_id, club_id).await?;
        draft.commit(persisted.clone());
        Ok(persisted)
    }

    /// Replaces the stored weights with `desired` in one save.
    pub async fn replace_weights(
        &self,
        user_id: &str,
        club_id: &str,
        desired: WeightMap,
    ) -> Result<WeightMap, PreferencesError> {
        let mut draft = Draft::new(self.load_weights(user_id, club_id).await?);
        draft.replace_draft(desired);
        self.save_weights(user_id, club_id, &mut draft).await
    }

    #[instrument(skip(self))]
    pub async fn load_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
    ) -> Result<FavoriteKeySet, PreferencesError> {
        validate_scope(&[user_id, entity_id, club_id])?;
        let records = self
            .repository
            .fetch_favorites(user_id, entity_id, club_id)
            .await?;
        Ok(normalize_keys(records.iter().map(|r| r.stat_key.as_str())))
    }

    pub async fn favorites_draft(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
    ) -> LoadState<Draft<FavoriteKeySet>> {
        LoadState::from_result(
            self.load_favorites(user_id, entity_id, club_id)
                .await
                .map(Draft::new),
        )
    }

    #[instrument(skip(self, draft))]
    pub async fn save_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
        draft: &mut Draft<FavoriteKeySet>,
    ) -> Result<FavoriteKeySet, PreferencesError> {
        validate_scope(&[user_id, entity_id, club_id])?;

        if !draft.dirty() {
            return Ok(draft.committed().clone());
        }

        let diff = draft.diff();

        // Deletes go by record id, so resolve the keys against what is stored now.
        let records = self
            .repository
            .fetch_favorites(user_id, entity_id, club_id)
            .await?;
        let to_delete_ids: Vec<String> = records
            .iter()
            .filter(|record| {
                diff.to_delete
                    .iter()
                    .any(|key| key == record.stat_key.trim())
            })
            .map(|record| record.id.clone())
            .collect();

        info!(
            inserted = diff.to_insert.len(),
            deleted = to_delete_ids.len(),
            "Saving favorite changes"
        );

        if let Err(error) = self
            .repository
            .persist_favorite_diff(user_id, entity_id, club_id, &diff.to_insert, &to_delete_ids)
            .await
        {
            warn!(error = %error, "Favorite save failed, draft kept");
            return Err(error);
        }

        let persisted = self.load_favorites(user_id, entity_id, club_id).await?;
        draft.commit(persisted.clone());
        Ok(persisted)
    }

    pub async fn replace_favorites(
        &self,
        user_id: &str,
        entity_id: &str,
        club_id: &str,
        desired: FavoriteKeySet,
    ) -> Result<FavoriteKeySet, PreferencesError> {
        let mut draft = Draft::new(self.load_favorites(user_id, entity_id, club_id).await?);
        draft.replace_draft(desired);
        self.save_favorites(user_id, entity_id, club_id, &mut draft)
            .await
    }
}

fn validate_scope(ids: &[&str]) -> Result<(), PreferencesError> {
    if ids.iter().any(|id| id.trim().is_empty()) {
        return Err(PreferencesError::Validation(
            "user, player and club ids must not be blank".to_string(),
        ));
    }
    Ok(())
}
