use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

use super::{favorites::FavoriteKeySet, service::PreferencesService, weights::WeightMap};
use crate::shared::{AppError, AppState};

/// GET /clubs/:club_id/users/:user_id/weights
#[instrument(name = "get_weights", skip(state))]
pub async fn get_weights(
    State(state): State<AppState>,
    Path((club_id, user_id)): Path<(String, String)>,
) -> Result<Json<WeightMap>, AppError> {
    let service = PreferencesService::new(Arc::clone(&state.preferences_repository));
    let weights = service.load_weights(&user_id, &club_id).await?;
    Ok(Json(weights))
}

/// PUT /clubs/:club_id/users/:user_id/weights
///
/// Body is the full desired map. Responds with the state read back from the
/// store after the save.
#[instrument(name = "put_weights", skip(state, desired))]
pub async fn put_weights(
    State(state): State<AppState>,
    Path((club_id, user_id)): Path<(String, String)>,
    Json(desired): Json<WeightMap>,
) -> Result<Json<WeightMap>, AppError> {
    let service = PreferencesService::new(Arc::clone(&state.preferences_repository));
    let persisted = service.replace_weights(&user_id, &club_id, desired).await?;

    info!(weight_count = persisted.len(), "Weights saved");
    Ok(Json(persisted))
}

/// GET /clubs/:club_id/users/:user_id/favorites/:player_id
#[instrument(name = "get_favorites", skip(state))]
pub async fn get_favorites(
    State(state): State<AppState>,
    Path((club_id, user_id, player_id)): Path<(String, String, String)>,
) -> Result<Json<FavoriteKeySet>, AppError> {
    let service = PreferencesService::new(Arc::clone(&state.preferences_repository));
    let favorites = service
        .load_favorites(&user_id, &player_id, &club_id)
        .await?;
    Ok(Json(favorites))
}

/// PUT /clubs/:club_id/users/:user_id/favorites/:player_id
#[instrument(name = "put_favorites", skip(state, desired))]
pub async fn put_favorites(
    State(state): State<AppState>,
    Path((club_id, user_id, player_id)): Path<(String, String, String)>,
    Json(desired): Json<FavoriteKeySet>,
) -> Result<Json<FavoriteKeySet>, AppError> {
    let service = PreferencesService::new(Arc::clone(&state.preferences_repository));
    let persisted = service
        .replace_favorites(&user_id, &player_id, &club_id, desired)
        .await?;

    info!(favorite_count = persisted.len(), "Favorites saved");
    Ok(Json(persisted))
}
