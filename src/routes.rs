use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::preferences::handlers as preferences;
use crate::shared::AppState;
use crate::stats::handlers as stats;

/// Builds the HTTP surface. Every route is scoped to a club.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "polostats" }))
        .route(
            "/clubs/:club_id/players/:player_id/summary",
            get(stats::player_summary),
        )
        .route("/clubs/:club_id/matches/compare", get(stats::compare_matches))
        .route(
            "/clubs/:club_id/matches/:match_id/totals",
            get(stats::match_totals),
        )
        .route(
            "/clubs/:club_id/matches/:match_id/shot-map",
            get(stats::shot_map),
        )
        .route("/clubs/:club_id/users/:user_id/ranking", get(stats::ranking))
        .route(
            "/clubs/:club_id/users/:user_id/weights",
            get(preferences::get_weights).put(preferences::put_weights),
        )
        .route(
            "/clubs/:club_id/users/:user_id/favorites/:player_id",
            get(preferences::get_favorites).put(preferences::put_favorites),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
