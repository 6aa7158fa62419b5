use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::preferences::{PreferencesError, PreferencesRepository};
use crate::stats::{StatsError, StatsRepository};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub stats_repository: Arc<dyn StatsRepository>,
    pub preferences_repository: Arc<dyn PreferencesRepository>,
}

impl AppState {
    pub fn new(
        stats_repository: Arc<dyn StatsRepository>,
        preferences_repository: Arc<dyn PreferencesRepository>,
    ) -> Self {
        Self {
            stats_repository,
            preferences_repository,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<StatsError> for AppError {
    fn from(error: StatsError) -> Self {
        match error {
            StatsError::Repository(msg) => AppError::DatabaseError(msg),
            StatsError::NotFound(msg) => AppError::NotFound(msg),
            StatsError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<PreferencesError> for AppError {
    fn from(error: PreferencesError) -> Self {
        match error {
            PreferencesError::Persistence(msg) => AppError::DatabaseError(msg),
            PreferencesError::Validation(msg) => AppError::BadRequest(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;
    use crate::preferences::InMemoryPreferencesRepository;
    use crate::stats::InMemoryStatsRepository;

    /// Builder for creating AppState with overrides for testing
    #[derive(Default)]
    pub struct AppStateBuilder {
        stats_repository: Option<Arc<dyn StatsRepository>>,
        preferences_repository: Option<Arc<dyn PreferencesRepository>>,
    }

    impl AppStateBuilder {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_stats_repository(mut self, repo: Arc<dyn StatsRepository>) -> Self {
            self.stats_repository = Some(repo);
            self
        }

        pub fn with_preferences_repository(mut self, repo: Arc<dyn PreferencesRepository>) -> Self {
            self.preferences_repository = Some(repo);
            self
        }

        pub fn build(self) -> AppState {
            AppState {
                stats_repository: self
                    .stats_repository
                    .unwrap_or_else(|| Arc::new(InMemoryStatsRepository::new())),
                preferences_repository: self
                    .preferences_repository
                    .unwrap_or_else(|| Arc::new(InMemoryPreferencesRepository::new())),
            }
        }
    }

    #[test]
    fn maps_domain_errors_to_status_codes() {
        let response = AppError::from(StatsError::NotFound("match m1".into())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response =
            AppError::from(PreferencesError::Persistence("down".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::from(StatsError::Validation("blank".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
