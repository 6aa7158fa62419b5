// Library crate for the water polo stats server
// This file exposes the public API for integration tests

pub mod config;
pub mod preferences;
pub mod routes;
pub mod shared;
pub mod stats;

// Re-export commonly used types for easier access in tests
pub use config::AppConfig;
pub use preferences::{
    Draft, FavoriteKeySet, InMemoryPreferencesRepository, LoadState, PreferencesRepository,
    PreferencesService, WeightMap,
};
pub use shared::{AppError, AppState};
pub use stats::{
    AggregatedTotals, InMemoryStatsRepository, MatchInfo, MatchTotals, PlayerInfo, RawStatRow,
    StatRow, StatsRepository, StatsService, WeightedScore,
};
