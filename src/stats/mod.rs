pub mod aggregator;
pub mod comparator;
pub mod handlers;
pub mod keys;
pub mod models;
pub mod normalizer;
pub mod repository;
pub mod scorer;
pub mod service;
pub mod shot_map;

mod errors;

pub use aggregator::{aggregate, efficiency, per_match_average, PlayerSummary};
pub use comparator::{compare_match, MatchTotals};
pub use errors::StatsError;
pub use keys::StatKey;
pub use models::*;
pub use repository::{InMemoryStatsRepository, PostgresStatsRepository, StatsRepository};
pub use scorer::{rank_players, weighted_score, RankedPlayer, WeightedScore};
pub use service::StatsService;
pub use shot_map::{build_shot_map, ShotMap, ShotOutcome, ShotRecord};
