pub mod draft;
pub mod favorites;
pub mod handlers;
pub mod repository;
pub mod service;
pub mod weights;

mod errors;

pub use draft::{Draft, LoadState, Reconcile};
pub use errors::PreferencesError;
pub use favorites::{diff_keys, normalize_keys, FavoriteKeySet, KeyDiff};
pub use repository::{
    FavoriteRecord, InMemoryPreferencesRepository, PostgresPreferencesRepository,
    PreferencesRepository,
};
pub use service::PreferencesService;
pub use weights::{diff_weights, WeightDiff, WeightMap};
