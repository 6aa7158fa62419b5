use thiserror::Error;

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
