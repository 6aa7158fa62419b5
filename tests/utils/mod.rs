pub mod fixtures;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use fixtures::{match_info, player, raw_row, CLUB_ID};
#[allow(unused_imports)]
pub use setup::{TestSetup, TestSetupBuilder};
