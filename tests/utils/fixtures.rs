use serde_json::Value;

use polostats::{MatchInfo, PlayerInfo, RawStatRow};

pub const CLUB_ID: &str = "club-1";

pub fn player(id: &str, name: &str) -> PlayerInfo {
    PlayerInfo {
        id: id.to_string(),
        club_id: CLUB_ID.to_string(),
        name: name.to_string(),
        cap_number: None,
        is_goalkeeper: false,
    }
}

pub fn match_info(id: &str, home_score: u32, away_score: u32, is_home: bool) -> MatchInfo {
    MatchInfo {
        id: id.to_string(),
        club_id: CLUB_ID.to_string(),
        opponent: format!("Rival {id}"),
        jornada: Some(format!("Jornada {id}")),
        home_score,
        away_score,
        is_home,
        played_on: None,
    }
}

/// Builds a raw row from a JSON object literal; non-objects give an empty row.
pub fn raw_row(entity_id: &str, match_id: &str, values: Value) -> RawStatRow {
    RawStatRow {
        entity_id: entity_id.to_string(),
        match_id: match_id.to_string(),
        values: values.as_object().cloned().unwrap_or_default(),
    }
}
