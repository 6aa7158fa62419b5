use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, EnumString};

use super::aggregator::efficiency;

/// Goal face split into a 3x3 grid, numbered 1..=9 left to right, top to bottom.
pub const ZONE_COUNT: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShotOutcome {
    Goal,
    Save,
    Miss,
    Post,
}

/// A shot faced by a goalkeeper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub match_id: String,
    pub goalkeeper_id: String,
    /// Target zone, `None` when it was not recorded.
    pub zone: Option<u8>,
    pub outcome: ShotOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ZoneTally {
    pub attempts: u32,
    pub goals: u32,
    pub saves: u32,
}

impl ZoneTally {
    fn record(&mut self, outcome: ShotOutcome) {
        self.attempts += 1;
        match outcome {
            ShotOutcome::Goal => self.goals += 1,
            ShotOutcome::Save => self.saves += 1,
            ShotOutcome::Miss | ShotOutcome::Post => {}
        }
    }

    /// Saves over on-target shots.
    pub fn save_percentage(&self) -> i64 {
        efficiency(f64::from(self.saves), f64::from(self.saves + self.goals))
    }

    fn merge(&mut self, other: &ZoneTally) {
        self.attempts += other.attempts;
        self.goals += other.goals;
        self.saves += other.saves;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone: u8,
    #[serde(flatten)]
    pub tally: ZoneTally,
    pub save_percentage: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShotMap {
    pub zones: Vec<ZoneSummary>,
    /// Shots with a missing or out-of-range zone.
    pub unzoned: ZoneTally,
    pub overall: ZoneTally,
    pub save_percentage: i64,
}

impl ShotMap {
    pub fn zone(&self, zone: u8) -> Option<&ZoneSummary> {
        self.zones.iter().find(|summary| summary.zone == zone)
    }
}

/// Tallies shots per zone. `goalkeeper_id` narrows to one keeper when given.
pub fn build_shot_map(shots: &[ShotRecord], goalkeeper_id: Option<&str>) -> ShotMap {
    let mut zones = [ZoneTally::default(); ZONE_COUNT as usize];
    let mut unzoned = ZoneTally::default();

    let faced = shots
        .iter()
        .filter(|shot| goalkeeper_id.map_or(true, |id| id == shot.goalkeeper_id));

    for shot in faced {
        match shot.zone {
            Some(zone @ 1..=ZONE_COUNT) => zones[usize::from(zone - 1)].record(shot.outcome),
            _ => unzoned.record(shot.outcome),
        }
    }

    let mut overall = unzoned;
    for tally in &zones {
        overall.merge(tally);
    }

    ShotMap {
        zones: zones
            .iter()
            .zip(1..=ZONE_COUNT)
            .map(|(tally, zone)| ZoneSummary {
                zone,
                tally: *tally,
                save_percentage: tally.save_percentage(),
            })
            .collect(),
        unzoned,
        save_percentage: overall.save_percentage(),
        overall,
    }
}
