use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use super::keys::StatKey;
use super::models::{AggregatedTotals, RowFilter, StatRow};

/// Sums every key across the rows accepted by `filter`.
///
/// Values for each key are added in sorted order, so any permutation of
/// `rows` produces bit-identical totals.
pub fn aggregate(rows: &[StatRow], filter: &RowFilter) -> AggregatedTotals {
    let mut columns: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut matches: BTreeSet<&str> = BTreeSet::new();
    let mut row_count = 0;

    for row in rows.iter().filter(|row| filter.matches(row)) {
        row_count += 1;
        matches.insert(row.match_id.as_str());
        for (key, value) in &row.values {
            columns.entry(key.as_str()).or_default().push(*value);
        }
    }

    let totals: BTreeMap<String, f64> = columns
        .into_iter()
        .map(|(key, mut values)| {
            values.sort_by(f64::total_cmp);
            (key.to_string(), values.into_iter().sum::<f64>())
        })
        .collect();

    AggregatedTotals {
        totals,
        row_count,
        match_count: matches.len(),
    }
}

/// Percentage of `numerator` over `denominator`, rounded to an integer.
/// A non-positive denominator yields 0.
pub fn efficiency(numerator: f64, denominator: f64) -> i64 {
    if denominator <= 0.0 {
        return 0;
    }

    let ratio = (numerator / denominator * 100.0).round();
    if ratio.is_finite() {
        ratio as i64
    } else {
        0
    }
}

/// Average per match with one decimal place; no matches reads "0.0".
pub fn per_match_average(total: f64, match_count: usize) -> String {
    if match_count == 0 {
        return "0.0".to_string();
    }

    // Ties round away from zero, matching `efficiency`.
    let average = (total / match_count as f64 * 10.0).round() / 10.0;
    if average.is_finite() {
        format!("{average:.1}")
    } else {
        "0.0".to_string()
    }
}

/// Season overview for a single player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSummary {
    pub player_id: String,
    pub matches_played: usize,
    pub goals: f64,
    pub shots: f64,
    pub shot_efficiency: i64,
    pub assists: f64,
    pub blocks: f64,
    pub goalkeeper_saves: f64,
    pub goals_per_match: String,
    pub assists_per_match: String,
    pub totals: AggregatedTotals,
}

pub fn summarize_player(player_id: &str, rows: &[StatRow]) -> PlayerSummary {
    let totals = aggregate(rows, &RowFilter::entity(player_id));
    let goals = totals.stat(StatKey::GolesTotales);
    let shots = totals.stat(StatKey::TirosTotales);
    let assists = totals.stat(StatKey::AccionesAsistencias);

    PlayerSummary {
        player_id: player_id.to_string(),
        matches_played: totals.match_count,
        goals,
        shots,
        shot_efficiency: efficiency(goals, shots),
        assists,
        blocks: totals.stat(StatKey::AccionesBloqueo),
        goalkeeper_saves: totals.stat(StatKey::PorteroParadasTotales),
        goals_per_match: per_match_average(goals, totals.match_count),
        assists_per_match: per_match_average(assists, totals.match_count),
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(player: &str, match_id: &str, goals: f64, shots: f64) -> StatRow {
        StatRow::new(player, match_id)
            .with("goles_totales", goals)
            .with("tiros_totales", shots)
    }

    #[test]
    fn sums_goals_and_shots() {
        let rows = vec![row("p1", "m1", 3.0, 5.0), row("p1", "m2", 1.0, 5.0)];

        let totals = aggregate(&rows, &RowFilter::all());
        assert_eq!(totals.get("goles_totales"), 4.0);
        assert_eq!(totals.get("tiros_totales"), 10.0);
        assert_eq!(
            efficiency(totals.get("goles_totales"), totals.get("tiros_totales")),
            40
        );
        assert_eq!(totals.row_count, 2);
        assert_eq!(totals.match_count, 2);
    }

    #[test]
    fn any_row_order_gives_identical_totals() {
        let rows = vec![
            row("p1", "m1", 0.1, 1.0),
            row("p1", "m2", 0.2, 3.0),
            row("p1", "m3", 0.3, 7.0),
            StatRow::new("p1", "m4").with("acciones_bloqueo", 1e16),
            StatRow::new("p1", "m5").with("acciones_bloqueo", 1.0),
            StatRow::new("p1", "m6").with("acciones_bloqueo", -1e16),
        ];
        let expected = aggregate(&rows, &RowFilter::all());

        let mut reversed = rows.clone();
        reversed.reverse();
        assert_eq!(aggregate(&reversed, &RowFilter::all()), expected);

        let mut rotated = rows.clone();
        rotated.rotate_left(2);
        assert_eq!(aggregate(&rotated, &RowFilter::all()), expected);

        let mut swapped = rows;
        swapped.swap(0, 5);
        swapped.swap(1, 3);
        assert_eq!(aggregate(&swapped, &RowFilter::all()), expected);
    }

    #[test]
    fn aggregating_twice_is_identical() {
        let rows = vec![row("p1", "m1", 2.0, 4.0), row("p2", "m1", 1.0, 2.0)];
        assert_eq!(
            aggregate(&rows, &RowFilter::all()),
            aggregate(&rows, &RowFilter::all())
        );
    }

    #[test]
    fn filter_limits_rows() {
        let rows = vec![
            row("p1", "m1", 2.0, 4.0),
            row("p2", "m1", 1.0, 2.0),
            row("p1", "m2", 5.0, 6.0),
        ];

        let p1 = aggregate(&rows, &RowFilter::entity("p1"));
        assert_eq!(p1.get("goles_totales"), 7.0);
        assert_eq!(p1.match_count, 2);

        let m1 = aggregate(&rows, &RowFilter::match_id("m1"));
        assert_eq!(m1.get("goles_totales"), 3.0);
        assert_eq!(m1.row_count, 2);
        assert_eq!(m1.match_count, 1);
    }

    #[test]
    fn empty_input_has_no_totals() {
        let totals = aggregate(&[], &RowFilter::all());
        assert!(totals.totals.is_empty());
        assert_eq!(totals.match_count, 0);
    }

    #[rstest]
    #[case(4.0, 10.0, 40)]
    #[case(1.0, 3.0, 33)]
    #[case(2.0, 3.0, 67)]
    #[case(1.0, 8.0, 13)]
    #[case(5.0, 5.0, 100)]
    #[case(0.0, 5.0, 0)]
    #[case(3.0, 0.0, 0)]
    #[case(0.0, 0.0, 0)]
    #[case(3.0, -2.0, 0)]
    fn efficiency_is_rounded_and_zero_guarded(
        #[case] numerator: f64,
        #[case] denominator: f64,
        #[case] expected: i64,
    ) {
        assert_eq!(efficiency(numerator, denominator), expected);
    }

    #[rstest]
    #[case(7.0, 2, "3.5")]
    #[case(10.0, 3, "3.3")]
    #[case(0.0, 4, "0.0")]
    #[case(5.0, 0, "0.0")]
    #[case(1.0, 4, "0.3")]
    #[case(5.0, 4, "1.3")]
    #[case(-1.0, 4, "-0.3")]
    fn per_match_average_has_one_decimal(
        #[case] total: f64,
        #[case] matches: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(per_match_average(total, matches), expected);
    }

    #[test]
    fn summarizes_player_season() {
        let rows = vec![
            row("p1", "m1", 3.0, 5.0).with("acciones_asistencias", 1.0),
            row("p1", "m2", 1.0, 5.0).with("acciones_asistencias", 2.0),
            row("p9", "m1", 9.0, 9.0),
        ];

        let summary = summarize_player("p1", &rows);
        assert_eq!(summary.matches_played, 2);
        assert_eq!(summary.goals, 4.0);
        assert_eq!(summary.shots, 10.0);
        assert_eq!(summary.shot_efficiency, 40);
        assert_eq!(summary.assists, 3.0);
        assert_eq!(summary.goals_per_match, "2.0");
        assert_eq!(summary.assists_per_match, "1.5");
    }

    #[test]
    fn summary_for_player_without_rows_is_zeroed() {
        let summary = summarize_player("ghost", &[]);
        assert_eq!(summary.matches_played, 0);
        assert_eq!(summary.shot_efficiency, 0);
        assert_eq!(summary.goals_per_match, "0.0");
    }
}
