use serde::Serialize;

use super::aggregator::{aggregate, efficiency};
use super::keys::StatKey;
use super::models::{MatchInfo, RowFilter, StatRow};

/// Fixed-shape team totals for one match, used by the comparison views.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTotals {
    pub match_id: String,
    pub opponent: String,
    pub jornada: Option<String>,
    pub home_score: u32,
    pub away_score: u32,
    pub is_home: bool,

    pub goles: f64,
    pub tiros: f64,
    pub eficiencia_tiro: i64,
    pub asistencias: f64,

    pub goles_hombre_mas: f64,
    pub fallos_hombre_mas: f64,
    pub eficiencia_hombre_mas: i64,

    pub bloqueos: f64,
    pub perdidas: f64,
    pub recuperaciones: f64,
    /// Recoveries minus turnovers.
    pub balance_posesion: f64,

    pub goles_recibidos: u32,
    pub goles_hombre_menos: f64,
    pub paradas_hombre_menos: f64,
    pub eficiencia_hombre_menos: i64,

    pub paradas: f64,
    pub paradas_recuperacion: f64,
    pub porcentaje_paradas: i64,
}

/// Builds the totals record for `info` from the rows belonging to that match.
/// Rows for other matches are ignored.
pub fn compare_match(info: &MatchInfo, rows: &[StatRow]) -> MatchTotals {
    let totals = aggregate(rows, &RowFilter::match_id(info.id.as_str()));

    let goles = totals.stat(StatKey::GolesTotales);
    let tiros = totals.stat(StatKey::TirosTotales);
    let goles_hombre_mas = totals.stat(StatKey::GolesHombreMas);
    let fallos_hombre_mas = totals.stat(StatKey::FallosHombreMas);
    let perdidas = totals.stat(StatKey::AccionesPerdidaPosesion);
    let recuperaciones = totals.stat(StatKey::AccionesRecuperacion);
    let goles_hombre_menos = totals.stat(StatKey::PorteroGolesHombreMenos);
    let paradas_hombre_menos = totals.stat(StatKey::PorteroParadasHombreMenos);
    let paradas = totals.stat(StatKey::PorteroParadasTotales);

    // Conceded goals are read off the scoreboard, never summed from rows.
    let goles_recibidos = info.goals_against();

    MatchTotals {
        match_id: info.id.clone(),
        opponent: info.opponent.clone(),
        jornada: info.jornada.clone(),
        home_score: info.home_score,
        away_score: info.away_score,
        is_home: info.is_home,

        goles,
        tiros,
        eficiencia_tiro: efficiency(goles, tiros),
        asistencias: totals.stat(StatKey::AccionesAsistencias),

        goles_hombre_mas,
        fallos_hombre_mas,
        eficiencia_hombre_mas: efficiency(goles_hombre_mas, goles_hombre_mas + fallos_hombre_mas),

        bloqueos: totals.stat(StatKey::AccionesBloqueo),
        perdidas,
        recuperaciones,
        balance_posesion: recuperaciones - perdidas,

        goles_recibidos,
        goles_hombre_menos,
        paradas_hombre_menos,
        eficiencia_hombre_menos: efficiency(
            paradas_hombre_menos,
            paradas_hombre_menos + goles_hombre_menos,
        ),

        paradas,
        paradas_recuperacion: totals.stat(StatKey::PorteroParadasRecuperacion),
        porcentaje_paradas: efficiency(paradas, paradas + f64::from(goles_recibidos)),
    }
}

/// One record per match, in the order the matches were given.
pub fn compare_matches(matches: &[MatchInfo], rows: &[StatRow]) -> Vec<MatchTotals> {
    matches
        .iter()
        .map(|info| compare_match(info, rows))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_info(id: &str, home: u32, away: u32, is_home: bool) -> MatchInfo {
        MatchInfo {
            id: id.to_string(),
            club_id: "club".to_string(),
            opponent: "CN Sabadell".to_string(),
            jornada: Some("Jornada 4".to_string()),
            home_score: home,
            away_score: away,
            is_home,
            played_on: None,
        }
    }

    fn full_rows() -> Vec<StatRow> {
        vec![
            StatRow::new("p1", "m1")
                .with("goles_totales", 3.0)
                .with("tiros_totales", 6.0)
                .with("acciones_asistencias", 2.0)
                .with("goles_hombre_mas", 1.0)
                .with("fallos_hombre_mas", 1.0)
                .with("acciones_bloqueo", 1.0)
                .with("acciones_perdida_posesion", 2.0)
                .with("acciones_recuperacion", 3.0),
            StatRow::new("p2", "m1")
                .with("goles_totales", 2.0)
                .with("tiros_totales", 4.0)
                .with("goles_hombre_mas", 1.0)
                .with("fallos_hombre_mas", 2.0)
                .with("acciones_perdida_posesion", 3.0),
            StatRow::new("gk", "m1")
                .with("portero_paradas_totales", 10.0)
                .with("portero_paradas_recuperacion", 4.0)
                .with("portero_paradas_hombre_menos", 3.0)
                .with("portero_goles_hombre_menos", 1.0),
            StatRow::new("p1", "m2").with("goles_totales", 9.0),
        ]
    }

    #[test]
    fn builds_totals_for_a_match() {
        let totals = compare_match(&match_info("m1", 8, 5, true), &full_rows());

        assert_eq!(totals.goles, 5.0);
        assert_eq!(totals.tiros, 10.0);
        assert_eq!(totals.eficiencia_tiro, 50);
        assert_eq!(totals.asistencias, 2.0);
        assert_eq!(totals.goles_hombre_mas, 2.0);
        assert_eq!(totals.fallos_hombre_mas, 3.0);
        assert_eq!(totals.eficiencia_hombre_mas, 40);
        assert_eq!(totals.bloqueos, 1.0);
        assert_eq!(totals.balance_posesion, -2.0);
        assert_eq!(totals.eficiencia_hombre_menos, 75);
        assert_eq!(totals.paradas, 10.0);
        assert_eq!(totals.paradas_recuperacion, 4.0);
        assert_eq!(totals.goles_recibidos, 5);
        assert_eq!(totals.porcentaje_paradas, 67);
    }

    #[test]
    fn goals_conceded_come_from_the_scoreboard() {
        let rows = vec![StatRow::new("gk", "m1").with("goles_recibidos", 42.0)];

        let home = compare_match(&match_info("m1", 8, 5, true), &rows);
        assert_eq!(home.goles_recibidos, 5);

        let away = compare_match(&match_info("m1", 8, 5, false), &rows);
        assert_eq!(away.goles_recibidos, 8);
    }

    #[test]
    fn match_without_rows_has_zero_efficiencies() {
        let totals = compare_match(&match_info("m9", 0, 0, true), &full_rows());

        assert_eq!(totals.goles, 0.0);
        assert_eq!(totals.eficiencia_tiro, 0);
        assert_eq!(totals.eficiencia_hombre_mas, 0);
        assert_eq!(totals.eficiencia_hombre_menos, 0);
        assert_eq!(totals.porcentaje_paradas, 0);
    }

    #[test]
    fn keeps_match_order() {
        let matches = vec![match_info("m2", 3, 4, false), match_info("m1", 8, 5, true)];
        let compared = compare_matches(&matches, &full_rows());

        assert_eq!(compared.len(), 2);
        assert_eq!(compared[0].match_id, "m2");
        assert_eq!(compared[0].goles, 9.0);
        assert_eq!(compared[1].match_id, "m1");
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let totals = compare_match(&match_info("m1", 8, 5, true), &full_rows());
        let json = serde_json::to_value(&totals).unwrap();
        assert_eq!(json["golesRecibidos"], 5);
        assert_eq!(json["eficienciaTiro"], 50);
        assert_eq!(json["matchId"], "m1");
    }
}
