use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Statistic keys recorded per player per match.
///
/// Rows may carry keys outside this list; they are kept as plain strings and
/// simply ignored by anything that does not ask for them.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StatKey {
    GolesTotales,
    TirosTotales,
    AccionesAsistencias,
    GolesHombreMas,
    FallosHombreMas,
    AccionesBloqueo,
    AccionesPerdidaPosesion,
    AccionesRecuperacion,
    PorteroGolesHombreMenos,
    PorteroParadasHombreMenos,
    PorteroParadasTotales,
    PorteroParadasRecuperacion,
}

impl StatKey {
    /// Column name as stored in per-match stat rows.
    pub fn key(self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn key_matches_strum_serialization() {
        for stat in StatKey::iter() {
            assert_eq!(stat.key(), stat.as_ref());
            assert_eq!(stat.to_string(), stat.key());
        }
    }

    #[test]
    fn parses_from_column_name() {
        assert_eq!(
            StatKey::from_str("portero_paradas_totales"),
            Ok(StatKey::PorteroParadasTotales)
        );
        assert!(StatKey::from_str("not_a_stat").is_err());
    }
}
