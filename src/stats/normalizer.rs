use serde_json::{Map, Value};

use super::models::{RawStatRow, StatRow, StatValues};

/// Coerces any stored value into a number.
///
/// Numbers pass through, numeric strings are parsed after trimming, and
/// everything else (null, booleans, objects, arrays, NaN/inf) becomes 0.
pub fn normalize_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(n) if n.is_finite() => n,
        _ => 0.0,
    }
}

pub fn normalize_values(values: &Map<String, Value>) -> StatValues {
    values
        .iter()
        .map(|(key, value)| (key.clone(), normalize_value(value)))
        .collect()
}

pub fn normalize_row(raw: &RawStatRow) -> StatRow {
    StatRow {
        entity_id: raw.entity_id.clone(),
        match_id: raw.match_id.clone(),
        values: normalize_values(&raw.values),
    }
}

pub fn normalize_rows(raw: &[RawStatRow]) -> Vec<StatRow> {
    raw.iter().map(normalize_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(3), 3.0)]
    #[case(json!(2.5), 2.5)]
    #[case(json!(-1), -1.0)]
    #[case(json!("4"), 4.0)]
    #[case(json!(" 7.5 "), 7.5)]
    #[case(json!(""), 0.0)]
    #[case(json!("abc"), 0.0)]
    #[case(json!("NaN"), 0.0)]
    #[case(json!("inf"), 0.0)]
    #[case(json!(null), 0.0)]
    #[case(json!(true), 0.0)]
    #[case(json!({"goles": 1}), 0.0)]
    #[case(json!([1, 2]), 0.0)]
    fn coerces_to_finite_number(#[case] input: Value, #[case] expected: f64) {
        assert_eq!(normalize_value(&input), expected);
    }

    #[test]
    fn normalizes_every_field_of_a_row() {
        let raw: RawStatRow = serde_json::from_value(json!({
            "entity_id": "p1",
            "match_id": "m1",
            "values": {
                "goles_totales": "3",
                "tiros_totales": 5,
                "acciones_bloqueo": null,
                "campo_desconocido": "x"
            }
        }))
        .unwrap();

        let row = normalize_row(&raw);
        assert_eq!(row.entity_id, "p1");
        assert_eq!(row.get("goles_totales"), 3.0);
        assert_eq!(row.get("tiros_totales"), 5.0);
        assert_eq!(row.get("acciones_bloqueo"), 0.0);
        assert_eq!(row.get("campo_desconocido"), 0.0);
        assert_eq!(row.values.len(), 4);
    }

    #[test]
    fn row_without_values_is_empty() {
        let raw: RawStatRow =
            serde_json::from_value(json!({"entity_id": "p1", "match_id": "m1"})).unwrap();
        assert!(normalize_row(&raw).values.is_empty());
    }
}
