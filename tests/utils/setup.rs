use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

use polostats::{
    routes, AppState, InMemoryPreferencesRepository, InMemoryStatsRepository, MatchInfo,
    PlayerInfo, RawStatRow,
};

use super::fixtures::{match_info, player, raw_row, CLUB_ID};

// ============================================================================
// Test Setup Infrastructure
// ============================================================================

pub struct TestSetup {
    pub app: Router,
    #[allow(dead_code)]
    pub stats_repository: Arc<InMemoryStatsRepository>,
    #[allow(dead_code)]
    pub preferences_repository: Arc<InMemoryPreferencesRepository>,
}

impl TestSetup {
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }
}

pub struct TestSetupBuilder {
    players: Vec<PlayerInfo>,
    matches: Vec<MatchInfo>,
    rows: Vec<RawStatRow>,
}

impl TestSetupBuilder {
    pub fn new() -> Self {
        Self {
            players: vec![],
            matches: vec![],
            rows: vec![],
        }
    }

    pub fn with_player(mut self, player: PlayerInfo) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_match(mut self, info: MatchInfo) -> Self {
        self.matches.push(info);
        self
    }

    pub fn with_row(mut self, row: RawStatRow) -> Self {
        self.rows.push(row);
        self
    }

    /// Two matches and three field players with a mix of clean and messy values.
    pub fn with_sample_season(self) -> Self {
        self.with_player(player("p1", "Ana"))
            .with_player(player("p2", "Berta"))
            .with_player(player("p3", "Carla"))
            .with_match(match_info("m1", 8, 5, true))
            .with_match(match_info("m2", 7, 6, false))
            .with_row(raw_row(
                "p1",
                "m1",
                json!({"goles_totales": 3, "tiros_totales": 5, "acciones_asistencias": 1}),
            ))
            .with_row(raw_row(
                "p1",
                "m2",
                json!({"goles_totales": "1", "tiros_totales": 5, "acciones_asistencias": null}),
            ))
            .with_row(raw_row(
                "p2",
                "m1",
                json!({"goles_totales": 2, "tiros_totales": 2, "acciones_asistencias": 4}),
            ))
            .with_row(raw_row(
                "p3",
                "m2",
                json!({"goles_totales": "n/a", "acciones_bloqueo": 6}),
            ))
    }

    pub fn build(self) -> TestSetup {
        let mut stats = InMemoryStatsRepository::new();
        for player in self.players {
            stats = stats.with_player(player);
        }
        for info in self.matches {
            stats = stats.with_match(info);
        }
        for row in self.rows {
            stats = stats.with_stat_row(CLUB_ID, row);
        }

        let stats_repository = Arc::new(stats);
        let preferences_repository = Arc::new(InMemoryPreferencesRepository::new());
        let state = AppState::new(stats_repository.clone(), preferences_repository.clone());

        TestSetup {
            app: routes::app(state),
            stats_repository,
            preferences_repository,
        }
    }
}
