use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct Health {
    status: &'static str,
    charts: usize,
    layout: String,
}

/// Liveness probe. Makes no outbound calls.
pub async fn health_check(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        charts: state.config.charts.len(),
        layout: state.config.layout.to_string(),
    })
}
