use axum::extract::State;
use axum::Json;

use super::AppState;
use crate::orchestration::StatsSnapshot;

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsSnapshot> {
    Json(state.stats.snapshot())
}
