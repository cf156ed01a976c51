use axum::{Json, Router, extract::State, routing::get};

use crate::models::{ApiOk, AppState};

#[derive(serde::Serialize)]
pub struct HealthData {
    pub status: &'static str,
    pub calendar_offset: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub async fn health(State(state): State<AppState>) -> Json<ApiOk<HealthData>> {
    Json(ApiOk {
        data: HealthData {
            status: "ok",
            calendar_offset: state.calendar_offset.to_string(),
        },
    })
}
