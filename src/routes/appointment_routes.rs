// src/routes/appointment_routes.rs

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    calendar::{CalendarMonth, DayBucket, MonthView, build_month_view},
    error::ApiError,
    models::{ApiOk, AppState},
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/appointments/month", get(get_appointments_month))
        .route("/appointments/day", get(get_appointments_day))
}

/* ============================================================
   Query params
   ============================================================ */

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    // YYYY-MM; omitted means the current month on the clinic calendar
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    // YYYY-MM-DD
    pub date: Option<String>,
}

/* ============================================================
   GET /appointments/month
   ============================================================ */

pub async fn get_appointments_month(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<ApiOk<MonthView>>, ApiError> {
    let month = match q.month.as_deref() {
        Some(s) => s.parse::<CalendarMonth>()?,
        None => CalendarMonth::current(state.calendar_offset)?,
    };

    Ok(Json(ApiOk {
        data: load_month_view(&state, month).await?,
    }))
}

/* ============================================================
   GET /appointments/day
   ============================================================ */

pub async fn get_appointments_day(
    State(state): State<AppState>,
    Query(q): Query<DayQuery>,
) -> Result<Json<ApiOk<DayBucket>>, ApiError> {
    let raw = q
        .date
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation("date is required"))?;
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::validation("date must be YYYY-MM-DD"))?;

    let month = CalendarMonth::containing(date)?;
    let view = load_month_view(&state, month).await?;

    let bucket = view
        .day(date)
        .cloned()
        .ok_or_else(|| ApiError::Internal(format!("no bucket for {date} in {month}")))?;

    Ok(Json(ApiOk { data: bucket }))
}

/* ============================================================
   Helper: fetch the month window and project it
   ============================================================ */

async fn load_month_view(state: &AppState, month: CalendarMonth) -> Result<MonthView, ApiError> {
    let window = month.window(state.calendar_offset);
    let records = state.appointments.appointments_updated_within(window).await?;

    let view = build_month_view(&records, month, state.calendar_offset);

    tracing::info!(
        %month,
        fetched = records.len(),
        bucketed = view.total_count(),
        "built month view"
    );
    Ok(view)
}
