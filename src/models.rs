use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repository::AppointmentSource;

#[derive(Clone)]
pub struct AppState {
    pub appointments: Arc<dyn AppointmentSource>,
    /// Offset at which "calendar day" is evaluated for `updated_at`.
    pub calendar_offset: FixedOffset,
}

/* -------------------------
   API DTOs
--------------------------*/

#[derive(Debug, Serialize)]
pub struct ApiOk<T> {
    pub data: T,
}

/* -------------------------
   Appointment records
--------------------------*/

/// Stored as smallint: 0 pending, 1 confirmed, 2 completed, 3 cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "smallint")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(i16)]
pub enum AppointmentStatus {
    Pending = 0,
    Confirmed = 1,
    Completed = 2,
    Cancelled = 3,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonBrief {
    pub id: Uuid,
    pub display: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceBrief {
    pub id: Uuid,
    pub display_name: String,
}

/// One appointment with its doctor, patient and service already joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub updated_at: DateTime<Utc>,
    pub doctor: Option<PersonBrief>,
    pub patient: PersonBrief,
    pub service: ServiceBrief,
}

/* -------------------------
   Helpers
--------------------------*/

/// "First Last", with missing parts dropped.
pub fn display_name(first: &str, last: &str) -> String {
    format!("{} {}", first.trim(), last.trim()).trim().to_string()
}
