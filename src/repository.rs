// src/repository.rs

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    calendar::MonthWindow,
    models::{AppointmentRecord, AppointmentStatus, PersonBrief, ServiceBrief, display_name},
};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("appointment query failed: {0}")]
    Query(#[from] sqlx::Error),
}

/// Supplies appointments whose `updated_at` lies inside a window, with
/// doctor, patient and service already joined.
#[async_trait]
pub trait AppointmentSource: Send + Sync {
    async fn appointments_updated_within(
        &self,
        window: MonthWindow,
    ) -> Result<Vec<AppointmentRecord>, RepositoryError>;
}

pub struct PgAppointmentSource {
    pool: PgPool,
}

impl PgAppointmentSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/* ============================================================
   DB Row Models
   ============================================================ */

#[derive(Debug, sqlx::FromRow)]
pub struct AppointmentRow {
    pub appointment_id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: AppointmentStatus,
    pub updated_at: DateTime<Utc>,

    pub d_id: Option<Uuid>,
    pub d_first: Option<String>,
    pub d_last: Option<String>,

    pub p_id: Uuid,
    pub p_first: String,
    pub p_last: String,

    pub svc_id: Uuid,
    pub svc_name: String,
}

impl From<AppointmentRow> for AppointmentRecord {
    fn from(r: AppointmentRow) -> Self {
        // LEFT JOIN: no doctor assigned -> all d_* columns are NULL
        let doctor = r.d_id.map(|id| PersonBrief {
            id,
            display: display_name(
                r.d_first.as_deref().unwrap_or_default(),
                r.d_last.as_deref().unwrap_or_default(),
            ),
        });

        AppointmentRecord {
            id: r.appointment_id,
            date: r.appointment_date,
            start_time: r.start_time,
            end_time: r.end_time,
            status: r.status,
            updated_at: r.updated_at,
            doctor,
            patient: PersonBrief {
                id: r.p_id,
                display: display_name(&r.p_first, &r.p_last),
            },
            service: ServiceBrief {
                id: r.svc_id,
                display_name: r.svc_name,
            },
        }
    }
}

#[async_trait]
impl AppointmentSource for PgAppointmentSource {
    async fn appointments_updated_within(
        &self,
        window: MonthWindow,
    ) -> Result<Vec<AppointmentRecord>, RepositoryError> {
        let rows: Vec<AppointmentRow> = sqlx::query_as::<_, AppointmentRow>(
            r#"
            SELECT
              a.appointment_id,
              a.appointment_date,
              a.start_time,
              a.end_time,
              a.status,
              a.updated_at,

              d.employee_id AS d_id,
              d.first_name  AS d_first,
              d.last_name   AS d_last,

              p.patient_id AS p_id,
              p.first_name AS p_first,
              p.last_name  AS p_last,

              sc.service_id   AS svc_id,
              sc.display_name AS svc_name

            FROM appointment a
            JOIN patient p ON p.patient_id = a.patient_id
            JOIN service_catalog sc ON sc.service_id = a.service_id
            LEFT JOIN employee d ON d.employee_id = a.doctor_employee_id

            WHERE a.updated_at BETWEEN $1 AND $2

            ORDER BY a.updated_at ASC, a.appointment_id ASC
            "#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(
            rows = rows.len(),
            start = %window.start,
            end = %window.end,
            "fetched appointments"
        );

        Ok(rows.into_iter().map(AppointmentRecord::from).collect())
    }
}
