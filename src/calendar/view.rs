//! Monthly calendar projection: appointments bucketed by day, then by doctor.

use std::collections::HashMap;

use chrono::{Datelike, FixedOffset, NaiveDate};
use serde::Serialize;

use super::month::CalendarMonth;
use crate::models::AppointmentRecord;

/// Appointments of one doctor on one day.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorGroup {
    pub doctor: String,
    pub count: usize,
    pub appointments: Vec<AppointmentRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Locale day string, e.g. `3/5/2024`.
    pub label: String,
    pub count: usize,
    pub groups: Vec<DoctorGroup>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayBucket>,
}

impl DayBucket {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            label: day_label(date),
            count: 0,
            groups: vec![],
        }
    }

    fn push(&mut self, doctor: &str, record: &AppointmentRecord) {
        match self.groups.iter_mut().find(|g| g.doctor == doctor) {
            Some(group) => {
                group.appointments.push(record.clone());
                group.count += 1;
            }
            None => self.groups.push(DoctorGroup {
                doctor: doctor.to_string(),
                count: 1,
                appointments: vec![record.clone()],
            }),
        }
        self.count += 1;
    }
}

impl MonthView {
    pub fn total_count(&self) -> usize {
        self.days.iter().map(|d| d.count).sum()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayBucket> {
        self.days.iter().find(|d| d.date == date)
    }
}

/// `M/D/YYYY` without zero padding.
pub fn day_label(date: NaiveDate) -> String {
    format!("{}/{}/{}", date.month(), date.day(), date.year())
}

/// Project `records` onto every day of `month`.
///
/// Records land on the calendar day of `updated_at` as seen at `offset`.
/// Records with no doctor, or a doctor with an empty display name, are
/// skipped. Doctors are grouped by display name in first-seen order, and
/// days without appointments still get an empty bucket. Records whose day
/// falls outside `month` are ignored.
pub fn build_month_view(
    records: &[AppointmentRecord],
    month: CalendarMonth,
    offset: FixedOffset,
) -> MonthView {
    let mut partitions: HashMap<NaiveDate, DayBucket> = HashMap::new();

    for record in records {
        let Some(doctor) = record.doctor.as_ref().filter(|d| !d.display.is_empty()) else {
            continue;
        };
        let date = record.updated_at.with_timezone(&offset).date_naive();
        if !month.contains(date) {
            continue;
        }

        partitions
            .entry(date)
            .or_insert_with(|| DayBucket::empty(date))
            .push(&doctor.display, record);
    }

    let days = month
        .days()
        .map(|date| partitions.remove(&date).unwrap_or_else(|| DayBucket::empty(date)))
        .collect();

    MonthView {
        year: month.year(),
        month: month.month(),
        days,
    }
}
