use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonthError {
    #[error("month must be between 1 and 12 (got {0})")]
    InvalidMonth(u32),
    #[error("year must be between 1 and 9999 (got {0})")]
    YearOutOfRange(i32),
    #[error("month must be YYYY-MM (got {0:?})")]
    Malformed(String),
}

/// A calendar month, validated on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

/// Inclusive `[start, end]` bounds of a month on the `updated_at` axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl CalendarMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, MonthError> {
        if !(1..=12).contains(&month) {
            return Err(MonthError::InvalidMonth(month));
        }
        if !(1..=9999).contains(&year) {
            return Err(MonthError::YearOutOfRange(year));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, MonthError> {
        Self::new(date.year(), date.month())
    }

    /// The current month on a calendar evaluated at `offset`.
    /// Reads the wall clock; keep it at the request boundary.
    pub fn current(offset: FixedOffset) -> Result<Self, MonthError> {
        Self::containing(Utc::now().with_timezone(&offset).date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // year and month were range-checked in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    fn next_first_day(&self) -> NaiveDate {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1).unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        (self.next_first_day() - self.first_day()).num_days() as u32
    }

    /// Every date of the month, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        self.first_day().iter_days().take(self.days_in_month() as usize)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// UTC bounds of the month for a calendar whose days start at local
    /// midnight in `offset`. `end` sits one microsecond before the next
    /// month begins, which is the resolution of a Postgres timestamptz.
    pub fn window(&self, offset: FixedOffset) -> MonthWindow {
        let shift = Duration::seconds(offset.local_minus_utc() as i64);
        let local_midnight = |d: NaiveDate| d.and_time(NaiveTime::MIN) - shift;

        let start = DateTime::<Utc>::from_naive_utc_and_offset(local_midnight(self.first_day()), Utc);
        let next = DateTime::<Utc>::from_naive_utc_and_offset(local_midnight(self.next_first_day()), Utc);

        MonthWindow {
            start,
            end: next - Duration::microseconds(1),
        }
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for CalendarMonth {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MonthError::Malformed(s.to_string());

        let (y, m) = s.trim().split_once('-').ok_or_else(malformed)?;
        if y.len() != 4 || m.is_empty() || m.len() > 2 {
            return Err(malformed());
        }
        let year = y.parse::<i32>().map_err(|_| malformed())?;
        let month = m.parse::<u32>().map_err(|_| malformed())?;

        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rejects_out_of_range_months() {
        assert_eq!(CalendarMonth::new(2024, 0), Err(MonthError::InvalidMonth(0)));
        assert_eq!(CalendarMonth::new(2024, 13), Err(MonthError::InvalidMonth(13)));
        assert_eq!(CalendarMonth::new(0, 5), Err(MonthError::YearOutOfRange(0)));
        assert_eq!(CalendarMonth::new(10_000, 5), Err(MonthError::YearOutOfRange(10_000)));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(CalendarMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(CalendarMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(CalendarMonth::new(2000, 2).unwrap().days_in_month(), 29);
        assert_eq!(CalendarMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(CalendarMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn days_cover_the_whole_month_in_order() {
        let march = CalendarMonth::new(2024, 3).unwrap();
        let days: Vec<_> = march.days().collect();

        assert_eq!(days.len(), 31);
        assert_eq!(days.first(), Some(&date(2024, 3, 1)));
        assert_eq!(days.last(), Some(&date(2024, 3, 31)));
        assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
    }

    #[test]
    fn parses_year_month() {
        assert_eq!("2024-03".parse::<CalendarMonth>(), CalendarMonth::new(2024, 3));
        assert_eq!(" 2024-3 ".parse::<CalendarMonth>(), CalendarMonth::new(2024, 3));
        assert_eq!(
            "2024-13".parse::<CalendarMonth>(),
            Err(MonthError::InvalidMonth(13))
        );
        assert!(matches!(
            "2024/03".parse::<CalendarMonth>(),
            Err(MonthError::Malformed(_))
        ));
        assert!(matches!(
            "24-03".parse::<CalendarMonth>(),
            Err(MonthError::Malformed(_))
        ));
        assert!(matches!(
            "2024-03-05".parse::<CalendarMonth>(),
            Err(MonthError::Malformed(_))
        ));
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(CalendarMonth::new(2024, 3).unwrap().to_string(), "2024-03");
    }

    #[test]
    fn window_in_utc() {
        let w = CalendarMonth::new(2024, 12).unwrap().window(FixedOffset::east_opt(0).unwrap());

        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(
            w.end,
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() - Duration::microseconds(1)
        );
    }

    #[test]
    fn window_follows_calendar_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let w = CalendarMonth::new(2024, 3).unwrap().window(plus_two);

        // local midnight on 1 March at +02:00 is 22:00 UTC on 29 February
        assert_eq!(w.start, Utc.with_ymd_and_hms(2024, 2, 29, 22, 0, 0).unwrap());
        assert_eq!(
            w.end,
            Utc.with_ymd_and_hms(2024, 3, 31, 22, 0, 0).unwrap() - Duration::microseconds(1)
        );
    }

    #[test]
    fn contains_only_its_own_dates() {
        let march = CalendarMonth::new(2024, 3).unwrap();
        assert!(march.contains(date(2024, 3, 31)));
        assert!(!march.contains(date(2024, 4, 1)));
        assert!(!march.contains(date(2023, 3, 15)));
        assert_eq!(CalendarMonth::containing(date(2024, 3, 9)), Ok(march));
    }
}
