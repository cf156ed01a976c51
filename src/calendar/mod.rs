pub mod month;
pub mod view;

pub use month::{CalendarMonth, MonthError, MonthWindow};
pub use view::{DayBucket, MonthView, build_month_view};
