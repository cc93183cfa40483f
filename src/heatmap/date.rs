//! Calendar helpers used to decide where grid columns break and where month
//! labels go.
//!
//! Every function takes a loose `(year, month, day)` triple.  A day number past
//! the end of its month rolls over into the following month, which lets
//! callers ask about "the day after this one" as `day + 1`.

use time::{Date, Month};

static SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of days that a date can be into its month and still fall in the
/// month's first week
const FIRST_WEEK_DAYS: u8 = 7;

/// Resolve a `(year, month, day)` triple to a real date.  Returns `None` if
/// `month` is not in `1..=12` or the result is outside the range of [`Date`].
pub(crate) fn calendar_date(year: i32, month: u8, day: u8) -> Option<Date> {
    let month = Month::try_from(month).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let offset = i32::from(day) - 1;
    Date::from_julian_day(first.to_julian_day().checked_add(offset)?).ok()
}

/// Sunday-based index of the day of the week: Sunday is 0, Saturday is 6
pub(crate) fn weekday_of(year: i32, month: u8, day: u8) -> Option<u8> {
    calendar_date(year, month, day).map(|d| d.weekday().number_days_from_sunday())
}

pub(crate) fn is_first_day_of_week(year: i32, month: u8, day: u8) -> bool {
    weekday_of(year, month, day) == Some(0)
}

pub(crate) fn is_first_week_of_month(year: i32, month: u8, day: u8) -> bool {
    calendar_date(year, month, day).is_some_and(|d| d.day() <= FIRST_WEEK_DAYS)
}

pub(crate) fn short_month_name(year: i32, month: u8, day: u8) -> Option<&'static str> {
    let date = calendar_date(year, month, day)?;
    SHORT_MONTH_NAMES
        .get(usize::from(u8::from(date.month())) - 1)
        .copied()
}
