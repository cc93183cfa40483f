mod color;
mod date;
mod layout;
mod window;
pub(crate) use self::color::{ColorParser, Rgb, StandardColorParser};
pub(crate) use self::layout::{layout, GridLayout};
pub(crate) use self::window::{trim, MAX_WINDOW_WEEKS, MIN_WINDOW_WEEKS};
use thiserror::Error;
use time::Date;

/// One calendar day's worth of contributions.
///
/// Sequences of these are expected to be in chronological order with exactly
/// one entry per day; nothing downstream checks this.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct ContributionDay {
    pub(crate) year: i32,
    pub(crate) month: u8,
    pub(crate) day: u8,
    pub(crate) level: u32,
}

impl ContributionDay {
    pub(crate) fn new(date: Date, level: u32) -> ContributionDay {
        ContributionDay {
            year: date.year(),
            month: date.month().into(),
            day: date.day(),
            level,
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum InvalidArgument {
    #[error("window must be between 2 and 53 weeks, got {0}")]
    WindowWeeks(u8),
    #[error("invalid color: {0:?}")]
    Color(String),
}
