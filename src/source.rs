//! Where contribution histories come from.
//!
//! Fetches run on a background thread and hand their complete result back
//! over a channel in one message, so a history is never seen half-loaded.

use crate::heatmap::ContributionDay;
use std::fmt;
use std::fs;
use std::io;
use std::iter::successors;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::sync::{
    mpsc::{self, Receiver, TryRecvError},
    Arc,
};
use std::thread;
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};
use tracing::{debug, info, warn};

static YMD_FMT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

pub(crate) type FetchResult = Result<Vec<ContributionDay>, FetchError>;

/// A provider of per-user contribution histories
pub(crate) trait ContributionSource: fmt::Debug + Send + Sync {
    /// Fetch the history of `username`, covering at least the last
    /// `window_weeks` weeks.  Days must be consecutive and in chronological
    /// order.
    fn fetch(&self, username: &str, window_weeks: u8) -> FetchResult;
}

#[derive(Debug, Error)]
pub(crate) enum FetchError {
    #[error("invalid username {0:?}")]
    Username(String),
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected a date and a level")]
    Malformed { line: usize },
    #[error("line {line}: invalid date {value:?}")]
    Date {
        line: usize,
        value: String,
        #[source]
        source: time::error::Parse,
    },
    #[error("line {line}: invalid level {value:?}")]
    Level {
        line: usize,
        value: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: {date} is not the day after the previous entry")]
    Gap { line: usize, date: Date },
    #[error("no contributions found for {0:?}")]
    Empty(String),
    #[error("fetch ended without a result")]
    Abandoned,
}

/// Reads histories from `<dir>/<username>.txt`.
///
/// Each line holds a `YYYY-MM-DD` date and a level, separated by whitespace
/// or a comma.  Blank lines and lines starting with `#` are skipped.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub(crate) fn new<P: Into<PathBuf>>(dir: P) -> FileSource {
        FileSource { dir: dir.into() }
    }
}

impl ContributionSource for FileSource {
    fn fetch(&self, username: &str, _window_weeks: u8) -> FetchResult {
        if !is_valid_username(username) {
            return Err(FetchError::Username(username.to_owned()));
        }
        let path = self.dir.join(format!("{username}.txt"));
        debug!(path = %path.display(), "reading contribution history");
        let text = fs::read_to_string(&path).map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;
        let days = parse_history(&text)?;
        if days.is_empty() {
            return Err(FetchError::Empty(username.to_owned()));
        }
        Ok(days)
    }
}

// GitHub user & organization names are ASCII alphanumerics and hyphens
fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

pub(crate) fn parse_history(text: &str) -> FetchResult {
    let mut days = Vec::new();
    let mut previous: Option<Date> = None;
    for (line, content) in std::iter::zip(1.., text.lines()) {
        let content = content.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let mut fields = content
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty());
        let (Some(date_str), Some(level_str), None) = (fields.next(), fields.next(), fields.next())
        else {
            return Err(FetchError::Malformed { line });
        };
        let date = Date::parse(date_str, &YMD_FMT).map_err(|source| FetchError::Date {
            line,
            value: date_str.to_owned(),
            source,
        })?;
        let level = level_str
            .parse::<u32>()
            .map_err(|source| FetchError::Level {
                line,
                value: level_str.to_owned(),
                source,
            })?;
        if previous.is_some_and(|p| p.next_day() != Some(date)) {
            return Err(FetchError::Gap { line, date });
        }
        previous = Some(date);
        days.push(ContributionDay::new(date, level));
    }
    Ok(days)
}

/// Makes up a plausible-looking history that ends on `today`, the same every
/// time for the same username
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct SyntheticSource {
    today: Date,
}

impl SyntheticSource {
    pub(crate) fn new(today: Date) -> SyntheticSource {
        SyntheticSource { today }
    }
}

impl ContributionSource for SyntheticSource {
    fn fetch(&self, username: &str, window_weeks: u8) -> FetchResult {
        if username.is_empty() {
            return Err(FetchError::Username(username.to_owned()));
        }
        let seed = username
            .bytes()
            .fold(0xCBF2_9CE4_8422_2325_u64, |h, b| {
                (h ^ u64::from(b)).wrapping_mul(0x0100_0000_01B3)
            });
        // Whole weeks before the current one, plus the current week up to
        // and including today
        let qty = usize::from(window_weeks.saturating_sub(1)) * 7
            + usize::from(self.today.weekday().number_days_from_sunday())
            + 1;
        let mut days = successors(Some(self.today), |d| d.previous_day())
            .take(qty)
            .map(|date| ContributionDay::new(date, synthetic_level(seed, date)))
            .collect::<Vec<_>>();
        days.reverse();
        Ok(days)
    }
}

fn synthetic_level(seed: u64, date: Date) -> u32 {
    // splitmix64
    let mut z = seed ^ u64::from(date.to_julian_day().unsigned_abs());
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    match z % 10 {
        0..=3 => 0,
        4 | 5 => 1,
        6 | 7 => 2,
        8 => 3,
        _ => 4,
    }
}

/// A fetch running in the background
#[derive(Debug)]
pub(crate) struct PendingFetch {
    username: String,
    receiver: Receiver<FetchResult>,
}

impl PendingFetch {
    /// The user whose history is being fetched
    pub(crate) fn username(&self) -> &str {
        &self.username
    }

    /// Returns `None` while the fetch is still running
    pub(crate) fn try_take(&self) -> Option<FetchResult> {
        match self.receiver.try_recv() {
            Ok(r) => Some(r),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(FetchError::Abandoned)),
        }
    }

    pub(crate) fn wait(self) -> FetchResult {
        self.receiver
            .recv()
            .unwrap_or_else(|_| Err(FetchError::Abandoned))
    }
}

pub(crate) fn spawn_fetch(
    source: Arc<dyn ContributionSource>,
    username: &str,
    window_weeks: u8,
) -> PendingFetch {
    let (sender, receiver) = mpsc::channel();
    let name = username.to_owned();
    let spawned = thread::Builder::new()
        .name(String::from("fetch"))
        .spawn(move || {
            let result = source.fetch(&name, window_weeks);
            match &result {
                Ok(days) => info!(username = %name, days = days.len(), "fetched contributions"),
                Err(e) => debug!(username = %name, error = %e, "fetch failed"),
            }
            // The receiving end is gone if this fetch was superseded.
            let _ = sender.send(result);
        });
    if let Err(e) = spawned {
        warn!(error = %e, "could not start fetch thread");
    }
    PendingFetch {
        username: username.to_owned(),
        receiver,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_parse_history() {
        let text = concat!(
            "# exported history\n",
            "2023-12-30 0\n",
            "\n",
            "2023-12-31,4\n",
            "  2024-01-01\t12  \n",
        );
        let days = parse_history(text).unwrap();
        assert_eq!(
            days,
            [
                ContributionDay::new(date!(2023 - 12 - 30), 0),
                ContributionDay::new(date!(2023 - 12 - 31), 4),
                ContributionDay::new(date!(2024 - 01 - 01), 12),
            ]
        );
    }

    #[test]
    fn test_parse_empty_history() {
        assert!(parse_history("").unwrap().is_empty());
        assert!(parse_history("# nothing\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse_history("2023-01-01\n"),
            Err(FetchError::Malformed { line: 1 })
        ));
        assert!(matches!(
            parse_history("2023-01-01 1 2\n"),
            Err(FetchError::Malformed { line: 1 })
        ));
        assert!(matches!(
            parse_history("2023-01-01 1\n2023-02-30 1\n"),
            Err(FetchError::Date { line: 2, .. })
        ));
        assert!(matches!(
            parse_history("2023-01-01 -1\n"),
            Err(FetchError::Level { line: 1, .. })
        ));
        assert!(matches!(
            parse_history("2023-01-01 1\n\n2023-01-03 1\n"),
            Err(FetchError::Gap { line: 3, date }) if date == date!(2023 - 01 - 03)
        ));
        assert!(matches!(
            parse_history("2023-01-02 1\n2023-01-01 1\n"),
            Err(FetchError::Gap { line: 2, .. })
        ));
    }

    #[test]
    fn test_usernames() {
        assert!(is_valid_username("octocat"));
        assert!(is_valid_username("some-org-2"));
        assert!(!is_valid_username(""));
        assert!(!is_valid_username("../etc/passwd"));
        assert!(!is_valid_username("a b"));
    }

    #[test]
    fn test_file_source_rejects_paths() {
        let source = FileSource::new(".");
        assert!(matches!(
            source.fetch("../secrets", 53),
            Err(FetchError::Username(_))
        ));
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/contribmap");
        let Err(FetchError::Io { path, .. }) = source.fetch("octocat", 53) else {
            panic!("missing file should be an I/O error");
        };
        assert_eq!(path, PathBuf::from("/nonexistent/contribmap/octocat.txt"));
    }

    #[test]
    fn test_synthetic_source() {
        // A Wednesday
        let today = date!(2024 - 03 - 13);
        let source = SyntheticSource::new(today);
        let days = source.fetch("octocat", 53).unwrap();
        assert_eq!(days.len(), 52 * 7 + 4);
        let last = days[days.len() - 1];
        assert_eq!((last.year, last.month, last.day), (2024, 3, 13));
        assert_eq!(
            (days[0].year, days[0].month, days[0].day),
            (2023, 3, 12),
            "history should start on a Sunday"
        );
        assert!(days.iter().all(|d| d.level <= 4));
        assert!(days.iter().any(|d| d.level > 0));
        assert_eq!(source.fetch("octocat", 53).unwrap(), days);
        assert_ne!(source.fetch("hubot", 53).unwrap(), days);
        assert_eq!(source.fetch("octocat", 2).unwrap().len(), 7 + 4);
        assert!(matches!(source.fetch("", 53), Err(FetchError::Username(_))));
    }

    #[derive(Debug)]
    struct Fixed(Vec<ContributionDay>);

    impl ContributionSource for Fixed {
        fn fetch(&self, _username: &str, _window_weeks: u8) -> FetchResult {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_spawn_fetch() {
        let days = vec![ContributionDay::new(date!(2024 - 01 - 01), 3)];
        let pending = spawn_fetch(Arc::new(Fixed(days.clone())), "octocat", 10);
        assert_eq!(pending.username(), "octocat");
        assert_eq!(pending.wait().unwrap(), days);
    }
}
