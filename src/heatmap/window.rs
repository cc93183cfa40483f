use super::layout::ROWS;
use super::ContributionDay;

pub(crate) const MIN_WINDOW_WEEKS: u8 = 2;

/// 52 whole weeks plus the current one
pub(crate) const MAX_WINDOW_WEEKS: u8 = 53;

/// Return the trailing `weeks` weeks of `days`.
///
/// When the length of `days` is not a whole number of weeks, the leftover
/// days count as one (partial) week of the window, and the rest of the window
/// is filled with whole weeks.  If `days` is too short, all of it is
/// returned.
pub(crate) fn trim(days: &[ContributionDay], weeks: u8) -> &[ContributionDay] {
    let weeks = usize::from(weeks);
    let partial = days.len() % ROWS;
    let retained = if partial > 0 {
        partial + weeks.saturating_sub(1) * ROWS
    } else {
        weeks * ROWS
    };
    &days[days.len() - retained.min(days.len())..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::testing::days_from;
    use time::macros::date;

    #[test]
    fn test_partial_week_kept_whole() {
        let days = days_from(date!(2023 - 01 - 05), 10);
        assert_eq!(trim(&days, 2), &days[..]);
    }

    #[test]
    fn test_trailing_weeks() {
        let days = days_from(date!(2023 - 01 - 01), 30);
        let window = trim(&days, 3);
        assert_eq!(window.len(), 16);
        assert_eq!(window, &days[14..]);
        assert_eq!(window.last(), days.last());
    }

    #[test]
    fn test_whole_weeks() {
        let days = days_from(date!(2023 - 01 - 01), 28);
        assert_eq!(trim(&days, 2), &days[14..]);
        assert_eq!(trim(&days, 4), &days[..]);
    }

    #[test]
    fn test_short_history_is_clamped() {
        let days = days_from(date!(2023 - 01 - 01), 9);
        assert_eq!(trim(&days, 53), &days[..]);
        assert!(trim(&[], 53).is_empty());
    }

    #[test]
    fn test_window_lengths() {
        let days = days_from(date!(2022 - 06 - 13), 400);
        for len in 0..=days.len() {
            let history = &days[days.len() - len..];
            for weeks in MIN_WINDOW_WEEKS..=MAX_WINDOW_WEEKS {
                let partial = len % 7;
                let expected = if partial > 0 {
                    partial + (usize::from(weeks) - 1) * 7
                } else {
                    usize::from(weeks) * 7
                };
                let window = trim(history, weeks);
                assert_eq!(
                    window.len(),
                    expected.min(len),
                    "trimming {len} days to {weeks} weeks"
                );
                assert!(history.ends_with(window));
            }
        }
    }
}
