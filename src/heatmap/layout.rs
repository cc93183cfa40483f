//! Placement of day blocks and month labels on a canvas of a given width.
//!
//! Each column of the grid is one Sunday-to-Saturday week and each of the
//! seven rows is a day of the week.  Every column gets the same share of the
//! canvas width, 90% of which is the block and the rest is the gap before the
//! next column.

use super::color::{calculate_level_color, Rgb};
use super::date::{is_first_day_of_week, is_first_week_of_month, short_month_name, weekday_of};
use super::ContributionDay;

/// Number of rows in the grid, one per day of the week
pub(crate) const ROWS: usize = 7;

/// Fraction of a column's width taken up by its blocks
const BLOCK_FILL: f32 = 0.9;

/// Height of the month label band, in block sizes
const LABEL_SCALE: f32 = 1.5;

/// Margin above the label band (and left of the first column) when month
/// labels are shown
const LABEL_MARGIN: f32 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct PlacedBlock {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub(crate) size: f32,
    pub(crate) color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MonthLabel {
    pub(crate) text: &'static str,
    pub(crate) x: f32,
    pub(crate) baseline_y: f32,
}

/// The result of a layout pass: one block per input day, in input order,
/// plus a label for each month whose first week starts a column
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct GridLayout {
    pub(crate) columns: usize,
    pub(crate) block_size: f32,
    pub(crate) spacing: f32,
    pub(crate) top_margin: f32,
    pub(crate) label_height: f32,
    pub(crate) blocks: Vec<PlacedBlock>,
    pub(crate) labels: Vec<MonthLabel>,
}

// The count is only rounded up when the number of whole weeks is not a
// multiple of seven, so a whole number of weeks that does not start on a
// Sunday can end up one column short of the canvas.
fn column_count(days: usize) -> usize {
    let columns = days / ROWS;
    let columns = if columns % 7 == 0 { columns } else { columns + 1 };
    columns.max(1)
}

/// Lay out `days` on a canvas `canvas_width` units wide.
///
/// `days` must be consecutive calendar days in chronological order.  The
/// first block lands on the row of its own weekday; the rows above it in the
/// first column are left empty.  A new column starts whenever the *following*
/// day is a Sunday.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn layout(
    days: &[ContributionDay],
    canvas_width: f32,
    display_month_labels: bool,
    base_color: Rgb,
) -> GridLayout {
    let Some(first) = days.first() else {
        return GridLayout::default();
    };
    let columns = column_count(days.len());
    let column_width = canvas_width / columns as f32;
    let block_size = column_width * BLOCK_FILL;
    let spacing = column_width - block_size;
    let (top_margin, label_height) = if display_month_labels {
        (LABEL_MARGIN, block_size * LABEL_SCALE)
    } else {
        (0.0, 0.0)
    };
    let weekday = weekday_of(first.year, first.month, first.day).unwrap_or(0);
    let first_row = (i16::from(weekday) - 7).rem_euclid(7);

    let mut blocks = Vec::with_capacity(days.len());
    let mut labels = Vec::new();
    let mut x = top_margin;
    let mut y = f32::from(first_row) * (block_size + spacing) + top_margin + label_height;
    for day in days {
        blocks.push(PlacedBlock {
            x,
            y,
            size: block_size,
            color: calculate_level_color(base_color, day.level),
        });
        let next = day.day.saturating_add(1);
        if is_first_day_of_week(day.year, day.month, next) {
            x += block_size + spacing;
            y = top_margin + label_height;
            if display_month_labels && is_first_week_of_month(day.year, day.month, next) {
                if let Some(text) = short_month_name(day.year, day.month, next) {
                    labels.push(MonthLabel {
                        text,
                        x,
                        baseline_y: label_height,
                    });
                }
            }
        } else {
            y += block_size + spacing;
        }
    }

    GridLayout {
        columns,
        block_size,
        spacing,
        top_margin,
        label_height,
        blocks,
        labels,
    }
}
