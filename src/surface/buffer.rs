use super::Surface;
use crate::heatmap::Rgb;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, style::Style};
use std::ops::Range;

/// Glyph used for every cell: its foreground paints the cell's upper pixel
/// and its background paints the lower one
const UPPER_HALF: &str = "▀";

/// Number of surface pixels stacked in one terminal row
const PIXELS_PER_ROW: u16 = 2;

/// Draws onto a region of a terminal buffer.
///
/// Each terminal cell holds two square-ish pixels, one above the other, so
/// the surface is `area.width` units wide and `2 * area.height` units tall.
/// Anything drawn outside of the area is dropped.
#[derive(Debug, Eq, PartialEq)]
pub(crate) struct BufferSurface<'a> {
    area: Rect,
    buf: &'a mut Buffer,
    background: Color,
}

impl<'a> BufferSurface<'a> {
    pub(crate) fn new(area: Rect, buf: &'a mut Buffer, background: Color) -> Self {
        BufferSurface {
            area,
            buf,
            background,
        }
    }

    fn pixel_height(&self) -> u16 {
        self.area.height.saturating_mul(PIXELS_PER_ROW)
    }

    fn set_pixel(&mut self, px: u16, py: u16, color: Color) {
        let row = py / PIXELS_PER_ROW;
        if px < self.area.width && row < self.area.height {
            if let Some(cell) = self.buf.cell_mut((px + self.area.x, row + self.area.y)) {
                cell.set_symbol(UPPER_HALF);
                if py % PIXELS_PER_ROW == 0 {
                    cell.set_fg(color);
                } else {
                    cell.set_bg(color);
                }
            }
        }
    }
}

// Pixels lying wholly within `start..start+len`, or the single pixel ending
// at `floor(start + len)` if there are none, clipped to `0..limit`.  The
// pixel holding `start + len` is never painted, so squares laid out at a
// pitch of two or more pixels always keep a gap between them.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_span(start: f32, len: f32, limit: u16) -> Range<u16> {
    if len <= 0.0 {
        return 0..0;
    }
    let limit = f32::from(limit);
    let end = (start + len).floor();
    let begin = start.ceil().min(end - 1.0);
    let lo = begin.clamp(0.0, limit) as u16;
    let hi = end.clamp(0.0, limit) as u16;
    lo..hi
}

// The pixel containing `v`, or `None` if it's past `limit`.  Negative values
// are pulled in to the first pixel.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel_index(v: f32, limit: u16) -> Option<u16> {
    let v = v.round().max(0.0);
    (v < f32::from(limit)).then_some(v as u16)
}

impl Surface for BufferSurface<'_> {
    fn measure_clip_width(&self) -> f32 {
        f32::from(self.area.width)
    }

    fn draw_rect(&mut self, x: f32, y: f32, size: f32, color: Rgb) {
        let color = Color::from(color);
        for py in pixel_span(y, size, self.pixel_height()) {
            for px in pixel_span(x, size, self.area.width) {
                self.set_pixel(px, py, color);
            }
        }
    }

    // Text takes up a whole terminal row, so the font size is ignored and the
    // text goes in the row holding the pixel just above the baseline.
    fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Rgb, _font_size: f32) {
        let (Some(py), Some(col)) = (
            pixel_index(baseline_y - 1.0, self.pixel_height()),
            pixel_index(x, self.area.width),
        ) else {
            return;
        };
        let row = py / PIXELS_PER_ROW;
        let _ = self.buf.set_stringn(
            col + self.area.x,
            row + self.area.y,
            text,
            usize::from(self.area.width - col),
            Style::new().fg(color.into()).bg(self.background),
        );
    }

    fn clear(&mut self, color: Option<Rgb>) {
        let fill = color.map_or(self.background, Color::from);
        for y in self.area.top()..self.area.bottom() {
            for x in self.area.left()..self.area.right() {
                if let Some(cell) = self.buf.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_symbol(UPPER_HALF).set_fg(fill).set_bg(fill);
                }
            }
        }
    }
}
