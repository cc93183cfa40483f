mod buffer;
mod svg;
pub(crate) use self::buffer::BufferSurface;
pub(crate) use self::svg::SvgSurface;
use crate::heatmap::{GridLayout, Rgb};

/// Something a heatmap can be drawn on.  Coordinates are in the surface's own
/// units with the origin at the top left.
pub(crate) trait Surface {
    /// Width of the drawable area
    fn measure_clip_width(&self) -> f32;

    /// Fill a `size` by `size` square whose top left corner is at `(x, y)`
    fn draw_rect(&mut self, x: f32, y: f32, size: f32, color: Rgb);

    fn draw_text(&mut self, text: &str, x: f32, baseline_y: f32, color: Rgb, font_size: f32);

    /// Erase everything drawn so far, filling with `color`, or leaving the
    /// surface transparent if `color` is `None`
    fn clear(&mut self, color: Option<Rgb>);
}

/// Draw a laid-out grid: every block, then every month label in
/// `text_color`, sized to the label band
pub(crate) fn paint<S: Surface + ?Sized>(grid: &GridLayout, text_color: Rgb, surface: &mut S) {
    for block in &grid.blocks {
        surface.draw_rect(block.x, block.y, block.size, block.color);
    }
    for label in &grid.labels {
        surface.draw_text(
            label.text,
            label.x,
            label.baseline_y,
            text_color,
            grid.label_height,
        );
    }
}
