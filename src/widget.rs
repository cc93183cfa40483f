use crate::surface::BufferSurface;
use crate::theme::BACKGROUND;
use crate::view::HeatmapView;
use ratatui::{buffer::Buffer, layout::Rect, widgets::StatefulWidget};

/// Draws a [`HeatmapView`] across the full width of its area, two heatmap
/// pixels per terminal row
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Heatmap;

impl StatefulWidget for Heatmap {
    type State = HeatmapView;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let mut surface = BufferSurface::new(area, buf, BACKGROUND);
        state.draw(&mut surface);
    }
}
