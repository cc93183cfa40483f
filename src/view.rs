use crate::heatmap::{
    self, trim, ColorParser, ContributionDay, GridLayout, InvalidArgument, Rgb, MAX_WINDOW_WEEKS,
    MIN_WINDOW_WEEKS,
};
use crate::source::{spawn_fetch, ContributionSource, FetchError, FetchResult, PendingFetch};
use crate::surface::{paint, Surface};
use std::mem;
use std::sync::Arc;
use tracing::{debug, warn};

/// GitHub's classic lightest green
pub(crate) const DEFAULT_BASE_COLOR: Rgb = Rgb::new(0xD6, 0xE6, 0x85);

pub(crate) const DEFAULT_TEXT_COLOR: Rgb = Rgb::new(0x00, 0x00, 0x00);

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct RenderConfig {
    pub(crate) base_color: Rgb,
    pub(crate) text_color: Rgb,
    pub(crate) display_month_labels: bool,
    pub(crate) window_weeks: u8,
}

impl Default for RenderConfig {
    fn default() -> RenderConfig {
        RenderConfig {
            base_color: DEFAULT_BASE_COLOR,
            text_color: DEFAULT_TEXT_COLOR,
            display_month_labels: false,
            window_weeks: MAX_WINDOW_WEEKS,
        }
    }
}

/// A heatmap of one user's contributions together with how to draw it.
///
/// Every change goes through a setter, which drops the cached layout and
/// raises a redraw request.  The host picks the request up with
/// [`HeatmapView::take_redraw_request`], so any number of changes between two
/// frames cost a single redraw.
#[derive(Debug)]
pub(crate) struct HeatmapView {
    config: RenderConfig,
    days: Option<Vec<ContributionDay>>,
    username: Option<String>,
    parser: Box<dyn ColorParser>,
    source: Arc<dyn ContributionSource>,
    pending: Option<PendingFetch>,
    // Keyed by the canvas width it was computed for
    cache: Option<(f32, GridLayout)>,
    redraw_requested: bool,
}

impl HeatmapView {
    pub(crate) fn new(source: Arc<dyn ContributionSource>, parser: Box<dyn ColorParser>) -> Self {
        HeatmapView {
            config: RenderConfig::default(),
            days: None,
            username: None,
            parser,
            source,
            pending: None,
            cache: None,
            redraw_requested: true,
        }
    }

    pub(crate) fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The user whose history is on display
    pub(crate) fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// The user whose history is being fetched, if any
    pub(crate) fn loading_username(&self) -> Option<&str> {
        self.pending.as_ref().map(PendingFetch::username)
    }

    /// Number of days that fit in the current window
    pub(crate) fn shown_days(&self) -> usize {
        self.days
            .as_deref()
            .map_or(0, |days| trim(days, self.config.window_weeks).len())
    }

    fn invalidate(&mut self) {
        self.cache = None;
        self.redraw_requested = true;
    }

    pub(crate) fn set_base_color(&mut self, color: Rgb) {
        self.config.base_color = color;
        self.invalidate();
    }

    /// Set the base color from a string.  If the string can't be parsed, the
    /// failure is logged and the current color is kept.
    pub(crate) fn set_base_color_str(&mut self, s: &str) {
        match self.parser.parse(s) {
            Ok(color) => self.set_base_color(color),
            Err(e) => {
                warn!(error = %e, "keeping previous base color");
                self.invalidate();
            }
        }
    }

    pub(crate) fn set_text_color(&mut self, color: Rgb) {
        self.config.text_color = color;
        self.invalidate();
    }

    /// Set the month label color from a string.  If the string can't be
    /// parsed, the failure is logged and the current color is kept.
    pub(crate) fn set_text_color_str(&mut self, s: &str) {
        match self.parser.parse(s) {
            Ok(color) => self.set_text_color(color),
            Err(e) => {
                warn!(error = %e, "keeping previous text color");
                self.invalidate();
            }
        }
    }

    /// Set how many trailing weeks are shown.  The full history is kept, so
    /// widening the window again brings back older weeks.
    pub(crate) fn set_window_weeks(&mut self, weeks: u8) -> Result<(), InvalidArgument> {
        if !(MIN_WINDOW_WEEKS..=MAX_WINDOW_WEEKS).contains(&weeks) {
            return Err(InvalidArgument::WindowWeeks(weeks));
        }
        self.config.window_weeks = weeks;
        self.invalidate();
        Ok(())
    }

    pub(crate) fn set_display_month_labels(&mut self, display: bool) {
        self.config.display_month_labels = display;
        self.invalidate();
    }

    /// Start fetching the history of `username`, abandoning any fetch still
    /// in flight.  The current history and username stay on display until
    /// the fetch succeeds.
    pub(crate) fn load_user(&mut self, username: &str) {
        debug!(username, "loading contributions");
        self.pending = Some(spawn_fetch(
            Arc::clone(&self.source),
            username,
            self.config.window_weeks,
        ));
        self.redraw_requested = true;
    }

    /// Fetch the displayed user's history again.  Returns `false` if no
    /// user has been loaded successfully.
    pub(crate) fn reload(&mut self) -> bool {
        match self.username.clone() {
            Some(username) => {
                self.load_user(&username);
                true
            }
            None => false,
        }
    }

    /// Apply the result of the pending fetch if it has finished.  Returns
    /// `None` if there is no fetch or it is still running.
    pub(crate) fn poll_fetch(&mut self) -> Option<Result<(), FetchError>> {
        let result = self.pending.as_ref()?.try_take()?;
        let pending = self.pending.take()?;
        Some(self.complete_fetch(pending.username(), result))
    }

    /// Block until the pending fetch finishes and apply its result.  Returns
    /// `None` if there is no fetch.
    pub(crate) fn wait_fetch(&mut self) -> Option<Result<(), FetchError>> {
        let pending = self.pending.take()?;
        let username = pending.username().to_owned();
        let result = pending.wait();
        Some(self.complete_fetch(&username, result))
    }

    fn complete_fetch(&mut self, username: &str, result: FetchResult) -> Result<(), FetchError> {
        // Ensure the loading indicator goes away whatever the outcome
        self.redraw_requested = true;
        match result {
            Ok(days) => {
                self.username = Some(username.to_owned());
                self.days = Some(days);
                self.invalidate();
                Ok(())
            }
            Err(e) => {
                warn!(username, error = %e, "failed to fetch contributions");
                Err(e)
            }
        }
    }

    /// Forget the current history
    pub(crate) fn clear(&mut self) {
        self.days = None;
        self.invalidate();
    }

    /// Lay out the current window for a canvas `canvas_width` wide.  Returns
    /// `None` if there is no history.
    pub(crate) fn layout(&mut self, canvas_width: f32) -> Option<&GridLayout> {
        let days = self.days.as_deref()?;
        let fresh = matches!(&self.cache, Some((width, _)) if width.to_bits() == canvas_width.to_bits());
        if !fresh {
            let window = trim(days, self.config.window_weeks);
            let grid = heatmap::layout(
                window,
                canvas_width,
                self.config.display_month_labels,
                self.config.base_color,
            );
            debug!(
                days = window.len(),
                columns = grid.columns,
                canvas_width,
                "laid out heatmap"
            );
            self.cache = Some((canvas_width, grid));
        }
        self.cache.as_ref().map(|(_, grid)| grid)
    }

    /// Redraw the whole heatmap on `surface`
    pub(crate) fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.redraw_requested = false;
        surface.clear(None);
        let text_color = self.config.text_color;
        if let Some(grid) = self.layout(surface.measure_clip_width()) {
            paint(grid, text_color, surface);
        }
    }

    pub(crate) fn take_redraw_request(&mut self) -> bool {
        mem::take(&mut self.redraw_requested)
    }
}
