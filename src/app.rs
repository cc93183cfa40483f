use crate::help::Help;
use crate::theme::{BASE_STYLE, ERROR_STYLE, HINT_STYLE, LOADING_STYLE, USERNAME_STYLE};
use crate::view::HeatmapView;
use crate::widget::Heatmap;
use crossterm::event::{self, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Margin, Rect},
    text::{Line, Span},
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::Duration;

/// How long to wait for input before checking on a running fetch
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub(crate) struct App {
    view: HeatmapView,
    state: AppState,
    // Set when the last fetch failed; cleared by a successful fetch or any
    // key press
    fetch_failed: bool,
}

impl App {
    pub(crate) fn new(view: HeatmapView) -> App {
        App {
            view,
            state: AppState::Heatmap,
            fetch_failed: false,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut dirty = true;
        while !self.quitting() {
            self.check_fetch();
            if self.view.take_redraw_request() || dirty {
                self.draw(terminal)?;
                dirty = false;
            }
            if event::poll(POLL_INTERVAL)? {
                self.handle_input()?;
                // Redraw on resize, and we might as well redraw on other
                // stuff too
                dirty = true;
            }
        }
        Ok(())
    }

    // A finished fetch raises a redraw request of its own, and failures have
    // already been logged
    fn check_fetch(&mut self) {
        match self.view.poll_fetch() {
            Some(Ok(())) => self.fetch_failed = false,
            Some(Err(_)) => self.fetch_failed = true,
            None => (),
        }
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event::read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key or asked for
    // something that can't be done
    fn handle_key(&mut self, key: KeyCode) -> bool {
        self.fetch_failed = false;
        match self.state {
            AppState::Heatmap => match key {
                KeyCode::Char('m') => {
                    let display = !self.view.config().display_month_labels;
                    self.view.set_display_month_labels(display);
                    true
                }
                KeyCode::Char('+' | '=') => self.resize_window(1),
                KeyCode::Char('-') => self.resize_window(-1),
                KeyCode::Char('r') => self.view.reload(),
                KeyCode::Char('c') => {
                    self.view.clear();
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Heatmap;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn resize_window(&mut self, delta: i8) -> bool {
        self.view
            .config()
            .window_weeks
            .checked_add_signed(delta)
            .is_some_and(|weeks| self.view.set_window_weeks(weeks).is_ok())
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn status_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", self.view.username().unwrap_or("(no user)")),
                USERNAME_STYLE,
            ),
            Span::raw(format!(
                "· {} days · {} weeks ",
                self.view.shown_days(),
                self.view.config().window_weeks
            )),
        ];
        if let Some(username) = self.view.loading_username() {
            spans.push(Span::styled(format!("· loading {username}… "), LOADING_STYLE));
        } else if self.fetch_failed {
            spans.push(Span::styled("· fetch failed ", ERROR_STYLE));
        }
        spans.push(Span::styled("· ? for help", HINT_STYLE));
        Line::from(spans).style(BASE_STYLE)
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [map_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Heatmap.render(map_area.inner(Margin::new(1, 1)), buf, &mut self.view);
        self.status_line().render(status_area, buf);
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Heatmap,
    Helping,
    Quitting,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::testing::days_from;
    use crate::heatmap::{ContributionDay, StandardColorParser};
    use crate::source::{ContributionSource, FetchError, FetchResult};
    use crate::theme::BACKGROUND;
    use ratatui::style::Color;
    use std::sync::Arc;
    use time::macros::date;

    #[derive(Debug)]
    struct Fixed(Vec<ContributionDay>);

    /// Knows everyone except "ghost"
    impl ContributionSource for Fixed {
        fn fetch(&self, username: &str, _window_weeks: u8) -> FetchResult {
            if username == "ghost" {
                Err(FetchError::Empty(username.to_owned()))
            } else {
                Ok(self.0.clone())
            }
        }
    }

    fn loaded_app() -> App {
        let days = days_from(date!(2023 - 01 - 01), 14);
        let mut view = HeatmapView::new(Arc::new(Fixed(days)), Box::new(StandardColorParser));
        view.load_user("octocat");
        view.wait_fetch().unwrap().unwrap();
        App::new(view)
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_owned())
            .collect()
    }

    #[test]
    fn test_render() {
        let mut app = loaded_app();
        // 14 days make 3 columns on a 30-wide canvas: 10 units per column,
        // 9 of them block
        let area = Rect::new(0, 0, 32, 10);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(
            row_text(&buffer, 9),
            " octocat · 14 days · 53 weeks · "
        );
        // The first Sunday sits at the top left of the heatmap, drawn as the
        // upper pixel of the first heatmap row
        let corner = buffer.cell((1, 1)).unwrap();
        assert_eq!(corner.symbol(), "▀");
        assert_eq!(corner.fg, Color::Rgb(0xEE, 0xEE, 0xEE));
        // Gap between the first and second columns
        let gap = buffer.cell((10, 1)).unwrap();
        assert_eq!(gap.fg, BACKGROUND);
        // Second column starts at 1 + 10
        let second = buffer.cell((11, 1)).unwrap();
        assert_ne!(second.fg, BACKGROUND);
    }

    #[test]
    fn test_help() {
        let mut app = loaded_app();
        assert!(app.handle_key(KeyCode::Char('?')));
        let area = Rect::new(0, 0, 60, 16);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        let text = (0..16).map(|y| row_text(&buffer, y)).collect::<Vec<_>>();
        assert!(text.iter().any(|row| row.contains(" Commands ")));
        assert!(text.iter().any(|row| row.contains("m               Toggle month labels")));
        assert!(app.handle_key(KeyCode::Char('x')));
        assert_eq!(app.state, AppState::Heatmap);
    }

    #[test]
    fn test_month_toggle() {
        let mut app = loaded_app();
        assert!(app.handle_key(KeyCode::Char('m')));
        assert!(app.view.config().display_month_labels);
        assert!(app.handle_key(KeyCode::Char('m')));
        assert!(!app.view.config().display_month_labels);
    }

    #[test]
    fn test_window_keys() {
        let mut app = loaded_app();
        assert!(!app.handle_key(KeyCode::Char('+')));
        assert_eq!(app.view.config().window_weeks, 53);
        assert!(app.handle_key(KeyCode::Char('-')));
        assert_eq!(app.view.config().window_weeks, 52);
        assert!(app.handle_key(KeyCode::Char('=')));
        assert_eq!(app.view.config().window_weeks, 53);
        app.view.set_window_weeks(2).unwrap();
        assert!(!app.handle_key(KeyCode::Char('-')));
        assert_eq!(app.view.config().window_weeks, 2);
    }

    #[test]
    fn test_clear_and_reload() {
        let mut app = loaded_app();
        assert!(app.handle_key(KeyCode::Char('c')));
        assert_eq!(app.view.shown_days(), 0);
        assert!(app.handle_key(KeyCode::Char('r')));
        assert_eq!(app.view.loading_username(), Some("octocat"));
        app.view.wait_fetch().unwrap().unwrap();
        assert_eq!(app.view.shown_days(), 14);
    }

    #[test]
    fn test_quit_and_invalid_keys() {
        let mut app = loaded_app();
        assert!(!app.handle_key(KeyCode::Char('z')));
        assert!(!app.quitting());
        assert!(app.handle_key(KeyCode::Esc));
        assert!(app.quitting());
        assert!(!app.handle_key(KeyCode::Char('q')));
    }

    fn finish_fetch(app: &mut App) {
        while app.view.loading_username().is_some() {
            app.check_fetch();
            std::thread::yield_now();
        }
    }

    #[test]
    fn test_failed_fetch_status() {
        let mut app = loaded_app();
        app.view.load_user("ghost");
        let area = Rect::new(0, 0, 60, 10);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(
            row_text(&buffer, 9),
            " octocat · 14 days · 53 weeks · loading ghost… · ? for help "
        );
        finish_fetch(&mut app);
        assert!(app.fetch_failed);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(
            row_text(&buffer, 9),
            " octocat · 14 days · 53 weeks · fetch failed · ? for help   "
        );
        assert_eq!(Some(buffer.cell((32, 9)).unwrap().fg), ERROR_STYLE.fg);
        // Any key dismisses the notice
        assert!(app.handle_key(KeyCode::Char('m')));
        assert!(!app.fetch_failed);
    }

    #[test]
    fn test_successful_fetch_clears_failure() {
        let mut app = loaded_app();
        app.view.load_user("ghost");
        finish_fetch(&mut app);
        assert!(app.fetch_failed);
        app.view.load_user("octocat");
        finish_fetch(&mut app);
        assert!(!app.fetch_failed);
        assert_eq!(app.view.username(), Some("octocat"));
    }
}
