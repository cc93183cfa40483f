mod app;
mod heatmap;
mod help;
mod source;
mod surface;
mod theme;
mod view;
mod widget;
use crate::app::App;
use crate::heatmap::StandardColorParser;
use crate::source::{ContributionSource, FileSource, SyntheticSource};
use crate::surface::SvgSurface;
use crate::view::HeatmapView;
use anyhow::{anyhow, Context};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use time::OffsetDateTime;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_SVG_WIDTH: f32 = 700.0;

#[derive(Clone, Debug, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Options {
    username: String,
    weeks: Option<u8>,
    color: Option<String>,
    text_color: Option<String>,
    months: bool,
    data_dir: Option<PathBuf>,
    demo: bool,
    svg: Option<PathBuf>,
    width: Option<f32>,
    log_file: Option<PathBuf>,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        let mut username = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('w') | Arg::Long("weeks") => opts.weeks = Some(parser.value()?.parse()?),
                Arg::Short('c') | Arg::Long("color") => {
                    opts.color = Some(parser.value()?.string()?);
                }
                Arg::Short('t') | Arg::Long("text-color") => {
                    opts.text_color = Some(parser.value()?.string()?);
                }
                Arg::Short('m') | Arg::Long("months") => opts.months = true,
                Arg::Short('d') | Arg::Long("data") => opts.data_dir = Some(parser.value()?.into()),
                Arg::Long("demo") => opts.demo = true,
                Arg::Long("svg") => opts.svg = Some(parser.value()?.into()),
                Arg::Long("width") => opts.width = Some(parser.value()?.parse()?),
                Arg::Short('l') | Arg::Long("log") => opts.log_file = Some(parser.value()?.into()),
                Arg::Value(value) if username.is_none() => username = Some(value.string()?),
                _ => return Err(arg.unexpected()),
            }
        }
        opts.username =
            username.ok_or_else(|| lexopt::Error::Custom("missing USERNAME argument".into()))?;
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => opts.run(),
            Command::Help => {
                println!("Usage: contribmap [options] <USERNAME>");
                println!();
                println!("Render a GitHub-style contributions heatmap");
                println!();
                println!("Options:");
                println!("  -w, --weeks <N>           Number of trailing weeks to show, 2-53 [default: 53]");
                println!("  -c, --color <COLOR>       Base block color [default: #d6e685]");
                println!("  -t, --text-color <COLOR>  Month label color [default: black]");
                println!("  -m, --months              Display month labels");
                println!("  -d, --data <DIR>          Directory holding <USERNAME>.txt histories [default: .]");
                println!("      --demo                Make up a history instead of reading one");
                println!("      --svg <FILE>          Write an SVG image instead of starting the viewer");
                println!("      --width <PX>          Width of the SVG image [default: 700]");
                println!("  -l, --log <FILE>          Append diagnostic logs to FILE");
                println!("  -h, --help                Display this help message and exit");
                println!("  -V, --version             Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

impl Options {
    fn run(self) -> anyhow::Result<()> {
        // Look up the local offset while this is still the only thread
        let source: Arc<dyn ContributionSource> = if self.demo {
            let today = OffsetDateTime::now_local()
                .context("failed to determine local date")?
                .date();
            Arc::new(SyntheticSource::new(today))
        } else {
            Arc::new(FileSource::new(
                self.data_dir.clone().unwrap_or_else(|| PathBuf::from(".")),
            ))
        };
        init_tracing(self.log_file.as_deref(), self.svg.is_none())?;
        let mut view = HeatmapView::new(source, Box::new(StandardColorParser));
        if let Some(weeks) = self.weeks {
            view.set_window_weeks(weeks).context("invalid --weeks")?;
        }
        if let Some(color) = &self.color {
            view.set_base_color_str(color);
        }
        if let Some(color) = &self.text_color {
            view.set_text_color_str(color);
        }
        view.set_display_month_labels(self.months);
        view.load_user(&self.username);
        match self.svg {
            Some(path) => export_svg(view, &path, self.width.unwrap_or(DEFAULT_SVG_WIDTH)),
            None => with_terminal(|mut terminal| {
                terminal.hide_cursor().context("failed to hide cursor")?;
                App::new(view).run(&mut terminal)?;
                Ok(())
            }),
        }
    }
}

fn export_svg(mut view: HeatmapView, path: &Path, width: f32) -> anyhow::Result<()> {
    if !(width.is_finite() && width > 0.0) {
        return Err(anyhow!("SVG width must be a positive number, got {width}"));
    }
    let requested = view.loading_username().unwrap_or_default().to_owned();
    if let Some(r) = view.wait_fetch() {
        r.with_context(|| format!("failed to load contributions for {requested}"))?;
    }
    let mut surface = SvgSurface::new(width);
    view.draw(&mut surface);
    if surface.is_blank() {
        warn!("no contributions to draw");
    }
    fs::write(path, surface.to_string())
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), days = view.shown_days(), "wrote heatmap");
    Ok(())
}

// The interactive viewer owns the terminal, so without a log file its
// diagnostics go nowhere.
fn init_tracing(log_file: Option<&Path>, interactive: bool) -> anyhow::Result<()> {
    if interactive && log_file.is_none() {
        return Ok(());
    }
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid RUST_LOG filter")?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    let result = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    result.map_err(|e| anyhow!("failed to set up logging: {e}"))
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
