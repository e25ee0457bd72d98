use crate::config::load_config;
use crate::layout::{ViewMode, ViewState, Viewport, compute_layout};
use crate::layout_dump::dump_json;
use crate::model::{Day, parse_schedule};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::text_metrics::{HeuristicTextMeasure, SystemTextMeasure, TextMeasure};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "runway",
    version,
    about = "Milestone countdown renderer (fill, calendar and timeline views)"
)]
pub struct Args {
    /// Milestone config JSON file or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file (svg/png/json). Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON5 file (theme variables and layout constants)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width", default_value_t = 1280.0)]
    pub width: f32,

    /// Height
    #[arg(short = 'H', long = "height", default_value_t = 800.0)]
    pub height: f32,

    /// Which view to render
    #[arg(long = "view", value_enum, default_value = "timeline")]
    pub view: ViewArg,

    /// Countdown reference date (YYYY-MM-DD); defaults to the system date
    #[arg(long = "today")]
    pub today: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
    Json,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum ViewArg {
    Fill,
    Calendar,
    Timeline,
}

impl From<ViewArg> for ViewMode {
    fn from(view: ViewArg) -> ViewMode {
        match view {
            ViewArg::Fill => ViewMode::Fill,
            ViewArg::Calendar => ViewMode::Calendar,
            ViewArg::Timeline => ViewMode::Timeline,
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    config.render.width = args.width;
    config.render.height = args.height;

    let input = read_input(args.input.as_deref())?;
    let schedule = parse_schedule(&input)?;
    let today = resolve_today(args.today.as_deref())?;

    let state = ViewState::new(schedule, args.view.into());
    let viewport = Viewport {
        width: config.render.width,
        height: config.render.height,
        today,
    };
    let measure = resolve_measure(&config.theme.font_family);
    let layout = compute_layout(
        &state,
        &viewport,
        &config.theme,
        &config.layout,
        measure.as_ref(),
    )?;

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &state, &config.theme, &config.layout);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let svg = render_svg(&layout, &state, &config.theme, &config.layout);
            let output = args
                .output
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("Output path required for png output"))?;
            write_output_png(&svg, output, &config.render)?;
        }
        OutputFormat::Json => {
            let dump = dump_json(&layout, &state.schedule)?;
            match args.output.as_deref() {
                Some(path) => std::fs::write(path, dump)?,
                None => println!("{dump}"),
            }
        }
    }

    Ok(())
}

/// Exact measurement when a face resolves for the theme's font stack; the
/// deterministic heuristic otherwise. One estimator for the whole pass.
fn resolve_measure(font_family: &str) -> Box<dyn TextMeasure> {
    match SystemTextMeasure::new(font_family) {
        Some(measure) => Box::new(measure),
        None => Box::new(HeuristicTextMeasure::default()),
    }
}

fn resolve_today(arg: Option<&str>) -> Result<Day> {
    if let Some(value) = arg {
        return Day::parse(value)
            .ok_or_else(|| anyhow::anyhow!("--today must be a YYYY-MM-DD date, got {value:?}"));
    }
    let secs = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)?
        .as_secs();
    Ok(Day::from_unix_days((secs / 86_400) as i32))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path == Path::new("-") {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            return Ok(buf);
        }
        return Ok(std::fs::read_to_string(path)?);
    }

    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn today_flag_parses_civil_dates() {
        let day = resolve_today(Some("2026-08-06")).expect("valid date");
        assert_eq!(day.to_string(), "2026-08-06");
        assert!(resolve_today(Some("yesterday")).is_err());
    }

    #[test]
    fn system_today_is_plausible() {
        let day = resolve_today(None).expect("system date");
        let (year, _, _) = day.year_month_day();
        assert!(year >= 2024, "system clock mapped to {day}");
    }

    #[test]
    fn view_args_map_onto_view_modes() {
        assert_eq!(ViewMode::from(ViewArg::Fill), ViewMode::Fill);
        assert_eq!(ViewMode::from(ViewArg::Timeline), ViewMode::Timeline);
    }
}
