#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod layout;
pub mod layout_dump;
pub mod model;
pub mod render;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, load_config};
pub use layout::{
    Layout, LayoutError, LayoutResult, ViewMode, ViewState, Viewport, compute_layout,
};
pub use model::{ColorToken, ConfigError, Day, Milestone, Schedule, parse_schedule};
pub use render::render_svg;
pub use text_metrics::{HeuristicTextMeasure, SystemTextMeasure, TextMeasure};
pub use theme::Theme;
