use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    pub cell_gap: f32,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self { cell_gap: 2.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub cell_gap: f32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self { cell_gap: 3.0 }
    }
}

/// Every tunable constant of the layout pipeline. The historical variants of
/// the collapse heuristic differed only in these numbers, so they live here
/// rather than inside the algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Outer padding around every view, px.
    pub padding: f32,
    /// Fixed chip dimension along the time axis, px.
    pub chip_extent: f32,
    /// Width of an icon-only chip; the guaranteed fallback width.
    pub collapsed_width: f32,
    /// Gap between the icon disc and the label text inside a chip.
    pub label_text_gap: f32,
    /// Trailing padding inside an expanded chip.
    pub chip_pad_x: f32,
    /// Minimum clearance along the axis before two chips conflict.
    pub lane_conflict_gap: f32,
    /// Minimum clearance between chips along the perpendicular axis.
    pub label_gap: f32,
    /// Share of the cross-axis space budgeted to point-milestone chips.
    pub point_extent_ratio: f32,
    /// Share of the cross-axis space budgeted to Gantt labels.
    pub gantt_extent_ratio: f32,
    /// Gantt bar thickness, px.
    pub bar_height: f32,
    /// Clearance between bars sharing a row, px along the axis.
    pub bar_gap: f32,
    /// Vertical clearance between bar rows.
    pub bar_row_gap: f32,
    /// Minimum rendered bar length, px.
    pub bar_min_len: f32,
    /// Number of labeled axis ticks (fence posts: `tick_count + 1` labels).
    pub tick_count: usize,
    /// Windows at most this long also get unlabeled week marks.
    pub week_marks_max_days: i32,
    /// Collapse unaccented chips before accented ones.
    pub collapse_prefers_low_priority: bool,
    pub fill: FillConfig,
    pub calendar: CalendarConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding: 24.0,
            chip_extent: 28.0,
            collapsed_width: 30.0,
            label_text_gap: 6.0,
            chip_pad_x: 8.0,
            lane_conflict_gap: 10.0,
            label_gap: 8.0,
            point_extent_ratio: 0.55,
            gantt_extent_ratio: 0.35,
            bar_height: 10.0,
            bar_gap: 4.0,
            bar_row_gap: 6.0,
            bar_min_len: 14.0,
            tick_count: 6,
            week_marks_max_days: 120,
            collapse_prefers_low_priority: true,
            fill: FillConfig::default(),
            calendar: CalendarConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    background: Option<String>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    axis_color: Option<String>,
    chip_background: Option<String>,
    chip_border: Option<String>,
    cell_empty: Option<String>,
    cell_filled: Option<String>,
    today_color: Option<String>,
    highlight_ring: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    padding: Option<f32>,
    chip_extent: Option<f32>,
    collapsed_width: Option<f32>,
    label_text_gap: Option<f32>,
    chip_pad_x: Option<f32>,
    lane_conflict_gap: Option<f32>,
    label_gap: Option<f32>,
    point_extent_ratio: Option<f32>,
    gantt_extent_ratio: Option<f32>,
    bar_height: Option<f32>,
    bar_gap: Option<f32>,
    bar_row_gap: Option<f32>,
    bar_min_len: Option<f32>,
    tick_count: Option<usize>,
    week_marks_max_days: Option<i32>,
    collapse_prefers_low_priority: Option<bool>,
    fill_cell_gap: Option<f32>,
    calendar_cell_gap: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    width: Option<f32>,
    height: Option<f32>,
}

/// Loads a JSON5 config file over the defaults. A missing path just means
/// defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: ConfigFile = json5::from_str(&contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        if theme_name == "midnight" || theme_name == "dark" {
            config.theme = Theme::midnight();
        } else if theme_name == "modern" || theme_name == "light" {
            config.theme = Theme::modern();
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.axis_color {
            config.theme.axis_color = v;
        }
        if let Some(v) = vars.chip_background {
            config.theme.chip_background = v;
        }
        if let Some(v) = vars.chip_border {
            config.theme.chip_border = v;
        }
        if let Some(v) = vars.cell_empty {
            config.theme.cell_empty = v;
        }
        if let Some(v) = vars.cell_filled {
            config.theme.cell_filled = v;
        }
        if let Some(v) = vars.today_color {
            config.theme.today_color = v;
        }
        if let Some(v) = vars.highlight_ring {
            config.theme.highlight_ring = v;
        }
    }

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.padding {
            config.layout.padding = v;
        }
        if let Some(v) = layout.chip_extent {
            config.layout.chip_extent = v;
        }
        if let Some(v) = layout.collapsed_width {
            config.layout.collapsed_width = v;
        }
        if let Some(v) = layout.label_text_gap {
            config.layout.label_text_gap = v;
        }
        if let Some(v) = layout.chip_pad_x {
            config.layout.chip_pad_x = v;
        }
        if let Some(v) = layout.lane_conflict_gap {
            config.layout.lane_conflict_gap = v;
        }
        if let Some(v) = layout.label_gap {
            config.layout.label_gap = v;
        }
        if let Some(v) = layout.point_extent_ratio {
            config.layout.point_extent_ratio = v;
        }
        if let Some(v) = layout.gantt_extent_ratio {
            config.layout.gantt_extent_ratio = v;
        }
        if let Some(v) = layout.bar_height {
            config.layout.bar_height = v;
        }
        if let Some(v) = layout.bar_gap {
            config.layout.bar_gap = v;
        }
        if let Some(v) = layout.bar_row_gap {
            config.layout.bar_row_gap = v;
        }
        if let Some(v) = layout.bar_min_len {
            config.layout.bar_min_len = v;
        }
        if let Some(v) = layout.tick_count {
            config.layout.tick_count = v;
        }
        if let Some(v) = layout.week_marks_max_days {
            config.layout.week_marks_max_days = v;
        }
        if let Some(v) = layout.collapse_prefers_low_priority {
            config.layout.collapse_prefers_low_priority = v;
        }
        if let Some(v) = layout.fill_cell_gap {
            config.layout.fill.cell_gap = v;
        }
        if let Some(v) = layout.calendar_cell_gap {
            config.layout.calendar.cell_gap = v;
        }
    }

    if let Some(v) = parsed.width {
        config.render.width = v;
    }
    if let Some(v) = parsed.height {
        config.render.height = v;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_returns_defaults() {
        let config = load_config(None).expect("defaults");
        assert_eq!(config.layout.tick_count, 6);
        assert_eq!(config.render.width, 1280.0);
    }

    #[test]
    fn config_file_overrides_merge_over_defaults() {
        let dir = std::env::temp_dir().join("runway-config-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json5");
        std::fs::write(
            &path,
            r#"{
                // JSON5: comments and trailing commas are fine
                theme: "midnight",
                themeVariables: { fontSize: 15 },
                layout: { collapsedWidth: 36, tickCount: 4, },
                width: 900,
            }"#,
        )
        .unwrap();
        let config = load_config(Some(&path)).expect("config");
        assert_eq!(config.theme.font_size, 15.0);
        assert_eq!(config.theme.background, Theme::midnight().background);
        assert_eq!(config.layout.collapsed_width, 36.0);
        assert_eq!(config.layout.tick_count, 4);
        assert_eq!(config.layout.padding, 24.0);
        assert_eq!(config.render.width, 900.0);
        assert_eq!(config.render.height, 800.0);
    }
}
