use crate::config::{LayoutConfig, RenderConfig};
use crate::layout::{
    CalendarLayout, FillLayout, Layout, Orientation, TimelineLayout, ViewData, ViewState,
};
use crate::model::Milestone;
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Renders a computed layout to an SVG string. Pure consumer: nothing here
/// feeds back into layout decisions.
pub fn render_svg(
    layout: &Layout,
    state: &ViewState,
    theme: &Theme,
    config: &LayoutConfig,
) -> String {
    let mut svg = String::new();
    let width = layout.width.max(200.0);
    let height = layout.height.max(200.0);

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        theme.background
    );

    push_countdown_header(&mut svg, layout, theme, config);

    match &layout.data {
        ViewData::Fill(data) => push_fill_view(&mut svg, data, state, theme, config),
        ViewData::Calendar(data) => push_calendar_view(&mut svg, data, state, theme, config),
        ViewData::Timeline(data) => push_timeline_view(&mut svg, data, state, layout, theme, config),
    }

    svg.push_str("</svg>");
    svg
}

fn push_countdown_header(svg: &mut String, layout: &Layout, theme: &Theme, config: &LayoutConfig) {
    let countdown = &layout.countdown;
    let x = config.padding;
    let y = (config.padding * 0.75).max(theme.font_size);
    let _ = write!(
        svg,
        "<text x=\"{x:.2}\" y=\"{y:.2}\" font-family=\"{}\" font-size=\"{:.1}\" font-weight=\"600\" fill=\"{}\">{} days left</text>",
        theme.font_family,
        theme.font_size * 1.15,
        theme.text_color,
        countdown.days_remaining
    );
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{y:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}/{} days · {:.0}%</text>",
        layout.width - config.padding,
        theme.font_family,
        theme.font_size * 0.9,
        theme.muted_text_color,
        countdown.days_elapsed,
        countdown.days_total,
        countdown.fraction_elapsed * 100.0
    );
}

fn push_cell(
    svg: &mut String,
    x: f32,
    y: f32,
    size: f32,
    gap: f32,
    fill: &str,
    stroke: Option<&str>,
) {
    let inner = (size - gap).max(1.0);
    let stroke_attr = match stroke {
        Some(color) => format!(" stroke=\"{color}\" stroke-width=\"1.5\""),
        None => String::new(),
    };
    let _ = write!(
        svg,
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{inner:.2}\" height=\"{inner:.2}\" rx=\"2\" fill=\"{fill}\"{stroke_attr}/>",
    );
}

fn push_fill_view(
    svg: &mut String,
    data: &FillLayout,
    state: &ViewState,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let origin = config.padding;
    for index in 0..data.total_cells {
        let col = index % data.cols;
        let row = index / data.cols;
        let fill = if index < data.filled_cells {
            theme.cell_filled.as_str()
        } else {
            theme.cell_empty.as_str()
        };
        push_cell(
            svg,
            origin + col as f32 * data.cell_size,
            origin + row as f32 * data.cell_size,
            data.cell_size,
            data.cell_gap,
            fill,
            None,
        );
    }
    if let Some(today) = data.today_cell {
        push_cell(
            svg,
            origin + today.col as f32 * data.cell_size,
            origin + today.row as f32 * data.cell_size,
            data.cell_size,
            data.cell_gap,
            "none",
            Some(theme.today_color.as_str()),
        );
    }
    for entry in &data.milestone_cells {
        let milestone = &state.schedule.milestones[entry.source_idx];
        let stroke = if state.highlight == Some(entry.source_idx) {
            theme.highlight_ring.as_str()
        } else {
            theme.accent(milestone.color)
        };
        let x = origin + entry.cell.col as f32 * data.cell_size;
        let y = origin + entry.cell.row as f32 * data.cell_size;
        push_cell(svg, x, y, data.cell_size, data.cell_gap, "none", Some(stroke));
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{:.1}\">{}</text>",
            x + data.cell_size * 0.5,
            y + data.cell_size * 0.72,
            (data.cell_size * 0.55).min(theme.font_size * 1.2),
            escape_xml(&milestone.emoji)
        );
    }
}

fn push_calendar_view(
    svg: &mut String,
    data: &CalendarLayout,
    state: &ViewState,
    theme: &Theme,
    config: &LayoutConfig,
) {
    let origin = config.padding;
    for index in 0..data.total_days {
        let slot = data.lead_blanks + index;
        push_cell(
            svg,
            origin + (slot % 7) as f32 * data.cell_size,
            origin + (slot / 7) as f32 * data.cell_size,
            data.cell_size,
            data.cell_gap,
            theme.cell_empty.as_str(),
            None,
        );
    }
    for mark in &data.month_marks {
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"end\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            origin - 6.0,
            origin + mark.row as f32 * data.cell_size + data.cell_size * 0.7,
            theme.font_family,
            theme.font_size * 0.85,
            theme.muted_text_color,
            escape_xml(&mark.label)
        );
    }
    if let Some(today) = data.today_cell {
        push_cell(
            svg,
            origin + today.col as f32 * data.cell_size,
            origin + today.row as f32 * data.cell_size,
            data.cell_size,
            data.cell_gap,
            "none",
            Some(theme.today_color.as_str()),
        );
    }
    for entry in &data.milestone_cells {
        let milestone = &state.schedule.milestones[entry.source_idx];
        let stroke = if state.highlight == Some(entry.source_idx) {
            theme.highlight_ring.as_str()
        } else {
            theme.accent(milestone.color)
        };
        let x = origin + entry.cell.col as f32 * data.cell_size;
        let y = origin + entry.cell.row as f32 * data.cell_size;
        push_cell(svg, x, y, data.cell_size, data.cell_gap, "none", Some(stroke));
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{:.1}\">{}</text>",
            x + data.cell_size * 0.5,
            y + data.cell_size * 0.72,
            (data.cell_size * 0.55).min(theme.font_size * 1.2),
            escape_xml(&milestone.emoji)
        );
        if let Some(end) = entry.end_cell {
            push_cell(
                svg,
                origin + end.col as f32 * data.cell_size,
                origin + end.row as f32 * data.cell_size,
                data.cell_size,
                data.cell_gap,
                "none",
                Some(stroke),
            );
        }
    }
}

/// Axis-space to screen-space for the timeline view. `along` is a position
/// on the time axis, `out` a perpendicular offset away from it.
fn timeline_point(
    orientation: Orientation,
    config: &LayoutConfig,
    baseline: f32,
    along: f32,
    out: f32,
) -> (f32, f32) {
    match orientation {
        Orientation::Horizontal => (config.padding + along, baseline - out),
        Orientation::Vertical => (baseline + out, config.padding + along),
    }
}

fn push_timeline_view(
    svg: &mut String,
    data: &TimelineLayout,
    state: &ViewState,
    layout: &Layout,
    theme: &Theme,
    config: &LayoutConfig,
) {
    // Point chips live on one side of the axis, Gantt bars and labels on the
    // other.
    let baseline = match data.orientation {
        Orientation::Horizontal => layout.height * 0.55,
        Orientation::Vertical => layout.width * 0.3,
    };

    let (x1, y1) = timeline_point(data.orientation, config, baseline, 0.0, 0.0);
    let (x2, y2) = timeline_point(data.orientation, config, baseline, data.axis_len, 0.0);
    let _ = write!(
        svg,
        "<line x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\" stroke=\"{}\" stroke-width=\"2\"/>",
        theme.axis_color
    );

    for tick in &data.ticks {
        let len = if tick.major { 8.0 } else { 4.0 };
        let (tx1, ty1) = timeline_point(data.orientation, config, baseline, tick.position_px, 0.0);
        let (tx2, ty2) =
            timeline_point(data.orientation, config, baseline, tick.position_px, -len);
        let _ = write!(
            svg,
            "<line x1=\"{tx1:.2}\" y1=\"{ty1:.2}\" x2=\"{tx2:.2}\" y2=\"{ty2:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
            theme.axis_color
        );
        if tick.major {
            let (lx, ly) =
                timeline_point(data.orientation, config, baseline, tick.position_px, -22.0);
            let _ = write!(
                svg,
                "<text x=\"{lx:.2}\" y=\"{ly:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
                theme.font_family,
                theme.font_size * 0.85,
                theme.muted_text_color,
                escape_xml(&tick.label)
            );
        }
    }

    if let Some(today_px) = data.today_px {
        let (tx1, ty1) = timeline_point(data.orientation, config, baseline, today_px, -14.0);
        let (tx2, ty2) = timeline_point(data.orientation, config, baseline, today_px, 14.0);
        let _ = write!(
            svg,
            "<line x1=\"{tx1:.2}\" y1=\"{ty1:.2}\" x2=\"{tx2:.2}\" y2=\"{ty2:.2}\" stroke=\"{}\" stroke-width=\"2\" stroke-dasharray=\"3 3\"/>",
            theme.today_color
        );
    }

    for point in &data.points {
        let milestone = &state.schedule.milestones[point.source_idx];
        push_chip(
            svg,
            data,
            theme,
            config,
            baseline,
            point.position_px,
            point.offset_px,
            point.width_px,
            point.expanded,
            milestone,
            state.highlight == Some(point.source_idx),
        );
    }

    // Gantt bars on the far side of the axis from the point chips.
    for entry in &data.gantt {
        let milestone = &state.schedule.milestones[entry.source_idx];
        let out = -(config.bar_row_gap
            + entry.bar_lane as f32 * (config.bar_height + config.bar_row_gap)
            + config.bar_height);
        let (bx1, by1) =
            timeline_point(data.orientation, config, baseline, entry.bar_start_px, out);
        let (bx2, by2) = timeline_point(
            data.orientation,
            config,
            baseline,
            entry.bar_end_px,
            out + config.bar_height,
        );
        let (x, y) = (bx1.min(bx2), by1.min(by2));
        let (w, h) = ((bx2 - bx1).abs(), (by2 - by1).abs());
        let fill = theme.accent(milestone.color);
        let _ = write!(
            svg,
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"3\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1\"/>",
            theme.chip_border
        );
    }
    let bars_depth = config.bar_row_gap
        + data.bar_lane_count as f32 * (config.bar_height + config.bar_row_gap);
    for entry in &data.gantt {
        let milestone = &state.schedule.milestones[entry.source_idx];
        push_chip(
            svg,
            data,
            theme,
            config,
            baseline,
            entry.label_center_px,
            -(bars_depth + entry.label_offset_px + entry.label_width_px),
            entry.label_width_px,
            entry.label_expanded,
            milestone,
            state.highlight == Some(entry.source_idx),
        );
    }
}

fn push_chip(
    svg: &mut String,
    data: &TimelineLayout,
    theme: &Theme,
    config: &LayoutConfig,
    baseline: f32,
    along: f32,
    out: f32,
    width: f32,
    expanded: bool,
    milestone: &Milestone,
    highlighted: bool,
) {
    let extent = config.chip_extent;
    // Stem from the axis to the chip.
    let (sx1, sy1) = timeline_point(data.orientation, config, baseline, along, 0.0);
    let (sx2, sy2) = timeline_point(data.orientation, config, baseline, along, out);
    let _ = write!(
        svg,
        "<line x1=\"{sx1:.2}\" y1=\"{sy1:.2}\" x2=\"{sx2:.2}\" y2=\"{sy2:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        theme.axis_color
    );

    let (cx1, cy1) = timeline_point(
        data.orientation,
        config,
        baseline,
        along - extent * 0.5,
        out,
    );
    let (cx2, cy2) = timeline_point(
        data.orientation,
        config,
        baseline,
        along + extent * 0.5,
        out + width,
    );
    let (x, y) = (cx1.min(cx2), cy1.min(cy2));
    let (w, h) = ((cx2 - cx1).abs(), (cy2 - cy1).abs());
    let stroke = if highlighted {
        theme.highlight_ring.as_str()
    } else if milestone.high_priority() {
        theme.accent(milestone.color)
    } else {
        theme.chip_border.as_str()
    };
    let _ = write!(
        svg,
        "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{w:.2}\" height=\"{h:.2}\" rx=\"6\" fill=\"{}\" stroke=\"{stroke}\" stroke-width=\"1.2\"/>",
        theme.chip_background
    );
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-size=\"{:.1}\">{}</text>",
        x + config.collapsed_width * 0.5,
        y + h * 0.5 + theme.font_size * 0.35,
        theme.font_size,
        escape_xml(&milestone.emoji)
    );
    if expanded {
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.1}\" fill=\"{}\">{}</text>",
            x + config.collapsed_width + config.label_text_gap,
            y + h * 0.5 + theme.font_size * 0.35,
            theme.font_family,
            theme.font_size,
            theme.text_color,
            escape_xml(&milestone.label)
        );
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = "Inter".to_string();
    opt.default_size = usvg::Size::from_wh(render_cfg.width, render_cfg.height)
        .unwrap_or(usvg::Size::from_wh(800.0, 600.0).unwrap());

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires building with the 'png' feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
