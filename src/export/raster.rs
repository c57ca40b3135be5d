use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::Rgb;
use crate::figure::{Axis, Figure, Mark, Panel};
use crate::style::Style;

type DrawResult<T, DB> = Result<T, DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Font sizes are given in points; pixels = points * dpi / 72.
struct Scale {
    px_per_pt: f64,
}

impl Scale {
    fn px(&self, pt: f64) -> f64 {
        pt * self.px_per_pt
    }

    fn px_i32(&self, pt: f64) -> i32 {
        self.px(pt).round() as i32
    }

    fn px_u32(&self, pt: f64) -> u32 {
        self.px(pt).round().max(0.0) as u32
    }
}

fn rgba(c: Rgb) -> RGBAColor {
    RGBAColor(c.r, c.g, c.b, c.alpha_f64())
}

/// Register the bundled sans-serif face under the style's family name.
/// Registration overwrites, so repeated calls are harmless.
pub fn register_fonts(family: &str) -> Result<(), String> {
    plotters::style::register_font(family, FontStyle::Normal, epaint_default_fonts::UBUNTU_LIGHT)
        .map_err(|_| "invalid bundled font".to_string())
}

/// Rasterise a figure into an RGB buffer of `figure.pixel_size(dpi)`.
pub fn render_rgb(figure: &Figure, dpi: u32) -> Result<(u32, u32, Vec<u8>), String> {
    register_fonts(&figure.style.font_family)?;
    let (w, h) = figure.pixel_size(dpi);
    let mut buf = vec![0u8; w as usize * h as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buf, (w, h)).into_drawing_area();
        let scale = Scale {
            px_per_pt: dpi as f64 / 72.0,
        };
        draw_figure(&root, figure, &scale).map_err(|e| e.to_string())?;
        root.present().map_err(|e| e.to_string())?;
    }
    Ok((w, h, buf))
}

fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    scale: &Scale,
) -> DrawResult<(), DB> {
    let style = &figure.style;
    root.fill(&rgba(style.figure_background))?;

    let body = match &figure.title {
        Some(title) => root.titled(title, text_style(style, scale.px(style.font_size * 1.4)))?,
        None => root.clone(),
    };

    let areas = body.split_evenly((figure.rows.max(1), figure.cols.max(1)));
    for (area, panel) in areas.iter().zip(&figure.panels) {
        draw_panel(area, panel, style, scale)?;
    }

    if figure.figure_legend {
        draw_legend(root, &figure.legend_entries(), style, scale)?;
    }
    Ok(())
}

fn text_style<'a>(style: &'a Style, size_px: f64) -> TextStyle<'a> {
    (style.font_family.as_str(), size_px)
        .into_font()
        .color(&rgba(style.text))
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    style: &Style,
    scale: &Scale,
) -> DrawResult<(), DB> {
    let ((x0, x1), (y0, y1)) = panel.bounds();
    let label_font = text_style(style, scale.px(style.font_size));
    let desc_font = text_style(style, scale.px(style.font_size * 1.1));

    let x_label_area = if matches!(panel.x_axis, Axis::Categorical(_)) { 28.0 } else { 24.0 };
    let y_label_area = if matches!(panel.y_axis, Axis::Categorical(_)) { 70.0 } else { 36.0 };
    let desc = |label: &Option<String>| if label.is_some() { 14.0 } else { 0.0 };

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(scale.px_u32(6.0))
        .x_label_area_size(scale.px_u32(x_label_area + desc(&panel.x_label)))
        .y_label_area_size(scale.px_u32(y_label_area + desc(&panel.y_label)));
    if let Some(title) = &panel.title {
        builder.caption(title, desc_font.clone());
    }
    let mut chart = builder.build_cartesian_2d(x0..x1, y0..y1)?;

    if !panel.frameless {
        chart.plotting_area().fill(&rgba(style.panel_background))?;
    }

    {
        let no_label = |_: &f64| String::new();
        let grid = style.grid.filter(|_| !panel.frameless);
        let mut mesh = chart.configure_mesh();
        mesh.label_style(label_font.clone())
            .axis_desc_style(desc_font.clone())
            .light_line_style(&TRANSPARENT)
            .axis_style(&TRANSPARENT);
        match grid {
            Some(color) => {
                mesh.bold_line_style(&rgba(color));
            }
            None => {
                mesh.disable_mesh();
            }
        }
        let (area_w, area_h) = area.dim_in_pixel();
        if matches!(panel.x_axis, Axis::Categorical(_)) {
            mesh.disable_x_mesh().x_label_formatter(&no_label);
        } else {
            let spacing = scale.px(style.font_size * X_TICK_SPACING);
            mesh.x_labels(tick_count(area_w, spacing))
                .x_label_formatter(&tick_label);
        }
        if matches!(panel.y_axis, Axis::Categorical(_)) {
            mesh.disable_y_mesh().y_label_formatter(&no_label);
        } else {
            let spacing = scale.px(style.font_size * Y_TICK_SPACING);
            mesh.y_labels(tick_count(area_h, spacing))
                .y_label_formatter(&tick_label);
        }
        if let Some(label) = &panel.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &panel.y_label {
            mesh.y_desc(label.as_str());
        }
        mesh.draw()?;
    }

    for mark in &panel.marks {
        draw_mark(&mut chart, mark, style, scale)?;
    }

    // Categorical tick labels, placed in the area's own pixel space
    let (ox, oy) = area.get_base_pixel();
    let gap = scale.px_i32(4.0);
    if let Axis::Categorical(ticks) = &panel.x_axis {
        let font = label_font.pos(Pos::new(HPos::Center, VPos::Top));
        for (pos, label) in ticks {
            let (bx, by) = chart.backend_coord(&(*pos, y0));
            area.draw(&Text::new(label.as_str(), (bx - ox, by - oy + gap), font.clone()))?;
        }
    }
    if let Axis::Categorical(ticks) = &panel.y_axis {
        let font = label_font.pos(Pos::new(HPos::Right, VPos::Center));
        for (pos, label) in ticks {
            let (bx, by) = chart.backend_coord(&(x0, *pos));
            area.draw(&Text::new(label.as_str(), (bx - ox - gap, by - oy), font.clone()))?;
        }
    }

    if panel.legend {
        let plot = chart.plotting_area().strip_coord_spec();
        draw_legend(&plot, &panel.legend_entries(), style, scale)?;
    }
    Ok(())
}

/// Minimum distance between tick labels, in multiples of the font size.
const X_TICK_SPACING: f64 = 5.0;
const Y_TICK_SPACING: f64 = 2.5;

/// How many ticks fit along `pixels` with at least `spacing` between them.
fn tick_count(pixels: u32, spacing: f64) -> usize {
    if spacing <= 0.0 {
        return 2;
    }
    (pixels as f64 / spacing).floor().clamp(2.0, 10.0) as usize
}

/// Tick text with at most three decimals and no trailing zeros.
fn tick_label(value: &f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_mark<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    mark: &Mark,
    style: &Style,
    scale: &Scale,
) -> DrawResult<(), DB> {
    match mark {
        Mark::Bars { color, bars, .. } => {
            let fill = rgba(*color).filled();
            chart.draw_series(
                bars.iter()
                    .filter(|b| b.height > 0.0)
                    .map(|b| Rectangle::new([(b.x0, 0.0), (b.x1, b.height)], fill)),
            )?;
        }
        Mark::Boxes { items } => {
            let edge = rgba(Rgb::hex(0x3f3f3f)).stroke_width(scale.px_u32(1.0).max(1));
            for item in items {
                let (p, h, s) = (item.position, item.width / 2.0, &item.stats);
                chart.draw_series([
                    Rectangle::new([(p - h, s.q1), (p + h, s.q3)], rgba(item.color).filled()),
                    Rectangle::new([(p - h, s.q1), (p + h, s.q3)], edge),
                ])?;
                let cap = h / 2.0;
                chart.draw_series([
                    PathElement::new(vec![(p - h, s.median), (p + h, s.median)], edge),
                    PathElement::new(vec![(p, s.lower_whisker), (p, s.q1)], edge),
                    PathElement::new(vec![(p, s.q3), (p, s.upper_whisker)], edge),
                    PathElement::new(
                        vec![(p - cap, s.lower_whisker), (p + cap, s.lower_whisker)],
                        edge,
                    ),
                    PathElement::new(
                        vec![(p - cap, s.upper_whisker), (p + cap, s.upper_whisker)],
                        edge,
                    ),
                ])?;
                chart.draw_series(
                    s.fliers
                        .iter()
                        .map(|&f| Circle::new((p, f), scale.px_i32(2.5), edge)),
                )?;
            }
        }
        Mark::Cells { cells } => {
            chart.draw_series(cells.iter().map(|c| {
                Rectangle::new([(c.x0, c.y0), (c.x1, c.y1)], rgba(c.color).filled())
            }))?;
            let font_px = scale.px(style.font_size);
            for c in cells {
                if let Some(text) = &c.text {
                    let font = (style.font_family.as_str(), font_px)
                        .into_font()
                        .color(&rgba(c.text_color))
                        .pos(Pos::new(HPos::Center, VPos::Center));
                    chart.draw_series(std::iter::once(Text::new(
                        text.clone(),
                        ((c.x0 + c.x1) / 2.0, (c.y0 + c.y1) / 2.0),
                        font,
                    )))?;
                }
            }
        }
        Mark::Points {
            color,
            radius,
            points,
            ..
        } => {
            let fill = rgba(*color).filled();
            let r = scale.px_i32(*radius).max(1);
            chart.draw_series(points.iter().map(|&p| Circle::new(p, r, fill)))?;
        }
        Mark::Line {
            color,
            width,
            points,
            ..
        } => {
            let stroke = rgba(*color).stroke_width(scale.px_u32(*width).max(1));
            chart.draw_series(LineSeries::new(points.iter().copied(), stroke))?;
        }
    }
    Ok(())
}

/// Boxed legend in the top-right corner of `area`.
fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[(String, Rgb)],
    style: &Style,
    scale: &Scale,
) -> DrawResult<(), DB> {
    if entries.is_empty() {
        return Ok(());
    }
    let font = text_style(style, scale.px(style.font_size))
        .pos(Pos::new(HPos::Left, VPos::Center));
    let mut text_w = 0;
    for (label, _) in entries {
        let (w, _) = area.estimate_text_size(label, &font)?;
        text_w = text_w.max(w as i32);
    }

    let pad = scale.px_i32(4.0);
    let row_h = scale.px_i32(style.font_size * 1.5);
    let swatch = scale.px_i32(style.font_size);
    let box_w = pad * 3 + swatch + text_w;
    let box_h = pad * 2 + row_h * entries.len() as i32;
    let (area_w, _) = area.dim_in_pixel();
    let x0 = area_w as i32 - box_w - pad * 2;
    let y0 = pad * 2;

    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + box_w, y0 + box_h)],
        rgba(Rgb::WHITE.with_alpha(0.8)).filled(),
    ))?;
    area.draw(&Rectangle::new(
        [(x0, y0), (x0 + box_w, y0 + box_h)],
        rgba(Rgb::hex(0xcccccc)).stroke_width(1),
    ))?;
    for (i, (label, color)) in entries.iter().enumerate() {
        let cy = y0 + pad + row_h * i as i32 + row_h / 2;
        let sx = x0 + pad;
        area.draw(&Rectangle::new(
            [(sx, cy - swatch / 2), (sx + swatch, cy + swatch / 2)],
            rgba(*color).filled(),
        ))?;
        area.draw(&Text::new(label.as_str(), (sx + swatch + pad, cy), font.clone()))?;
    }
    Ok(())
}
