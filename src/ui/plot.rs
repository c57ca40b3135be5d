use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_extras::{Size, StripBuilder};
use egui_plot::{
    Bar as PlotBar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint,
    PlotPoints, PlotUi, Points, Polygon, Text,
};

use crate::color::Rgb;
use crate::figure::{Axis, Figure, Mark, Panel};
use crate::plots::PlotName;
use crate::state::AppState;

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgba_unmultiplied(c.r, c.g, c.b, c.a)
}

// ---------------------------------------------------------------------------
// Figure view (central panel)
// ---------------------------------------------------------------------------

/// Render the selected figure as a grid of plots.
pub fn figure_view(ui: &mut Ui, state: &AppState) {
    let Some((name, figure)) = state.selected_figure() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No figures to show");
        });
        return;
    };

    ui.painter()
        .rect_filled(ui.max_rect(), 0.0, color32(figure.style.figure_background));

    StripBuilder::new(ui)
        .sizes(Size::remainder(), figure.rows)
        .vertical(|mut strip| {
            for row in 0..figure.rows {
                strip.strip(|builder| {
                    builder
                        .sizes(Size::remainder(), figure.cols)
                        .horizontal(|mut strip| {
                            for col in 0..figure.cols {
                                strip.cell(|ui: &mut Ui| {
                                    panel_plot(ui, name, figure, row, col);
                                });
                            }
                        });
                });
            }
        });
}

fn panel_plot(ui: &mut Ui, name: PlotName, figure: &Figure, row: usize, col: usize) {
    let panel = figure.panel(row, col);
    let style = &figure.style;
    let x_categorical = matches!(panel.x_axis, Axis::Categorical(_));
    let y_categorical = matches!(panel.y_axis, Axis::Categorical(_));

    let mut plot = Plot::new((name.as_str(), row, col))
        .show_grid(style.grid.is_some() && !panel.frameless)
        .show_axes([!x_categorical, !y_categorical])
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);
    if panel.legend || figure.figure_legend {
        plot = plot.legend(Legend::default());
    }
    if let Some(label) = &panel.x_label {
        plot = plot.x_axis_label(label.as_str());
    }
    if let Some(label) = &panel.y_label {
        plot = plot.y_axis_label(label.as_str());
    }

    plot.show(ui, |plot_ui| {
        for mark in &panel.marks {
            draw_mark(plot_ui, mark);
        }
        category_labels(plot_ui, panel, color32(style.text));
    });
}

fn draw_mark(plot_ui: &mut PlotUi, mark: &Mark) {
    match mark {
        Mark::Bars { label, color, bars } => {
            let bars = bars
                .iter()
                .map(|b| {
                    PlotBar::new((b.x0 + b.x1) / 2.0, b.height)
                        .width(b.x1 - b.x0)
                        .fill(color32(*color))
                })
                .collect();
            let mut chart = BarChart::new(bars).color(color32(*color));
            if let Some(label) = label {
                chart = chart.name(label);
            }
            plot_ui.bar_chart(chart);
        }
        Mark::Boxes { items } => {
            let elems = items
                .iter()
                .map(|item| {
                    let s = &item.stats;
                    BoxElem::new(
                        item.position,
                        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                    )
                    .box_width(item.width)
                    .whisker_width(item.width / 2.0)
                    .fill(color32(item.color))
                    .stroke(Stroke::new(1.0, Color32::DARK_GRAY))
                    .name(&item.label)
                })
                .collect();
            plot_ui.box_plot(BoxPlot::new(elems));

            let fliers: PlotPoints = items
                .iter()
                .flat_map(|item| item.stats.fliers.iter().map(|&f| [item.position, f]))
                .collect();
            plot_ui.points(Points::new(fliers).radius(2.5).color(Color32::DARK_GRAY));
        }
        Mark::Cells { cells } => {
            for c in cells {
                let corners: PlotPoints = vec![
                    [c.x0, c.y0],
                    [c.x1, c.y0],
                    [c.x1, c.y1],
                    [c.x0, c.y1],
                ]
                .into();
                let fill = color32(c.color);
                plot_ui.polygon(
                    Polygon::new(corners)
                        .fill_color(fill)
                        .stroke(Stroke::new(0.0, fill)),
                );
                if let Some(text) = &c.text {
                    let center = PlotPoint::new((c.x0 + c.x1) / 2.0, (c.y0 + c.y1) / 2.0);
                    plot_ui.text(Text::new(
                        center,
                        RichText::new(text).color(color32(c.text_color)),
                    ));
                }
            }
        }
        Mark::Points {
            label,
            color,
            radius,
            points,
        } => {
            let series: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
            let mut pts = Points::new(series)
                .radius(*radius as f32)
                .color(color32(*color));
            if let Some(label) = label {
                pts = pts.name(label);
            }
            plot_ui.points(pts);
        }
        Mark::Line {
            label,
            color,
            width,
            points,
        } => {
            let series: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
            let mut line = Line::new(series).color(color32(*color)).width(*width as f32);
            if let Some(label) = label {
                line = line.name(label);
            }
            plot_ui.line(line);
        }
    }
}

/// egui_plot axes are numeric only, so category names are drawn as text
/// just outside the data.
fn category_labels(plot_ui: &mut PlotUi, panel: &Panel, color: Color32) {
    let ((x0, x1), (y0, y1)) = panel.bounds();
    if let Axis::Categorical(ticks) = &panel.x_axis {
        let y = y0 - (y1 - y0) * 0.02;
        for (pos, label) in ticks {
            plot_ui.text(
                Text::new(PlotPoint::new(*pos, y), RichText::new(label).color(color))
                    .anchor(Align2::CENTER_TOP),
            );
        }
    }
    if let Axis::Categorical(ticks) = &panel.y_axis {
        let x = x0 - (x1 - x0) * 0.02;
        for (pos, label) in ticks {
            plot_ui.text(
                Text::new(PlotPoint::new(x, *pos), RichText::new(label).color(color))
                    .anchor(Align2::RIGHT_CENTER),
            );
        }
    }
}
