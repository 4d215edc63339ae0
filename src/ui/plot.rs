use std::f64::consts::TAU;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, Legend, Line, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::chart::{Chart, ChartData, PieSlice, SliceText};
use crate::color::{ColorMap, viridis_for};
use crate::config;
use crate::data::aggregate::{GroupRow, HistogramBin};
use crate::state::DashboardTables;

// ---------------------------------------------------------------------------
// Fixed dashboard charts
// ---------------------------------------------------------------------------

/// Render the fixed two-column visualization grid plus the insight charts.
pub fn dashboard_charts(ui: &mut Ui, tables: &DashboardTables) {
    ui.columns(2, |cols| {
        cols[0].strong("Top 10 Movies by Gross");
        viridis_bars(&mut cols[0], "top_grossing", &tables.top_grossing, "Gross Revenue");

        cols[0].strong("Top 20 Movie Genres");
        viridis_bars(&mut cols[0], "top_genres", &tables.top_genres, "Number of Movies");

        cols[1].strong("Box Office Earnings Over The Years");
        yearly_line(&mut cols[1], &tables.yearly_gross);

        cols[1].strong("Top 10 Directors by Average IMDb Rating");
        director_bars(&mut cols[1], &tables.top_directors);
    });

    ui.heading("Additional Insights");
    ui.strong("Genre Distribution");
    genre_bars(ui, &tables.genre_distribution, &tables.genre_colors);

    ui.strong("Rating Distribution");
    histogram_bars(ui, "rating_histogram", &tables.rating_histogram, "IMDB_Rating");
}

/// Vertical bars over categorical labels, coloured by value on Viridis.
fn viridis_bars(ui: &mut Ui, id: &str, rows: &[GroupRow], y_label: &str) {
    if rows.is_empty() {
        ui.label("No results");
        return;
    }
    let (min, max) = value_range(rows.iter().map(|r| r.value));
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new(i as f64, r.value)
                .width(0.7)
                .name(r.key.to_string())
                .fill(viridis_for(r.value, min, max))
        })
        .collect();
    let labels: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();

    Plot::new(id.to_string())
        .height(config::PLOT_HEIGHT)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn yearly_line(ui: &mut Ui, rows: &[GroupRow]) {
    if rows.is_empty() {
        ui.label("No results");
        return;
    }
    let points: PlotPoints = rows
        .iter()
        .filter_map(|r| Some([r.key.as_f64()?, r.value]))
        .collect();

    Plot::new("yearly_gross")
        .height(config::PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Gross Revenue")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(points).name("Gross").width(1.5));
        });
}

/// Horizontal bars, best director on top, with the rounded rating as text.
fn director_bars(ui: &mut Ui, rows: &[GroupRow]) {
    if rows.is_empty() {
        ui.label("No results");
        return;
    }
    let (min, max) = value_range(rows.iter().map(|r| r.value));
    let n = rows.len();
    // Row 0 is the best; draw it at the top.
    let labels: Vec<String> = rows.iter().rev().map(|r| r.key.to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            Bar::new((n - 1 - i) as f64, r.value)
                .width(0.7)
                .name(format!("{} ({:.2})", r.key, r.value))
                .fill(viridis_for(r.value, min, max))
        })
        .collect();

    Plot::new("top_directors")
        .height(config::PLOT_HEIGHT)
        .x_axis_label("Average IMDb Rating")
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
            for (i, r) in rows.iter().enumerate() {
                plot_ui.text(
                    Text::new(PlotPoint::new(r.value / 2.0, (n - 1 - i) as f64), format!("{:.2}", r.value))
                        .color(Color32::WHITE),
                );
            }
        });
}

fn genre_bars(ui: &mut Ui, rows: &[GroupRow], colors: &ColorMap) {
    if rows.is_empty() {
        ui.label("No results");
        return;
    }
    let labels: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
    let bars: Vec<Bar> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let name = r.key.to_string();
            Bar::new(i as f64, r.value)
                .width(0.7)
                .fill(colors.color_for(&name))
                .name(name)
        })
        .collect();

    Plot::new("genre_distribution")
        .height(config::PLOT_HEIGHT)
        .y_axis_label("Count")
        .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });
}

fn histogram_bars(ui: &mut Ui, id: &str, bins: &[HistogramBin], x_label: &str) {
    if bins.is_empty() {
        ui.label("No results");
        return;
    }
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.2}–{:.2}", b.start, b.end))
        })
        .collect();

    Plot::new(id.to_string())
        .height(config::PLOT_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label("Frequency")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

// ---------------------------------------------------------------------------
// User-built chart
// ---------------------------------------------------------------------------

/// Render a chart produced by the chart builder. `colors` covers
/// [`Chart::color_keys`].
pub fn chart(ui: &mut Ui, chart: &Chart, colors: &ColorMap) {
    if chart.is_empty() {
        ui.label("No results: no movies match the current filters.");
        return;
    }

    match &chart.data {
        ChartData::Bars { categories, series } => {
            let labels = categories.clone();
            let values: Vec<Vec<f64>> = series.iter().map(|s| s.values.clone()).collect();
            let bases = stack_bases(&values);
            let charts: Vec<BarChart> = series
                .iter()
                .zip(bases)
                .map(|(s, base)| {
                    let bars = s
                        .values
                        .iter()
                        .zip(base)
                        .enumerate()
                        .map(|(i, (&v, b))| {
                            Bar::new(i as f64, v)
                                .base_offset(b)
                                .width(0.7)
                                .name(&categories[i])
                        })
                        .collect();
                    BarChart::new(bars).name(&s.name).color(colors.color_for(&s.name))
                })
                .collect();

            base_plot(chart)
                .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
                .show(ui, |plot_ui| {
                    for bar_chart in charts {
                        plot_ui.bar_chart(bar_chart);
                    }
                });
        }
        ChartData::Points { series } => {
            base_plot(chart).show(ui, |plot_ui| {
                for s in series {
                    let points: PlotPoints = s.values.iter().copied().collect();
                    plot_ui.points(
                        Points::new(points)
                            .name(&s.name)
                            .color(colors.color_for(&s.name))
                            .radius(3.0),
                    );
                }
            });
        }
        ChartData::Histogram { edges, series } => {
            let counts: Vec<Vec<f64>> = series
                .iter()
                .map(|s| s.values.iter().map(|&c| c as f64).collect())
                .collect();
            let bases = stack_bases(&counts);
            let charts: Vec<BarChart> = series
                .iter()
                .zip(counts.iter().zip(bases))
                .map(|(s, (values, base))| {
                    let bars = edges
                        .iter()
                        .zip(values)
                        .zip(base)
                        .map(|((&(start, end), &count), b)| {
                            Bar::new((start + end) / 2.0, count)
                                .base_offset(b)
                                .width(end - start)
                                .name(format!("{start:.2}–{end:.2}"))
                        })
                        .collect();
                    BarChart::new(bars).name(&s.name).color(colors.color_for(&s.name))
                })
                .collect();
            base_plot(chart).show(ui, |plot_ui| {
                for bar_chart in charts {
                    plot_ui.bar_chart(bar_chart);
                }
            });
        }
        ChartData::Boxes { categories, series } => {
            let labels = categories.clone();
            let n_series = series.len().max(1) as f64;
            let box_width = 0.8 / n_series;
            base_plot(chart)
                .x_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
                .show(ui, |plot_ui| {
                    for (s_idx, s) in series.iter().enumerate() {
                        let color = colors.color_for(&s.name);
                        // Side-by-side boxes within each category slot.
                        let offset = (s_idx as f64 + 0.5) * box_width - 0.4;
                        let elems: Vec<BoxElem> = s
                            .values
                            .iter()
                            .enumerate()
                            .filter_map(|(c, stats)| {
                                let st = (*stats)?;
                                Some(
                                    BoxElem::new(
                                        c as f64 + offset,
                                        BoxSpread::new(st.lower_whisker, st.q1, st.median, st.q3, st.upper_whisker),
                                    )
                                    .name(&categories[c])
                                    .box_width(box_width * 0.9)
                                    .fill(color.gamma_multiply(0.4))
                                    .stroke(Stroke::new(1.5, color)),
                                )
                            })
                            .collect();
                        plot_ui.box_plot(BoxPlot::new(elems).name(&s.name).color(color));
                    }
                });
        }
        ChartData::Pie { slices } => {
            let text = chart.slice_text;
            Plot::new("custom_chart_pie")
                .height(config::PLOT_HEIGHT * 1.5)
                .legend(Legend::default())
                .data_aspect(1.0)
                .show_axes(false)
                .show_grid(false)
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    let mut start = 0.0;
                    for slice in slices {
                        let sweep = slice.fraction * TAU;
                        if sweep <= 0.0 {
                            continue;
                        }
                        let color = colors.color_for(&slice.group);
                        plot_ui.polygon(
                            Polygon::new(wedge(start, sweep))
                                .name(&slice.group)
                                .fill_color(color)
                                .stroke(Stroke::new(1.0, Color32::BLACK)),
                        );
                        if let Some(text) = text {
                            let (pos, label) = slice_label(slice, start, sweep, text);
                            plot_ui.text(Text::new(pos, label).color(Color32::WHITE));
                        }
                        start += sweep;
                    }
                });
        }
    }
}

fn base_plot(chart: &Chart) -> Plot<'static> {
    Plot::new("custom_chart")
        .height(config::PLOT_HEIGHT * 1.5)
        .legend(Legend::default())
        .x_axis_label(chart.x_label.clone())
        .y_axis_label(chart.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

// -- helpers --

/// Base offset of every value when each series is stacked on the ones
/// before it.
fn stack_bases(series: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = series.iter().map(Vec::len).max().unwrap_or(0);
    let mut running = vec![0.0; width];
    series
        .iter()
        .map(|values| {
            let base = running[..values.len()].to_vec();
            for (total, v) in running.iter_mut().zip(values) {
                *total += v;
            }
            base
        })
        .collect()
}

/// Label for an integer grid mark on a categorical axis; blank elsewhere.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)))
}

/// Closed polygon for a pie wedge of unit radius.
fn wedge(start: f64, sweep: f64) -> Vec<[f64; 2]> {
    let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        // Clockwise from twelve o'clock.
        let angle = std::f64::consts::FRAC_PI_2 - (start + sweep * i as f64 / steps as f64);
        points.push([angle.cos(), angle.sin()]);
    }
    points
}

fn slice_label(slice: &PieSlice, start: f64, sweep: f64, text: SliceText) -> (PlotPoint, String) {
    let mid = std::f64::consts::FRAC_PI_2 - (start + sweep / 2.0);
    let radius = if text.inside { 0.62 } else { 1.15 };
    let pos = PlotPoint::new(radius * mid.cos(), radius * mid.sin());

    let percent = format!("{:.1}%", slice.fraction * 100.0);
    let label = match (text.show_label, text.show_percent) {
        (true, true) => format!("{}\n{percent}", slice.label),
        (true, false) => slice.label.clone(),
        (false, true) => percent,
        (false, false) => String::new(),
    };
    (pos, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_label_only_on_integer_marks() {
        let labels = vec!["Action".to_string(), "Drama".to_string()];
        assert_eq!(category_label(&labels, 1.0), "Drama");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 7.0), "");
    }

    #[test]
    fn test_stack_bases_accumulate_series() {
        let series = vec![vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0], vec![5.0, 5.0, 5.0]];
        let bases = stack_bases(&series);
        assert_eq!(bases[0], vec![0.0, 0.0, 0.0]);
        assert_eq!(bases[1], vec![1.0, 2.0, 3.0]);
        assert_eq!(bases[2], vec![11.0, 22.0, 33.0]);
        assert!(stack_bases(&[]).is_empty());
    }

    #[test]
    fn test_wedge_starts_at_center() {
        let points = wedge(0.0, TAU / 4.0);
        assert_eq!(points[0], [0.0, 0.0]);
        let first = points[1];
        assert!((first[0] - 0.0).abs() < 1e-12 && (first[1] - 1.0).abs() < 1e-12);
        let last = points[points.len() - 1];
        assert!((last[0] - 1.0).abs() < 1e-12 && last[1].abs() < 1e-12);
    }

    #[test]
    fn test_inside_slice_label_shows_percent_and_label() {
        let slice = PieSlice {
            label: "Nolan".into(),
            value: 500.0,
            fraction: 0.5,
            group: "Nolan".into(),
        };
        let text = SliceText {
            inside: true,
            show_percent: true,
            show_label: true,
        };
        let (pos, label) = slice_label(&slice, 0.0, TAU / 2.0, text);
        assert_eq!(label, "Nolan\n50.0%");
        assert!(pos.x > 0.0 && pos.x < 1.0);
    }
}
