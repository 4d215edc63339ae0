use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartKind;
use crate::data::model::Column;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters and chart builder
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Filters");
            ui.separator();
            genre_filter(ui, state);
            ui.separator();
            range_filters(ui, state);
            ui.separator();

            ui.heading("Chart Builder");
            ui.separator();
            chart_builder(ui, state);
        });
}

fn genre_filter(ui: &mut Ui, state: &mut AppState) {
    // The genre list is read while state is mutated.
    let dataset = state.dataset.clone();
    let n_selected = state.filters.genres.len();
    let header_text = format!("Genres  ({n_selected}/{})", dataset.genres.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt("genre_filter")
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_genres();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_genres();
                }
            });

            let colors = state.tables.genre_colors.clone();
            for genre in &dataset.genres {
                let mut checked = state.filters.genres.contains(genre);
                let text = RichText::new(genre).color(colors.color_for(genre));
                if ui.checkbox(&mut checked, text).changed() {
                    state.toggle_genre(genre);
                }
            }
        });
}

fn range_filters(ui: &mut Ui, state: &mut AppState) {
    let dataset = state.dataset.clone();

    if let Some((lo, hi)) = dataset.year_bounds {
        ui.strong("Released Year");
        let (mut from, mut to) = state.filters.years;
        let changed = ui.add(egui::Slider::new(&mut from, lo..=hi).text("from")).changed()
            | ui.add(egui::Slider::new(&mut to, lo..=hi).text("to")).changed();
        if changed {
            state.set_year_range(from, to);
        }
    }

    if let Some((lo, hi)) = dataset.rating_bounds {
        ui.strong("IMDB Rating");
        let (mut from, mut to) = state.filters.ratings;
        let changed = ui
            .add(egui::Slider::new(&mut from, lo..=hi).step_by(0.1).max_decimals(1).text("from"))
            .changed()
            | ui
                .add(egui::Slider::new(&mut to, lo..=hi).step_by(0.1).max_decimals(1).text("to"))
                .changed();
        if changed {
            state.set_rating_range(from, to);
        }
    }

    ui.label(format!(
        "{} of {} movies match",
        state.visible_indices.len(),
        dataset.len()
    ));
}

fn chart_builder(ui: &mut Ui, state: &mut AppState) {
    let request = &mut state.chart_request;

    egui::ComboBox::from_label("Chart type")
        .selected_text(request.kind.label())
        .show_ui(ui, |ui: &mut Ui| {
            for kind in ChartKind::ALL {
                ui.selectable_value(&mut request.kind, kind, kind.label());
            }
        });

    column_selector(ui, "X-Axis", &mut request.x);
    if request.kind.uses_y() {
        column_selector(ui, "Y-Axis", &mut request.y);
    }
    column_selector(ui, "Color (Optional)", &mut request.color);

    // Validate as soon as the selection changes, before anything is drawn.
    let validation = request.validate();
    if let Err(e) = &validation {
        ui.label(RichText::new(e.to_string()).color(Color32::YELLOW));
    }

    if ui
        .add_enabled(validation.is_ok(), egui::Button::new("Create Chart"))
        .clicked()
    {
        state.create_chart();
    }

    if let Some(msg) = &state.status_message {
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

fn column_selector(ui: &mut Ui, label: &str, selected: &mut Option<Column>) {
    let text = selected.map_or_else(|| "None".to_string(), |c| c.to_string());
    egui::ComboBox::from_label(label)
        .selected_text(text)
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(selected, None, "None");
            for column in Column::ALL {
                ui.selectable_value(selected, Some(column), column.header());
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top bar with the dataset size.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(crate::config::WINDOW_TITLE);
        ui.separator();
        ui.label(format!(
            "{} movies loaded, {} match the filters",
            state.dataset.len(),
            state.visible_indices.len()
        ));
    });
}

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the scrolling dashboard body.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "This dashboard allows you to visualize and explore a movie dataset. \
                 Use the filters in the sidebar to create various types of charts.",
            );

            ui.add_space(8.0);
            ui.heading("Summary Metrics");
            super::tables::summary_metrics(ui, &state.tables.summary);

            ui.add_space(8.0);
            ui.heading("Dataset");
            super::tables::dataset_table(ui, &state.dataset.records);

            ui.add_space(8.0);
            search_section(ui, state);

            ui.add_space(8.0);
            ui.heading("Visualizations");
            super::plot::dashboard_charts(ui, &state.tables);

            if let Some(chart) = &state.chart {
                ui.add_space(8.0);
                ui.heading(&chart.title);
                super::plot::chart(ui, chart, &state.chart_colors);
            }
        });
}

fn search_section(ui: &mut Ui, state: &mut AppState) {
    let mut query = state.search_query.clone();
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Search for a movie");
        if ui.text_edit_singleline(&mut query).changed() {
            state.set_search_query(&query);
        }
    });

    if !state.is_searching() {
        return;
    }
    let results = state.search_results();
    if results.is_empty() {
        ui.label(format!("No movies found for '{}'", state.search_query.trim()));
    } else {
        ui.heading(format!("Search Results for '{}'", state.search_query.trim()));
        super::tables::movies_with_posters(ui, &results);
    }
}
