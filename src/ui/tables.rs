use eframe::egui::{self, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::config;
use crate::data::aggregate::SummaryMetrics;
use crate::data::model::{Column, MovieRecord};

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

pub fn summary_metrics(ui: &mut Ui, summary: &SummaryMetrics) {
    let average = summary
        .average_rating
        .map_or_else(|| "–".to_string(), |r| format!("{r:.2}"));
    let metrics = [
        ("Total Movies", thousands(summary.total_movies as u64)),
        ("Total Votes", thousands(summary.total_votes)),
        ("Average IMDB Rating", average),
        ("Total Gross", format!("${}", thousands(summary.total_gross))),
    ];

    ui.columns(metrics.len(), |cols| {
        for (col, (label, value)) in cols.iter_mut().zip(metrics) {
            col.label(label);
            col.heading(value);
        }
    });
}

/// Format an integer with `,` thousands separators.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// ---------------------------------------------------------------------------
// Dataset table
// ---------------------------------------------------------------------------

/// Scrollable table of every selectable column.
pub fn dataset_table(ui: &mut Ui, records: &[MovieRecord]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(TableColumn::auto().at_least(60.0).clip(true), Column::ALL.len())
        .min_scrolled_height(0.0)
        .max_scroll_height(320.0)
        .header(20.0, |mut header| {
            for column in Column::ALL {
                header.col(|ui| {
                    ui.strong(column.header());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let record = &records[row.index()];
                for column in Column::ALL {
                    row.col(|ui| {
                        ui.label(cell_text(column, record));
                    });
                }
            });
        });
}

fn cell_text(column: Column, record: &MovieRecord) -> String {
    match column {
        Column::Gross => thousands(record.gross_revenue),
        Column::Overview if record.overview.chars().count() > 60 => {
            let short: String = record.overview.chars().take(60).collect();
            format!("{short}…")
        }
        _ => column.value(record).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Search results
// ---------------------------------------------------------------------------

/// Poster plus headline facts for each movie.
pub fn movies_with_posters(ui: &mut Ui, movies: &[&MovieRecord]) {
    for movie in movies {
        ui.horizontal(|ui: &mut Ui| {
            if !movie.poster_url.is_empty() {
                ui.add(
                    egui::Image::new(movie.poster_url.as_str())
                        .max_width(config::POSTER_WIDTH)
                        .corner_radius(4.0),
                );
            }
            ui.vertical(|ui: &mut Ui| {
                ui.strong(format!("{} ({})", movie.title, movie.released_year));
                ui.label(format!("IMDB Rating: {}", movie.imdb_rating));
                ui.label(format!("Genre: {}", movie.genres.join(", ")));
                ui.label(format!("Gross: ${}", thousands(movie.gross_revenue)));
            });
        });
        ui.separator();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::movie;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(825_532_764), "825,532,764");
    }

    #[test]
    fn test_long_overviews_are_shortened() {
        let mut m = movie("A", 2000, &["Drama"], 8.0, 1_000_000);
        m.overview = "x".repeat(100);
        assert_eq!(cell_text(Column::Overview, &m).chars().count(), 61);
        assert_eq!(cell_text(Column::Gross, &m), "1,000,000");
        assert_eq!(cell_text(Column::Genre, &m), "Drama");
    }
}
