use std::sync::Arc;

use crate::chart::{Chart, ChartRequest, create_chart};
use crate::color::ColorMap;
use crate::config;
use crate::data::aggregate::{
    AggregateError, GroupRow, HistogramBin, SummaryMetrics, genre_distribution, rating_histogram,
    top_genres, top_grossing_titles, top_rated_directors, yearly_gross,
};
use crate::data::filter::{FilterState, genre_year_rating_filter, init_filter_state, title_search};
use crate::data::model::{MovieDataset, MovieRecord};

// ---------------------------------------------------------------------------
// Fixed dashboard tables
// ---------------------------------------------------------------------------

/// Aggregates shown in the fixed dashboard sections. They are computed over
/// the full dataset, which never changes, so they are built once.
#[derive(Debug, Clone)]
pub struct DashboardTables {
    pub summary: SummaryMetrics,
    pub top_grossing: Vec<GroupRow>,
    pub yearly_gross: Vec<GroupRow>,
    pub top_genres: Vec<GroupRow>,
    pub top_directors: Vec<GroupRow>,
    pub genre_distribution: Vec<GroupRow>,
    pub rating_histogram: Vec<HistogramBin>,
    /// One colour per genre, shared by every genre chart.
    pub genre_colors: ColorMap,
}

impl DashboardTables {
    pub fn compute(dataset: &MovieDataset) -> Result<Self, AggregateError> {
        let all = dataset.all();
        Ok(Self {
            summary: SummaryMetrics::compute(&all),
            top_grossing: top_grossing_titles(&all)?,
            yearly_gross: yearly_gross(&all)?,
            top_genres: top_genres(&all)?,
            top_directors: top_rated_directors(&all)?,
            genre_distribution: genre_distribution(&all)?,
            rating_histogram: rating_histogram(&all, config::HISTOGRAM_BINS),
            genre_colors: ColorMap::new(&dataset.genres),
        })
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Cleaned dataset, shared read-only.
    pub dataset: Arc<MovieDataset>,

    pub tables: DashboardTables,

    /// Sidebar genre / year / rating selections.
    pub filters: FilterState,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    pub search_query: String,

    /// Indices of records matching `search_query` (cached).
    pub search_indices: Vec<usize>,

    /// Chart kind and column selectors.
    pub chart_request: ChartRequest,

    /// Last chart created with "Create Chart".
    pub chart: Option<Chart>,

    /// Colours for the series / slices of `chart`.
    pub chart_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(dataset: Arc<MovieDataset>) -> Result<Self, AggregateError> {
        let tables = DashboardTables::compute(&dataset)?;
        let filters = init_filter_state(&dataset);
        let visible_indices = (0..dataset.len()).collect();
        Ok(Self {
            dataset,
            tables,
            filters,
            visible_indices,
            search_query: String::new(),
            search_indices: Vec::new(),
            chart_request: ChartRequest::default(),
            chart: None,
            chart_colors: ColorMap::new::<String>(&[]),
            status_message: None,
        })
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        self.visible_indices = genre_year_rating_filter(&self.dataset.records, &self.filters);
        log::debug!(
            "{} of {} movies pass the filters",
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Records passing the current filters.
    pub fn visible_records(&self) -> Vec<&MovieRecord> {
        self.dataset.select(&self.visible_indices)
    }

    /// Toggle a single genre in the genre filter.
    pub fn toggle_genre(&mut self, genre: &str) {
        if !self.filters.genres.remove(genre) {
            self.filters.genres.insert(genre.to_string());
        }
        self.refilter();
    }

    /// Select every genre.
    pub fn select_all_genres(&mut self) {
        self.filters.genres = self.dataset.genres.iter().cloned().collect();
        self.refilter();
    }

    /// Deselect every genre.
    pub fn select_no_genres(&mut self) {
        self.filters.genres.clear();
        self.refilter();
    }

    /// Set the year range; a reversed range is swapped.
    pub fn set_year_range(&mut self, from: i32, to: i32) {
        self.filters.years = (from.min(to), from.max(to));
        self.refilter();
    }

    /// Set the rating range; a reversed range is swapped. Bounds are snapped
    /// to the one-decimal precision of IMDb ratings.
    pub fn set_rating_range(&mut self, from: f64, to: f64) {
        let (from, to) = (round_rating(from), round_rating(to));
        self.filters.ratings = (from.min(to), from.max(to));
        self.refilter();
    }

    /// Update the search box. An empty (or blank) query clears the results.
    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
        self.search_indices = if query.trim().is_empty() {
            Vec::new()
        } else {
            title_search(&self.dataset.records, query)
        };
    }

    /// Whether a non-blank search is active.
    pub fn is_searching(&self) -> bool {
        !self.search_query.trim().is_empty()
    }

    /// Records matching the current search.
    pub fn search_results(&self) -> Vec<&MovieRecord> {
        self.dataset.select(&self.search_indices)
    }

    /// Build the requested chart from the filtered view.
    ///
    /// On invalid selectors the previous chart is cleared and the error is
    /// kept in `status_message`.
    pub fn create_chart(&mut self) {
        let result = create_chart(&self.visible_records(), &self.chart_request);
        match result {
            Ok(chart) => {
                log::info!("Created {} '{}'", chart.kind, chart.title);
                self.chart_colors = ColorMap::new(&chart.color_keys());
                self.chart = Some(chart);
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Chart request rejected: {e}");
                self.chart = None;
                self.status_message = Some(e.to_string());
            }
        }
    }
}

fn round_rating(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartKind;
    use crate::data::fixtures::movie;
    use crate::data::model::Column;
    use eframe::egui::Color32;

    fn state() -> AppState {
        let ds = MovieDataset::from_records(vec![
            movie("The Dark Knight", 2008, &["Action", "Crime", "Drama"], 9.0, 534_858_444),
            movie("Batman Begins", 2005, &["Action", "Adventure"], 8.2, 206_852_432),
            movie("Casablanca", 1942, &["Drama", "Romance", "War"], 8.5, 1_024_560),
        ]);
        AppState::new(Arc::new(ds)).unwrap()
    }

    #[test]
    fn test_new_state_shows_everything() {
        let state = state();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.tables.summary.total_movies, 3);
        assert_eq!(state.tables.top_grossing[0].key.to_string(), "The Dark Knight");
        assert!(state.chart.is_none());
    }

    #[test]
    fn test_genre_toggles_refilter() {
        let mut state = state();
        state.select_no_genres();
        assert!(state.visible_indices.is_empty());
        state.toggle_genre("War");
        assert_eq!(state.visible_indices, vec![2]);
        state.toggle_genre("War");
        assert!(state.visible_indices.is_empty());
        state.select_all_genres();
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn test_reversed_ranges_are_swapped() {
        let mut state = state();
        state.set_year_range(2010, 2000);
        assert_eq!(state.filters.years, (2000, 2010));
        assert_eq!(state.visible_indices, vec![0, 1]);
        state.set_rating_range(8.6, 8.0);
        assert_eq!(state.visible_indices, vec![1]);
    }

    #[test]
    fn test_slider_rating_bounds_stay_inclusive() {
        let ds = MovieDataset::from_records(vec![
            movie("Low", 2000, &["Drama"], 7.6, 1),
            movie("Mid", 2000, &["Drama"], 7.7, 1),
            movie("High", 2000, &["Drama"], 9.3, 1),
        ]);
        let mut state = AppState::new(Arc::new(ds)).unwrap();
        // What a 0.1-step slider starting at 7.6 stores for "7.7".
        let dragged = 7.6 + ((7.7 - 7.6) / 0.1_f64).round() * 0.1;
        state.set_rating_range(7.6, dragged);
        let titles: Vec<&str> = state.visible_records().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Low", "Mid"]);
    }

    #[test]
    fn test_search_keeps_trailing_spaces() {
        let ds = MovieDataset::from_records(vec![
            movie("The Thing", 1982, &["Horror"], 8.1, 1),
            movie("Theodore Rex", 1995, &["Comedy"], 7.6, 1),
        ]);
        let mut state = AppState::new(Arc::new(ds)).unwrap();
        state.set_search_query("The ");
        let titles: Vec<&str> = state.search_results().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["The Thing"]);
    }

    #[test]
    fn test_search_searches_whole_dataset() {
        let mut state = state();
        state.select_no_genres();
        state.set_search_query("BATMAN");
        assert!(state.is_searching());
        assert_eq!(state.search_results()[0].title, "Batman Begins");
        state.set_search_query("   ");
        assert!(!state.is_searching());
        assert!(state.search_results().is_empty());
    }

    #[test]
    fn test_create_chart_reports_unset_axes() {
        let mut state = state();
        state.create_chart();
        assert!(state.chart.is_none());
        assert!(state.status_message.as_deref().unwrap_or_default().contains("X-axis"));

        state.chart_request = ChartRequest {
            kind: ChartKind::Bar,
            x: Some(Column::Genre),
            y: Some(Column::Gross),
            color: None,
        };
        state.create_chart();
        assert!(state.status_message.is_none());
        assert!(!state.chart.as_ref().unwrap().is_empty());
        assert_ne!(state.chart_colors.color_for("Gross"), Color32::LIGHT_BLUE);
    }

    #[test]
    fn test_chart_uses_filtered_view() {
        let mut state = state();
        state.select_no_genres();
        state.chart_request = ChartRequest {
            kind: ChartKind::Pie,
            x: Some(Column::Director),
            y: Some(Column::Gross),
            color: None,
        };
        state.create_chart();
        assert!(state.chart.as_ref().unwrap().is_empty());
    }
}
