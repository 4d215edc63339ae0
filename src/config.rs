//! Compile-time settings for the dashboard.

/// Dataset location, relative to the working directory.
pub const DATASET_PATH: &str = "imdb_top_1000.csv";

pub const WINDOW_TITLE: &str = "Movie Dataset Visualization Dashboard";
pub const WINDOW_SIZE: [f32; 2] = [1400.0, 900.0];
pub const WINDOW_MIN_SIZE: [f32; 2] = [800.0, 500.0];

pub const TOP_GROSSING_TITLES: usize = 10;
pub const TOP_GENRES: usize = 20;
pub const TOP_DIRECTORS: usize = 10;

/// Bin count for the rating distribution and numeric histograms.
pub const HISTOGRAM_BINS: usize = 20;

pub const POSTER_WIDTH: f32 = 150.0;
pub const PLOT_HEIGHT: f32 = 280.0;
