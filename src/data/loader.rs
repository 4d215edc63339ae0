use std::fs::File;
use std::path::Path;

use super::clean::{RawMovieRow, clean_rows};
use super::error::LoadError;
use super::model::MovieDataset;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Headers that must be present in the source CSV, in file order.
pub const REQUIRED_HEADERS: [&str; 16] = [
    "Poster_Link",
    "Series_Title",
    "Released_Year",
    "Certificate",
    "Runtime",
    "Genre",
    "IMDB_Rating",
    "Overview",
    "Meta_score",
    "Director",
    "Star1",
    "Star2",
    "Star3",
    "Star4",
    "No_of_Votes",
    "Gross",
];

/// Load and clean the movie dataset at `path`.
///
/// This is the only place the dataset is built; callers wrap the result in an
/// `Arc` and hand out read-only references from there on.
pub fn load_dataset(path: &Path) -> Result<MovieDataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_rows(file, path)?;
    log::debug!("Read {} raw rows from {}", rows.len(), path.display());

    let records = clean_rows(rows)?;
    Ok(MovieDataset::from_records(records))
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Parse CSV from any reader into raw rows, checking the header first.
fn read_rows<R: std::io::Read>(source: R, path: &Path) -> Result<Vec<RawMovieRow>, LoadError> {
    let csv_error = |source: csv::Error| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().map_err(csv_error)?.clone();

    for required in REQUIRED_HEADERS {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_error)?;
        let mut row: RawMovieRow = record.deserialize(Some(&headers)).map_err(csv_error)?;
        row.line = record.position().map(|p| p.line()).unwrap_or_default();
        rows.push(row);
    }
    Ok(rows)
}
