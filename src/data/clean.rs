use std::collections::BTreeMap;

use serde::Deserialize;

use super::error::LoadError;
use super::model::MovieRecord;

// ---------------------------------------------------------------------------
// RawMovieRow – one CSV record before cleaning
// ---------------------------------------------------------------------------

/// A CSV record exactly as read. Every cell is optional text; an empty cell
/// deserializes to `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovieRow {
    #[serde(rename = "Poster_Link")]
    pub poster_link: Option<String>,
    #[serde(rename = "Series_Title")]
    pub series_title: Option<String>,
    #[serde(rename = "Released_Year")]
    pub released_year: Option<String>,
    #[serde(rename = "Certificate")]
    pub certificate: Option<String>,
    #[serde(rename = "Runtime")]
    pub runtime: Option<String>,
    #[serde(rename = "Genre")]
    pub genre: Option<String>,
    #[serde(rename = "IMDB_Rating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Overview")]
    pub overview: Option<String>,
    #[serde(rename = "Meta_score")]
    pub meta_score: Option<String>,
    #[serde(rename = "Director")]
    pub director: Option<String>,
    #[serde(rename = "Star1")]
    pub star1: Option<String>,
    #[serde(rename = "Star2")]
    pub star2: Option<String>,
    #[serde(rename = "Star3")]
    pub star3: Option<String>,
    #[serde(rename = "Star4")]
    pub star4: Option<String>,
    #[serde(rename = "No_of_Votes")]
    pub votes: Option<String>,
    #[serde(rename = "Gross")]
    pub gross: Option<String>,
    /// Source line number, for error messages.
    #[serde(skip)]
    pub line: u64,
}

/// Separator between genres in the `Genre` column.
pub const GENRE_DELIMITER: &str = ", ";

// ---------------------------------------------------------------------------
// Cleaning pipeline
// ---------------------------------------------------------------------------

/// Turn raw rows into cleaned records.
///
/// Steps, in order:
/// 1. drop rows without a gross value
/// 2. impute missing certificate / meta score with the column mode; the
///    meta score mode is taken over parsed numbers, so "74" and "74.0" agree
/// 3. strip `" min"` from runtime and `","` from gross, parse both
/// 4. drop rows whose year is not an integer, parse the rest
/// 5. parse rating (finite only) and votes; split genres
///
/// Any value that still fails to parse aborts the whole load.
pub fn clean_rows(rows: Vec<RawMovieRow>) -> Result<Vec<MovieRecord>, LoadError> {
    let total = rows.len();

    let rows: Vec<RawMovieRow> = rows
        .into_iter()
        .filter(|r| present(&r.gross).is_some())
        .collect();
    let without_gross = total - rows.len();

    let certificate_mode = column_mode(rows.iter().filter_map(|r| present(&r.certificate)))
        .map(str::to_string)
        .ok_or(LoadError::NoModeValue("Certificate"))?;
    let meta_scores = rows
        .iter()
        .filter_map(|r| present(&r.meta_score).map(|raw| parse_whole_number(raw, r.line, "Meta_score")))
        .collect::<Result<Vec<u32>, LoadError>>()?;
    let meta_score_mode = column_mode(meta_scores).ok_or(LoadError::NoModeValue("Meta_score"))?;
    log::debug!("Imputing Certificate with '{certificate_mode}', Meta_score with '{meta_score_mode}'");

    let mut records = Vec::with_capacity(rows.len());
    let mut bad_year = 0usize;

    for row in rows {
        let line = row.line;

        let runtime_raw = required(&row.runtime, line, "Runtime")?;
        let runtime_minutes = parse_number::<u32>(&runtime_raw.replace(" min", ""), line, "Runtime", runtime_raw)?;
        let gross_raw = required(&row.gross, line, "Gross")?;
        let gross_revenue = parse_number::<u64>(&gross_raw.replace(',', ""), line, "Gross", gross_raw)?;

        let Some(released_year) = present(&row.released_year).and_then(|y| y.parse::<i32>().ok()) else {
            log::debug!(
                "line {line}: dropping row with non-year value {:?}",
                row.released_year.as_deref().unwrap_or("")
            );
            bad_year += 1;
            continue;
        };

        let certificate = present(&row.certificate).unwrap_or(certificate_mode.as_str()).to_string();
        let meta_score = match present(&row.meta_score) {
            Some(raw) => parse_whole_number(raw, line, "Meta_score")?,
            None => meta_score_mode,
        };

        let rating_raw = required(&row.imdb_rating, line, "IMDB_Rating")?;
        let imdb_rating = parse_number::<f64>(rating_raw, line, "IMDB_Rating", rating_raw)?;
        if !imdb_rating.is_finite() {
            return Err(invalid(line, "IMDB_Rating", rating_raw));
        }
        let votes_raw = required(&row.votes, line, "No_of_Votes")?;
        let votes = parse_number::<u64>(&votes_raw.replace(',', ""), line, "No_of_Votes", votes_raw)?;

        let genre_raw = required(&row.genre, line, "Genre")?;
        let genres = split_genres(genre_raw);
        if genres.is_empty() {
            return Err(invalid(line, "Genre", genre_raw));
        }

        records.push(MovieRecord {
            poster_url: text(&row.poster_link),
            title: text(&row.series_title),
            released_year,
            certificate,
            runtime_minutes,
            genres,
            imdb_rating,
            overview: text(&row.overview),
            meta_score,
            director: text(&row.director),
            stars: [text(&row.star1), text(&row.star2), text(&row.star3), text(&row.star4)],
            votes,
            gross_revenue,
        });
    }

    log::info!(
        "Cleaned dataset: kept {} of {total} rows ({without_gross} without gross, {bad_year} with invalid year)",
        records.len()
    );
    Ok(records)
}

/// Split a genre cell into trimmed, non-empty names in source order.
pub fn split_genres(raw: &str) -> Vec<String> {
    raw.split(GENRE_DELIMITER)
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}

/// Most frequent value. Ties go to the smallest.
pub fn column_mode<T, I>(values: I) -> Option<T>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    // BTreeMap iterates in key order; only a strictly larger count replaces.
    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, c)| count > *c) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

// -- cell helpers --

/// Trimmed cell content, `None` when missing or blank.
fn present(cell: &Option<String>) -> Option<&str> {
    cell.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn text(cell: &Option<String>) -> String {
    present(cell).unwrap_or_default().to_string()
}

fn required<'a>(cell: &'a Option<String>, line: u64, column: &'static str) -> Result<&'a str, LoadError> {
    present(cell).ok_or_else(|| invalid(line, column, ""))
}

fn parse_number<T: std::str::FromStr>(
    cleaned: &str,
    line: u64,
    column: &'static str,
    original: &str,
) -> Result<T, LoadError> {
    cleaned.trim().parse::<T>().map_err(|_| invalid(line, column, original))
}

/// Accepts `"80"` as well as `"80.0"`; anything with a fraction is rejected.
fn parse_whole_number(raw: &str, line: u64, column: &'static str) -> Result<u32, LoadError> {
    if let Ok(v) = raw.parse::<u32>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&v) => Ok(v as u32),
        _ => Err(invalid(line, column, raw)),
    }
}

fn invalid(line: u64, column: &'static str, value: &str) -> LoadError {
    LoadError::InvalidValue {
        line,
        column,
        value: value.to_string(),
    }
}
