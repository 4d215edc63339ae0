use std::collections::{BTreeMap, HashSet};

use thiserror::Error;

use super::model::{CellValue, Column, MovieRecord};
use crate::config;

// ---------------------------------------------------------------------------
// Group-by / top-N
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Mean,
    Sum,
    /// Number of contributions per group; needs no metric column.
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    #[error("{0:?} needs a metric column")]
    MissingMetric(Aggregate),

    #[error("column '{0}' is not numeric and cannot be aggregated")]
    NonNumericMetric(Column),
}

/// One row of a grouped table.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    pub key: CellValue,
    pub value: f64,
}

/// Group `records` by `key` and aggregate `metric` per group.
///
/// Rows come back in ascending key order. List-valued keys (genres) are
/// exploded, so a record contributes to every group it lists.
pub fn group_aggregate(
    records: &[&MovieRecord],
    key: Column,
    metric: Option<Column>,
    aggregate: Aggregate,
) -> Result<Vec<GroupRow>, AggregateError> {
    let metric = match (aggregate, metric) {
        (Aggregate::Count, _) => None,
        (_, None) => return Err(AggregateError::MissingMetric(aggregate)),
        (_, Some(m)) if !m.is_numeric() => return Err(AggregateError::NonNumericMetric(m)),
        (_, Some(m)) => Some(m),
    };

    // key -> (sum, count)
    let mut groups: BTreeMap<CellValue, (f64, usize)> = BTreeMap::new();
    for record in records {
        let value = metric.and_then(|m| m.number(record)).unwrap_or(0.0);
        for k in key.categories(record) {
            let slot = groups.entry(k).or_insert((0.0, 0));
            slot.0 += value;
            slot.1 += 1;
        }
    }

    Ok(groups
        .into_iter()
        .map(|(key, (sum, count))| GroupRow {
            key,
            value: match aggregate {
                Aggregate::Mean => sum / count as f64,
                Aggregate::Sum => sum,
                Aggregate::Count => count as f64,
            },
        })
        .collect())
}

/// Group, aggregate, rank by the aggregated value and keep the first `n`.
///
/// Groups with equal values keep the order in which they first appear in
/// `records`.
pub fn top_n_by_metric(
    records: &[&MovieRecord],
    key: Column,
    metric: Option<Column>,
    aggregate: Aggregate,
    n: usize,
    order: SortOrder,
) -> Result<Vec<GroupRow>, AggregateError> {
    let mut rows = group_aggregate(records, key, metric, aggregate)?;
    let first_seen = first_appearance(records, key);
    rows.sort_by_key(|r| first_seen.get(&r.key).copied().unwrap_or(usize::MAX));
    match order {
        SortOrder::Descending => rows.sort_by(|a, b| b.value.total_cmp(&a.value)),
        SortOrder::Ascending => rows.sort_by(|a, b| a.value.total_cmp(&b.value)),
    }
    rows.truncate(n);
    Ok(rows)
}

/// Position at which each group key first shows up in `records`.
fn first_appearance(records: &[&MovieRecord], key: Column) -> BTreeMap<CellValue, usize> {
    let mut seen = BTreeMap::new();
    for record in records {
        for k in key.categories(record) {
            let next = seen.len();
            seen.entry(k).or_insert(next);
        }
    }
    seen
}

// -- dashboard tables --

/// Titles with the highest mean gross.
pub fn top_grossing_titles(records: &[&MovieRecord]) -> Result<Vec<GroupRow>, AggregateError> {
    top_n_by_metric(
        records,
        Column::Title,
        Some(Column::Gross),
        Aggregate::Mean,
        config::TOP_GROSSING_TITLES,
        SortOrder::Descending,
    )
}

/// Directors with the highest mean IMDb rating.
pub fn top_rated_directors(records: &[&MovieRecord]) -> Result<Vec<GroupRow>, AggregateError> {
    top_n_by_metric(
        records,
        Column::Director,
        Some(Column::ImdbRating),
        Aggregate::Mean,
        config::TOP_DIRECTORS,
        SortOrder::Descending,
    )
}

/// Most frequent genres.
pub fn top_genres(records: &[&MovieRecord]) -> Result<Vec<GroupRow>, AggregateError> {
    top_n_by_metric(
        records,
        Column::Genre,
        None,
        Aggregate::Count,
        config::TOP_GENRES,
        SortOrder::Descending,
    )
}

/// Every genre with its movie count, most frequent first.
pub fn genre_distribution(records: &[&MovieRecord]) -> Result<Vec<GroupRow>, AggregateError> {
    top_n_by_metric(
        records,
        Column::Genre,
        None,
        Aggregate::Count,
        usize::MAX,
        SortOrder::Descending,
    )
}

/// Total gross per release year, in year order.
pub fn yearly_gross(records: &[&MovieRecord]) -> Result<Vec<GroupRow>, AggregateError> {
    group_aggregate(records, Column::ReleasedYear, Some(Column::Gross), Aggregate::Sum)
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bin edges spanning the finite `values`. `None` for no finite
/// values or no bins.
pub fn bin_edges(values: &[f64], bins: usize) -> Option<Vec<(f64, f64)>> {
    let finite = || values.iter().copied().filter(|v| v.is_finite());
    if bins == 0 || finite().next().is_none() {
        return None;
    }
    let mut lo = finite().fold(f64::INFINITY, f64::min);
    let mut hi = finite().fold(f64::NEG_INFINITY, f64::max);
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    Some(
        (0..bins)
            .map(|i| {
                let start = lo + width * i as f64;
                let end = if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 };
                (start, end)
            })
            .collect(),
    )
}

/// Count `values` into `edges`. Intervals are half-open except the last;
/// non-finite values are skipped.
pub fn count_into(edges: &[(f64, f64)], values: &[f64]) -> Vec<usize> {
    let mut counts = vec![0usize; edges.len()];
    let Some((&(lo, _), &(_, hi))) = edges.first().zip(edges.last()) else {
        return counts;
    };
    let width = (hi - lo) / edges.len() as f64;
    for &v in values {
        if !v.is_finite() || v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(edges.len() - 1);
        counts[idx] += 1;
    }
    counts
}

/// Equal-width histogram of `values`.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(edges) = bin_edges(values, bins) else {
        return Vec::new();
    };
    let counts = count_into(&edges, values);
    edges
        .into_iter()
        .zip(counts)
        .map(|((start, end), count)| HistogramBin { start, end, count })
        .collect()
}

/// Distribution of IMDb ratings across `bins` equal-width intervals.
pub fn rating_histogram(records: &[&MovieRecord], bins: usize) -> Vec<HistogramBin> {
    let ratings: Vec<f64> = records.iter().map(|r| r.imdb_rating).collect();
    histogram(&ratings, bins)
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryMetrics {
    /// Distinct titles.
    pub total_movies: usize,
    pub total_votes: u64,
    pub average_rating: Option<f64>,
    pub total_gross: u64,
}

impl SummaryMetrics {
    pub fn compute(records: &[&MovieRecord]) -> Self {
        let titles: HashSet<&str> = records.iter().map(|r| r.title.as_str()).collect();
        let average_rating = (!records.is_empty())
            .then(|| records.iter().map(|r| r.imdb_rating).sum::<f64>() / records.len() as f64);
        SummaryMetrics {
            total_movies: titles.len(),
            total_votes: records.iter().map(|r| r.votes).sum(),
            average_rating,
            total_gross: records.iter().map(|r| r.gross_revenue).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{directed, movie};
    use crate::data::model::MovieRecord;

    fn records() -> Vec<MovieRecord> {
        vec![
            directed(movie("Inception", 2010, &["Action", "Adventure", "Sci-Fi"], 8.8, 292_576_195), "Christopher Nolan"),
            directed(movie("Interstellar", 2014, &["Adventure", "Drama", "Sci-Fi"], 8.6, 188_020_017), "Christopher Nolan"),
            directed(movie("Heat", 1995, &["Action", "Crime", "Drama"], 8.3, 67_436_818), "Michael Mann"),
            directed(movie("Collateral", 2004, &["Action", "Crime", "Drama"], 7.5, 101_005_703), "Michael Mann"),
            directed(movie("Inception", 2010, &["Action"], 8.8, 100), "Christopher Nolan"),
            directed(movie("Amélie", 2001, &["Comedy", "Romance"], 8.3, 33_225_499), "Jean-Pierre Jeunet"),
        ]
    }

    #[test]
    fn test_top_grossing_uses_mean_per_title() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let top = top_grossing_titles(&refs).unwrap();
        assert_eq!(top[0].key, CellValue::Text("Interstellar".into()));
        let inception = top.iter().find(|r| r.key == CellValue::Text("Inception".into())).unwrap();
        assert_eq!(inception.value, (292_576_195.0 + 100.0) / 2.0);
        assert_eq!(top.len(), 5);
    }

    #[test]
    fn test_genre_counts_explode_lists() {
        let data = vec![movie("A", 2000, &["Action", "Adventure", "Drama"], 8.0, 1)];
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let counts = top_genres(&refs).unwrap();
        assert_eq!(counts.len(), 3);
        for row in counts {
            assert_eq!(row.value, 1.0);
        }
    }

    #[test]
    fn test_top_n_is_sorted_and_truncated() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        for n in [0, 1, 3, 50] {
            let rows = top_n_by_metric(&refs, Column::Genre, None, Aggregate::Count, n, SortOrder::Descending).unwrap();
            assert_eq!(rows.len(), n.min(7));
            assert!(rows.windows(2).all(|w| w[0].value >= w[1].value));
        }
        let asc = top_n_by_metric(&refs, Column::Director, Some(Column::ImdbRating), Aggregate::Mean, 3, SortOrder::Ascending).unwrap();
        assert!(asc.windows(2).all(|w| w[0].value <= w[1].value));
        assert_eq!(asc[0].key, CellValue::Text("Michael Mann".into()));
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        // Adventure, Sci-Fi and Crime all appear twice; Drama three times.
        let rows = genre_distribution(&refs).unwrap();
        let keys: Vec<String> = rows.iter().map(|r| r.key.to_string()).collect();
        assert_eq!(keys[0], "Action");
        assert_eq!(keys[1], "Drama");
        assert_eq!(&keys[2..5], ["Adventure", "Sci-Fi", "Crime"]);
        assert_eq!(&keys[5..], ["Comedy", "Romance"]);
    }

    #[test]
    fn test_yearly_gross_is_in_year_order() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let years = yearly_gross(&refs).unwrap();
        let keys: Vec<CellValue> = years.iter().map(|r| r.key.clone()).collect();
        assert_eq!(
            keys,
            [1995, 2001, 2004, 2010, 2014].map(CellValue::Integer).to_vec()
        );
        assert_eq!(years[3].value, 292_576_295.0);
    }

    #[test]
    fn test_metric_must_be_numeric() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        assert_eq!(
            group_aggregate(&refs, Column::Genre, Some(Column::Director), Aggregate::Sum),
            Err(AggregateError::NonNumericMetric(Column::Director))
        );
        assert_eq!(
            group_aggregate(&refs, Column::Genre, None, Aggregate::Mean),
            Err(AggregateError::MissingMetric(Aggregate::Mean))
        );
    }

    #[test]
    fn test_empty_input_gives_empty_tables() {
        let refs: Vec<&MovieRecord> = Vec::new();
        assert!(top_grossing_titles(&refs).unwrap().is_empty());
        assert!(rating_histogram(&refs, 20).is_empty());
        let summary = SummaryMetrics::compute(&refs);
        assert_eq!(summary.total_movies, 0);
        assert_eq!(summary.average_rating, None);
    }

    #[test]
    fn test_rating_histogram_counts_every_record() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let bins = rating_histogram(&refs, 4);
        assert_eq!(bins.len(), 4);
        assert_eq!(bins[0].start, 7.5);
        assert!((bins[3].end - 8.8).abs() < 1e-9);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), data.len());
        // 8.8 lands in the closed last bin.
        assert_eq!(bins[3].count, 3);
    }

    #[test]
    fn test_histogram_of_constant_values_is_widened() {
        let bins = histogram(&[5.0, 5.0, 5.0], 2);
        assert_eq!(bins[0].start, 4.5);
        assert_eq!(bins[1].end, 5.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 3);
        assert!(histogram(&[1.0], 0).is_empty());
    }

    #[test]
    fn test_non_finite_values_are_not_binned() {
        let bins = histogram(&[f64::NAN, 8.0, 9.0, f64::INFINITY], 2);
        assert_eq!(bins[0].start, 8.0);
        assert_eq!(bins[1].end, 9.0);
        assert_eq!(bins.iter().map(|b| b.count).collect::<Vec<_>>(), vec![1, 1]);
        assert!(histogram(&[f64::NAN], 3).is_empty());
    }

    #[test]
    fn test_summary_metrics() {
        let data = records();
        let refs: Vec<&MovieRecord> = data.iter().collect();
        let summary = SummaryMetrics::compute(&refs);
        assert_eq!(summary.total_movies, 5);
        assert_eq!(summary.total_votes, 6000);
        assert_eq!(summary.total_gross, 682_264_332);
        assert!((summary.average_rating.unwrap() - 8.383_333).abs() < 1e-3);
    }
}
