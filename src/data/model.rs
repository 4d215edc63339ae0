use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a selectable column
// ---------------------------------------------------------------------------

/// A typed view of one column value of a [`MovieRecord`].
/// Used as a group key in `BTreeMap`s, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    List(Vec<String>),
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
                List(_) => 3,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (List(a), List(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.1}"),
            CellValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

impl CellValue {
    /// Numeric interpretation for aggregation and plotting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// MovieRecord – one cleaned row of the dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub poster_url: String,
    pub title: String,
    pub released_year: i32,
    pub certificate: String,
    pub runtime_minutes: u32,
    /// Non-empty, in the order listed by the source.
    pub genres: Vec<String>,
    pub imdb_rating: f64,
    pub overview: String,
    pub meta_score: u32,
    pub director: String,
    pub stars: [String; 4],
    pub votes: u64,
    pub gross_revenue: u64,
}

// ---------------------------------------------------------------------------
// Column – the closed set of user-selectable columns
// ---------------------------------------------------------------------------

/// Every dataset column a user can put on a chart axis or group by.
/// `Poster_Link` is not selectable; it is only shown as an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Title,
    ReleasedYear,
    Certificate,
    Runtime,
    Genre,
    ImdbRating,
    Overview,
    MetaScore,
    Director,
    Star1,
    Star2,
    Star3,
    Star4,
    Votes,
    Gross,
}

impl Column {
    pub const ALL: [Column; 15] = [
        Column::Title,
        Column::ReleasedYear,
        Column::Certificate,
        Column::Runtime,
        Column::Genre,
        Column::ImdbRating,
        Column::Overview,
        Column::MetaScore,
        Column::Director,
        Column::Star1,
        Column::Star2,
        Column::Star3,
        Column::Star4,
        Column::Votes,
        Column::Gross,
    ];

    /// Header of the column in the source CSV.
    pub fn header(self) -> &'static str {
        match self {
            Column::Title => "Series_Title",
            Column::ReleasedYear => "Released_Year",
            Column::Certificate => "Certificate",
            Column::Runtime => "Runtime",
            Column::Genre => "Genre",
            Column::ImdbRating => "IMDB_Rating",
            Column::Overview => "Overview",
            Column::MetaScore => "Meta_score",
            Column::Director => "Director",
            Column::Star1 => "Star1",
            Column::Star2 => "Star2",
            Column::Star3 => "Star3",
            Column::Star4 => "Star4",
            Column::Votes => "No_of_Votes",
            Column::Gross => "Gross",
        }
    }

    /// Whether every value of this column has a numeric interpretation.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Column::ReleasedYear
                | Column::Runtime
                | Column::ImdbRating
                | Column::MetaScore
                | Column::Votes
                | Column::Gross
        )
    }

    /// Read this column from a record.
    pub fn value(self, record: &MovieRecord) -> CellValue {
        match self {
            Column::Title => CellValue::Text(record.title.clone()),
            Column::ReleasedYear => CellValue::Integer(i64::from(record.released_year)),
            Column::Certificate => CellValue::Text(record.certificate.clone()),
            Column::Runtime => CellValue::Integer(i64::from(record.runtime_minutes)),
            Column::Genre => CellValue::List(record.genres.clone()),
            Column::ImdbRating => CellValue::Float(record.imdb_rating),
            Column::Overview => CellValue::Text(record.overview.clone()),
            Column::MetaScore => CellValue::Integer(i64::from(record.meta_score)),
            Column::Director => CellValue::Text(record.director.clone()),
            Column::Star1 => CellValue::Text(record.stars[0].clone()),
            Column::Star2 => CellValue::Text(record.stars[1].clone()),
            Column::Star3 => CellValue::Text(record.stars[2].clone()),
            Column::Star4 => CellValue::Text(record.stars[3].clone()),
            Column::Votes => CellValue::Integer(record.votes as i64),
            Column::Gross => CellValue::Integer(record.gross_revenue as i64),
        }
    }

    /// Numeric value of this column, `None` for text columns.
    pub fn number(self, record: &MovieRecord) -> Option<f64> {
        self.value(record).as_f64()
    }

    /// Group keys contributed by a record. List cells are exploded so a
    /// movie counts once towards every genre it lists.
    pub fn categories(self, record: &MovieRecord) -> Vec<CellValue> {
        match self.value(record) {
            CellValue::List(items) => items.into_iter().map(CellValue::Text).collect(),
            other => vec![other],
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

// ---------------------------------------------------------------------------
// MovieDataset – the complete cleaned dataset
// ---------------------------------------------------------------------------

/// The cleaned dataset with indices precomputed for the filter widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDataset {
    pub records: Vec<MovieRecord>,
    /// Distinct genre names, sorted lexicographically.
    pub genres: Vec<String>,
    pub year_bounds: Option<(i32, i32)>,
    pub rating_bounds: Option<(f64, f64)>,
}

impl MovieDataset {
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let genres: BTreeSet<String> = records
            .iter()
            .flat_map(|r| r.genres.iter().cloned())
            .collect();

        let year_bounds = records.iter().map(|r| r.released_year).fold(None, |acc: Option<(i32, i32)>, y| {
            Some(match acc {
                None => (y, y),
                Some((lo, hi)) => (lo.min(y), hi.max(y)),
            })
        });
        let rating_bounds = records.iter().map(|r| r.imdb_rating).fold(None, |acc: Option<(f64, f64)>, v| {
            Some(match acc {
                None => (v, v),
                Some((lo, hi)) => (f64::min(lo, v), f64::max(hi, v)),
            })
        });

        MovieDataset {
            records,
            genres: genres.into_iter().collect(),
            year_bounds,
            rating_bounds,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrow every record, in file order.
    pub fn all(&self) -> Vec<&MovieRecord> {
        self.records.iter().collect()
    }

    /// Borrow the records at `indices`. Out-of-range indices are skipped.
    pub fn select(&self, indices: &[usize]) -> Vec<&MovieRecord> {
        indices.iter().filter_map(|&i| self.records.get(i)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::movie;

    #[test]
    fn test_from_records_sorts_distinct_genres() {
        let ds = MovieDataset::from_records(vec![
            movie("A", 2001, &["Drama", "Action"], 8.0, 10),
            movie("B", 1995, &["Comedy", "Drama"], 7.5, 20),
        ]);
        assert_eq!(ds.genres, vec!["Action", "Comedy", "Drama"]);
        assert_eq!(ds.year_bounds, Some((1995, 2001)));
        assert_eq!(ds.rating_bounds, Some((7.5, 8.0)));
    }

    #[test]
    fn test_empty_dataset_has_no_bounds() {
        let ds = MovieDataset::from_records(Vec::new());
        assert!(ds.is_empty());
        assert!(ds.genres.is_empty());
        assert_eq!(ds.year_bounds, None);
        assert_eq!(ds.rating_bounds, None);
    }

    #[test]
    fn test_genre_categories_are_exploded() {
        let m = movie("A", 2001, &["Action", "Adventure", "Drama"], 8.0, 10);
        assert_eq!(
            Column::Genre.categories(&m),
            vec![
                CellValue::Text("Action".into()),
                CellValue::Text("Adventure".into()),
                CellValue::Text("Drama".into()),
            ]
        );
        assert_eq!(Column::Director.categories(&m).len(), 1);
    }

    #[test]
    fn test_numeric_columns_have_numbers() {
        let m = movie("A", 2001, &["Drama"], 8.0, 10);
        for column in Column::ALL {
            assert_eq!(column.number(&m).is_some(), column.is_numeric(), "{column}");
        }
    }

    #[test]
    fn test_cell_value_ordering_is_numeric_for_integers() {
        let mut keys = vec![
            CellValue::Integer(2010),
            CellValue::Integer(999),
            CellValue::Integer(1994),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CellValue::Integer(999),
                CellValue::Integer(1994),
                CellValue::Integer(2010),
            ]
        );
    }

    #[test]
    fn test_select_skips_out_of_range() {
        let ds = MovieDataset::from_records(vec![movie("A", 2001, &["Drama"], 8.0, 10)]);
        let picked = ds.select(&[0, 5]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].title, "A");
    }
}
