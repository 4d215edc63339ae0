use std::collections::BTreeSet;

use super::model::{MovieDataset, MovieRecord};

// ---------------------------------------------------------------------------
// Filter predicate: sidebar selections
// ---------------------------------------------------------------------------

/// Genre / year / rating selections from the side panel.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// A record passes when it lists at least one of these genres.
    pub genres: BTreeSet<String>,
    /// Inclusive release-year range.
    pub years: (i32, i32),
    /// Inclusive IMDb rating range.
    pub ratings: (f64, f64),
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            genres: BTreeSet::new(),
            years: (i32::MIN, i32::MAX),
            ratings: (f64::NEG_INFINITY, f64::INFINITY),
        }
    }
}

impl FilterState {
    pub fn matches(&self, record: &MovieRecord) -> bool {
        let (year_min, year_max) = self.years;
        let (rating_min, rating_max) = self.ratings;
        record.genres.iter().any(|g| self.genres.contains(g))
            && (year_min..=year_max).contains(&record.released_year)
            && rating_min <= record.imdb_rating
            && record.imdb_rating <= rating_max
    }
}

/// Initialise a [`FilterState`] with every genre and the full observed ranges
/// selected (i.e., show everything).
pub fn init_filter_state(dataset: &MovieDataset) -> FilterState {
    let defaults = FilterState::default();
    FilterState {
        genres: dataset.genres.iter().cloned().collect(),
        years: dataset.year_bounds.unwrap_or(defaults.years),
        ratings: dataset.rating_bounds.unwrap_or(defaults.ratings),
    }
}

/// Return indices of records passing the genre, year and rating filters.
///
/// A record passes when:
/// * at least one of its genres is selected (no genres selected → nothing passes)
/// * its release year lies in `filters.years`, bounds included
/// * its rating lies in `filters.ratings`, bounds included
pub fn genre_year_rating_filter(base: &[MovieRecord], filters: &FilterState) -> Vec<usize> {
    base.iter()
        .enumerate()
        .filter(|(_, r)| filters.matches(r))
        .map(|(i, _)| i)
        .collect()
}

/// Return indices of records whose title contains `query`, ignoring case.
///
/// An empty query matches everything; callers decide whether to search at all.
pub fn title_search(base: &[MovieRecord], query: &str) -> Vec<usize> {
    let needle = query.to_lowercase();
    base.iter()
        .enumerate()
        .filter(|(_, r)| r.title.to_lowercase().contains(&needle))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::movie;
    use proptest::prelude::*;

    fn dataset() -> MovieDataset {
        MovieDataset::from_records(vec![
            movie("The Dark Knight", 2008, &["Action", "Crime", "Drama"], 9.0, 534_858_444),
            movie("Batman Begins", 2005, &["Action", "Adventure"], 8.2, 206_852_432),
            movie("Amélie", 2001, &["Comedy", "Romance"], 8.3, 33_225_499),
            movie("Casablanca", 1942, &["Drama", "Romance", "War"], 8.5, 1_024_560),
            movie("The Batman", 2022, &["Action", "Crime"], 7.8, 369_345_583),
        ])
    }

    #[test]
    fn test_init_filter_state_selects_everything() {
        let ds = dataset();
        let filters = init_filter_state(&ds);
        assert_eq!(filters.years, (1942, 2022));
        assert_eq!(filters.ratings, (7.8, 9.0));
        assert_eq!(genre_year_rating_filter(&ds.records, &filters), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_filter_requires_all_three_predicates() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.genres = ["Crime".to_string()].into_iter().collect();
        filters.years = (2000, 2010);
        assert_eq!(genre_year_rating_filter(&ds.records, &filters), vec![0]);

        filters.ratings = (9.1, 10.0);
        assert!(genre_year_rating_filter(&ds.records, &filters).is_empty());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.years = (2005, 2008);
        filters.ratings = (8.2, 9.0);
        assert_eq!(genre_year_rating_filter(&ds.records, &filters), vec![0, 1]);
    }

    #[test]
    fn test_no_genres_selected_hides_everything() {
        let ds = dataset();
        let mut filters = init_filter_state(&ds);
        filters.genres.clear();
        assert!(genre_year_rating_filter(&ds.records, &filters).is_empty());
    }

    #[test]
    fn test_search_ignores_case() {
        let ds = dataset();
        let lower = title_search(&ds.records, "batman");
        let upper = title_search(&ds.records, "BATMAN");
        assert_eq!(lower, vec![1, 4]);
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_search_handles_non_ascii_and_misses() {
        let ds = dataset();
        assert_eq!(title_search(&ds.records, "AMÉLIE"), vec![2]);
        assert!(title_search(&ds.records, "inception").is_empty());
        assert_eq!(title_search(&ds.records, "").len(), ds.len());
    }

    proptest! {
        #[test]
        fn filter_keeps_exactly_the_matching_records(
            lo in 1930i32..2030,
            span in 0i32..60,
            rating_lo in 7.0f64..9.5,
            rating_span in 0.0f64..2.0,
            genre_mask in 0u8..32,
        ) {
            let ds = dataset();
            let genres: BTreeSet<String> = ds
                .genres
                .iter()
                .enumerate()
                .filter(|(i, _)| genre_mask & (1 << (i % 5)) != 0)
                .map(|(_, g)| g.clone())
                .collect();
            let filters = FilterState {
                genres,
                years: (lo, lo + span),
                ratings: (rating_lo, rating_lo + rating_span),
            };

            let kept = genre_year_rating_filter(&ds.records, &filters);
            for (i, r) in ds.records.iter().enumerate() {
                let expected = r.genres.iter().any(|g| filters.genres.contains(g))
                    && lo <= r.released_year
                    && r.released_year <= lo + span
                    && rating_lo <= r.imdb_rating
                    && r.imdb_rating <= rating_lo + rating_span;
                prop_assert_eq!(kept.contains(&i), expected);
            }
        }
    }
}
