/// Data layer: core types, loading, cleaning, filtering and aggregation.
///
/// Architecture:
/// ```text
///  imdb_top_1000.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  csv → Vec<RawMovieRow>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  clean   │  drop / impute / coerce → MovieDataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐     ┌───────────┐
///   │  filter  │ ──▶ │ aggregate │  group-by, top-N, histograms
///   └──────────┘     └───────────┘
/// ```

pub mod aggregate;
pub mod clean;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;

#[cfg(test)]
pub mod fixtures;
