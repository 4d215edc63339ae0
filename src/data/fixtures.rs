//! Record builders shared by unit tests.

use super::model::MovieRecord;

pub fn movie(title: &str, year: i32, genres: &[&str], rating: f64, gross: u64) -> MovieRecord {
    MovieRecord {
        poster_url: format!("https://example.com/{title}.jpg"),
        title: title.to_string(),
        released_year: year,
        certificate: "U".to_string(),
        runtime_minutes: 120,
        genres: genres.iter().map(|g| g.to_string()).collect(),
        imdb_rating: rating,
        overview: String::new(),
        meta_score: 70,
        director: "Unknown".to_string(),
        stars: Default::default(),
        votes: 1000,
        gross_revenue: gross,
    }
}

pub fn directed(mut record: MovieRecord, director: &str) -> MovieRecord {
    record.director = director.to_string();
    record
}
