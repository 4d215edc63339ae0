//! Writes a synthetic `imdb_top_1000.csv` in the raw (uncleaned) layout the
//! dashboard loads, including the dirty rows the loader has to repair.
//!
//! Usage: `generate_sample [OUTPUT_PATH]`

use anyhow::{Context, Result};

const HEADERS: [&str; 16] = [
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

const GENRES: [&str; 12] = [
    "Action", "Adventure", "Animation", "Biography", "Comedy", "Crime", "Drama", "Fantasy",
    "Horror", "Mystery", "Sci-Fi", "Thriller",
];
const CERTIFICATES: [&str; 5] = ["U", "UA", "A", "PG-13", "R"];
const DIRECTORS: [&str; 8] = [
    "Ada Moreno",
    "Bram Okafor",
    "Chen Liang",
    "Dara Novak",
    "Eli Sandberg",
    "Farah Qureshi",
    "Gus Lindqvist",
    "Hana Ito",
];
const FIRST_NAMES: [&str; 8] = ["Alex", "Sam", "Jordan", "Riley", "Casey", "Morgan", "Quinn", "Avery"];
const LAST_NAMES: [&str; 8] = ["Hart", "Vale", "Stone", "Reyes", "Kaur", "Brandt", "Osei", "Ward"];
const TITLE_WORDS: [&str; 12] = [
    "Silent", "Crimson", "Last", "Hidden", "Midnight", "Golden", "River", "Empire", "Storm",
    "Garden", "Signal", "Harbor",
];

const N_MOVIES: usize = 1000;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

fn with_commas(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn person(rng: &mut SimpleRng) -> String {
    format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES))
}

fn movie_row(rng: &mut SimpleRng, index: usize) -> Vec<String> {
    let title = format!(
        "The {} {} {}",
        rng.pick(&TITLE_WORDS),
        rng.pick(&TITLE_WORDS),
        index + 1
    );
    // A handful of rows carry the rating code in place of the year.
    let year = if rng.chance(0.002) {
        "PG".to_string()
    } else {
        rng.range(1930, 2020).to_string()
    };
    let certificate = if rng.chance(0.1) {
        String::new()
    } else {
        rng.pick(&CERTIFICATES).to_string()
    };
    let runtime = format!("{} min", rng.range(75, 200));

    let n_genres = rng.range(1, 3) as usize;
    let mut genres: Vec<&str> = Vec::with_capacity(n_genres);
    while genres.len() < n_genres {
        let genre = rng.pick(&GENRES);
        if !genres.contains(&genre) {
            genres.push(genre);
        }
    }

    let rating = 7.6 + (rng.range(0, 17) as f64) / 10.0;
    let meta_score = if rng.chance(0.15) {
        String::new()
    } else {
        rng.range(40, 100).to_string()
    };
    let votes = rng.range(25_000, 2_300_000);
    let gross = if rng.chance(0.16) {
        String::new()
    } else {
        with_commas(rng.range(1_000, 900_000_000))
    };

    vec![
        format!("https://example.invalid/posters/{}.jpg", index + 1),
        title,
        year,
        certificate,
        runtime,
        genres.join(", "),
        format!("{rating:.1}"),
        "A synthetic plot summary for a generated movie.".to_string(),
        meta_score,
        rng.pick(&DIRECTORS).to_string(),
        person(rng),
        person(rng),
        person(rng),
        person(rng),
        votes.to_string(),
        gross,
    ]
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "imdb_top_1000.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("Failed to create {output_path}"))?;
    writer.write_record(HEADERS)?;
    for index in 0..N_MOVIES {
        writer.write_record(movie_row(&mut rng, index))?;
    }
    writer.flush().context("Failed to flush CSV writer")?;

    println!("Wrote {N_MOVIES} movies to {output_path}");
    Ok(())
}
