//! Core domain types for the movie analytics tables.
//!
//! Three flat tables are held in memory:
//! - movie records (one row per title)
//! - per-year genre statistics
//! - overall genre statistics
//!
//! `DataIndex` owns all of them plus the secondary indices built at load time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::numeric;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a movie in `DataIndex::movies`.
///
/// Records never move after load, so the position is a stable identifier.
pub type MovieIdx = usize;

/// Label assigned upstream to commercially successful movies.
pub const HIT_LABEL: &str = "Hit";

/// Separator used for multi-genre strings after normalisation.
pub const GENRE_SEPARATOR: char = '|';

// =============================================================================
// Movie-related Types
// =============================================================================

/// A single movie row.
///
/// Genres are kept as the normalised pipe-joined string (`"Action|Drama"`),
/// because genre combinations are analysed as atomic categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub title: String,
    pub year: Option<i32>,
    /// Pipe-joined genre string, empty when the source row had none
    pub genre: String,
    pub budget: Option<f64>,
    pub box_office: Option<f64>,
    /// Precomputed upstream; missing values are stored as 0.0
    pub roi: f64,
    pub imdb_rating: Option<f64>,
    pub runtime: Option<f64>,
    pub release_date: Option<NaiveDate>,
    /// Calendar month (1-12), from the source column or the parsed date
    pub release_month: Option<u32>,
    pub success_label: Option<String>,
    pub poster_url: Option<String>,
}

impl MovieRecord {
    /// Create a record with only a title and genre string set.
    ///
    /// Mostly useful for building fixtures; loaders fill every field.
    pub fn new(title: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            year: None,
            genre: genre.into(),
            budget: None,
            box_office: None,
            roi: 0.0,
            imdb_rating: None,
            runtime: None,
            release_date: None,
            release_month: None,
            success_label: None,
            poster_url: None,
        }
    }

    /// Iterate over the individual genre tokens of this movie.
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        split_genres(&self.genre)
    }

    /// True if one of the tokens equals `genre` exactly.
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genre_tokens().any(|g| g == genre)
    }

    /// True for multi-genre movies (`"Action|Drama"`).
    pub fn is_combination(&self) -> bool {
        self.genre.contains(GENRE_SEPARATOR)
    }

    /// True if labelled a Hit.
    pub fn is_hit(&self) -> bool {
        self.success_label.as_deref() == Some(HIT_LABEL)
    }
}

/// Split a pipe-joined genre string into non-empty tokens.
pub fn split_genres(genre: &str) -> impl Iterator<Item = &str> {
    genre
        .split(GENRE_SEPARATOR)
        .map(str::trim)
        .filter(|g| !g.is_empty())
}

/// Numeric movie columns that statistics and the encoder read generically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericField {
    Budget,
    BoxOffice,
    Roi,
    ImdbRating,
    Runtime,
    Year,
    ReleaseMonth,
}

impl NumericField {
    /// Column name as it appears in the source tables.
    pub fn name(self) -> &'static str {
        match self {
            NumericField::Budget => "budget",
            NumericField::BoxOffice => "box_office",
            NumericField::Roi => "roi",
            NumericField::ImdbRating => "imdb_rating",
            NumericField::Runtime => "runtime",
            NumericField::Year => "year",
            NumericField::ReleaseMonth => "release_month",
        }
    }

    /// Read this field from a movie.
    pub fn value(self, movie: &MovieRecord) -> Option<f64> {
        match self {
            NumericField::Budget => movie.budget,
            NumericField::BoxOffice => movie.box_office,
            NumericField::Roi => Some(movie.roi),
            NumericField::ImdbRating => movie.imdb_rating,
            NumericField::Runtime => movie.runtime,
            NumericField::Year => movie.year.map(f64::from),
            NumericField::ReleaseMonth => movie.release_month.map(f64::from),
        }
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Aggregates for one (genre, year) pair. `genre` is always a single token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreYearStat {
    pub genre: String,
    pub year: i32,
    pub total_movies: u32,
    pub avg_rating: f64,
    pub avg_budget: f64,
    pub total_box_office: f64,
    pub success_rate: f64,
    pub avg_roi: f64,
    pub roi_volatility: f64,
}

/// Aggregates for one genre across all years.
///
/// `roi_volatility` is always the value recomputed from the movie table,
/// never the one found in the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenreOverallStat {
    pub genre: String,
    pub total_movies: u32,
    pub avg_rating: f64,
    pub avg_budget: f64,
    pub total_box_office: f64,
    pub success_rate: f64,
    pub avg_roi: f64,
    pub roi_volatility: f64,
}

impl GenreOverallStat {
    /// Zeroed row for a genre.
    pub fn empty(genre: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            total_movies: 0,
            avg_rating: 0.0,
            avg_budget: 0.0,
            total_box_office: 0.0,
            success_rate: 0.0,
            avg_roi: 0.0,
            roi_volatility: 0.0,
        }
    }
}

// =============================================================================
// DataIndex - The In-Memory Store
// =============================================================================

/// Main data structure that holds all tables and indices.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// request handler, so no locking is needed.
#[derive(Debug)]
pub struct DataIndex {
    // Primary tables
    pub(crate) movies: Vec<MovieRecord>,
    pub(crate) genre_year_stats: Vec<GenreYearStat>,
    pub(crate) genre_overall_stats: Vec<GenreOverallStat>,

    // Secondary indices
    /// Genre token -> positions of movies carrying it (a movie appears under each of its tokens)
    pub(crate) genre_index: HashMap<String, Vec<MovieIdx>>,
    /// Release year -> positions of movies (sorted by year)
    pub(crate) year_index: BTreeMap<i32, Vec<MovieIdx>>,

    /// File the movie table was read from, if loaded from disk
    pub(crate) movie_source: Option<String>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self {
            movies: Vec::new(),
            genre_year_stats: Vec::new(),
            genre_overall_stats: Vec::new(),
            genre_index: HashMap::new(),
            year_index: BTreeMap::new(),
            movie_source: None,
        }
    }

    /// All movies in load order
    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    /// Get a movie by position
    pub fn get_movie(&self, idx: MovieIdx) -> Option<&MovieRecord> {
        self.movies.get(idx)
    }

    pub fn genre_year_stats(&self) -> &[GenreYearStat] {
        &self.genre_year_stats
    }

    pub fn genre_overall_stats(&self) -> &[GenreOverallStat] {
        &self.genre_overall_stats
    }

    /// Overall statistics row for an exact genre name
    pub fn get_overall_stat(&self, genre: &str) -> Option<&GenreOverallStat> {
        self.genre_overall_stats.iter().find(|s| s.genre == genre)
    }

    /// Per-year statistics rows for one year, in table order
    pub fn year_stats_for(&self, year: i32) -> impl Iterator<Item = &GenreYearStat> {
        self.genre_year_stats.iter().filter(move |s| s.year == year)
    }

    /// Positions of all movies carrying a genre token
    pub fn get_movies_by_genre(&self, genre: &str) -> &[MovieIdx] {
        self.genre_index
            .get(genre)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Positions of all movies released in a year
    pub fn get_movies_by_year(&self, year: i32) -> &[MovieIdx] {
        self.year_index
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Genre tokens present in the movie table
    pub fn genre_tokens(&self) -> impl Iterator<Item = &str> {
        self.genre_index.keys().map(String::as_str)
    }

    /// Sorted, de-duplicated genre names from the overall statistics
    pub fn all_genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = self
            .genre_overall_stats
            .iter()
            .map(|s| s.genre.clone())
            .collect();
        genres.sort();
        genres.dedup();
        genres
    }

    /// (min, max) release year over all movies
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let min = *self.year_index.keys().next()?;
        let max = *self.year_index.keys().next_back()?;
        Some((min, max))
    }

    /// Latest release year in the movie table
    pub fn max_year(&self) -> Option<i32> {
        self.year_index.keys().next_back().copied()
    }

    /// Median of a numeric movie column, skipping missing values
    pub fn median(&self, field: NumericField) -> Option<f64> {
        let values: Vec<f64> = self.movies.iter().filter_map(|m| field.value(m)).collect();
        numeric::median(&values)
    }

    /// Name of the file the movie table was read from
    pub fn movie_source(&self) -> Option<&str> {
        self.movie_source.as_deref()
    }

    // Mutators - used while loading, before the index is shared

    /// Append a movie row. Call `finalize` once all rows are in.
    pub fn insert_movie(&mut self, movie: MovieRecord) {
        self.movies.push(movie);
    }

    pub fn insert_year_stat(&mut self, stat: GenreYearStat) {
        self.genre_year_stats.push(stat);
    }

    pub fn insert_overall_stat(&mut self, stat: GenreOverallStat) {
        self.genre_overall_stats.push(stat);
    }

    /// Get counts for debugging/validation: (movies, year stats, overall stats)
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.movies.len(),
            self.genre_year_stats.len(),
            self.genre_overall_stats.len(),
        )
    }
}

impl Default for DataIndex {
    fn default() -> Self {
        Self::new()
    }
}
