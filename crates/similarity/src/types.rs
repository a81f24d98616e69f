//! Query and result types shared by the similarity scorers.

use data_loader::{parser::normalize_genre_separators, split_genres, MovieIdx, MovieRecord};
use serde::Serialize;
use std::collections::HashSet;

/// A movie description to compare against the historical records.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieQuery {
    /// Genre tokens of the query, de-duplicated
    pub genres: HashSet<String>,
    pub budget: f64,
    pub year: i32,
    pub imdb_rating: f64,
    pub runtime: f64,
}

impl MovieQuery {
    /// Build a query from a raw genre string (`"Action|Drama"` or `"Action, Drama"`).
    pub fn new(genre: &str, budget: f64, year: i32, imdb_rating: f64, runtime: f64) -> Self {
        Self {
            genres: genre_set(genre),
            budget,
            year,
            imdb_rating,
            runtime,
        }
    }

    /// Number of genre tokens shared with a record
    pub fn shared_genres(&self, movie: &MovieRecord) -> usize {
        shared_genre_count(&self.genres, movie)
    }
}

/// Normalised, de-duplicated genre tokens of a raw genre string.
pub fn genre_set(genre: &str) -> HashSet<String> {
    split_genres(&normalize_genre_separators(genre))
        .map(str::to_string)
        .collect()
}

pub(crate) fn shared_genre_count(genres: &HashSet<String>, movie: &MovieRecord) -> usize {
    let tokens: HashSet<&str> = movie.genre_tokens().collect();
    tokens.iter().filter(|g| genres.contains(**g)).count()
}

/// A historical movie ranked by the weighted scorer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarMovie {
    #[serde(skip)]
    pub idx: MovieIdx,
    pub title: String,
    pub year: Option<i32>,
    pub genre: String,
    pub budget: Option<f64>,
    pub box_office: Option<f64>,
    pub roi: f64,
    pub success_label: Option<String>,
    pub similarity_score: f64,
}

impl SimilarMovie {
    pub(crate) fn from_record(idx: MovieIdx, movie: &MovieRecord, score: f64) -> Self {
        Self {
            idx,
            title: movie.title.clone(),
            year: movie.year,
            genre: movie.genre.clone(),
            budget: movie.budget,
            box_office: movie.box_office,
            roi: data_loader::numeric::round2(movie.roi),
            success_label: movie.success_label.clone(),
            similarity_score: data_loader::numeric::round2(score),
        }
    }
}

/// A historical movie ranked by log-budget distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetNeighbor {
    #[serde(skip)]
    pub idx: MovieIdx,
    pub title: String,
    pub year: Option<i32>,
    pub roi: f64,
    pub success_label: Option<String>,
    #[serde(skip)]
    pub budget_distance: f64,
}
