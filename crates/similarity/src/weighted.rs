//! Weighted multi-attribute similarity
//!
//! Scores every historical record against a query movie:
//!
//! | component | points                                   |
//! |-----------|------------------------------------------|
//! | genre     | 30 per shared genre token                |
//! | budget    | (1 - min(\|Δbudget\| / budget, 1)) × 25  |
//! | year      | (1 - min(\|Δyear\| / 10, 1)) × 15        |
//! | rating    | (1 - min(\|Δrating\| / 5, 1)) × 20       |
//! | runtime   | (1 - min(\|Δruntime\| / 100, 1)) × 10    |
//!
//! A record missing a field scores 0 for that component. A non-positive
//! query budget scores 0 on the budget component for every record.

use crate::types::{MovieQuery, SimilarMovie};
use data_loader::{DataIndex, MovieRecord};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Points awarded per component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    /// Per shared genre token
    pub genre: f64,
    pub budget: f64,
    pub year: f64,
    pub rating: f64,
    pub runtime: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            genre: 30.0,
            budget: 25.0,
            year: 15.0,
            rating: 20.0,
            runtime: 10.0,
        }
    }
}

const YEAR_SCALE: f64 = 10.0;
const RATING_SCALE: f64 = 5.0;
const RUNTIME_SCALE: f64 = 100.0;

/// Closeness in [0, 1]: 1 for identical values, 0 at or beyond `scale`.
fn closeness(diff: f64, scale: f64) -> f64 {
    1.0 - (diff.abs() / scale).clamp(0.0, 1.0)
}

/// Ranks historical movies by weighted similarity to a query
pub struct WeightedScorer {
    /// Shared reference to the data index (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,

    weights: SimilarityWeights,
}

impl WeightedScorer {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            weights: SimilarityWeights::default(),
        }
    }

    /// Score a single record against the query.
    pub fn score(&self, query: &MovieQuery, movie: &MovieRecord) -> f64 {
        let w = &self.weights;
        let mut score = query.shared_genres(movie) as f64 * w.genre;

        if query.budget > 0.0 && query.budget.is_finite() {
            if let Some(budget) = movie.budget {
                score += closeness(budget - query.budget, query.budget) * w.budget;
            }
        }
        if let Some(year) = movie.year {
            score += closeness(f64::from(year - query.year), YEAR_SCALE) * w.year;
        }
        if let Some(rating) = movie.imdb_rating {
            score += closeness(rating - query.imdb_rating, RATING_SCALE) * w.rating;
        }
        if let Some(runtime) = movie.runtime {
            score += closeness(runtime - query.runtime, RUNTIME_SCALE) * w.runtime;
        }
        score
    }

    /// Top `limit` records by score, highest first.
    ///
    /// Equal scores keep record order. Records with a non-finite score are
    /// left out.
    #[instrument(skip(self, query), fields(genres = query.genres.len()))]
    pub fn top_similar(&self, query: &MovieQuery, limit: usize) -> Vec<SimilarMovie> {
        let movies = self.data_index.movies();

        // par_iter + collect keeps record order, so the stable sort below breaks ties by position
        let mut scored: Vec<(usize, f64)> = movies
            .par_iter()
            .enumerate()
            .map(|(idx, movie)| (idx, self.score(query, movie)))
            .filter(|(_, score)| score.is_finite())
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        debug!("Scored {} movies, returning {}", movies.len(), scored.len());
        scored
            .into_iter()
            .map(|(idx, score)| SimilarMovie::from_record(idx, &movies[idx], score))
            .collect()
    }

    /// Mean ROI of the top `limit` similar movies, 0.0 when there are none.
    pub fn expected_roi(&self, query: &MovieQuery, limit: usize) -> f64 {
        let similar = self.top_similar(query, limit);
        let rois: Vec<f64> = similar.iter().map(|m| m.roi).collect();
        data_loader::numeric::mean(&rois).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(title: &str, genre: &str, budget: f64, year: i32, rating: f64, runtime: f64) -> MovieRecord {
        let mut m = MovieRecord::new(title, genre);
        m.budget = Some(budget);
        m.year = Some(year);
        m.imdb_rating = Some(rating);
        m.runtime = Some(runtime);
        m.roi = 1.0;
        m
    }

    fn create_test_index() -> Arc<DataIndex> {
        let movies = vec![
            movie("Same", "Action|Drama", 100.0, 2015, 7.0, 140.0),
            movie("Close", "Action", 120.0, 2016, 6.5, 130.0),
            movie("Far", "Comedy", 1000.0, 1990, 3.0, 90.0),
        ];
        Arc::new(DataIndex::from_parts(movies, vec![], vec![]).unwrap())
    }

    #[test]
    fn test_self_similarity_is_maximal() {
        let index = create_test_index();
        let scorer = WeightedScorer::new(Arc::clone(&index));
        let query = MovieQuery::new("Action|Drama", 100.0, 2015, 7.0, 140.0);

        let same = scorer.score(&query, &index.movies()[0]);
        assert_eq!(same, 2.0 * 30.0 + 25.0 + 15.0 + 20.0 + 10.0);

        let ranked = scorer.top_similar(&query, 3);
        assert_eq!(ranked[0].title, "Same");
        assert!(ranked[0].similarity_score > ranked[1].similarity_score);
    }

    #[test]
    fn test_component_scores() {
        let index = create_test_index();
        let scorer = WeightedScorer::new(Arc::clone(&index));
        let query = MovieQuery::new("Action", 100.0, 2015, 7.0, 140.0);

        // genre 30, budget (1 - 0.2) * 25, year 0.9 * 15, rating 0.9 * 20, runtime 0.9 * 10
        let expected = 30.0 + 20.0 + 13.5 + 18.0 + 9.0;
        assert!((scorer.score(&query, &index.movies()[1]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_fields_score_zero() {
        let scorer = WeightedScorer::new(create_test_index());
        let query = MovieQuery::new("Thriller", 100.0, 2015, 7.0, 140.0);
        let bare = MovieRecord::new("Bare", "Action");
        assert_eq!(scorer.score(&query, &bare), 0.0);

        let free = MovieQuery::new("Action", 0.0, 2015, 7.0, 140.0);
        let mut budget_only = MovieRecord::new("Budget", "");
        budget_only.budget = Some(0.0);
        assert_eq!(scorer.score(&free, &budget_only), 0.0);
    }

    #[test]
    fn test_ties_keep_record_order() {
        let movies = vec![
            movie("First", "Drama", 100.0, 2015, 7.0, 140.0),
            movie("Second", "Drama", 100.0, 2015, 7.0, 140.0),
        ];
        let index = Arc::new(DataIndex::from_parts(movies, vec![], vec![]).unwrap());
        let scorer = WeightedScorer::new(index);
        let query = MovieQuery::new("Drama", 100.0, 2015, 7.0, 140.0);

        let ranked = scorer.top_similar(&query, 1);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "First");
    }

    #[test]
    fn test_non_finite_fields_never_outrank_exact_match() {
        let mut junk = movie("Junk", "Horror", 0.0, 1980, 0.0, 0.0);
        junk.budget = Some(f64::NAN);
        junk.imdb_rating = Some(f64::INFINITY);
        let movies = vec![junk, movie("Exact", "Drama", 100.0, 2015, 7.0, 140.0)];
        let index = Arc::new(DataIndex::from_parts(movies, vec![], vec![]).unwrap());
        let scorer = WeightedScorer::new(index);
        let query = MovieQuery::new("Drama", 100.0, 2015, 7.0, 140.0);

        let ranked = scorer.top_similar(&query, 5);
        assert_eq!(ranked[0].title, "Exact");
        assert!(ranked.iter().all(|m| m.similarity_score.is_finite()));
    }

    #[test]
    fn test_expected_roi() {
        let scorer = WeightedScorer::new(create_test_index());
        let query = MovieQuery::new("Action", 100.0, 2015, 7.0, 140.0);
        assert_eq!(scorer.expected_roi(&query, 5), 1.0);
    }
}
