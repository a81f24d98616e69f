//! Budget-cluster neighbours for the investment simulator
//!
//! Restricts to records sharing at least one genre token with the query
//! (falling back to every record when none do) and ranks them by
//! `|ln(1 + budget_a) - ln(1 + budget_b)|`, closest first. Records without
//! a budget are skipped.

use crate::types::{genre_set, shared_genre_count, BudgetNeighbor};
use data_loader::DataIndex;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Neighbours returned when no limit is configured
pub const DEFAULT_CLUSTER_SIZE: usize = 10;

pub struct BudgetClusterScorer {
    data_index: Arc<DataIndex>,
    limit: usize,
}

impl BudgetClusterScorer {
    pub fn new(data_index: Arc<DataIndex>) -> Self {
        Self {
            data_index,
            limit: DEFAULT_CLUSTER_SIZE,
        }
    }

    /// Configure how many neighbours to return (default: 10)
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    #[instrument(skip(self))]
    pub fn nearest(&self, genre: &str, budget: f64) -> Vec<BudgetNeighbor> {
        let genres = genre_set(genre);
        let movies = self.data_index.movies();

        let mut pool: Vec<usize> = (0..movies.len())
            .filter(|&i| shared_genre_count(&genres, &movies[i]) > 0)
            .collect();
        if pool.is_empty() {
            debug!("No genre overlap for {:?}, using all movies", genre);
            pool = (0..movies.len()).collect();
        }

        let target = budget.ln_1p();
        let mut ranked: Vec<(usize, f64)> = pool
            .into_iter()
            .filter_map(|i| {
                movies[i]
                    .budget
                    .map(|b| (i, (b.ln_1p() - target).abs()))
                    .filter(|(_, d)| !d.is_nan())
            })
            .collect();

        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked.truncate(self.limit);

        ranked
            .into_iter()
            .map(|(idx, distance)| {
                let movie = &movies[idx];
                BudgetNeighbor {
                    idx,
                    title: movie.title.clone(),
                    year: movie.year,
                    roi: data_loader::numeric::round2(movie.roi),
                    success_label: movie.success_label.clone(),
                    budget_distance: distance,
                }
            })
            .collect()
    }

    /// Mean ROI of the neighbours, 0.0 when there are none.
    pub fn expected_roi(&self, genre: &str, budget: f64) -> f64 {
        let rois: Vec<f64> = self.nearest(genre, budget).iter().map(|n| n.roi).collect();
        data_loader::numeric::mean(&rois).unwrap_or(0.0)
    }
}
