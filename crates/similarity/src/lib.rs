//! # Similarity Crate
//!
//! Ranks historical movies against a query movie.
//!
//! ## Components
//!
//! ### Weighted scorer
//! Multi-attribute score over genre overlap, budget, year, rating and runtime.
//! Used for expected-ROI estimation and as evidence next to a prediction.
//!
//! ### Budget-cluster scorer
//! Genre-filtered nearest neighbours on a log budget scale, used by the
//! investment simulator.
//!
//! ## Example Usage
//!
//! ```ignore
//! use similarity::{MovieQuery, WeightedScorer, BudgetClusterScorer};
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_dir(Path::new("data"))?);
//!
//! let scorer = WeightedScorer::new(data_index.clone());
//! let query = MovieQuery::new("Action|Drama", 5.0e8, 2019, 7.1, 140.0);
//! let similar = scorer.top_similar(&query, 5);
//!
//! let cluster = BudgetClusterScorer::new(data_index.clone());
//! let neighbours = cluster.nearest("Action", 5.0e8);
//! ```

pub mod budget_cluster;
pub mod types;
pub mod weighted;

pub use budget_cluster::BudgetClusterScorer;
pub use types::{genre_set, BudgetNeighbor, MovieQuery, SimilarMovie};
pub use weighted::{SimilarityWeights, WeightedScorer};
