//! Core traits for the explorer pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! extensible filters to be applied to a set of movie positions.

use anyhow::Result;
use data_loader::{DataIndex, MovieIdx};

/// Core trait for filtering movies.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows filters to be shared by concurrent request handlers
/// - Filters take ownership of the Vec<MovieIdx> and return a filtered Vec
/// - Positions are kept in their input order
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Apply this filter to a set of movie positions.
    ///
    /// # Arguments
    /// * `movies` - Positions into `index.movies()` (takes ownership)
    /// * `index` - The loaded tables
    fn apply(&self, movies: Vec<MovieIdx>, index: &DataIndex) -> Result<Vec<MovieIdx>>;
}
