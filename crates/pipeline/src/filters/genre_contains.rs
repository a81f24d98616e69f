//! Genre filter for the explorer.

use super::is_wildcard;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{DataIndex, MovieIdx};

/// Keeps movies whose genre string contains the given text, ignoring case.
///
/// ## Algorithm
/// Substring match against the whole pipe-joined genre string, so
/// `"drama"` matches both `"Drama"` and `"Action|Drama"`.
pub struct GenreContainsFilter {
    needle: String,
}

impl GenreContainsFilter {
    pub fn new(genre: &str) -> Self {
        Self {
            needle: genre.trim().to_lowercase(),
        }
    }

    /// Build from an optional query parameter; empty or `"All"` means no filter.
    pub fn from_param(genre: Option<&str>) -> Option<Self> {
        genre.filter(|g| !is_wildcard(g)).map(Self::new)
    }
}

impl Filter for GenreContainsFilter {
    fn name(&self) -> &str {
        "GenreContainsFilter"
    }

    fn apply(&self, movies: Vec<MovieIdx>, index: &DataIndex) -> Result<Vec<MovieIdx>> {
        Ok(movies
            .into_iter()
            .filter(|&idx| {
                index
                    .get_movie(idx)
                    .is_some_and(|m| m.genre.to_lowercase().contains(&self.needle))
            })
            .collect())
    }
}
