//! Filter on release year.

use crate::traits::Filter;
use anyhow::{bail, Result};
use data_loader::{DataIndex, MovieIdx};

/// Keeps movies released within an inclusive year range.
///
/// ## Algorithm
/// 1. Movies without a year are dropped
/// 2. Keep movies with `start <= year <= end`
pub struct YearRangeFilter {
    start: i32,
    end: i32,
}

impl YearRangeFilter {
    pub fn new(start: i32, end: i32) -> Result<Self> {
        if start > end {
            bail!("Invalid year range: {} > {}", start, end);
        }
        Ok(Self { start, end })
    }

    /// Build from optional bounds; the range only applies when both are given.
    pub fn from_bounds(start: Option<i32>, end: Option<i32>) -> Result<Option<Self>> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end).map(Some),
            _ => Ok(None),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

impl Filter for YearRangeFilter {
    fn name(&self) -> &str {
        "YearRangeFilter"
    }

    fn apply(&self, movies: Vec<MovieIdx>, index: &DataIndex) -> Result<Vec<MovieIdx>> {
        Ok(movies
            .into_iter()
            .filter(|&idx| {
                index
                    .get_movie(idx)
                    .and_then(|m| m.year)
                    .is_some_and(|year| self.contains(year))
            })
            .collect())
    }
}
