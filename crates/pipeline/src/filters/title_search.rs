//! Free-text title search.

use crate::traits::Filter;
use anyhow::Result;
use data_loader::{DataIndex, MovieIdx};

/// Keeps movies whose title contains the search text, ignoring case.
///
/// The text is matched literally, never as a pattern.
pub struct TitleSearchFilter {
    needle: String,
}

impl TitleSearchFilter {
    pub fn new(search: &str) -> Self {
        Self {
            needle: search.trim().to_lowercase(),
        }
    }

    /// Build from an optional query parameter; empty text means no filter.
    pub fn from_param(search: Option<&str>) -> Option<Self> {
        search
            .filter(|s| !s.trim().is_empty())
            .map(Self::new)
    }
}

impl Filter for TitleSearchFilter {
    fn name(&self) -> &str {
        "TitleSearchFilter"
    }

    fn apply(&self, movies: Vec<MovieIdx>, index: &DataIndex) -> Result<Vec<MovieIdx>> {
        Ok(movies
            .into_iter()
            .filter(|&idx| {
                index
                    .get_movie(idx)
                    .is_some_and(|m| m.title.to_lowercase().contains(&self.needle))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::MovieRecord;

    #[test]
    fn test_title_search_is_case_insensitive_and_literal() {
        let movies = vec![
            MovieRecord::new("Dilwale Dulhania Le Jayenge", "Romance"),
            MovieRecord::new("Dil Chahta Hai", "Comedy|Drama"),
            MovieRecord::new("Sholay (1975)", "Action"),
        ];
        let index = DataIndex::from_parts(movies, vec![], vec![]).unwrap();

        let filter = TitleSearchFilter::new("DIL");
        assert_eq!(filter.apply(vec![0, 1, 2], &index).unwrap(), vec![0, 1]);

        // Parentheses are plain characters
        let filter = TitleSearchFilter::new("(1975)");
        assert_eq!(filter.apply(vec![0, 1, 2], &index).unwrap(), vec![2]);

        assert!(TitleSearchFilter::from_param(Some("  ")).is_none());
        assert!(TitleSearchFilter::from_param(None).is_none());
    }
}
