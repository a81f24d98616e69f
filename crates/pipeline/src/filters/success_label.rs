//! Filter on the upstream success label.

use super::is_wildcard;
use crate::traits::Filter;
use anyhow::Result;
use data_loader::{DataIndex, MovieIdx};

/// Keeps movies whose success label equals the given label exactly.
pub struct SuccessLabelFilter {
    label: String,
}

impl SuccessLabelFilter {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Build from an optional query parameter; empty or `"All"` means no filter.
    pub fn from_param(label: Option<&str>) -> Option<Self> {
        label.filter(|l| !is_wildcard(l)).map(Self::new)
    }
}

impl Filter for SuccessLabelFilter {
    fn name(&self) -> &str {
        "SuccessLabelFilter"
    }

    fn apply(&self, movies: Vec<MovieIdx>, index: &DataIndex) -> Result<Vec<MovieIdx>> {
        Ok(movies
            .into_iter()
            .filter(|&idx| {
                index
                    .get_movie(idx)
                    .and_then(|m| m.success_label.as_deref())
                    == Some(self.label.as_str())
            })
            .collect())
    }
}
