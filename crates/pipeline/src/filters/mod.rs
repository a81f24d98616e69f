//! Filter implementations for the movie explorer.
//!
//! This module contains all the concrete filter implementations
//! that can be composed into a FilterPipeline.

pub mod genre_contains;
pub mod success_label;
pub mod title_search;
pub mod year_range;

// Re-export for convenience
pub use genre_contains::GenreContainsFilter;
pub use success_label::SuccessLabelFilter;
pub use title_search::TitleSearchFilter;
pub use year_range::YearRangeFilter;

/// Query values that mean "no filter".
pub(crate) fn is_wildcard(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value.eq_ignore_ascii_case("all")
}
