//! # Data Loader Crate
//!
//! Loads the three movie analytics tables into memory and indexes them.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (MovieRecord, GenreYearStat, GenreOverallStat, DataIndex)
//! - **parser**: Parse the CSV tables into Rust structs
//! - **index**: Build secondary indices and derived columns
//! - **numeric**: Mean / median / sample standard deviation helpers
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_dir(Path::new("data"))?;
//!
//! let drama = index.get_overall_stat("Drama").unwrap();
//! let dramas = index.get_movies_by_genre("Drama");
//!
//! println!("{} dramas, ROI volatility {:.2}", dramas.len(), drama.roi_volatility);
//! ```

// Public modules
pub mod error;
pub mod index;
pub mod numeric;
pub mod parser;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use index::{
    FALLBACK_MOVIES_FILE, GENRE_OVERALL_STATS_FILE, GENRE_YEAR_STATS_FILE, MASTER_MOVIES_FILE,
};
pub use types::{
    split_genres, DataIndex, GenreOverallStat, GenreYearStat, MovieIdx, MovieRecord,
    NumericField, GENRE_SEPARATOR, HIT_LABEL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_index_creation() {
        let index = DataIndex::new();
        let (movies, year_stats, overall_stats) = index.counts();

        assert_eq!(movies, 0);
        assert_eq!(year_stats, 0);
        assert_eq!(overall_stats, 0);
    }

    #[test]
    fn test_insert_movie() {
        let mut index = DataIndex::new();

        let mut movie = MovieRecord::new("Dangal", "Action|Biography|Drama");
        movie.year = Some(2016);
        movie.success_label = Some(HIT_LABEL.to_string());

        index.insert_movie(movie);

        let retrieved = index.get_movie(0).unwrap();
        assert_eq!(retrieved.title, "Dangal");
        assert!(retrieved.is_hit());
        assert!(retrieved.is_combination());
        assert!(retrieved.has_genre("Biography"));
        assert!(!retrieved.has_genre("Bio"));
        assert_eq!(retrieved.genre_tokens().count(), 3);
    }

    #[test]
    fn test_median_skips_missing_values() {
        let mut index = DataIndex::new();
        for (i, rating) in [Some(6.0), None, Some(8.0), Some(7.0)].into_iter().enumerate() {
            let mut movie = MovieRecord::new(format!("M{}", i), "Drama");
            movie.imdb_rating = rating;
            index.insert_movie(movie);
        }
        assert_eq!(index.median(NumericField::ImdbRating), Some(7.0));
        assert_eq!(index.median(NumericField::Runtime), None);
    }

    #[test]
    fn test_empty_queries() {
        let index = DataIndex::new();

        assert!(index.get_movie(999).is_none());
        assert!(index.get_overall_stat("Drama").is_none());
        assert!(index.get_movies_by_genre("Drama").is_empty());
        assert!(index.get_movies_by_year(2020).is_empty());
        assert!(index.year_range().is_none());
    }
}
