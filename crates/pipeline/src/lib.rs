//! Feature encoding and movie exploration.
//!
//! This crate provides:
//! - FeatureEncoder for turning movie descriptions into model input vectors
//! - Filter trait and implementations for narrowing the movie table
//! - FilterPipeline for composing filters
//! - The explorer (filter, sort, paginate)
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{explore, ExploreQuery, FeatureEncoder, MovieFeatures};
//!
//! let rows: Vec<MovieFeatures> = index.movies().iter().map(MovieFeatures::from_record).collect();
//! let encoder = FeatureEncoder::fit(&rows, true)?;
//! let matrix = encoder.encode_batch(&rows);
//!
//! let page = explore(&index, &ExploreQuery { genre: Some("Drama".into()), ..Default::default() })?;
//! ```

pub mod explorer;
pub mod features;
pub mod filter_pipeline;
pub mod filters;
pub mod traits;

// Re-export main types
pub use explorer::{explore, ExplorePage, ExploreQuery, ExploreRow, SortKey, SortOrder};
pub use features::{Feature, FeatureEncoder, FeatureSchema, MovieFeatures};
pub use filter_pipeline::FilterPipeline;
pub use traits::Filter;
