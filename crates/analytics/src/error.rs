//! Error types for the statistics engine.
//!
//! These cover structural problems with the loaded tables. A genre that
//! cannot be found or a query without enough data is not an error here;
//! it is reported through [`crate::Outcome::Unavailable`].

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    /// A table needed by the computation has no rows
    #[error("No rows in {0}")]
    EmptyTable(&'static str),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, AnalyticsError>;
