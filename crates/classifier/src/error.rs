//! Error types for training and scoring.

use thiserror::Error;

/// Errors that can occur while training or querying the classifier
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Training set is empty")]
    EmptyTrainingSet,

    #[error("Training needs at least 2 classes, found {0}")]
    TooFewClasses(usize),

    #[error("Class '{class}' has {count} rows, at least 2 are needed for a stratified split")]
    ClassTooSmall { class: String, count: usize },

    #[error("Expected {expected} features, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Invalid training configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, ClassifierError>;
