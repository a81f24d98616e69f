//! In-process Hit/Flop classifier.
//!
//! This crate provides:
//! - A CART decision tree with weighted Gini impurity
//! - A random forest grown in parallel with reproducible per-tree seeds
//! - Label encoding, a stratified hold-out split and evaluation metrics
//!
//! It works on plain numeric matrices; turning movies into rows is the
//! feature encoder's job.
//!
//! ## Example Usage
//! ```ignore
//! use classifier::{TrainedClassifier, TrainingConfig};
//!
//! let model = TrainedClassifier::train(&matrix, &labels, &TrainingConfig::default())?;
//! println!("held-out accuracy: {:.2}", model.evaluation().accuracy);
//!
//! let probabilities = model.predict_proba(&encoded_row)?;
//! ```

pub mod error;
pub mod forest;
pub mod training;
pub mod tree;

pub use error::{ClassifierError, Result};
pub use forest::{balanced_class_weights, ForestConfig, MaxFeatures, RandomForest};
pub use training::{
    accuracy, confusion_matrix, stratified_split, Evaluation, LabelEncoder, TrainedClassifier,
    TrainingConfig,
};
pub use tree::{DecisionTree, TreeConfig};
