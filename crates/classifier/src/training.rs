//! Label encoding, stratified hold-out split and evaluation.

use crate::error::{ClassifierError, Result};
use crate::forest::{argmax, ForestConfig, RandomForest};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, instrument};

/// Maps class names to dense indices, sorted lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<S: AsRef<str>>(labels: &[S]) -> Self {
        let mut classes: Vec<String> = labels.iter().map(|l| l.as_ref().to_string()).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn decode(&self, idx: usize) -> Option<&str> {
        self.classes.get(idx).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingConfig {
    /// Share of each class held out for evaluation
    pub test_fraction: f64,
    /// Seed for the hold-out shuffle
    pub seed: u64,
    pub forest: ForestConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            forest: ForestConfig::default(),
        }
    }
}

/// Split positions into (train, test) with each class represented in both.
///
/// Every class holds out `max(1, round(fraction × count))` rows, capped so at
/// least one row stays in training.
pub fn stratified_split(
    y: &[usize],
    n_classes: usize,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ClassifierError::InvalidConfig(format!(
            "test fraction must be in (0, 1), got {}",
            test_fraction
        )));
    }

    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (i, &label) in y.iter().enumerate() {
        by_class[label].push(i);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(y.len());
    let mut test = Vec::new();
    for mut members in by_class {
        members.shuffle(&mut rng);
        let n_test = ((test_fraction * members.len() as f64).round() as usize)
            .max(1)
            .min(members.len().saturating_sub(1));
        test.extend_from_slice(&members[..n_test]);
        train.extend_from_slice(&members[n_test..]);
    }
    train.sort_unstable();
    test.sort_unstable();
    Ok((train, test))
}

pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Rows are true classes, columns predicted classes.
pub fn confusion_matrix(y_true: &[usize], y_pred: &[usize], n_classes: usize) -> Vec<Vec<u32>> {
    let mut matrix = vec![vec![0u32; n_classes]; n_classes];
    for (&t, &p) in y_true.iter().zip(y_pred) {
        matrix[t][p] += 1;
    }
    matrix
}

/// Hold-out metrics captured once at training time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Fraction in [0, 1]
    pub accuracy: f64,
    pub confusion_matrix: Vec<Vec<u32>>,
    pub train_size: usize,
    pub test_size: usize,
}

/// A forest together with its label encoding and hold-out evaluation.
#[derive(Debug, Clone)]
pub struct TrainedClassifier {
    forest: RandomForest,
    labels: LabelEncoder,
    evaluation: Evaluation,
}

impl TrainedClassifier {
    /// Stratified split, fit on the training part, evaluate on the rest.
    #[instrument(skip(x, labels, config), fields(rows = x.len()))]
    pub fn train<S: AsRef<str>>(
        x: &[Vec<f64>],
        labels: &[S],
        config: &TrainingConfig,
    ) -> Result<Self> {
        if x.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if x.len() != labels.len() {
            return Err(ClassifierError::InvalidInput(format!(
                "{} rows but {} labels",
                x.len(),
                labels.len()
            )));
        }

        let encoder = LabelEncoder::fit(labels);
        if encoder.len() < 2 {
            return Err(ClassifierError::TooFewClasses(encoder.len()));
        }
        let y: Vec<usize> = labels
            .iter()
            .filter_map(|l| encoder.encode(l.as_ref()))
            .collect();

        for (class_idx, class) in encoder.classes().iter().enumerate() {
            let count = y.iter().filter(|&&c| c == class_idx).count();
            if count < 2 {
                return Err(ClassifierError::ClassTooSmall {
                    class: class.clone(),
                    count,
                });
            }
        }

        let (train_idx, test_idx) =
            stratified_split(&y, encoder.len(), config.test_fraction, config.seed)?;
        let x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x[i].clone()).collect();
        let y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
        let x_test: Vec<Vec<f64>> = test_idx.iter().map(|&i| x[i].clone()).collect();
        let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

        let forest = RandomForest::fit(&x_train, &y_train, encoder.len(), &config.forest)?;
        let y_pred = forest.predict_batch(&x_test)?;

        let evaluation = Evaluation {
            accuracy: accuracy(&y_test, &y_pred),
            confusion_matrix: confusion_matrix(&y_test, &y_pred, encoder.len()),
            train_size: x_train.len(),
            test_size: x_test.len(),
        };
        info!(
            "Classifier trained: accuracy {:.2}% on {} held-out rows, classes {:?}",
            evaluation.accuracy * 100.0,
            evaluation.test_size,
            encoder.classes()
        );

        Ok(Self {
            forest,
            labels: encoder,
            evaluation,
        })
    }

    /// (class name, probability) pairs in class order.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<(String, f64)>> {
        let proba = self.forest.predict_proba(row)?;
        Ok(self
            .labels
            .classes()
            .iter()
            .cloned()
            .zip(proba)
            .collect())
    }

    /// Most probable class name.
    pub fn predict(&self, row: &[f64]) -> Result<String> {
        let proba = self.forest.predict_proba(row)?;
        let idx = argmax(&proba);
        self.labels
            .decode(idx)
            .map(str::to_string)
            .ok_or_else(|| ClassifierError::InvalidInput(format!("no class at index {}", idx)))
    }

    pub fn labels(&self) -> &LabelEncoder {
        &self.labels
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn feature_importances(&self) -> &[f64] {
        self.forest.feature_importances()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forest::MaxFeatures;

    #[test]
    fn test_label_encoder_sorts_classes() {
        let encoder = LabelEncoder::fit(&["Hit", "Flop", "Hit", "Average"]);
        assert_eq!(encoder.classes(), &["Average", "Flop", "Hit"]);
        assert_eq!(encoder.encode("Hit"), Some(2));
        assert_eq!(encoder.decode(1), Some("Flop"));
        assert_eq!(encoder.encode("Blockbuster"), None);
    }

    #[test]
    fn test_stratified_split_keeps_class_shares() {
        let y: Vec<usize> = (0..50).map(|i| usize::from(i >= 40)).collect();
        let (train, test) = stratified_split(&y, 2, 0.2, 42).unwrap();

        assert_eq!(train.len() + test.len(), 50);
        assert_eq!(test.iter().filter(|&&i| y[i] == 0).count(), 8);
        assert_eq!(test.iter().filter(|&&i| y[i] == 1).count(), 2);

        // Same seed, same split
        assert_eq!(stratified_split(&y, 2, 0.2, 42).unwrap(), (train, test));
    }

    #[test]
    fn test_small_classes_keep_one_training_row() {
        let y = vec![0, 0, 1, 1, 1];
        let (train, test) = stratified_split(&y, 2, 0.2, 1).unwrap();
        assert_eq!(test.len(), 2);
        assert_eq!(train.len(), 3);
    }

    #[test]
    fn test_metrics() {
        let y_true = [0, 0, 1, 1];
        let y_pred = [0, 1, 1, 1];
        assert_eq!(accuracy(&y_true, &y_pred), 0.75);
        assert_eq!(confusion_matrix(&y_true, &y_pred, 2), vec![vec![1, 1], vec![0, 2]]);
    }

    #[test]
    fn test_train_rejects_degenerate_labels() {
        let x = vec![vec![1.0], vec![2.0], vec![3.0]];
        assert_eq!(
            TrainedClassifier::train(&x, &["Hit", "Hit", "Hit"], &TrainingConfig::default()).unwrap_err(),
            ClassifierError::TooFewClasses(1)
        );
        assert!(matches!(
            TrainedClassifier::train(&x, &["Hit", "Hit", "Flop"], &TrainingConfig::default()),
            Err(ClassifierError::ClassTooSmall { count: 1, .. })
        ));
    }

    #[test]
    fn test_train_and_evaluate() {
        let x: Vec<Vec<f64>> = (0..60).map(|i| vec![i as f64, (i % 3) as f64]).collect();
        let labels: Vec<&str> = (0..60).map(|i| if i < 30 { "Flop" } else { "Hit" }).collect();
        let config = TrainingConfig {
            forest: ForestConfig {
                n_trees: 15,
                max_features: MaxFeatures::All,
                ..Default::default()
            },
            ..Default::default()
        };

        let model = TrainedClassifier::train(&x, &labels, &config).unwrap();
        let eval = model.evaluation();
        assert_eq!(eval.test_size, 12);
        assert_eq!(eval.train_size, 48);
        assert!(eval.accuracy > 0.9);

        let total: u32 = eval.confusion_matrix.iter().flatten().sum();
        assert_eq!(total as usize, eval.test_size);

        assert_eq!(model.predict(&[55.0, 1.0]).unwrap(), "Hit");
        let proba = model.predict_proba(&[2.0, 1.0]).unwrap();
        assert_eq!(proba[0].0, "Flop");
        assert!(proba[0].1 > 0.5);
    }
}
