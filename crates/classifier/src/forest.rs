//! Random forest of CART trees.
//!
//! Trees are grown in parallel. Tree `t` draws its bootstrap sample and its
//! split candidates from an RNG seeded with `seed + t`, so a forest is fully
//! reproducible regardless of thread scheduling.

use crate::error::{ClassifierError, Result};
use crate::tree::{DecisionTree, TreeConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info, instrument};

/// How many features each split considers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaxFeatures {
    /// floor(√n_features), at least 1
    Sqrt,
    All,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::All => n_features,
            MaxFeatures::Fixed(k) => k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Forest hyper-parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: usize,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    /// Weight classes by n_samples / (n_classes × class_count)
    pub balanced_class_weight: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: 10,
            min_samples_split: 5,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            balanced_class_weight: true,
            seed: 42,
        }
    }
}

/// `n / (k × count_c)` per class; classes absent from `y` get weight 0.
pub fn balanced_class_weights(y: &[usize], n_classes: usize) -> Vec<f64> {
    let mut counts = vec![0usize; n_classes];
    for &label in y {
        counts[label] += 1;
    }
    let n = y.len() as f64;
    counts
        .into_iter()
        .map(|c| {
            if c == 0 {
                0.0
            } else {
                n / (n_classes as f64 * c as f64)
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
    /// Mean decrease in impurity, normalised to sum to 1
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit a forest on `x` (one row per sample) and labels `y` in `0..n_classes`.
    #[instrument(skip(x, y), fields(rows = x.len()))]
    pub fn fit(x: &[Vec<f64>], y: &[usize], n_classes: usize, config: &ForestConfig) -> Result<Self> {
        if x.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if x.len() != y.len() {
            return Err(ClassifierError::InvalidInput(format!(
                "{} rows but {} labels",
                x.len(),
                y.len()
            )));
        }
        if config.n_trees == 0 {
            return Err(ClassifierError::InvalidConfig("n_trees must be positive".into()));
        }
        let n_features = x[0].len();
        if let Some(row) = x.iter().find(|r| r.len() != n_features) {
            return Err(ClassifierError::DimensionMismatch {
                expected: n_features,
                got: row.len(),
            });
        }
        if let Some(&label) = y.iter().find(|&&l| l >= n_classes) {
            return Err(ClassifierError::InvalidInput(format!(
                "label {} out of range for {} classes",
                label, n_classes
            )));
        }

        let class_weight = if config.balanced_class_weight {
            balanced_class_weights(y, n_classes)
        } else {
            vec![1.0; n_classes]
        };
        let tree_config = TreeConfig {
            max_depth: config.max_depth,
            min_samples_split: config.min_samples_split,
            max_features: config.max_features.resolve(n_features),
        };
        let n = x.len();

        let trees: Vec<DecisionTree> = (0..config.n_trees)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(t as u64));
                let samples: Vec<usize> = if config.bootstrap {
                    (0..n).map(|_| rng.random_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x, y, samples, &class_weight, tree_config, &mut rng)
            })
            .collect();

        let importances = Self::aggregate_importances(&trees, n_features);
        let nodes: usize = trees.iter().map(DecisionTree::node_count).sum();
        info!(
            "Grew {} trees ({} nodes) over {} rows x {} features",
            trees.len(),
            nodes,
            n,
            n_features
        );

        Ok(Self {
            trees,
            n_classes,
            n_features,
            importances,
        })
    }

    /// Per-tree importances normalised, averaged, then normalised again.
    fn aggregate_importances(trees: &[DecisionTree], n_features: usize) -> Vec<f64> {
        let mut total = vec![0.0; n_features];
        for tree in trees {
            let sum: f64 = tree.importances().iter().sum();
            if sum > 0.0 {
                for (acc, imp) in total.iter_mut().zip(tree.importances()) {
                    *acc += imp / sum;
                }
            }
        }
        let sum: f64 = total.iter().sum();
        if sum > 0.0 {
            total.iter_mut().for_each(|v| *v /= sum);
        } else {
            debug!("No tree made a split, feature importances are all zero");
        }
        total
    }

    fn check_row(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.n_features,
                got: row.len(),
            });
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(ClassifierError::InvalidInput(
                "feature vector contains a non-finite value".into(),
            ));
        }
        Ok(())
    }

    /// Mean of the per-tree leaf distributions.
    pub fn predict_proba(&self, row: &[f64]) -> Result<Vec<f64>> {
        self.check_row(row)?;
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (acc, p) in proba.iter_mut().zip(tree.predict_proba(row)) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n);
        Ok(proba)
    }

    /// Most probable class; the lowest index wins ties.
    pub fn predict(&self, row: &[f64]) -> Result<usize> {
        let proba = self.predict_proba(row)?;
        Ok(argmax(&proba))
    }

    pub fn predict_batch(&self, rows: &[Vec<f64>]) -> Result<Vec<usize>> {
        rows.par_iter().map(|row| self.predict(row)).collect()
    }

    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }
}

pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate() {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Class 1 iff feature 0 > 50; feature 1 is noise.
    fn threshold_data() -> (Vec<Vec<f64>>, Vec<usize>) {
        let x: Vec<Vec<f64>> = (0..100)
            .map(|i| vec![i as f64, ((i * 37) % 11) as f64])
            .collect();
        let y = (0..100).map(|i| usize::from(i > 50)).collect();
        (x, y)
    }

    fn small_config() -> ForestConfig {
        ForestConfig {
            n_trees: 10,
            max_features: MaxFeatures::All,
            ..Default::default()
        }
    }

    #[test]
    fn test_learns_threshold() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();

        assert_eq!(forest.predict(&[5.0, 3.0]).unwrap(), 0);
        assert_eq!(forest.predict(&[95.0, 3.0]).unwrap(), 1);

        let proba = forest.predict_proba(&[95.0, 3.0]).unwrap();
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_importances_sum_to_one() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let importances = forest.feature_importances();

        assert!((importances.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(importances[0] > importances[1]);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let (x, y) = threshold_data();
        let a = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        let b = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        for row in [[10.0, 1.0], [50.0, 4.0], [51.0, 9.0]] {
            assert_eq!(a.predict_proba(&row).unwrap(), b.predict_proba(&row).unwrap());
        }
        assert_eq!(a.feature_importances(), b.feature_importances());
    }

    #[test]
    fn test_rejects_bad_rows() {
        let (x, y) = threshold_data();
        let forest = RandomForest::fit(&x, &y, 2, &small_config()).unwrap();
        assert!(matches!(
            forest.predict(&[1.0]),
            Err(ClassifierError::DimensionMismatch { expected: 2, got: 1 })
        ));
        assert!(forest.predict(&[f64::NAN, 1.0]).is_err());
        assert!(matches!(
            RandomForest::fit(&[], &[], 2, &small_config()),
            Err(ClassifierError::EmptyTrainingSet)
        ));
    }

    #[test]
    fn test_balanced_class_weights() {
        let weights = balanced_class_weights(&[0, 0, 0, 1], 3);
        assert!((weights[0] - 4.0 / 9.0).abs() < 1e-12);
        assert!((weights[1] - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(weights[2], 0.0);
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Sqrt.resolve(30), 5);
        assert_eq!(MaxFeatures::Sqrt.resolve(1), 1);
        assert_eq!(MaxFeatures::Fixed(50).resolve(10), 10);
    }
}
