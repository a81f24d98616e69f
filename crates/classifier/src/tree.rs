//! CART decision tree with weighted Gini impurity.
//!
//! ## Algorithm
//! 1. At each node draw `max_features` candidate features without replacement
//! 2. For each candidate, sort the node's samples by that feature and sweep
//!    every threshold between two distinct consecutive values
//! 3. Keep the split with the lowest weighted child impurity
//! 4. Stop on max depth, on fewer than `min_samples_split` samples, or on a pure node
//!
//! Samples may repeat (bootstrap draws); each draw counts once with its
//! class weight.

use rand::rngs::StdRng;
use rand::seq::index;

/// Growth limits for a single tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    pub max_depth: usize,
    pub min_samples_split: usize,
    /// Candidate features per split, clamped to [1, n_features]
    pub max_features: usize,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf {
        /// Weighted class fractions, summing to 1
        distribution: Vec<f64>,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A fitted tree. Node 0 is the root.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    /// Total weighted impurity decrease per feature (not normalised)
    importances: Vec<f64>,
}

struct Split {
    feature: usize,
    threshold: f64,
    /// Σ weight × gini over both children
    child_impurity: f64,
}

/// Gini impurity from weighted class counts.
fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|c| (c / total).powi(2)).sum::<f64>()
}

struct Builder<'a> {
    x: &'a [Vec<f64>],
    y: &'a [usize],
    class_weight: &'a [f64],
    n_classes: usize,
    n_features: usize,
    config: TreeConfig,
    nodes: Vec<Node>,
    importances: Vec<f64>,
}

impl<'a> Builder<'a> {
    fn class_counts(&self, samples: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in samples {
            counts[self.y[i]] += self.class_weight[self.y[i]];
        }
        counts
    }

    fn grow(&mut self, samples: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(&samples);
        let total: f64 = counts.iter().sum();
        let impurity = gini(&counts, total);

        let can_split = depth < self.config.max_depth
            && samples.len() >= self.config.min_samples_split
            && impurity > 0.0;

        if can_split {
            if let Some(split) = self.best_split(&samples, &counts, total, rng) {
                self.importances[split.feature] += total * impurity - split.child_impurity;

                let x = self.x;
                let (left, right): (Vec<usize>, Vec<usize>) = samples
                    .into_iter()
                    .partition(|&i| x[i][split.feature] <= split.threshold);

                // Reserve the slot so the parent precedes its children
                let id = self.nodes.len();
                self.nodes.push(Node::Leaf {
                    distribution: Vec::new(),
                });
                let left = self.grow(left, depth + 1, rng);
                let right = self.grow(right, depth + 1, rng);
                self.nodes[id] = Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left,
                    right,
                };
                return id;
            }
        }

        let distribution = if total > 0.0 {
            counts.iter().map(|c| c / total).collect()
        } else {
            vec![1.0 / self.n_classes as f64; self.n_classes]
        };
        let id = self.nodes.len();
        self.nodes.push(Node::Leaf { distribution });
        id
    }

    fn best_split(
        &self,
        samples: &[usize],
        parent: &[f64],
        total: f64,
        rng: &mut StdRng,
    ) -> Option<Split> {
        let k = self.config.max_features.clamp(1, self.n_features);
        let candidates = index::sample(rng, self.n_features, k);

        let mut order = samples.to_vec();
        let mut left = vec![0.0; self.n_classes];
        let mut best: Option<Split> = None;

        for feature in candidates.iter() {
            let x = self.x;
            order.sort_by(|&a, &b| x[a][feature].total_cmp(&x[b][feature]));
            left.iter_mut().for_each(|c| *c = 0.0);
            let mut left_total = 0.0;

            for pos in 0..order.len().saturating_sub(1) {
                let i = order[pos];
                let class = self.y[i];
                let w = self.class_weight[class];
                left[class] += w;
                left_total += w;

                let current = x[i][feature];
                let next = x[order[pos + 1]][feature];
                if next <= current {
                    continue;
                }

                let right_total = total - left_total;
                if left_total <= 0.0 || right_total <= 0.0 {
                    continue;
                }

                let left_sq: f64 = left.iter().map(|c| (c / left_total).powi(2)).sum();
                let right_sq: f64 = parent
                    .iter()
                    .zip(&left)
                    .map(|(p, l)| ((p - l) / right_total).powi(2))
                    .sum();
                let child = left_total * (1.0 - left_sq) + right_total * (1.0 - right_sq);

                if best.as_ref().map_or(true, |b| child < b.child_impurity) {
                    let mut threshold = current / 2.0 + next / 2.0;
                    if threshold >= next || !threshold.is_finite() {
                        threshold = current;
                    }
                    best = Some(Split {
                        feature,
                        threshold,
                        child_impurity: child,
                    });
                }
            }
        }
        best
    }
}

impl DecisionTree {
    /// Grow a tree on the given sample positions (repeats allowed).
    ///
    /// Callers guarantee `samples` is non-empty, every row of `x` has the
    /// same width and every label is below `class_weight.len()`.
    pub fn fit(
        x: &[Vec<f64>],
        y: &[usize],
        samples: Vec<usize>,
        class_weight: &[f64],
        config: TreeConfig,
        rng: &mut StdRng,
    ) -> Self {
        let n_features = x.first().map_or(0, Vec::len);
        let mut builder = Builder {
            x,
            y,
            class_weight,
            n_classes: class_weight.len(),
            n_features,
            config,
            nodes: Vec::new(),
            importances: vec![0.0; n_features],
        };
        if n_features == 0 {
            // Nothing to split on: a single leaf
            builder.config.max_depth = 0;
        }
        builder.grow(samples, 0, rng);

        Self {
            nodes: builder.nodes,
            importances: builder.importances,
        }
    }

    /// Class distribution of the leaf the row falls into.
    pub fn predict_proba(&self, row: &[f64]) -> &[f64] {
        let mut id = 0;
        loop {
            match &self.nodes[id] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    id = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Longest root-to-leaf path, in edges
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], id: usize) -> usize {
            match &nodes[id] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }
}
