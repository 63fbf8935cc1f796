//! Binary CART classifier using Gini impurity.
//!
//! Splits are found by sorting each candidate feature once per node and
//! sweeping the class counts, so a node costs O(n log n) per feature.

use super::dataset::Dataset;
use rand::seq::SliceRandom;
use rand::Rng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeConfig {
    /// None grows until leaves are pure or too small to split.
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all).
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

#[derive(Debug, Clone)]
enum Node {
    /// Fraction of class-1 samples that reached this leaf.
    Leaf { probability: f64 },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    gain: f64,
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    config: TreeConfig,
    root: Option<Node>,
}

impl DecisionTree {
    pub fn new(config: TreeConfig) -> Self {
        Self { config, root: None }
    }

    /// Fits on the given row positions of `dataset` (duplicates allowed).
    pub fn fit<R: Rng>(&mut self, dataset: &Dataset, rows: &[usize], rng: &mut R) {
        self.root = if rows.is_empty() {
            None
        } else {
            Some(self.build(dataset, rows.to_vec(), 0, rng))
        };
    }

    /// Probability of class 1; an unfitted tree answers 0.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.0,
        };
        loop {
            match node {
                Node::Leaf { probability } => return *probability,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if features[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        self.root.as_ref().map_or(0, walk)
    }

    fn build<R: Rng>(
        &self,
        dataset: &Dataset,
        rows: Vec<usize>,
        depth: usize,
        rng: &mut R,
    ) -> Node {
        let n = rows.len();
        let positives = rows.iter().filter(|&&r| dataset.labels[r] == 1).count();
        let leaf = Node::Leaf {
            probability: positives as f64 / n as f64,
        };

        let depth_reached = self.config.max_depth.is_some_and(|max| depth >= max);
        if depth_reached
            || n < self.config.min_samples_split
            || positives == 0
            || positives == n
        {
            return leaf;
        }

        let Some(best) = self.find_best_split(dataset, &rows, positives, rng) else {
            return leaf;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| dataset.rows[r][best.feature] <= best.threshold);

        Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left: Box::new(self.build(dataset, left_rows, depth + 1, rng)),
            right: Box::new(self.build(dataset, right_rows, depth + 1, rng)),
        }
    }

    fn find_best_split<R: Rng>(
        &self,
        dataset: &Dataset,
        rows: &[usize],
        positives: usize,
        rng: &mut R,
    ) -> Option<BestSplit> {
        let n_features = dataset.n_features();
        let mut features: Vec<usize> = (0..n_features).collect();
        features.shuffle(rng);
        features.truncate(self.config.max_features.unwrap_or(n_features).max(1));

        let n = rows.len();
        let parent = gini(positives, n);
        let min_leaf = self.config.min_samples_leaf.max(1);
        let mut best: Option<BestSplit> = None;

        for feature in features {
            let mut column: Vec<(f64, u8)> = rows
                .iter()
                .map(|&r| (dataset.rows[r][feature], dataset.labels[r]))
                .collect();
            column.sort_by(|a, b| a.0.total_cmp(&b.0));

            let mut left_pos = 0usize;
            for i in 0..n - 1 {
                left_pos += usize::from(column[i].1);
                let left_n = i + 1;
                let right_n = n - left_n;
                if column[i].0 == column[i + 1].0 || left_n < min_leaf || right_n < min_leaf {
                    continue;
                }

                let weighted = (left_n as f64 * gini(left_pos, left_n)
                    + right_n as f64 * gini(positives - left_pos, right_n))
                    / n as f64;
                let gain = parent - weighted;
                if gain > best.as_ref().map_or(0.0, |b| b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (column[i].0 + column[i + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }
}

fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    2.0 * p * (1.0 - p)
}
