//! Bagged ensemble of decision trees with soft voting.

use super::dataset::{bootstrap, Dataset};
use super::decision_tree::{DecisionTree, TreeConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    /// Features per split; defaults to ceil(sqrt(n_features)).
    pub max_features: Option<usize>,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    config: ForestConfig,
    trees: Vec<DecisionTree>,
}

impl RandomForest {
    pub fn new(config: ForestConfig) -> Self {
        Self {
            config,
            trees: Vec::new(),
        }
    }

    /// Builds every tree in parallel. Tree `i` owns an RNG seeded with
    /// `seed + i`, so the fitted forest does not depend on thread scheduling.
    pub fn fit(&mut self, dataset: &Dataset, rows: &[usize]) {
        let n_features = dataset.n_features();
        let max_features = self
            .config
            .max_features
            .unwrap_or_else(|| (n_features as f64).sqrt().ceil() as usize);
        let tree_config = TreeConfig {
            max_depth: self.config.max_depth,
            min_samples_split: self.config.min_samples_split,
            min_samples_leaf: self.config.min_samples_leaf,
            max_features: Some(max_features),
        };
        let config = self.config;

        self.trees = (0..config.n_trees)
            .into_par_iter()
            .map(|i| {
                let mut rng = ChaCha8Rng::seed_from_u64(config.seed.wrapping_add(i as u64));
                let sample = if config.bootstrap {
                    bootstrap(rows, &mut rng)
                } else {
                    rows.to_vec()
                };
                let mut tree = DecisionTree::new(tree_config);
                tree.fit(dataset, &sample, &mut rng);
                tree
            })
            .collect();
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    /// Mean class-1 probability over all trees.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_proba(features)).sum();
        sum / self.trees.len() as f64
    }

    pub fn predict(&self, features: &[f64]) -> u8 {
        u8::from(self.predict_proba(features) > 0.5)
    }

    /// Fraction of `rows` whose prediction matches the label.
    pub fn accuracy(&self, dataset: &Dataset, rows: &[usize]) -> Option<f64> {
        if rows.is_empty() {
            return None;
        }
        let correct = rows
            .iter()
            .filter(|&&r| self.predict(&dataset.rows[r]) == dataset.labels[r])
            .count();
        Some(correct as f64 / rows.len() as f64)
    }
}
