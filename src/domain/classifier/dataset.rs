//! Feature rows, labels, and the sampling helpers used by the forest.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Labeled feature matrix. `bar_indices[r]` is the bar that row `r` describes.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<u8>,
    pub bar_indices: Vec<usize>,
}

/// Row positions of a shuffled train/test split.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Dataset {
    pub fn new(feature_names: Vec<String>) -> Self {
        Self {
            feature_names,
            ..Self::default()
        }
    }

    pub fn push(&mut self, bar_index: usize, features: Vec<f64>, label: u8) {
        debug_assert_eq!(features.len(), self.feature_names.len());
        self.rows.push(features);
        self.labels.push(label);
        self.bar_indices.push(bar_index);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    pub fn positive_count(&self) -> usize {
        self.labels.iter().filter(|&&l| l == 1).count()
    }

    pub fn all_rows(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }

    /// Shuffles row positions with a seeded RNG and holds out
    /// `ceil(test_ratio * n)` of them for testing.
    pub fn shuffle_split(&self, test_ratio: f64, seed: u64) -> Split {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut positions = self.all_rows();
        positions.shuffle(&mut rng);

        let n = positions.len();
        let test_size = ((test_ratio * n as f64).ceil() as usize).min(n);
        let train = positions.split_off(test_size);

        Split {
            train,
            test: positions,
        }
    }
}

/// Draws `rows.len()` positions from `rows` with replacement.
pub fn bootstrap<R: Rng>(rows: &[usize], rng: &mut R) -> Vec<usize> {
    if rows.is_empty() {
        return Vec::new();
    }
    (0..rows.len())
        .map(|_| rows[rng.gen_range(0..rows.len())])
        .collect()
}
