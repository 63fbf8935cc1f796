//! Breakout classifier: a random forest trained to imitate the rule-based
//! breakout detector, used to surface ML-predicted entry dates.
//!
//! The prediction pass scores every row, including the rows the forest was
//! trained on. Dates flagged this way are optimistically biased towards the
//! rule detector's own labels. This is intentional and must not be replaced
//! with a holdout-only prediction, which would change the flagged dates.

pub mod dataset;
pub mod decision_tree;
pub mod random_forest;

use crate::domain::indicator_helpers::IndicatorSettings;
use crate::domain::signal::{breakout_flag, signal_at, BreakoutParams, Signal, StrategyKind};
use crate::domain::symbol_data::SymbolData;
use dataset::Dataset;
use random_forest::{ForestConfig, RandomForest};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSet {
    /// close, volume, average volume, fast SMA, slow SMA
    Basic,
    /// Basic plus RSI, MACD line and MACD signal
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierConfig {
    pub n_trees: usize,
    pub max_depth: Option<usize>,
    pub seed: u64,
    pub feature_set: FeatureSet,
    /// Fraction of rows held out for the reported accuracy.
    pub holdout_ratio: Option<f64>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,
            max_depth: None,
            seed: 42,
            feature_set: FeatureSet::Basic,
            holdout_ratio: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutcome {
    pub signals: Vec<Signal>,
    pub training_rows: usize,
    pub positive_labels: usize,
    pub holdout_accuracy: Option<f64>,
}

pub fn feature_names(settings: &IndicatorSettings, feature_set: FeatureSet) -> Vec<String> {
    let mut names = vec![
        "close".to_string(),
        "volume".to_string(),
        settings.volume_type().column_name(),
        settings.sma_fast_type().column_name(),
        settings.sma_slow_type().column_name(),
    ];
    if feature_set == FeatureSet::Extended {
        names.push(settings.rsi_type().column_name());
        names.push("macd".to_string());
        names.push("macdSignal".to_string());
    }
    names
}

fn feature_row(
    data: &SymbolData,
    settings: &IndicatorSettings,
    feature_set: FeatureSet,
    index: usize,
) -> Option<Vec<f64>> {
    let bar = data.bars.get(index)?;
    let mut row = vec![
        bar.close,
        bar.volume,
        data.value(&settings.volume_type(), index)?,
        data.value(&settings.sma_fast_type(), index)?,
        data.value(&settings.sma_slow_type(), index)?,
    ];
    if feature_set == FeatureSet::Extended {
        let macd = settings.macd_type();
        row.push(data.value(&settings.rsi_type(), index)?);
        row.push(data.value(&macd, index)?);
        row.push(data.macd_signal(&macd, index)?);
    }
    Some(row)
}

/// One row per bar whose features and breakout label are all defined.
pub fn build_dataset(
    data: &SymbolData,
    settings: &IndicatorSettings,
    params: &BreakoutParams,
    feature_set: FeatureSet,
) -> Dataset {
    let mut dataset = Dataset::new(feature_names(settings, feature_set));
    for index in 0..data.bar_count() {
        let features = feature_row(data, settings, feature_set, index);
        let label = breakout_flag(data, settings, params, index);
        if let (Some(features), Some(label)) = (features, label) {
            dataset.push(index, features, u8::from(label));
        }
    }
    dataset
}

/// Fits the forest once and returns the bars it predicts as breakouts.
pub fn train_and_predict(
    data: &SymbolData,
    settings: &IndicatorSettings,
    params: &BreakoutParams,
    config: &ClassifierConfig,
) -> ClassifierOutcome {
    let dataset = build_dataset(data, settings, params, config.feature_set);
    let positive_labels = dataset.positive_count();

    if dataset.is_empty() {
        info!(symbol = %data.symbol, "no complete feature rows, classifier skipped");
        return ClassifierOutcome {
            signals: Vec::new(),
            training_rows: 0,
            positive_labels,
            holdout_accuracy: None,
        };
    }

    let (train_rows, test_rows) = match config.holdout_ratio {
        Some(ratio) => {
            let split = dataset.shuffle_split(ratio, config.seed);
            if split.train.is_empty() {
                (dataset.all_rows(), Vec::new())
            } else {
                (split.train, split.test)
            }
        }
        None => (dataset.all_rows(), Vec::new()),
    };

    let mut forest = RandomForest::new(ForestConfig {
        n_trees: config.n_trees,
        max_depth: config.max_depth,
        seed: config.seed,
        ..ForestConfig::default()
    });
    forest.fit(&dataset, &train_rows);
    let holdout_accuracy = forest.accuracy(&dataset, &test_rows);

    // Re-score the whole set, training rows included.
    let signals: Vec<Signal> = dataset
        .rows
        .iter()
        .zip(&dataset.bar_indices)
        .filter(|(row, _)| forest.predict(row) == 1)
        .map(|(_, &index)| signal_at(data, settings, StrategyKind::MlPredicted, index))
        .collect();

    info!(
        symbol = %data.symbol,
        rows = dataset.len(),
        train = train_rows.len(),
        positives = positive_labels,
        predicted = signals.len(),
        accuracy = ?holdout_accuracy,
        "classifier trained"
    );
    debug!(trees = forest.n_trees(), features = dataset.n_features(), "forest shape");

    ClassifierOutcome {
        signals,
        training_rows: train_rows.len(),
        positive_labels,
        holdout_accuracy,
    }
}
