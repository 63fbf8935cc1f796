//! Core domain types and evaluation logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod symbol_data;
pub mod signal;
pub mod classifier;
pub mod trade;
pub mod simulator;
pub mod metrics;
pub mod evaluation;
pub mod config_validation;
pub mod error;
