//! Configuration validation and typed config reading.
//!
//! Everything a run reads from the INI file is checked here before any bars
//! are loaded. Errors name the offending section and key.

use crate::domain::classifier::{ClassifierConfig, FeatureSet};
use crate::domain::error::BreakscanError;
use crate::domain::evaluation::{EvaluationConfig, StrategySpec};
use crate::domain::indicator_helpers::IndicatorSettings;
use crate::domain::signal::{BreakoutParams, StrategyKind, VolumeThresholdMode};
use crate::domain::simulator::ExitPolicy;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub const STRATEGY_SECTION_PREFIX: &str = "strategy.";

/// Holding period of the built-in strategies used when the file defines none.
pub const DEFAULT_HOLDING_PERIOD: u32 = 5;
pub const DEFAULT_STOP_LOSS_PCT: f64 = 1.5;
pub const DEFAULT_TAKE_PROFIT_PCT: f64 = 3.0;

/// Checks every section of a run configuration.
pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), BreakscanError> {
    read_date_range(config)?;
    read_holidays(config)?;
    let evaluation = read_evaluation_config(config)?;
    validate_evaluation_config(&evaluation)
}

/// Reads the typed evaluation settings. Absent keys take their defaults;
/// present keys must parse.
pub fn read_evaluation_config(
    config: &dyn ConfigPort,
) -> Result<EvaluationConfig, BreakscanError> {
    Ok(EvaluationConfig {
        indicators: read_indicator_settings(config)?,
        breakout: read_breakout_params(config)?,
        classifier: read_classifier_config(config)?,
        strategies: read_strategies(config)?,
    })
}

/// Optional `[data] start_date` / `end_date` bounds.
pub fn read_date_range(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), BreakscanError> {
    let start = read_date(config, "data", "start_date")?;
    let end = read_date(config, "data", "end_date")?;
    if let (Some(s), Some(e)) = (start, end) {
        if s >= e {
            return Err(BreakscanError::invalid(
                "data",
                "start_date",
                format!("start_date ({}) must be before end_date ({})", s, e),
            ));
        }
    }
    Ok((start, end))
}

/// Comma-separated `[calendar] holidays` list.
pub fn read_holidays(config: &dyn ConfigPort) -> Result<Vec<NaiveDate>, BreakscanError> {
    let Some(raw) = config.get_trimmed("calendar", "holidays") else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
                BreakscanError::invalid(
                    "calendar",
                    "holidays",
                    format!("'{}' is not a YYYY-MM-DD date", s),
                )
            })
        })
        .collect()
}

/// Section names of the form `[strategy.<id>]`, sorted by id.
pub fn strategy_sections(config: &dyn ConfigPort) -> Vec<String> {
    config
        .sections()
        .into_iter()
        .filter(|s| s.starts_with(STRATEGY_SECTION_PREFIX))
        .collect()
}

pub fn read_strategies(config: &dyn ConfigPort) -> Result<Vec<StrategySpec>, BreakscanError> {
    let sections = strategy_sections(config);
    if sections.is_empty() {
        return Ok(default_strategies());
    }
    sections
        .iter()
        .map(|section| parse_strategy(config, section))
        .collect()
}

/// Strategies used when the config names none: breakout, SMA crossover and
/// classifier entries with a fixed hold, plus breakout with stop and target.
pub fn default_strategies() -> Vec<StrategySpec> {
    let hold = ExitPolicy::FixedHold {
        days: DEFAULT_HOLDING_PERIOD,
    };
    let risk_managed = ExitPolicy::StopTakeProfit {
        days: DEFAULT_HOLDING_PERIOD,
        stop_loss_pct: DEFAULT_STOP_LOSS_PCT,
        take_profit_pct: DEFAULT_TAKE_PROFIT_PCT,
    };
    [
        ("Breakout", StrategyKind::Breakout, hold),
        ("SMA Crossover", StrategyKind::SmaCrossover, hold),
        ("ML Predicted", StrategyKind::MlPredicted, hold),
        ("Breakout Risk Managed", StrategyKind::Breakout, risk_managed),
    ]
    .into_iter()
    .map(|(name, signal, exit_policy)| StrategySpec {
        name: name.to_string(),
        signal,
        exit_policy,
    })
    .collect()
}

pub fn parse_strategy(
    config: &dyn ConfigPort,
    section: &str,
) -> Result<StrategySpec, BreakscanError> {
    let id = section
        .strip_prefix(STRATEGY_SECTION_PREFIX)
        .unwrap_or(section);
    let name = config
        .get_trimmed(section, "name")
        .unwrap_or_else(|| id.to_string());

    let signal = config
        .get_trimmed(section, "signal")
        .ok_or_else(|| BreakscanError::missing(section, "signal"))?
        .parse::<StrategyKind>()
        .map_err(|reason| BreakscanError::invalid(section, "signal", reason))?;

    let days = read_days(config, section, "holding_period")?
        .ok_or_else(|| BreakscanError::missing(section, "holding_period"))?;
    if days == 0 {
        return Err(BreakscanError::invalid(
            section,
            "holding_period",
            "holding_period must be at least 1",
        ));
    }

    let exit = config
        .get_trimmed(section, "exit")
        .unwrap_or_else(|| "fixed_hold".to_string())
        .to_lowercase();
    let exit_policy = match exit.as_str() {
        "fixed_hold" => ExitPolicy::FixedHold { days },
        "stop_take_profit" => ExitPolicy::StopTakeProfit {
            days,
            stop_loss_pct: read_required_pct(config, section, "stop_loss")?,
            take_profit_pct: read_required_pct(config, section, "take_profit")?,
        },
        "calendar_aware" => ExitPolicy::CalendarAware {
            wait_days: read_days(config, section, "waiting_period")?.unwrap_or(0),
            hold_days: days,
            snap_to_nearest: read_bool(config, section, "snap_to_nearest")?.unwrap_or(false),
        },
        other => {
            return Err(BreakscanError::invalid(
                section,
                "exit",
                format!(
                    "unknown exit '{}' (expected fixed_hold, stop_take_profit or calendar_aware)",
                    other
                ),
            ));
        }
    };

    Ok(StrategySpec {
        name,
        signal,
        exit_policy,
    })
}

fn read_indicator_settings(config: &dyn ConfigPort) -> Result<IndicatorSettings, BreakscanError> {
    let d = IndicatorSettings::default();
    Ok(IndicatorSettings {
        sma_fast: read_window(config, "sma_fast", d.sma_fast)?,
        sma_slow: read_window(config, "sma_slow", d.sma_slow)?,
        volume_window: read_window(config, "volume_window", d.volume_window)?,
        lagged_volume: read_bool(config, "signals", "lagged_volume_average")?
            .unwrap_or(d.lagged_volume),
        rsi_period: read_window(config, "rsi_period", d.rsi_period)?,
        macd_fast: read_window(config, "macd_fast", d.macd_fast)?,
        macd_slow: read_window(config, "macd_slow", d.macd_slow)?,
        macd_signal: read_window(config, "macd_signal", d.macd_signal)?,
    })
}

fn read_breakout_params(config: &dyn ConfigPort) -> Result<BreakoutParams, BreakscanError> {
    let d = BreakoutParams::default();
    let mode = match config.get_trimmed("signals", "volume_threshold_mode") {
        Some(raw) => raw
            .parse::<VolumeThresholdMode>()
            .map_err(|reason| BreakscanError::invalid("signals", "volume_threshold_mode", reason))?,
        None => d.mode,
    };
    Ok(BreakoutParams {
        volume_threshold_pct: read_number(config, "signals", "volume_threshold")?
            .unwrap_or(d.volume_threshold_pct),
        price_change_pct: read_number(config, "signals", "price_change")?
            .unwrap_or(d.price_change_pct),
        mode,
    })
}

fn read_classifier_config(config: &dyn ConfigPort) -> Result<ClassifierConfig, BreakscanError> {
    let d = ClassifierConfig::default();

    let n_trees: i64 = read_number(config, "classifier", "n_trees")?.unwrap_or(d.n_trees as i64);
    if n_trees < 1 {
        return Err(BreakscanError::invalid(
            "classifier",
            "n_trees",
            "n_trees must be at least 1",
        ));
    }

    let max_depth = match read_number::<i64>(config, "classifier", "max_depth")? {
        None | Some(0) => None,
        Some(depth) if depth < 0 => {
            return Err(BreakscanError::invalid(
                "classifier",
                "max_depth",
                "max_depth must be non-negative (0 = unlimited)",
            ));
        }
        Some(depth) => Some(depth as usize),
    };

    let holdout_ratio = match read_number::<f64>(config, "classifier", "holdout_ratio")? {
        None => None,
        Some(r) if r == 0.0 => None,
        Some(r) => Some(r),
    };

    let extended = read_bool(config, "classifier", "extended_features")?.unwrap_or(false);

    Ok(ClassifierConfig {
        n_trees: n_trees as usize,
        max_depth,
        seed: read_number(config, "classifier", "seed")?.unwrap_or(d.seed),
        feature_set: if extended {
            FeatureSet::Extended
        } else {
            FeatureSet::Basic
        },
        holdout_ratio,
    })
}

/// Range checks on an already-typed configuration.
pub fn validate_evaluation_config(config: &EvaluationConfig) -> Result<(), BreakscanError> {
    validate_indicator_settings(&config.indicators)?;
    validate_breakout_params(&config.breakout)?;
    validate_classifier_config(&config.classifier)?;

    if config.strategies.is_empty() {
        return Err(BreakscanError::missing("strategy.<id>", "signal"));
    }
    for spec in &config.strategies {
        validate_strategy(spec)?;
    }
    Ok(())
}

fn validate_indicator_settings(settings: &IndicatorSettings) -> Result<(), BreakscanError> {
    let windows = [
        ("sma_fast", settings.sma_fast),
        ("sma_slow", settings.sma_slow),
        ("volume_window", settings.volume_window),
        ("rsi_period", settings.rsi_period),
        ("macd_fast", settings.macd_fast),
        ("macd_slow", settings.macd_slow),
        ("macd_signal", settings.macd_signal),
    ];
    for (key, window) in windows {
        if window == 0 {
            return Err(BreakscanError::invalid(
                "indicators",
                key,
                format!("{} must be a positive window", key),
            ));
        }
    }
    Ok(())
}

fn validate_breakout_params(params: &BreakoutParams) -> Result<(), BreakscanError> {
    if !params.volume_threshold_pct.is_finite() || params.volume_threshold_pct < 0.0 {
        return Err(BreakscanError::invalid(
            "signals",
            "volume_threshold",
            "volume_threshold must be a non-negative percentage",
        ));
    }
    if !params.price_change_pct.is_finite() {
        return Err(BreakscanError::invalid(
            "signals",
            "price_change",
            "price_change must be finite",
        ));
    }
    Ok(())
}

fn validate_classifier_config(config: &ClassifierConfig) -> Result<(), BreakscanError> {
    if config.n_trees == 0 {
        return Err(BreakscanError::invalid(
            "classifier",
            "n_trees",
            "n_trees must be at least 1",
        ));
    }
    if config.max_depth == Some(0) {
        return Err(BreakscanError::invalid(
            "classifier",
            "max_depth",
            "max_depth must be at least 1 when set",
        ));
    }
    if let Some(ratio) = config.holdout_ratio {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(BreakscanError::invalid(
                "classifier",
                "holdout_ratio",
                "holdout_ratio must be between 0 and 1 (exclusive)",
            ));
        }
    }
    Ok(())
}

fn validate_strategy(spec: &StrategySpec) -> Result<(), BreakscanError> {
    let section = format!("{}{}", STRATEGY_SECTION_PREFIX, spec.name);
    if spec.name.trim().is_empty() {
        return Err(BreakscanError::invalid(
            &section,
            "name",
            "strategy name must not be empty",
        ));
    }
    let hold = match spec.exit_policy {
        ExitPolicy::FixedHold { days } => days,
        ExitPolicy::StopTakeProfit {
            days,
            stop_loss_pct,
            take_profit_pct,
        } => {
            check_positive_pct(&section, "stop_loss", stop_loss_pct)?;
            check_positive_pct(&section, "take_profit", take_profit_pct)?;
            days
        }
        ExitPolicy::CalendarAware { hold_days, .. } => hold_days,
    };
    if hold == 0 {
        return Err(BreakscanError::invalid(
            &section,
            "holding_period",
            "holding_period must be at least 1",
        ));
    }
    Ok(())
}

fn check_positive_pct(section: &str, key: &str, value: f64) -> Result<(), BreakscanError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(BreakscanError::invalid(
            section,
            key,
            format!("{} must be a positive percentage", key),
        ));
    }
    Ok(())
}

fn read_number<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, BreakscanError> {
    match config.get_trimmed(section, key) {
        None => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
            BreakscanError::invalid(section, key, format!("'{}' is not a valid number", raw))
        }),
    }
}

fn read_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, BreakscanError> {
    match read_number::<i64>(config, "indicators", key)? {
        None => Ok(default),
        Some(w) if w <= 0 => Err(BreakscanError::invalid(
            "indicators",
            key,
            format!("{} must be a positive window", key),
        )),
        Some(w) => Ok(w as usize),
    }
}

fn read_days(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<u32>, BreakscanError> {
    match read_number::<i64>(config, section, key)? {
        None => Ok(None),
        Some(d) => u32::try_from(d).map(Some).map_err(|_| {
            BreakscanError::invalid(
                section,
                key,
                format!("{} must be a non-negative day count", key),
            )
        }),
    }
}

fn read_required_pct(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<f64, BreakscanError> {
    let value: f64 =
        read_number(config, section, key)?.ok_or_else(|| BreakscanError::missing(section, key))?;
    check_positive_pct(section, key, value)?;
    Ok(value)
}

fn read_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<bool>, BreakscanError> {
    let Some(raw) = config.get_trimmed(section, key) else {
        return Ok(None);
    };
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(Some(true)),
        "false" | "no" | "0" => Ok(Some(false)),
        _ => Err(BreakscanError::invalid(
            section,
            key,
            format!("'{}' is not a boolean", raw),
        )),
    }
}

fn read_date(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<NaiveDate>, BreakscanError> {
    match config.get_trimmed(section, key) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                BreakscanError::invalid(section, key, format!("'{}' is not a YYYY-MM-DD date", raw))
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn cfg(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    const VALID: &str = r#"
[data]
symbol = AAPL
start_date = 2020-01-01
end_date = 2024-12-31

[signals]
volume_threshold = 50
price_change = 2.0
volume_threshold_mode = multiple
lagged_volume_average = true

[indicators]
sma_fast = 5
sma_slow = 20

[classifier]
n_trees = 50
max_depth = 8
seed = 7
extended_features = yes
holdout_ratio = 0.2

[calendar]
holidays = 2024-01-01, 2024-12-25

[strategy.breakout]
name = Volume Breakout
signal = breakout
exit = stop_take_profit
holding_period = 10
stop_loss = 2
take_profit = 3

[strategy.ml]
signal = ml_predicted
exit = calendar_aware
waiting_period = 1
holding_period = 5
snap_to_nearest = true
"#;

    #[test]
    fn valid_config_passes() {
        assert!(validate_run_config(&cfg(VALID)).is_ok());
    }

    #[test]
    fn reads_typed_settings() {
        let evaluation = read_evaluation_config(&cfg(VALID)).unwrap();

        assert_eq!(evaluation.indicators.sma_fast, 5);
        assert_eq!(evaluation.indicators.sma_slow, 20);
        assert_eq!(evaluation.indicators.volume_window, 20);
        assert!(evaluation.indicators.lagged_volume);
        assert_eq!(evaluation.breakout.mode, VolumeThresholdMode::Multiple);
        assert_eq!(evaluation.classifier.n_trees, 50);
        assert_eq!(evaluation.classifier.max_depth, Some(8));
        assert_eq!(evaluation.classifier.seed, 7);
        assert_eq!(evaluation.classifier.feature_set, FeatureSet::Extended);
        assert_eq!(evaluation.classifier.holdout_ratio, Some(0.2));
    }

    #[test]
    fn reads_strategy_sections_in_id_order() {
        let strategies = read_strategies(&cfg(VALID)).unwrap();
        assert_eq!(strategies.len(), 2);

        assert_eq!(strategies[0].name, "Volume Breakout");
        assert_eq!(strategies[0].signal, StrategyKind::Breakout);
        assert_eq!(
            strategies[0].exit_policy,
            ExitPolicy::StopTakeProfit {
                days: 10,
                stop_loss_pct: 2.0,
                take_profit_pct: 3.0
            }
        );

        // name falls back to the section id
        assert_eq!(strategies[1].name, "ml");
        assert_eq!(
            strategies[1].exit_policy,
            ExitPolicy::CalendarAware {
                wait_days: 1,
                hold_days: 5,
                snap_to_nearest: true
            }
        );
    }

    #[test]
    fn no_strategy_sections_gives_defaults() {
        let strategies = read_strategies(&cfg("[data]\nsymbol = AAPL\n")).unwrap();
        let kinds: Vec<_> = strategies.iter().map(|s| s.signal).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::Breakout,
                StrategyKind::SmaCrossover,
                StrategyKind::MlPredicted,
                StrategyKind::Breakout
            ]
        );
        assert!(strategies[..3]
            .iter()
            .all(|s| s.exit_policy == ExitPolicy::FixedHold { days: 5 }));
        assert_eq!(strategies[3].name, "Breakout Risk Managed");
        assert_eq!(
            strategies[3].exit_policy,
            ExitPolicy::StopTakeProfit {
                days: 5,
                stop_loss_pct: 1.5,
                take_profit_pct: 3.0
            }
        );
    }

    #[test]
    fn reads_holidays_and_dates() {
        let config = cfg(VALID);
        let holidays = read_holidays(&config).unwrap();
        assert_eq!(holidays.len(), 2);
        assert_eq!(holidays[1], NaiveDate::from_ymd_opt(2024, 12, 25).unwrap());

        let (start, end) = read_date_range(&config).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 12, 31));
    }

    #[test]
    fn start_after_end_fails() {
        let err = read_date_range(&cfg(
            "[data]\nstart_date = 2024-06-01\nend_date = 2024-01-01\n",
        ))
        .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn malformed_date_fails() {
        let err = validate_run_config(&cfg("[data]\nstart_date = 01/02/2024\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "start_date"));
    }

    #[test]
    fn malformed_holiday_fails() {
        let err = validate_run_config(&cfg("[calendar]\nholidays = 2024-01-01, xmas\n"))
            .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "holidays"));
    }

    #[test]
    fn zero_window_fails() {
        let err = validate_run_config(&cfg("[indicators]\nsma_fast = 0\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "sma_fast"));
    }

    #[test]
    fn negative_window_fails() {
        let err = validate_run_config(&cfg("[indicators]\nvolume_window = -3\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "volume_window"));
    }

    #[test]
    fn non_numeric_threshold_fails() {
        let err = validate_run_config(&cfg("[signals]\nprice_change = lots\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "price_change"));
    }

    #[test]
    fn negative_volume_threshold_fails() {
        let err = validate_run_config(&cfg("[signals]\nvolume_threshold = -10\n")).unwrap_err();
        assert!(
            matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "volume_threshold")
        );
    }

    #[test]
    fn unknown_threshold_mode_fails() {
        let err =
            validate_run_config(&cfg("[signals]\nvolume_threshold_mode = double\n")).unwrap_err();
        assert!(matches!(
            err,
            BreakscanError::ConfigInvalid { key, .. } if key == "volume_threshold_mode"
        ));
    }

    #[test]
    fn bad_boolean_fails() {
        let err =
            validate_run_config(&cfg("[signals]\nlagged_volume_average = maybe\n")).unwrap_err();
        assert!(matches!(
            err,
            BreakscanError::ConfigInvalid { key, .. } if key == "lagged_volume_average"
        ));
    }

    #[test]
    fn holdout_ratio_out_of_range_fails() {
        let err = validate_run_config(&cfg("[classifier]\nholdout_ratio = 1.5\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "holdout_ratio"));
    }

    #[test]
    fn zero_holdout_means_none() {
        let evaluation = read_evaluation_config(&cfg("[classifier]\nholdout_ratio = 0\n")).unwrap();
        assert_eq!(evaluation.classifier.holdout_ratio, None);
    }

    #[test]
    fn zero_trees_fails() {
        let err = validate_run_config(&cfg("[classifier]\nn_trees = 0\n")).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "n_trees"));
    }

    #[test]
    fn zero_max_depth_is_unlimited() {
        let evaluation = read_evaluation_config(&cfg("[classifier]\nmax_depth = 0\n")).unwrap();
        assert_eq!(evaluation.classifier.max_depth, None);
    }

    #[test]
    fn strategy_without_signal_fails() {
        let err = validate_run_config(&cfg("[strategy.a]\nholding_period = 5\n")).unwrap_err();
        assert!(matches!(
            err,
            BreakscanError::ConfigMissing { section, key } if section == "strategy.a" && key == "signal"
        ));
    }

    #[test]
    fn strategy_unknown_signal_fails() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = momentum\nholding_period = 5\n",
        ))
        .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "signal"));
    }

    #[test]
    fn strategy_without_holding_period_fails() {
        let err = validate_run_config(&cfg("[strategy.a]\nsignal = breakout\n")).unwrap_err();
        assert!(
            matches!(err, BreakscanError::ConfigMissing { key, .. } if key == "holding_period")
        );
    }

    #[test]
    fn strategy_zero_holding_period_fails() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = breakout\nholding_period = 0\n",
        ))
        .unwrap_err();
        assert!(
            matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "holding_period")
        );
    }

    #[test]
    fn stop_take_requires_both_levels() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = breakout\nexit = stop_take_profit\nholding_period = 5\nstop_loss = 2\n",
        ))
        .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigMissing { key, .. } if key == "take_profit"));
    }

    #[test]
    fn stop_loss_must_be_positive() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = breakout\nexit = stop_take_profit\nholding_period = 5\nstop_loss = 0\ntake_profit = 3\n",
        ))
        .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "stop_loss"));
    }

    #[test]
    fn unknown_exit_fails() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = breakout\nexit = trailing\nholding_period = 5\n",
        ))
        .unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "exit"));
    }

    #[test]
    fn negative_waiting_period_fails() {
        let err = validate_run_config(&cfg(
            "[strategy.a]\nsignal = breakout\nexit = calendar_aware\nholding_period = 5\nwaiting_period = -1\n",
        ))
        .unwrap_err();
        assert!(
            matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "waiting_period")
        );
    }

    #[test]
    fn typed_validation_rejects_empty_strategy_list() {
        let mut evaluation = read_evaluation_config(&cfg(VALID)).unwrap();
        evaluation.strategies.clear();
        let err = validate_evaluation_config(&evaluation).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigMissing { .. }));
    }

    #[test]
    fn typed_validation_rejects_explicit_zero_depth() {
        let mut evaluation = read_evaluation_config(&cfg(VALID)).unwrap();
        evaluation.classifier.max_depth = Some(0);
        let err = validate_evaluation_config(&evaluation).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "max_depth"));
    }

    #[test]
    fn typed_validation_rejects_non_finite_price_change() {
        let mut evaluation = read_evaluation_config(&cfg(VALID)).unwrap();
        evaluation.breakout.price_change_pct = f64::NAN;
        let err = validate_evaluation_config(&evaluation).unwrap_err();
        assert!(matches!(err, BreakscanError::ConfigInvalid { key, .. } if key == "price_change"));
    }
}
