//! Domain error types.
//!
//! Only structural failures are errors: bad configuration, unreadable or
//! malformed input. Per-signal resolution failures (missing exit bar,
//! out-of-range entry) are absorbed into the trade record instead.

/// Top-level error type for breakscan.
#[derive(Debug, thiserror::Error)]
pub enum BreakscanError {
    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BreakscanError {
    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BreakscanError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(section: &str, key: &str) -> Self {
        BreakscanError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }

    /// Process exit status for this error category.
    pub fn exit_status(&self) -> u8 {
        match self {
            BreakscanError::Io(_) | BreakscanError::Csv(_) => 1,
            BreakscanError::ConfigParse { .. }
            | BreakscanError::ConfigMissing { .. }
            | BreakscanError::ConfigInvalid { .. } => 2,
            BreakscanError::DataSource { .. } => 3,
            BreakscanError::InvalidSeries { .. } => 4,
            BreakscanError::NoData { .. } => 5,
        }
    }
}

impl From<&BreakscanError> for std::process::ExitCode {
    fn from(err: &BreakscanError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
