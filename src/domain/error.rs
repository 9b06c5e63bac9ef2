//! Domain error types.

/// Top-level error type for regimetrader.
#[derive(Debug, thiserror::Error)]
pub enum RegimeTraderError {
    #[error(
        "input length mismatch: {dates} dates, {prices} prices, {regimes} regimes \
         (must be equal and non-zero)"
    )]
    InvalidInputLength {
        dates: usize,
        prices: usize,
        regimes: usize,
    },

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

    #[error("data error in {source_name}: {reason}")]
    Data { source_name: String, reason: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl RegimeTraderError {
    pub(crate) fn data(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        RegimeTraderError::Data {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        RegimeTraderError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&RegimeTraderError> for std::process::ExitCode {
    fn from(err: &RegimeTraderError) -> Self {
        let code: u8 = match err {
            RegimeTraderError::Io(_) => 1,
            RegimeTraderError::ConfigParse { .. }
            | RegimeTraderError::ConfigMissing { .. }
            | RegimeTraderError::ConfigInvalid { .. } => 2,
            RegimeTraderError::InvalidInputLength { .. } | RegimeTraderError::Data { .. } => 5,
            RegimeTraderError::Report { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
