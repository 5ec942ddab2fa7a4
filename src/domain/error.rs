//! Domain error types.

/// Top-level error type for tradelens.
///
/// An empty filter selection is not represented here: it yields a valid,
/// empty view and zeroed aggregates.
#[derive(Debug, thiserror::Error)]
pub enum TradeLensError {
    #[error("ledger source {location} unavailable: {reason}")]
    SourceUnavailable { location: String, reason: String },

    #[error("ledger is missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TradeLensError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        TradeLensError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

impl From<&TradeLensError> for std::process::ExitCode {
    fn from(err: &TradeLensError) -> Self {
        let code: u8 = match err {
            TradeLensError::Io(_) | TradeLensError::SourceUnavailable { .. } => 1,
            TradeLensError::ConfigParse { .. }
            | TradeLensError::ConfigInvalid { .. } => 2,
            TradeLensError::MissingColumn { .. } | TradeLensError::MalformedRecord { .. } => 3,
            TradeLensError::Report { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}
