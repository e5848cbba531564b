use thiserror::Error;

/// Failures raised while reducing a forecast payload.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ForecastError {
    /// A forecast entry is missing a required field or carries an unreadable timestamp.
    #[error("Malformed forecast entry #{index}: {reason}")]
    MalformedInput { index: usize, reason: String },
}

impl ForecastError {
    pub(crate) fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput { index, reason: reason.into() }
    }
}
