use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmSightError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data source unavailable: {0}")]
    DataSourceUnavailable(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl FarmSightError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        FarmSightError::InvalidInput(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, FarmSightError>;

/// Reject NaN and infinities before they reach a recurrence.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FarmSightError::invalid_input(format!(
            "{} must be a finite number, got {}",
            name, value
        )))
    }
}
