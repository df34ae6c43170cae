use thiserror::Error;

#[derive(Debug, Error)]
pub enum PairsLabError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown ticker: {0} is not in the price data")]
    UnknownTicker(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for PairsLabError {
    fn from(e: serde_json::Error) -> Self {
        PairsLabError::SerializationError(e.to_string())
    }
}
