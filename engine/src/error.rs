use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use shared::models::MessageResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("invalid request: {field}")]
    InvalidInput { field: String },

    #[error("Cannot build a one-hour window from {year}-{month}-{day} hour {hour}")]
    InvalidWindow { year: u16, month: u16, day: u16, hour: u16 },

    #[error("Data source '{path}' unavailable: {source}")]
    DataSourceUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("Dataset '{0}' has no rows")]
    MalformedDataset(String),

    #[error("No trade records for code '{code}' in the requested window")]
    NoData { code: String },

    #[error("Internal processing error: {0}")]
    ProcessingError(String),
}

impl EngineError {
    pub fn invalid_input(field: impl Into<String>) -> Self {
        EngineError::InvalidInput { field: field.into() }
    }
}

// Clients only ever see two messages: the offending query field, or a
// generic calculation error. The full cause goes to the log.
impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let message = match &self {
            EngineError::InvalidInput { .. } => {
                tracing::warn!(error = %self, "Rejecting request with invalid input");
                self.to_string()
            }
            _ => {
                tracing::error!(error = ?self, "Mapping EngineError to calculation error response");
                "calculation error".to_string()
            }
        };
        (StatusCode::BAD_REQUEST, Json(MessageResponse::new(message))).into_response()
    }
}
