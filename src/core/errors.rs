use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("API error: {code} - {message}")]
    ApiError { code: i32, message: String },

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// True when the request never produced a usable HTTP response
    /// (connect failure, timeout, body read failure).
    pub fn is_transport(&self) -> bool {
        match self {
            Self::NetworkError(_) => true,
            Self::HttpError(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }
}

/// Errors raised by the chat transport.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Telegram API error: {0}")]
    ApiError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
