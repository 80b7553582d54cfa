//! DataMall client error types.

use std::fmt;

/// Errors from the DataMall HTTP client.
#[derive(Debug)]
pub enum DataMallError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Rate limited by the API
    RateLimited,

    /// Invalid account key or unauthorized
    Unauthorized,
}

impl fmt::Display for DataMallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataMallError::Http(e) => write!(f, "HTTP error: {e}"),
            DataMallError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            DataMallError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            DataMallError::RateLimited => write!(f, "rate limited by DataMall API"),
            DataMallError::Unauthorized => write!(f, "unauthorized (invalid account key)"),
        }
    }
}

impl std::error::Error for DataMallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DataMallError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for DataMallError {
    fn from(err: reqwest::Error) -> Self {
        DataMallError::Http(err)
    }
}
