use thiserror::Error;

/// Errors that can occur while loading, transforming or exporting reports.
#[derive(Error, Debug)]
pub enum WebtrackError {
    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from invalid report or session content.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error for malformed endpoint URLs.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid command-line or configuration value.
    #[error("{0}")]
    InvalidArgs(String),

    /// The report document does not have the expected shape.
    #[error("Invalid report document: {0}")]
    InvalidReport(String),

    /// Transport failure or non-2xx response from a remote endpoint.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Login failed or no authenticated session is available.
    #[error("{0}")]
    Auth(String),
}

/// Convenience result type for webtrack operations.
pub type Result<T> = std::result::Result<T, WebtrackError>;
