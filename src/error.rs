//! Error types for the Event Stream Server

use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error)]
pub enum StreamError {
    /// Event payload could not be serialized; fatal for the owning session
    #[error("Encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The outbound sink is gone, i.e. the client disconnected
    #[error("Outbound sink closed")]
    SinkClosed,

    /// Web server error
    #[error("Web server error: {0}")]
    WebServer(String),
}

/// Result type alias for the application
pub type StreamResult<T> = Result<T, StreamError>;
