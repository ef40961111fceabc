//! Error types for the library

use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the library
#[derive(Error, Debug)]
pub enum Error {
    /// Unknown pin map, pin label or malformed instruction text.
    /// These are programmer errors and are never retried.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An operation was invoked while the cached device mode forbids it,
    /// e.g. a message-channel command after UDP mode was enabled.
    #[error("protocol state error: {0}")]
    ProtocolState(String),

    /// The underlying WebSocket or UDP send failed, or the session is
    /// disconnected.
    #[error("transport error: {0}")]
    Transport(String),

    /// A correlated exchange got no matching reply within its deadline.
    #[error("timeout: {0}")]
    Timeout(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Transport(err.to_string())
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for Error {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        Error::Transport(err.to_string())
    }
}
