//! Realtime error type

/// Result alias for socket glue operations
pub type RealtimeResult<T> = Result<T, RealtimeError>;

/// Errors raised by the wire codec and the connection manager
#[derive(Debug, thiserror::Error)]
pub enum RealtimeError {
    #[error("empty frame")]
    EmptyFrame,

    #[error("malformed packet: {0}")]
    Malformed(String),

    #[error("unsupported packet: {0}")]
    Unsupported(String),

    #[error("missing auth token")]
    MissingToken,

    #[error("socket is not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
