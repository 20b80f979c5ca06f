use thiserror::Error;

/// User-facing classification of a failed remote operation.
///
/// `Transport` outcomes are presented as `Generic` (the distinction only
/// matters for diagnostics), so it does not appear here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RateLimited,
    AuthFailed,
    Forbidden,
    Generic,
}

/// Payload of the paused error view. Exists exactly while that view is
/// active and is discarded on any transition out of it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ErrorContext {
    pub kind: ErrorKind,
    pub message: String,
    pub retry_after_secs: Option<u64>,
}

impl ErrorContext {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            retry_after_secs: None,
        }
    }

    pub fn rate_limited(message: impl Into<String>, retry_after_secs: Option<u64>) -> Self {
        Self {
            kind: ErrorKind::RateLimited,
            message: message.into(),
            retry_after_secs,
        }
    }
}
