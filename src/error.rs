//! Error types shared across the crate.
//!
//! Library code reports failures through two enums:
//! - [`TransportError`]: the request never produced a usable HTTP response.
//! - [`StoreError`]: the outcome of a store operation as seen by the UI, already
//!   normalized to a human-readable message.
//!
//! The binary uses `anyhow` at its boundary (terminal setup, runtime).

/// Failure of the transport layer itself (network, timeouts, undecodable body).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decode(String),

    #[error("transport: {0}")]
    Other(String),
}

/// Which tier of the error taxonomy a [`StoreError`] belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any request was sent.
    Validation,
    /// The server answered with `success: false` or an unexpected status.
    Application,
    /// No usable envelope came back (network failure, error status, bad body).
    Transport,
}

/// Error surfaced by a store operation. `Display` yields the message only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Application(String),

    #[error("{0}")]
    Transport(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Validation(_) => ErrorKind::Validation,
            StoreError::Application(_) => ErrorKind::Application,
            StoreError::Transport(_) => ErrorKind::Transport,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            StoreError::Validation(m) | StoreError::Application(m) | StoreError::Transport(m) => m,
        }
    }
}
