//! Error types for negotiation and settings operations

use thiserror::Error;

/// Failures surfaced by a [`crate::Session`] and the signal wire codec.
///
/// There is no retry or recovery logic anywhere in the crate; every failure
/// propagates immediately to the caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// An operation was attempted while no engine handle exists.
    #[error("no active session")]
    NoActiveSession,

    /// The engine produced no usable local description after a commit, or a
    /// signal carried no session description.
    #[error("empty session description")]
    EmptySdp,

    /// An ICE server entry failed validation before the engine was built.
    #[error("invalid ice server configuration: {0}")]
    InvalidConfig(String),

    /// A wire payload could not be decoded into a [`crate::Signal`].
    #[error("malformed signal payload: {0}")]
    MalformedSignal(String),

    /// A failure reported by the underlying negotiation engine.
    #[error("engine error: {0}")]
    Engine(#[from] webrtc::Error),
}

/// Failures while loading or persisting [`crate::Settings`].
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
