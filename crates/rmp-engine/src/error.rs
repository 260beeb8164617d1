//! Error types for the bridge engine

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running the bridge
#[derive(Debug, Error)]
pub enum EngineError {
    /// Transport could not be opened; the session never starts
    #[error("failed to open {endpoint}: {reason}")]
    TransportOpen { endpoint: String, reason: String },

    /// Reading from the panel failed
    #[error("port error (read): {0}")]
    TransportRead(#[source] io::Error),

    /// Writing to the panel failed
    #[error("port error (write): {0}")]
    TransportWrite(#[source] io::Error),

    /// The transport accepted only part of a message
    #[error("short write: {written} of {expected} bytes")]
    ShortWrite { written: usize, expected: usize },

    /// A simulator variable could not be resolved
    #[error("can't map variable {0}")]
    UnboundVariable(String),

    /// A simulator command could not be resolved
    #[error("can't map command {0}")]
    UnboundCommand(String),

    /// I/O was attempted without an open transport
    #[error("no transport attached")]
    NotEnabled,

    /// Host lifecycle called out of order
    #[error("plugin not started")]
    NotStarted,

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors reading the bridge configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The endpoint file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The endpoint file has no port name on its first line
    #[error("no port named in {}", .0.display())]
    EmptyEndpoint(PathBuf),
}
