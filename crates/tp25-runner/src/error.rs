//! Runner error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tp25_device::DeviceError;
use tp25_protocol::ProtocolError;

/// Errors surfaced by the runner and the `tp25sim` binary.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        /// Path that was read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// Configuration is not valid YAML for [`crate::RunnerConfig`].
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Configuration values are out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Device construction failed.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Transport socket error.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// Bad hex input on the command line.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Input bytes are not a valid protocol message.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The interrupt handler could not be installed.
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),

    /// JSON output failed.
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}
