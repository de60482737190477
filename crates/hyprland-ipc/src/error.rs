//! Error types for Hyprland IPC operations

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, HyprError>;

/// Errors that can occur when communicating with the Hyprland compositor
#[derive(Debug, Error)]
pub enum HyprError {
    /// One or both of the required environment variables are missing
    #[error("Environment variable(s) not set: {vars} - is Hyprland running?")]
    EnvNotSet { vars: String },

    /// The instance directory or one of its socket files is missing
    #[error("Hyprland socket files not found in {}", dir.display())]
    SocketsNotFound { dir: PathBuf },

    /// Connecting, writing or reading on the command socket failed
    #[error("Failed to send IPC command to {}: {source}", path.display())]
    SendFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Hyprland did not understand the command
    #[error("Hyprland rejected command '{command}': unknown request")]
    UnknownRequest { command: String },

    /// The reply to a JSON command was not valid JSON
    #[error("Failed to decode JSON reply to '{command}': {source}")]
    DecodeFailed {
        command: String,
        #[source]
        source: serde_json::Error,
    },

    /// The reply was valid JSON but not the shape the getter expects
    #[error("Unexpected reply to '{command}': expected {expected}")]
    UnexpectedReply {
        command: String,
        expected: &'static str,
    },

    /// A dispatch call failed; the underlying failure is the source
    #[error("Failed to dispatch '{action}'")]
    DispatchFailed {
        action: String,
        #[source]
        source: Box<HyprError>,
    },

    /// Connecting to or reading from the event socket failed
    #[error("Failed to read Hyprland event stream at {}: {source}", path.display())]
    EventStreamFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
