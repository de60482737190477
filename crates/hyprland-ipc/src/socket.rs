//! Socket discovery for a running Hyprland instance
//!
//! Hyprland creates its sockets under
//! `$XDG_RUNTIME_DIR/hypr/$HYPRLAND_INSTANCE_SIGNATURE/`. This is the only
//! place the crate reads the environment, and it never connects: it only
//! checks that both socket files exist.

use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{HyprError, Result};

/// Environment variable holding the per-user runtime directory
pub const RUNTIME_DIR_ENV: &str = "XDG_RUNTIME_DIR";

/// Environment variable identifying the running Hyprland instance
pub const INSTANCE_SIGNATURE_ENV: &str = "HYPRLAND_INSTANCE_SIGNATURE";

/// File name of the request/response socket
pub const COMMAND_SOCKET_NAME: &str = ".socket.sock";

/// File name of the event stream socket
pub const EVENT_SOCKET_NAME: &str = ".socket2.sock";

/// Canonical locations of both Hyprland sockets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketPaths {
    pub command: PathBuf,
    pub event: PathBuf,
}

/// Discover the Hyprland socket paths from the environment
///
/// # Errors
///
/// Returns `HyprError::EnvNotSet` naming whichever of `XDG_RUNTIME_DIR` and
/// `HYPRLAND_INSTANCE_SIGNATURE` is missing.
/// Returns `HyprError::SocketsNotFound` if either socket file is missing.
pub fn socket_paths_from_env() -> Result<SocketPaths> {
    resolve_socket_paths(
        std::env::var_os(RUNTIME_DIR_ENV),
        std::env::var_os(INSTANCE_SIGNATURE_ENV),
    )
}

/// Resolve both socket paths from explicit variable values
///
/// An empty value counts as unset.
pub fn resolve_socket_paths(
    runtime_dir: Option<OsString>,
    signature: Option<OsString>,
) -> Result<SocketPaths> {
    let runtime_dir = runtime_dir.filter(|v| !v.is_empty());
    let signature = signature.filter(|v| !v.is_empty());

    let (runtime_dir, signature) = match (runtime_dir, signature) {
        (Some(runtime_dir), Some(signature)) => (runtime_dir, signature),
        (runtime_dir, signature) => {
            let mut missing = Vec::new();
            if runtime_dir.is_none() {
                missing.push(RUNTIME_DIR_ENV);
            }
            if signature.is_none() {
                missing.push(INSTANCE_SIGNATURE_ENV);
            }
            return Err(HyprError::EnvNotSet {
                vars: missing.join(", "),
            });
        }
    };

    let dir = PathBuf::from(runtime_dir).join("hypr").join(signature);
    debug!(dir = %dir.display(), "Looking for Hyprland sockets");

    let command = find_socket(&dir, COMMAND_SOCKET_NAME);
    let event = find_socket(&dir, EVENT_SOCKET_NAME);

    match (command, event) {
        (Some(command), Some(event)) => Ok(SocketPaths { command, event }),
        _ => Err(HyprError::SocketsNotFound { dir }),
    }
}

/// Return the canonical path of `dir/name` if it is a socket
fn find_socket(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = fs::canonicalize(dir.join(name)).ok()?;
    let metadata = fs::metadata(&path).ok()?;

    metadata.file_type().is_socket().then_some(path)
}
