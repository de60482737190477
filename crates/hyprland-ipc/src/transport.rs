//! Request/response transport for the Hyprland command socket
//!
//! The command socket carries exactly one exchange per connection: the client
//! writes the command, Hyprland writes its reply and closes the connection.
//! There is no length prefix, so the reply is complete only at end-of-stream.

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{HyprError, Result};

/// Reply Hyprland sends for a command it does not understand
pub const UNKNOWN_REQUEST: &str = "unknown request";

/// A single command exchange with the compositor
///
/// `HyprClient` performs every operation through this trait, so tests can
/// substitute a double for the real socket.
pub trait Transport {
    /// Send `command` and return the raw reply
    ///
    /// Implementations return the reply verbatim; rejection handling is left
    /// to the caller.
    fn request(&self, command: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn request(&self, command: &str) -> Result<String> {
        (**self).request(command)
    }
}

/// Write `payload` to `stream` and read the reply until the peer closes
///
/// A zero-length read ends the reply. Chunks are concatenated in order.
pub fn exchange<S: Read + Write>(stream: &mut S, payload: &[u8]) -> io::Result<Vec<u8>> {
    stream.write_all(payload)?;
    stream.flush()?;

    let mut reply = Vec::new();
    let mut chunk = [0u8; 8192];
    loop {
        let n = match stream.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        trace!(bytes = n, "Received reply chunk");
        reply.extend_from_slice(&chunk[..n]);
    }

    Ok(reply)
}

/// Transport opening a fresh UNIX stream connection per request
#[derive(Debug, Clone)]
pub struct UnixTransport {
    socket_path: PathBuf,
}

impl UnixTransport {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }
}

impl Transport for UnixTransport {
    fn request(&self, command: &str) -> Result<String> {
        let send_failed = |source| HyprError::SendFailed {
            path: self.socket_path.clone(),
            source,
        };

        debug!(command, socket = %self.socket_path.display(), "Sending IPC command");

        // The stream is dropped, and so closed, on every return path
        let mut stream = UnixStream::connect(&self.socket_path).map_err(send_failed)?;
        let reply = exchange(&mut stream, command.as_bytes()).map_err(send_failed)?;

        debug!(bytes = reply.len(), "Received IPC reply");

        Ok(String::from_utf8_lossy(&reply).into_owned())
    }
}
