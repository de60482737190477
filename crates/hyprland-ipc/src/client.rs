//! Hyprland IPC client implementation
//!
//! This module provides the `HyprClient` for communicating with the Hyprland
//! compositor. The client holds no connection of its own: every operation
//! opens, uses and closes a fresh socket through its `Transport`.

use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{HyprError, Result};
use crate::events::EventStream;
use crate::socket::socket_paths_from_env;
use crate::transport::{Transport, UnixTransport, UNKNOWN_REQUEST};

/// Separator between actions in a batched dispatch
const BATCH_SEPARATOR: &str = "; ";

/// Client for communicating with the Hyprland compositor via IPC
///
/// # Example
///
/// ```ignore
/// let client = HyprClient::from_env()?;
/// client.batch(&["workspace 2", "exec kitty"])?;
/// let window = client.get_active_window()?;
/// ```
#[derive(Debug, Clone)]
pub struct HyprClient<T = UnixTransport> {
    socket_path: PathBuf,
    event_socket_path: PathBuf,
    transport: T,
}

impl HyprClient<UnixTransport> {
    /// Create a client for explicit socket paths
    ///
    /// The paths are not checked until the first request.
    pub fn new(socket_path: impl Into<PathBuf>, event_socket_path: impl Into<PathBuf>) -> Self {
        let socket_path = socket_path.into();
        let transport = UnixTransport::new(socket_path.clone());

        Self {
            socket_path,
            event_socket_path: event_socket_path.into(),
            transport,
        }
    }

    /// Create a client for the Hyprland instance named by the environment
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EnvNotSet` if `XDG_RUNTIME_DIR` or
    /// `HYPRLAND_INSTANCE_SIGNATURE` is not set.
    /// Returns `HyprError::SocketsNotFound` if the socket files don't exist.
    pub fn from_env() -> Result<Self> {
        let paths = socket_paths_from_env()?;
        Ok(Self::new(paths.command, paths.event))
    }
}

impl<T: Transport> HyprClient<T> {
    /// Create a client sending its commands through `transport`
    pub fn with_transport(
        socket_path: impl Into<PathBuf>,
        event_socket_path: impl Into<PathBuf>,
        transport: T,
    ) -> Self {
        Self {
            socket_path: socket_path.into(),
            event_socket_path: event_socket_path.into(),
            transport,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn event_socket_path(&self) -> &Path {
        &self.event_socket_path
    }

    /// Send a raw command and return the reply verbatim
    ///
    /// # Errors
    ///
    /// Returns `HyprError::SendFailed` if the socket exchange fails.
    /// Returns `HyprError::UnknownRequest` if Hyprland replies `unknown request`.
    pub fn send(&self, command: &str) -> Result<String> {
        let reply = self.transport.request(command)?;

        if reply == UNKNOWN_REQUEST {
            return Err(HyprError::UnknownRequest {
                command: command.to_string(),
            });
        }

        Ok(reply)
    }

    /// Send a command and decode its reply as JSON
    ///
    /// An empty reply decodes to an empty object.
    ///
    /// # Errors
    ///
    /// Returns any error from `send()`, or `HyprError::DecodeFailed` if the
    /// reply is not valid JSON.
    pub fn send_json(&self, command: &str) -> Result<Value> {
        let reply = self.send(command)?;

        if reply.is_empty() {
            return Ok(Value::Object(Map::new()));
        }

        serde_json::from_str(&reply).map_err(|source| HyprError::DecodeFailed {
            command: command.to_string(),
            source,
        })
    }

    /// Send a command and deserialize its JSON reply into `R`
    pub fn send_json_as<R: DeserializeOwned>(&self, command: &str) -> Result<R> {
        let value = self.send_json(command)?;

        serde_json::from_value(value).map_err(|source| HyprError::DecodeFailed {
            command: command.to_string(),
            source,
        })
    }

    /// Run a single dispatcher, discarding its reply
    ///
    /// # Errors
    ///
    /// Returns `HyprError::DispatchFailed` naming `action`, with the
    /// underlying failure as its source.
    pub fn dispatch(&self, action: &str) -> Result<()> {
        self.send(&format!("dispatch {}", action))
            .map(drop)
            .map_err(|e| HyprError::DispatchFailed {
                action: action.to_string(),
                source: Box::new(e),
            })
    }

    /// Run dispatchers one request at a time, stopping at the first failure
    pub fn dispatch_many<S: AsRef<str>>(&self, actions: &[S]) -> Result<()> {
        for action in actions {
            self.dispatch(action.as_ref())?;
        }
        Ok(())
    }

    /// Run dispatchers as a single `dispatch a1; a2; ...` request
    ///
    /// Any failure of the combined request falls back to `dispatch_many()`,
    /// so only a failure of an individual dispatch is returned.
    pub fn batch<S: AsRef<str>>(&self, actions: &[S]) -> Result<()> {
        if actions.is_empty() {
            return Ok(());
        }

        let joined = actions
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join(BATCH_SEPARATOR);

        match self.send(&format!("dispatch {}", joined)) {
            Ok(_) => Ok(()),
            Err(e) => {
                debug!(
                    error = %e,
                    actions = actions.len(),
                    "Batched dispatch failed, falling back to individual dispatches"
                );
                self.dispatch_many(actions)
            }
        }
    }

    /// Query all clients (windows)
    ///
    /// An empty reply yields no clients.
    ///
    /// # Errors
    ///
    /// Returns any error from `send_json()`, or `HyprError::UnexpectedReply`
    /// if the reply is not an array of objects.
    pub fn get_clients(&self) -> Result<Vec<Map<String, Value>>> {
        const COMMAND: &str = "clients";

        let unexpected = || HyprError::UnexpectedReply {
            command: COMMAND.to_string(),
            expected: "an array of objects",
        };

        match self.send_json(COMMAND)? {
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::Object(client) => Ok(client),
                    _ => Err(unexpected()),
                })
                .collect(),
            Value::Object(map) if map.is_empty() => Ok(Vec::new()),
            _ => Err(unexpected()),
        }
    }

    /// Query the focused window
    pub fn get_active_window(&self) -> Result<Map<String, Value>> {
        self.get_object("activewindow")
    }

    /// Query the focused workspace
    pub fn get_active_workspace(&self) -> Result<Map<String, Value>> {
        self.get_object("activeworkspace")
    }

    fn get_object(&self, command: &str) -> Result<Map<String, Value>> {
        match self.send_json(command)? {
            Value::Object(map) => Ok(map),
            _ => Err(HyprError::UnexpectedReply {
                command: command.to_string(),
                expected: "an object",
            }),
        }
    }

    /// Open a new subscription to the event socket
    ///
    /// Each call connects afresh; the returned stream ends when Hyprland
    /// closes the connection.
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EventStreamFailed` if the connection fails.
    pub fn events(&self) -> Result<EventStream<UnixStream>> {
        EventStream::connect(&self.event_socket_path)
    }
}
