//! Hyprland IPC client
//!
//! This crate talks to a running Hyprland compositor over its two UNIX
//! domain sockets:
//! - `.socket.sock` accepts one command per connection and replies until it
//!   closes the connection
//! - `.socket2.sock` pushes a continuous stream of `name>>data` event lines
//!
//! ## Architecture
//!
//! - `HyprClient`: resolves both sockets and offers `send`, `send_json`,
//!   dispatch/batch helpers and the event stream
//! - `Transport`: the request/response seam, implemented by `UnixTransport`
//! - `EventStream`: iterator turning the raw event socket into `Event`s
//! - `HyprError`: error type for every operation
//!
//! All I/O is blocking. Every call opens its own connection, so a client can
//! be shared between threads without locking.

mod client;
mod error;
mod events;
mod socket;
mod transport;
mod types;

pub use client::HyprClient;
pub use error::{HyprError, Result};
pub use events::EventStream;
pub use socket::{
    resolve_socket_paths, socket_paths_from_env, SocketPaths, COMMAND_SOCKET_NAME,
    EVENT_SOCKET_NAME, INSTANCE_SIGNATURE_ENV, RUNTIME_DIR_ENV,
};
pub use transport::{exchange, Transport, UnixTransport, UNKNOWN_REQUEST};
pub use types::Event;
