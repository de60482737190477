//! Hyprland event stream implementation
//!
//! This module provides the `EventStream` for reading compositor events from
//! the event socket (`.socket2.sock`). Unlike the command socket, this
//! connection is one-way: Hyprland writes `name>>data\n` lines for as long as
//! the connection stays open, and the client never writes.
//!
//! ## Reading
//!
//! Bytes are accumulated in a buffer and every complete line is turned into
//! an `Event` in arrival order. A zero-length read is the normal end of the
//! stream; any partial line left in the buffer at that point is dropped.
//! There is no reconnection: call `HyprClient::events()` again to resume.

use std::io::{self, Read};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{HyprError, Result};
use crate::types::Event;

/// Size of each read from the event socket
const READ_CHUNK_SIZE: usize = 4096;

/// Iterator over the events arriving on one event socket connection
///
/// Yields `Ok(Event)` for every complete line and ends (`None`) once the
/// peer closes the connection. An I/O error is yielded once, after which the
/// stream is finished.
///
/// # Example
///
/// ```ignore
/// let client = HyprClient::from_env()?;
/// for event in client.events()? {
///     let event = event?;
///     if event.name == "workspace" {
///         println!("Switched to workspace {}", event.data);
///     }
/// }
/// ```
#[derive(Debug)]
pub struct EventStream<R> {
    reader: R,
    /// Bytes received but not yet terminated by a newline
    buffer: Vec<u8>,
    /// Socket path, kept for error messages
    path: PathBuf,
    finished: bool,
}

impl EventStream<UnixStream> {
    /// Connect to the event socket at `path`
    ///
    /// # Errors
    ///
    /// Returns `HyprError::EventStreamFailed` if the connection fails.
    pub fn connect(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path).map_err(|source| HyprError::EventStreamFailed {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(socket = %path.display(), "Event stream connected");

        Ok(Self::new(stream, path))
    }
}

impl<R: Read> EventStream<R> {
    /// Read events from an already connected byte source
    ///
    /// `path` is only used to label errors.
    pub fn new(reader: R, path: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            path: path.into(),
            finished: false,
        }
    }

    /// Remove and decode the first complete line in the buffer
    fn take_line(&mut self) -> Option<Event> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.buffer.drain(..=newline).collect();

        Some(Event::from_line(&String::from_utf8_lossy(
            &line[..line.len() - 1],
        )))
    }

    /// Append the next chunk to the buffer, returning the number of bytes read
    fn fill(&mut self) -> io::Result<usize> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.reader.read(&mut chunk) {
                Ok(n) => {
                    self.buffer.extend_from_slice(&chunk[..n]);
                    return Ok(n);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R: Read> Iterator for EventStream<R> {
    type Item = Result<Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.take_line() {
                trace!(name = %event.name, "Received event");
                return Some(Ok(event));
            }

            if self.finished {
                return None;
            }

            match self.fill() {
                Ok(0) => {
                    debug!(
                        socket = %self.path.display(),
                        discarded = self.buffer.len(),
                        "Event stream closed"
                    );
                    self.finished = true;
                    self.buffer.clear();
                    return None;
                }
                Ok(_) => {}
                Err(source) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Some(Err(HyprError::EventStreamFailed {
                        path: self.path.clone(),
                        source,
                    }));
                }
            }
        }
    }
}

impl<R: Read> std::iter::FusedIterator for EventStream<R> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::io::Write;
    use tempfile::TempDir;

    use crate::test_support::stream_once;

    /// Byte source replaying queued chunks, optionally failing at the end
    struct ChunkReader {
        chunks: VecDeque<Vec<u8>>,
        fail_at_end: bool,
    }

    impl ChunkReader {
        fn new(chunks: &[&[u8]]) -> Self {
            Self {
                chunks: chunks.iter().map(|c| c.to_vec()).collect(),
                fail_at_end: false,
            }
        }

        fn failing(chunks: &[&[u8]]) -> Self {
            Self {
                fail_at_end: true,
                ..Self::new(chunks)
            }
        }
    }

    impl Read for ChunkReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunks.pop_front() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
                None if self.fail_at_end => Err(io::Error::from(io::ErrorKind::ConnectionReset)),
                None => Ok(0),
            }
        }
    }

    fn collect(reader: ChunkReader) -> Vec<Event> {
        EventStream::new(reader, "/tmp/.socket2.sock")
            .map(|e| e.unwrap())
            .collect()
    }

    #[test]
    fn test_events_in_order_then_end() {
        let events = collect(ChunkReader::new(&[b"evt1>>data1\n", b"evt2>>data2\n"]));

        assert_eq!(
            events,
            vec![Event::new("evt1", "data1"), Event::new("evt2", "data2")]
        );
    }

    #[test]
    fn test_several_lines_in_one_chunk() {
        let events = collect(ChunkReader::new(&[b"workspace>>2\nactivewindow>>kitty,~\n"]));

        assert_eq!(
            events,
            vec![
                Event::new("workspace", "2"),
                Event::new("activewindow", "kitty,~"),
            ]
        );
    }

    #[test]
    fn test_line_split_across_chunks() {
        let events = collect(ChunkReader::new(&[b"openwin", b"dow>>80a6,2,", b"kitty,zsh\n"]));

        assert_eq!(events, vec![Event::new("openwindow", "80a6,2,kitty,zsh")]);
    }

    #[test]
    fn test_line_without_delimiter() {
        let events = collect(ChunkReader::new(&[b"configreloaded\n"]));

        assert_eq!(events, vec![Event::new("configreloaded", "")]);
    }

    #[test]
    fn test_partial_line_discarded_at_close() {
        let events = collect(ChunkReader::new(&[b"workspace>>1\nworksp"]));

        assert_eq!(events, vec![Event::new("workspace", "1")]);
    }

    #[test]
    fn test_immediate_close_yields_nothing() {
        assert!(collect(ChunkReader::new(&[])).is_empty());
    }

    #[test]
    fn test_read_error_ends_stream() {
        let mut stream = EventStream::new(
            ChunkReader::failing(&[b"workspace>>1\n"]),
            "/tmp/.socket2.sock",
        );

        assert_eq!(stream.next().unwrap().unwrap(), Event::new("workspace", "1"));
        match stream.next() {
            Some(Err(HyprError::EventStreamFailed { path, source })) => {
                assert_eq!(path, PathBuf::from("/tmp/.socket2.sock"));
                assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
            }
            other => panic!("Expected EventStreamFailed error, got: {:?}", other),
        }
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_stream_is_fused_after_close() {
        let mut stream = EventStream::new(ChunkReader::new(&[]), "/tmp/.socket2.sock");

        assert!(stream.next().is_none());
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_events_are_yielded_lazily() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".socket2.sock");
        let listener = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let mut stream = EventStream::connect(&path).unwrap();
        let (mut server, _addr) = listener.accept().unwrap();

        server.write_all(b"workspace>>1\n").unwrap();
        assert_eq!(stream.next().unwrap().unwrap(), Event::new("workspace", "1"));

        server.write_all(b"workspace>>2\n").unwrap();
        assert_eq!(stream.next().unwrap().unwrap(), Event::new("workspace", "2"));

        drop(server);
        assert!(stream.next().is_none());
    }

    #[test]
    fn test_connect_over_socket() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".socket2.sock");
        let server = stream_once(&path, vec![b"evt1>>data1\n", b"evt2>>data2\n"]);

        let events: Vec<Event> = EventStream::connect(&path)
            .unwrap()
            .map(|e| e.unwrap())
            .collect();

        assert_eq!(
            events,
            vec![Event::new("evt1", "data1"), Event::new("evt2", "data2")]
        );
        server.join().unwrap();
    }

    #[test]
    fn test_connect_failure() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".socket2.sock");

        let err = EventStream::connect(&path).unwrap_err();

        assert!(matches!(err, HyprError::EventStreamFailed { .. }), "{:?}", err);
        assert!(err.to_string().contains(".socket2.sock"), "{}", err);
    }
}
