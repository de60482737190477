//! Value types produced by the IPC client

use std::fmt;

/// Separator between the event name and its payload on the event socket
pub(crate) const EVENT_DELIMITER: &str = ">>";

/// A single compositor event read from the event socket
///
/// Hyprland writes one event per line as `name>>data`. The payload is kept
/// verbatim; multi-field payloads such as `openwindow>>addr,ws,class,title`
/// are left for the caller to split.
///
/// # Example
///
/// ```
/// use hyprland_ipc::Event;
///
/// let event = Event::from_line("workspace>>2");
/// assert_eq!(event, Event::new("workspace", "2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Event {
    /// Event identifier (e.g. "workspace", "activewindow")
    pub name: String,

    /// Raw payload after the first `>>`, empty when the line has none
    pub data: String,
}

impl Event {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    /// Split a line (without its trailing newline) on the first `>>`
    pub fn from_line(line: &str) -> Self {
        match line.split_once(EVENT_DELIMITER) {
            Some((name, data)) => Self::new(name, data),
            None => Self::new(line, ""),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.name, EVENT_DELIMITER, self.data)
    }
}
