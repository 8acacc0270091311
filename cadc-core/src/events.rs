// cadc_core/src/events.rs
use std::fmt;
use tokio::sync::mpsc::UnboundedSender;

/// Lifecycle of one operation. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    Idle,
    Preparing,
    Encrypting,
    Decrypting,
    Done,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Phase(Phase),
    Status(String),
    Progress { processed: usize, total: usize },
    Warning(String),
    /// Key-generation result; carries key material in clear text.
    Key {
        exponent: String,
        key: String,
        encoded: String,
    },
    Finished { success: bool, message: String },
}

impl Event {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Event::Finished { .. })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Idle => "idle",
            Phase::Preparing => "preparing",
            Phase::Encrypting => "encrypting",
            Phase::Decrypting => "decrypting",
            Phase::Done => "done",
            Phase::Failed => "failed",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Phase(p) => write!(f, "phase: {p}"),
            Event::Status(s) => f.write_str(s),
            Event::Progress { processed, total } => write!(f, "[{processed}/{total}]"),
            Event::Warning(w) => write!(f, "warning: {w}"),
            Event::Key {
                exponent,
                key,
                encoded,
            } => write!(f, "exponent: {exponent}\nkey: {key}\nencoded: {encoded}"),
            Event::Finished { success, message } => {
                let tag = if *success { "ok" } else { "failed" };
                write!(f, "{tag}: {message}")
            }
        }
    }
}

/// Where an operation reports what it is doing.
pub trait StatusSink {
    fn emit(&mut self, event: Event);
}

impl StatusSink for Vec<Event> {
    fn emit(&mut self, event: Event) {
        self.push(event);
    }
}

impl StatusSink for UnboundedSender<Event> {
    fn emit(&mut self, event: Event) {
        // receiver gone means nobody is listening any more
        let _ = self.send(event);
    }
}
