//! Live event stream emitted while renaming.
//!
//! Messages follow two shapes that presentation code relies on:
//! `"Label: value"` and `"Label: old → new"`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const FULL_QUEUE_POLL: Duration = Duration::from_millis(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub message: String,
    /// File the event is about, for attribution when targets run concurrently
    pub source: Option<PathBuf>,
}

impl Event {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(EventKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(EventKind::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(EventKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EventKind::Error, message)
    }

    pub fn with_source(mut self, source: &Path) -> Self {
        self.source = Some(source.to_path_buf());
        self
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver of renamer events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

impl<F> EventSink for F
where
    F: Fn(Event) + Send + Sync,
{
    fn emit(&self, event: Event) {
        self(event)
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event) {}
}

/// Cooperative cancellation flag shared between a run and its controller
#[derive(Debug, Default, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Bounded queue sink.
///
/// A full queue blocks the producer until the consumer drains it. While
/// blocked the producer polls `cancel`; once cancelled, events that do not
/// fit are dropped. Events are also dropped after the receiver hangs up.
pub struct ChannelSink {
    sender: SyncSender<Event>,
    cancel: CancelToken,
}

impl ChannelSink {
    pub fn new(capacity: usize, cancel: CancelToken) -> (Self, Receiver<Event>) {
        let (sender, receiver) = sync_channel(capacity.max(1));
        (Self { sender, cancel }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: Event) {
        let mut event = event;
        loop {
            match self.sender.try_send(event) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return,
                Err(TrySendError::Full(returned)) => {
                    if self.cancel.is_cancelled() {
                        return;
                    }
                    event = returned;
                    thread::sleep(FULL_QUEUE_POLL);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_event_constructors() {
        let e = Event::success("Renamed: a.mkv → b.mkv").with_source(Path::new("/tv/a.mkv"));
        assert_eq!(e.kind, EventKind::Success);
        assert_eq!(e.to_string(), "Renamed: a.mkv → b.mkv");
        assert_eq!(e.source, Some(PathBuf::from("/tv/a.mkv")));
    }

    #[test]
    fn test_closure_sink() {
        let seen = Mutex::new(Vec::new());
        let sink = |e: Event| seen.lock().unwrap().push(e.message);
        sink.emit(Event::info("Matched: a.mkv"));
        sink.emit(Event::warning("Skipped: b.mkv"));
        assert_eq!(*seen.lock().unwrap(), vec!["Matched: a.mkv", "Skipped: b.mkv"]);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_channel_sink_delivers_in_order() {
        let (sink, rx) = ChannelSink::new(8, CancelToken::new());
        sink.emit(Event::info("one"));
        sink.emit(Event::info("two"));
        drop(sink);

        let messages: Vec<String> = rx.iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["one", "two"]);
    }

    #[test]
    fn test_channel_sink_backpressure() {
        let (sink, rx) = ChannelSink::new(1, CancelToken::new());

        let producer = thread::spawn(move || {
            for i in 0..20 {
                sink.emit(Event::info(format!("event {}", i)));
            }
        });

        let received: Vec<Event> = rx.iter().collect();
        producer.join().unwrap();
        assert_eq!(received.len(), 20);
        assert_eq!(received[19].message, "event 19");
    }

    #[test]
    fn test_channel_sink_drops_after_cancel_when_full() {
        let cancel = CancelToken::new();
        let (sink, rx) = ChannelSink::new(1, cancel.clone());

        sink.emit(Event::info("kept"));
        cancel.cancel();
        // Queue is full and nobody drains it; this must not block
        sink.emit(Event::info("dropped"));
        drop(sink);

        let messages: Vec<String> = rx.iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["kept"]);
    }

    #[test]
    fn test_channel_sink_ignores_hung_up_receiver() {
        let (sink, rx) = ChannelSink::new(1, CancelToken::new());
        drop(rx);
        sink.emit(Event::error("nobody listening"));
    }
}
