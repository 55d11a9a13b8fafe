//! Event tracking
//!
//! `track(action, category, label)` is the single integration point for an
//! analytics backend. The tracker stamps each event and hands it to an
//! [`EventSink`]; swapping the sink swaps the backend without touching any
//! call site. Tracking is fire-and-forget: it never fails and never blocks.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// Event label: free text or a whole number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Number(i64),
    Text(String),
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Number(n) => write!(f, "{n}"),
            Label::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

impl From<String> for Label {
    fn from(s: String) -> Self {
        Label::Text(s)
    }
}

impl From<i64> for Label {
    fn from(n: i64) -> Self {
        Label::Number(n)
    }
}

impl From<u64> for Label {
    fn from(n: u64) -> Self {
        Label::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

/// A tracked analytics event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedEvent {
    pub action: String,
    pub category: String,
    pub label: Label,
    /// ISO-8601 UTC timestamp with millisecond precision
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

impl TrackedEvent {
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

// ============================================================================
// Clocks
// ============================================================================

/// Source of event timestamps
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed epoch plus the runtime's elapsed virtual milliseconds
#[derive(Debug, Clone)]
pub struct VirtualClock {
    epoch: DateTime<Utc>,
    elapsed_ms: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn new(epoch: DateTime<Utc>, elapsed_ms: Rc<Cell<u64>>) -> Self {
        Self { epoch, elapsed_ms }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        // Saturates at the last representable instant.
        let elapsed = i64::try_from(self.elapsed_ms.get()).unwrap_or(i64::MAX);
        Duration::try_milliseconds(elapsed)
            .and_then(|offset| self.epoch.checked_add_signed(offset))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Destination for tracked events. Implementations must not panic; failures
/// are theirs to log and drop.
pub trait EventSink {
    fn record(&self, event: &TrackedEvent);
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&self, event: &TrackedEvent) {
        (**self).record(event);
    }
}

/// Console surface: one `info` line per event
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn record(&self, event: &TrackedEvent) {
        tracing::info!(
            action = %event.action,
            category = %event.category,
            label = %event.label,
            timestamp = %event.timestamp_iso(),
            "Event tracked"
        );
    }
}

/// Shared in-memory buffer; clones observe the same events
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Rc<RefCell<Vec<TrackedEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far
    pub fn events(&self) -> Vec<TrackedEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far
    pub fn drain(&self) -> Vec<TrackedEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Recorded `(action, label)` pairs, handy for assertions
    pub fn actions(&self) -> Vec<(String, String)> {
        self.events
            .borrow()
            .iter()
            .map(|e| (e.action.clone(), e.label.to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &TrackedEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Newline-delimited JSON writer
pub struct JsonLinesSink<W: Write> {
    writer: RefCell<W>,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: RefCell::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn record(&self, event: &TrackedEvent) {
        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, action = %event.action, "Failed to encode tracked event");
                return;
            }
        };

        let mut writer = self.writer.borrow_mut();
        if let Err(e) = writeln!(writer, "{line}").and_then(|_| writer.flush()) {
            tracing::warn!(error = %e, action = %event.action, "Failed to write tracked event");
        }
    }
}

/// Forwards to several sinks in order
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl EventSink for FanoutSink {
    fn record(&self, event: &TrackedEvent) {
        for sink in &self.sinks {
            sink.record(event);
        }
    }
}

// ============================================================================
// Tracker
// ============================================================================

/// Stamps events and forwards them to the configured sink
pub struct EventTracker {
    sink: Box<dyn EventSink>,
    clock: Box<dyn Clock>,
}

impl Default for EventTracker {
    fn default() -> Self {
        Self::new(LogSink)
    }
}

impl EventTracker {
    /// Tracker with wall-clock timestamps
    pub fn new(sink: impl EventSink + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(sink: impl EventSink + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            sink: Box::new(sink),
            clock: Box::new(clock),
        }
    }

    /// Record `(action, category, label)` with the current timestamp
    pub fn track(&self, action: &str, category: &str, label: impl Into<Label>) {
        let event = TrackedEvent {
            action: action.to_string(),
            category: category.to_string(),
            label: label.into(),
            timestamp: self.clock.now(),
        };
        self.sink.record(&event);
    }
}
