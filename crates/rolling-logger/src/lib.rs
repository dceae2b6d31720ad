//! Rolling Logger
//!
//! `tracing` subscriber for browser front ends. Formatted events go to the
//! browser console (stderr when not running on wasm32) and the most recent
//! lines are kept in a fixed-size circular buffer for in-app diagnostics.

use std::collections::VecDeque;
use std::fmt::Write as _;
use std::io;
use std::sync::{Arc, Mutex, OnceLock};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Metadata, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

/// Number of lines kept when the logger is installed globally
pub const DEFAULT_CAPACITY: usize = 500;

static GLOBAL_BUFFER: OnceLock<LogBuffer> = OnceLock::new();

/// Shared circular buffer of formatted log lines
#[derive(Clone, Debug)]
pub struct LogBuffer {
    lines: Arc<Mutex<VecDeque<String>>>,
    capacity: usize,
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    /// Append a line, evicting the oldest one when full
    pub fn push(&self, line: String) {
        if let Ok(mut lines) = self.lines.lock() {
            if lines.len() == self.capacity {
                lines.pop_front();
            }
            lines.push_back(line);
        }
    }

    /// Buffered lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|lines| lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

// ========================
// Ring Buffer Layer
// ========================

/// Collects the `message` field and any extra fields of an event
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

fn format_line(timestamp: &str, meta: &Metadata<'_>, visitor: &LineVisitor) -> String {
    format!(
        "{} {:<5} {}: {}{}",
        timestamp,
        meta.level(),
        meta.target(),
        visitor.message,
        visitor.fields
    )
}

/// `tracing` layer that mirrors every event into a [`LogBuffer`]
pub struct RingBufferLayer {
    buffer: LogBuffer,
}

impl RingBufferLayer {
    pub fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S: Subscriber> Layer<S> for RingBufferLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        self.buffer
            .push(format_line(&timestamp, event.metadata(), &visitor));
    }
}

// ========================
// Console Writer
// ========================

/// `MakeWriter` that routes each formatted event to the console by level
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

/// Buffers one formatted event and emits it when dropped
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let line = String::from_utf8_lossy(&self.buf);
        emit(self.level, line.trim_end());
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter { level: Level::INFO, buf: Vec::new() }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter { level: *meta.level(), buf: Vec::new() }
    }
}

// ========================
// Installation
// ========================

/// Install the global subscriber.
///
/// Returns the shared buffer; `log` records from dependencies are bridged
/// into `tracing` by the subscriber's init.
pub fn init_logger(app_name: &str, max_level: Level) -> Result<LogBuffer, TryInitError> {
    let buffer = GLOBAL_BUFFER
        .get_or_init(|| LogBuffer::new(DEFAULT_CAPACITY))
        .clone();

    // SystemTime is unavailable on wasm32, the ring buffer stamps lines itself
    let console = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_writer(ConsoleMakeWriter);

    tracing_subscriber::registry()
        .with(LevelFilter::from_level(max_level))
        .with(console)
        .with(RingBufferLayer::new(buffer.clone()))
        .try_init()?;

    tracing::info!("[{}] logger ready, keeping last {} lines", app_name, buffer.capacity());
    Ok(buffer)
}

/// Lines captured by the global logger, oldest first
pub fn recent_lines() -> Vec<String> {
    GLOBAL_BUFFER.get().map(LogBuffer::lines).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::layer::SubscriberExt;

    #[test]
    fn test_buffer_evicts_oldest() {
        let buffer = LogBuffer::new(3);
        for i in 0..5 {
            buffer.push(format!("line {}", i));
        }
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.lines(), vec!["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn test_zero_capacity_keeps_one_line() {
        let buffer = LogBuffer::new(0);
        buffer.push("a".to_string());
        buffer.push("b".to_string());
        assert_eq!(buffer.lines(), vec!["b"]);
    }

    #[test]
    fn test_layer_captures_message_and_fields() {
        let buffer = LogBuffer::new(10);
        let subscriber = tracing_subscriber::registry().with(RingBufferLayer::new(buffer.clone()));

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(page = 3, "[PAGER] fetch {} rows", 10);
        });

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN"));
        assert!(lines[0].contains("[PAGER] fetch 10 rows"));
        assert!(lines[0].ends_with(" page=3"));
    }

    #[test]
    fn test_global_logger_feeds_recent_lines() {
        let buffer = init_logger("test", Level::DEBUG).unwrap();
        tracing::debug!("[TEST] visible in diagnostics");

        let lines = recent_lines();
        assert_eq!(lines, buffer.lines());
        assert!(lines.iter().any(|l| l.contains("logger ready")));
        assert!(lines.iter().any(|l| l.contains("[TEST] visible in diagnostics")));
        // second install is refused, the buffer survives
        assert!(init_logger("test", Level::DEBUG).is_err());
        assert!(!recent_lines().is_empty());
    }

    #[test]
    fn test_clear() {
        let buffer = LogBuffer::new(2);
        buffer.push("x".to_string());
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
