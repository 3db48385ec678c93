//! Event log capability injected into the engine.
//!
//! The engine narrates every tick as plain text lines: allocations, wage
//! payments, shortages, output, market activity, and regeneration. Where
//! those lines go is the caller's choice. Logging is fire-and-forget and
//! never feeds back into simulation state.
//!
//! Three implementations are provided:
//!
//! - [`TracingEventLog`] forwards each line to `tracing` under the
//!   [`EVENT_TARGET`] target.
//! - [`MemoryEventLog`] keeps every line, tagged with its tick.
//! - [`NullEventLog`] discards everything.

use tracing::info;

/// The `tracing` target used by [`TracingEventLog`].
pub const EVENT_TARGET: &str = "mercat::events";

/// A sink for per-tick event lines.
pub trait EventLog {
    /// Mark the start of a tick.
    fn log_tick_start(&mut self, tick: u64);

    /// Record one event line.
    fn log_event(&mut self, message: &str);

    /// Record several event lines, in order.
    fn log_events(&mut self, messages: &[String]) {
        for message in messages {
            self.log_event(message);
        }
    }

    /// Whether lines are recorded at all.
    ///
    /// The engine skips building event text when this is `false`.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Forwards event lines to `tracing` at `INFO` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventLog {
    /// Tick of the most recent [`EventLog::log_tick_start`].
    tick: u64,
}

impl TracingEventLog {
    /// Create a tracing-backed event log.
    pub const fn new() -> Self {
        Self { tick: 0 }
    }
}

impl EventLog for TracingEventLog {
    fn log_tick_start(&mut self, tick: u64) {
        self.tick = tick;
        info!(target: EVENT_TARGET, tick, "========== TICK {tick} ==========");
    }

    fn log_event(&mut self, message: &str) {
        info!(target: EVENT_TARGET, tick = self.tick, "{message}");
    }
}

/// One recorded event line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedEvent {
    /// Tick during which the line was logged; `0` before the first tick.
    pub tick: u64,
    /// The event text.
    pub message: String,
}

/// Keeps every event line in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryEventLog {
    /// Tick of the most recent tick start.
    tick: u64,
    /// Ticks started, in order.
    ticks: Vec<u64>,
    /// All recorded lines, in order.
    events: Vec<LoggedEvent>,
}

impl MemoryEventLog {
    /// Create an empty in-memory log.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            ticks: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Every recorded line, in order.
    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    /// Ticks that were started, in order.
    pub fn ticks(&self) -> &[u64] {
        &self.ticks
    }

    /// Lines logged during the given tick.
    pub fn messages_for(&self, tick: u64) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.tick == tick)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// Whether any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.events.iter().any(|e| e.message.contains(needle))
    }
}

impl EventLog for MemoryEventLog {
    fn log_tick_start(&mut self, tick: u64) {
        self.tick = tick;
        self.ticks.push(tick);
    }

    fn log_event(&mut self, message: &str) {
        self.events.push(LoggedEvent {
            tick: self.tick,
            message: message.to_owned(),
        });
    }
}

/// Discards every event line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullEventLog;

impl EventLog for NullEventLog {
    fn log_tick_start(&mut self, _tick: u64) {}

    fn log_event(&mut self, _message: &str) {}

    fn log_events(&mut self, _messages: &[String]) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

impl<L: EventLog + ?Sized> EventLog for Box<L> {
    fn log_tick_start(&mut self, tick: u64) {
        (**self).log_tick_start(tick);
    }

    fn log_event(&mut self, message: &str) {
        (**self).log_event(message);
    }

    fn log_events(&mut self, messages: &[String]) {
        (**self).log_events(messages);
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}
