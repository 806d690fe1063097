//! Leveled logging capability injected into stores.
//!
//! Stores never depend on a concrete sink. They hold an `Arc<dyn Logger>` and report what they
//! do through it; nothing a logger does can change the outcome of a store operation.

use std::fmt;

/// Target used for records forwarded to the `log` facade.
pub const LOG_TARGET: &str = "tome";

/// A sink for leveled store messages.
///
/// `fatal` is a severity, not an instruction: implementations must not abort.
pub trait Logger: Send + Sync {
    fn fatal(&self, args: fmt::Arguments<'_>);
    fn error(&self, args: fmt::Arguments<'_>);
    fn warn(&self, args: fmt::Arguments<'_>);
    fn info(&self, args: fmt::Arguments<'_>);
    fn debug(&self, args: fmt::Arguments<'_>);
    fn trace(&self, args: fmt::Arguments<'_>);
}

/// Forwards messages to the `log` crate, dropping anything below `level`.
///
/// Whatever logger the application installs (`env_logger`, `simple_logger`, ...) decides where
/// the output ends up.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger {
    level: log::LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: log::LevelFilter) -> Self {
        ConsoleLogger { level }
    }

    pub fn level(&self) -> log::LevelFilter {
        self.level
    }

    fn emit(&self, level: log::Level, args: fmt::Arguments<'_>) {
        if level <= self.level {
            log::log!(target: LOG_TARGET, level, "{}", args);
        }
    }
}

impl Default for ConsoleLogger {
    fn default() -> Self {
        ConsoleLogger::new(log::LevelFilter::Info)
    }
}

impl Logger for ConsoleLogger {
    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Error, format_args!("FATAL: {}", args));
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Debug, args);
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.emit(log::Level::Trace, args);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn fatal(&self, _args: fmt::Arguments<'_>) {}
    fn error(&self, _args: fmt::Arguments<'_>) {}
    fn warn(&self, _args: fmt::Arguments<'_>) {}
    fn info(&self, _args: fmt::Arguments<'_>) {}
    fn debug(&self, _args: fmt::Arguments<'_>) {}
    fn trace(&self, _args: fmt::Arguments<'_>) {}
}

/// Captures messages in memory so tests can assert on what a store reported.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Default)]
pub struct RecordingLogger {
    records: std::sync::Mutex<Vec<(Level, String)>>,
}

/// Severity captured by [`RecordingLogger`].
#[cfg(any(test, feature = "test-utils"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Fatal,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[cfg(any(test, feature = "test-utils"))]
impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<(Level, String)> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Messages logged at exactly `level`.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: Level, args: fmt::Arguments<'_>) {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push((level, args.to_string()));
    }
}

#[cfg(any(test, feature = "test-utils"))]
impl Logger for RecordingLogger {
    fn fatal(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Fatal, args);
    }

    fn error(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Debug, args);
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.push(Level::Trace, args);
    }
}
