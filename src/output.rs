//! Reporting and user-facing output.
//!
//! Components never print directly; they emit messages through a
//! [`Reporter`] passed in by the caller, so output stays capturable in
//! tests. [`ConsoleReporter`] is the terminal implementation used by the
//! binary; [`MemoryReporter`] records everything for assertions.

use std::io::{self, IsTerminal};
use std::sync::Mutex;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Diagnostic detail, shown only with `--debug`.
    Debug,
    /// Normal progress output, suppressed by `--quiet`.
    Info,
    /// Something worth attention; always shown.
    Warning,
    /// A failure, per-file or fatal; always shown.
    Error,
}

/// Sink for run-time messages, injected into every component.
pub trait Reporter {
    fn report(&self, level: Level, message: &str);

    fn debug(&self, message: &str) {
        self.report(Level::Debug, message);
    }

    fn info(&self, message: &str) {
        self.report(Level::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(Level::Warning, message);
    }

    fn error(&self, message: &str) {
        self.report(Level::Error, message);
    }
}

/// Terminal reporter with level prefixes and optional color.
pub struct ConsoleReporter {
    quiet: bool,
    debug: bool,
    colored: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool, debug: bool) -> Self {
        Self {
            quiet,
            debug,
            colored: Self::should_use_color(),
        }
    }

    /// Colored output only when stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, level: Level, message: &str) {
        match level {
            Level::Debug if !self.debug => return,
            Level::Info if self.quiet => return,
            _ => {}
        }

        let (prefix, color_code) = match level {
            Level::Info => ("", ""),
            Level::Debug => ("→ ", "\x1b[36m"),   // Cyan
            Level::Warning => ("⚠ ", "\x1b[33m"), // Yellow
            Level::Error => ("✗ ", "\x1b[31m"),   // Red
        };

        let reset = "\x1b[0m";

        if self.colored && !color_code.is_empty() {
            println!("{color_code}{prefix}{message}{reset}");
        } else {
            println!("{prefix}{message}");
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// Reporter that keeps every message in memory.
#[derive(Default)]
pub struct MemoryReporter {
    records: Mutex<Vec<(Level, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in order.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// True if any message at `level` contains `needle`.
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.records()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, level: Level, message: &str) {
        if let Ok(mut records) = self.records.lock() {
            records.push((level, message.to_string()));
        }
    }
}
