//! Terminal output utilities
//!
//! [`Reporter`] prints leveled progress lines (`[INFO] ...`) to stderr,
//! optionally colored. Coloring is decided once from the platform and the
//! `--no-color` flag, never from terminal sniffing.

use std::fmt;

use clap::ValueEnum;
use console::{style, Style};

/// Print an error message to stderr
pub fn print_error(message: &str) {
    eprintln!("{}: {}", style("error").red().bold(), message);
}

/// Reporter verbosity, ordered from most to least verbose
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum)]
pub enum LogLevel {
    #[value(name = "DEBUG")]
    Debug,
    #[default]
    #[value(name = "INFO")]
    Info,
    #[value(name = "WARN")]
    Warn,
    #[value(name = "ERROR")]
    Error,
}

impl LogLevel {
    /// Parse a level token, falling back to INFO for anything unknown
    pub fn parse_lenient(token: Option<&str>) -> Self {
        match token.map(|t| t.trim().to_ascii_uppercase()).as_deref() {
            Some("DEBUG") => LogLevel::Debug,
            Some("WARN") | Some("WARNING") => LogLevel::Warn,
            Some("ERROR") => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    fn style(self) -> Style {
        match self {
            LogLevel::Info => Style::new().green(),
            LogLevel::Warn => Style::new().yellow(),
            LogLevel::Error => Style::new().red(),
            LogLevel::Debug => Style::new().black(),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

/// Leveled progress and guidance output
#[derive(Debug, Clone, Copy)]
pub struct Reporter {
    level: LogLevel,
    color: bool,
}

impl Reporter {
    /// Create a reporter showing messages at `level` and above
    pub fn new(level: LogLevel, color: bool) -> Self {
        Self { level, color }
    }

    /// Whether messages at `level` are shown
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }

    /// Render a line, or `None` when `level` is filtered out
    pub fn format(&self, level: LogLevel, message: &str) -> Option<String> {
        if !self.enabled(level) {
            return None;
        }
        let line = format!("[{}] {}", level, message);
        if self.color {
            Some(level.style().force_styling(true).apply_to(line).to_string())
        } else {
            Some(line)
        }
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        if let Some(line) = self.format(level, message) {
            eprintln!("{}", line);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
