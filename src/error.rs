//! Error types and helpers for user-friendly error messages
//!
//! Every fatal condition carries an optional hint telling the user how to
//! get going again.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while configuring a project
#[derive(Error, Debug)]
pub enum ConfigureError {
    /// Malformed or inconsistent options, or an unreadable project file
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
        hint: Option<String>,
    },

    /// The build directory could not be created, cleared or entered
    #[error("Filesystem error on '{}': {message}", .path.display())]
    Filesystem {
        path: PathBuf,
        message: String,
        #[source]
        source: std::io::Error,
        hint: Option<String>,
    },

    /// The generator executable is not on PATH
    #[error("Missing tool: {tool}")]
    MissingTool {
        tool: String,
        required_for: String,
        hint: String,
    },

    /// The generator ran and exited with a non-zero status
    #[error("{program} exited with status {}", exit_status_text(.exit_code))]
    Invocation {
        program: String,
        exit_code: Option<i32>,
    },
}

fn exit_status_text(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "unknown".to_string(),
    }
}

impl ConfigureError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
            hint: None,
        }
    }

    /// Create a configuration error with source and hint
    pub fn config_error_with_hint(
        message: impl Into<String>,
        source: Option<anyhow::Error>,
        hint: impl Into<String>,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source,
            hint: Some(hint.into()),
        }
    }

    /// Create a filesystem error for the given path
    pub fn filesystem(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        let hint = match source.kind() {
            std::io::ErrorKind::PermissionDenied => Some(hints::permission_denied().to_string()),
            _ => None,
        };
        Self::Filesystem {
            path: path.into(),
            message: message.into(),
            source,
            hint,
        }
    }

    /// Create a missing tool error
    pub fn missing_tool(
        tool: impl Into<String>,
        required_for: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            required_for: required_for.into(),
            hint: hint.into(),
        }
    }

    /// Display error with formatting and hints
    pub fn display_with_hints(&self) {
        use console::style;

        eprintln!("\n{} {}", style("ERROR:").red().bold(), self);

        match self {
            ConfigureError::Config { hint, .. } | ConfigureError::Filesystem { hint, .. } => {
                if let Some(h) = hint {
                    eprintln!("\n{} {}", style("HINT:").yellow().bold(), h);
                }
            }
            ConfigureError::MissingTool {
                hint, required_for, ..
            } => {
                eprintln!("Required for: {}", required_for);
                eprintln!("\n{} {}", style("HINT:").yellow().bold(), hint);
            }
            ConfigureError::Invocation { .. } => {}
        }

        eprintln!();
    }
}

/// Common error hints
pub mod hints {
    /// Get hint for missing CMake
    pub fn cmake() -> &'static str {
        "Install CMake from https://cmake.org/ or use your package manager:\n\
         • macOS: brew install cmake\n\
         • Ubuntu: sudo apt install cmake\n\
         • Windows: winget install Kitware.CMake\n\
         \n\
         Or run with --drymode to only print the command line."
    }

    /// Get hint for a build directory we are not allowed to touch
    pub fn permission_denied() -> &'static str {
        "Check the permissions of the build directory, or pick another one with --build."
    }

    /// Get hint for a configure.toml that does not parse
    pub fn invalid_project_file() -> &'static str {
        "configure.toml is invalid. Common issues:\n\
         • Invalid TOML syntax (check quotes, brackets, commas)\n\
         • Non-string values in [cmake.defines] or [dependencies]\n\
         • Non-boolean values in [features]"
    }
}
