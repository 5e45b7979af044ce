//! configure.toml project file
//!
//! An optional file next to the top-level CMakeLists.txt holding the
//! defaults a project always wants, so the command line stays short.
//!
//! ```toml
//! [project]
//! name = "AMELETHDF"
//!
//! [cmake]
//! program = "cmake"
//! generator = "Ninja"
//! args = "-Wdev"
//! log_level = "DEBUG"
//!
//! [cmake.defines]
//! BUILD_TESTING = "ON"
//!
//! [dependencies]
//! hdf5 = "/opt/hdf5"
//!
//! [features]
//! docs = true
//! ```
//!
//! Values given on the command line always win over the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{hints, ConfigureError};

/// File name looked up in the current directory
pub const PROJECT_FILE: &str = "configure.toml";

/// Root of configure.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub cmake: CMakeSection,

    /// Dependency name → install location
    #[serde(default)]
    pub dependencies: BTreeMap<String, PathBuf>,

    /// Feature name → toggle
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

/// `[project]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectSection {
    /// Prefix of project-specific defines, e.g. `AMELETHDF`
    pub name: Option<String>,
}

/// `[cmake]`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CMakeSection {
    /// Generator executable
    pub program: Option<String>,

    /// Generator name passed with `-G`
    pub generator: Option<String>,

    /// Extra space separated arguments
    pub args: Option<String>,

    /// Reporter level; unknown values fall back to INFO
    pub log_level: Option<String>,

    /// Additional defines; `NAME:TYPE` keys are allowed
    #[serde(default)]
    pub defines: BTreeMap<String, String>,
}

impl ProjectConfig {
    /// Load `configure.toml` from `dir` if present
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(PROJECT_FILE);
        if path.is_file() {
            Self::load_from_path(&path).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigureError::config_error(format!(
                "Project file not found: {}",
                path.display()
            ))
            .into());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ConfigureError::config_error_with_hint(
                format!("Failed to parse {}", PROJECT_FILE),
                Some(e.into()),
                hints::invalid_project_file(),
            )
        })?;

        if let Some(name) = &config.project.name {
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigureError::config_error_with_hint(
                    format!("Invalid project name '{}'", name),
                    None,
                    "[project] name becomes a CMake variable prefix: use letters, digits and '_'",
                )
                .into());
            }
        }

        Ok(config)
    }
}
