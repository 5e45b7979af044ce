//! Build directory lifecycle
//!
//! [`WorkingContext`] owns every change of the process working directory:
//! [`WorkingContext::enter`] creates (or clears) the build directory and
//! moves into it, [`WorkingContext::leave`] moves back.
//!
//! Restoring is explicit, not tied to `Drop`. When the generator cannot be
//! started at all the error propagates and the process stays inside the
//! build directory; callers relying on the old directory must only do so
//! after a successful run.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::error::ConfigureError;
use crate::utils::paths::normalize_from;

/// What happened to the build directory on entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildDirState {
    /// It did not exist and was created
    Created,
    /// It existed and its contents were removed
    Cleared,
    /// It existed and was used as is
    Reused,
}

/// Source and working directories for one generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingContext {
    source_dir: PathBuf,
    build_dir: Option<PathBuf>,
    state: Option<BuildDirState>,
    entered: bool,
}

impl WorkingContext {
    /// Resolve the directories without touching the filesystem
    ///
    /// Used by dry mode: the context describes where cmake would run, but
    /// the build directory is neither created nor entered.
    pub fn plan(build_dir: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self {
            build_dir: build_dir.map(|dir| normalize_from(&cwd, dir)),
            source_dir: cwd,
            state: None,
            entered: false,
        })
    }

    /// Prepare the build directory and move the process into it
    ///
    /// Without a build directory this is a no-op and cmake runs in place.
    /// Any failure to create, clear or enter the directory is fatal.
    pub fn enter(build_dir: Option<&Path>, clean: bool) -> Result<Self> {
        let mut context = Self::plan(build_dir)?;
        let Some(dir) = context.build_dir.clone() else {
            return Ok(context);
        };

        if clean && context.source_dir.starts_with(&dir) {
            return Err(ConfigureError::config_error_with_hint(
                format!(
                    "Refusing to clean '{}': it contains the source directory",
                    dir.display()
                ),
                None,
                "Use a dedicated build directory, e.g. --build build",
            )
            .into());
        }

        let state = if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| {
                ConfigureError::filesystem(&dir, "Failed to create build directory", e)
            })?;
            BuildDirState::Created
        } else if clean {
            clear_directory(&dir)?;
            BuildDirState::Cleared
        } else {
            BuildDirState::Reused
        };

        std::env::set_current_dir(&dir)
            .map_err(|e| ConfigureError::filesystem(&dir, "Failed to enter build directory", e))?;

        context.state = Some(state);
        context.entered = true;
        Ok(context)
    }

    /// Directory holding the top-level CMakeLists.txt
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Normalized build directory, if one was requested
    pub fn build_dir(&self) -> Option<&Path> {
        self.build_dir.as_deref()
    }

    /// Directory cmake runs in
    pub fn working_dir(&self) -> &Path {
        self.build_dir.as_deref().unwrap_or(&self.source_dir)
    }

    pub fn state(&self) -> Option<BuildDirState> {
        self.state
    }

    /// Move the process back to the directory it was started from
    pub fn leave(self) -> Result<()> {
        if self.entered {
            std::env::set_current_dir(&self.source_dir).map_err(|e| {
                ConfigureError::filesystem(
                    &self.source_dir,
                    "Failed to return to source directory",
                    e,
                )
            })?;
        }
        Ok(())
    }
}

/// Remove every entry of `dir`, keeping `dir` itself
fn clear_directory(dir: &Path) -> Result<()> {
    let entries = fs::read_dir(dir)
        .map_err(|e| ConfigureError::filesystem(dir, "Failed to read build directory", e))?;

    for entry in entries {
        let entry = entry
            .map_err(|e| ConfigureError::filesystem(dir, "Failed to read build directory", e))?;
        let path = entry.path();
        // Symlinks are removed, never followed.
        let is_dir = entry
            .file_type()
            .map(|t| t.is_dir())
            .map_err(|e| ConfigureError::filesystem(&path, "Failed to inspect entry", e))?;

        let removed = if is_dir {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        removed.map_err(|e| ConfigureError::filesystem(&path, "Failed to remove entry", e))?;
    }
    Ok(())
}
