//! User options and their translation into CMake arguments
//!
//! [`aggregate`] is the single place deciding which `-D` defines, raw
//! passthrough tokens and `-G` generator arguments end up on the cmake
//! command line.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;

use super::defines::{on_off, Define, DefineSet};
use super::platform::PlatformInfo;
use crate::utils::paths::normalize_from;
use crate::utils::terminal::LogLevel;

/// Prefix of project-specific defines when none is configured
pub const DEFAULT_PROJECT_PREFIX: &str = "AMELETHDF";

/// Generator executable when none is configured
pub const DEFAULT_PROGRAM: &str = "cmake";

/// Dependency key whose path becomes `HDF5_DIR:PATH`
pub const DEP_HDF5: &str = "hdf5";

/// Feature key controlling `<PROJECT>_BUILD_DOCS:BOOL`
pub const FEATURE_DOCS: &str = "docs";

/// Build flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Flavor {
    #[value(name = "Release")]
    Release,
    #[value(name = "Debug")]
    Debug,
}

impl fmt::Display for Flavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flavor::Release => write!(f, "Release"),
            Flavor::Debug => write!(f, "Debug"),
        }
    }
}

/// Everything the user asked for, after merging CLI and project file
#[derive(Debug, Clone)]
pub struct RawOptions {
    pub build_dir: Option<PathBuf>,
    pub install_prefix: Option<PathBuf>,
    pub flavor: Option<Flavor>,
    /// Dependency name → install location; unknown names are ignored
    pub dependency_paths: BTreeMap<String, PathBuf>,
    /// Feature name → toggle; a missing key means "unset", not `false`
    pub feature_toggles: BTreeMap<String, bool>,
    pub generator_name: Option<String>,
    /// Space separated tokens, split before being forwarded
    pub extra_generator_args: String,
    /// Forwarded verbatim, in order
    pub passthrough_args: Vec<String>,
    /// Additional defines from the project file, applied after the built-in rules
    pub extra_defines: Vec<(String, String)>,
    pub project_prefix: String,
    pub program: String,
    pub clean: bool,
    pub dry_run: bool,
    pub log_level: LogLevel,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            build_dir: None,
            install_prefix: None,
            flavor: None,
            dependency_paths: BTreeMap::new(),
            feature_toggles: BTreeMap::new(),
            generator_name: None,
            extra_generator_args: String::new(),
            passthrough_args: Vec::new(),
            extra_defines: Vec::new(),
            project_prefix: DEFAULT_PROJECT_PREFIX.to_string(),
            program: DEFAULT_PROGRAM.to_string(),
            clean: false,
            dry_run: false,
            log_level: LogLevel::default(),
        }
    }
}

/// Result of [`aggregate`]
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub defines: DefineSet,
    /// Passthrough tokens followed by the split extra generator args
    pub trailing_args: Vec<String>,
    /// `["-G", name]` or empty
    pub generator_args: Vec<String>,
    /// Project-file defines dropped because a rule already set the name
    pub shadowed: Vec<Define>,
}

impl Aggregation {
    /// Defines, trailing tokens and generator flag, in command-line order
    pub fn to_args(&self) -> Vec<String> {
        let mut args = self.defines.to_args();
        args.extend(self.trailing_args.iter().cloned());
        args.extend(self.generator_args.iter().cloned());
        args
    }
}

/// Map options onto cmake arguments
///
/// Relative paths are resolved against `base`. Each rule fires only when
/// its option is present.
pub fn aggregate(options: &RawOptions, platform: &PlatformInfo, base: &Path) -> Aggregation {
    let mut defines = DefineSet::new();
    let prefix = &options.project_prefix;

    if let Some(hdf5) = options.dependency_paths.get(DEP_HDF5) {
        defines.set_if_absent(
            "HDF5_DIR:PATH",
            normalize_from(base, hdf5).display().to_string(),
        );
    }

    if let Some(install_prefix) = &options.install_prefix {
        defines.set_if_absent(
            "CMAKE_INSTALL_PREFIX:PATH",
            normalize_from(base, install_prefix).display().to_string(),
        );
    }

    if let Some(&docs) = options.feature_toggles.get(FEATURE_DOCS) {
        defines.set_if_absent(format!("{}_BUILD_DOCS:BOOL", prefix), on_off(docs));
    }

    if let Some(flavor) = options.flavor {
        defines.set_if_absent("CMAKE_BUILD_TYPE", flavor.to_string());
        defines.set_if_absent(
            format!("{}_ENABLE_COVERAGE:BOOL", prefix),
            on_off(flavor == Flavor::Debug),
        );
    }

    let mut shadowed = Vec::new();
    for (name, value) in &options.extra_defines {
        if !defines.set_if_absent(name.as_str(), value.as_str()) {
            shadowed.push(Define {
                name: name.clone(),
                value: value.clone(),
            });
        }
    }

    let mut trailing_args = options.passthrough_args.clone();
    trailing_args.extend(
        options
            .extra_generator_args
            .split_whitespace()
            .map(str::to_string),
    );

    // An explicit empty name means "let cmake pick", not "use the default".
    let generator = match options.generator_name.as_deref() {
        Some(name) if name.trim().is_empty() => None,
        Some(name) => Some(name),
        None => platform.default_generator(),
    };
    let generator_args = match generator {
        Some(name) => vec!["-G".to_string(), name.to_string()],
        None => Vec::new(),
    };

    Aggregation {
        defines,
        trailing_args,
        generator_args,
        shadowed,
    }
}
