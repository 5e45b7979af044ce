//! Configure command implementation
//!
//! Pipeline: options → platform facts → define aggregation → build
//! directory lifecycle → cmake (or dry print) → guidance.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Args;

use crate::build::invocation::{invoke, require_program, InvocationPlan, Mode, Outcome};
use crate::build::options::{
    aggregate, Flavor, RawOptions, DEFAULT_PROGRAM, DEFAULT_PROJECT_PREFIX, DEP_HDF5,
    FEATURE_DOCS,
};
use crate::build::platform::PlatformInfo;
use crate::build::workdir::WorkingContext;
use crate::config::ProjectConfig;
use crate::error::ConfigureError;
use crate::exec::subprocess::{ProcessRunner, SystemRunner};
use crate::utils::paths::normalize;
use crate::utils::terminal::{LogLevel, Reporter};

/// Configure the project with cmake
#[derive(Args, Debug)]
pub struct ConfigureCommand {
    /// Where the project is built (default: configure in place)
    #[arg(long, value_name = "PATH", help_heading = "General Configure Options")]
    pub build: Option<String>,

    /// Where the project is installed
    #[arg(long, value_name = "PATH", help_heading = "General Configure Options")]
    pub prefix: Option<String>,

    /// Build flavor; Debug also enables coverage
    #[arg(long, value_enum, help_heading = "General Configure Options")]
    pub flavor: Option<Flavor>,

    /// Path to the HDF5 cmake directory ('${SOMEWHERE}/share/cmake/hdf5')
    #[arg(long = "hdf5-dir", value_name = "PATH", help_heading = "Manage dependencies")]
    pub hdf5_dir: Option<String>,

    /// Build the library documentation
    #[arg(long, help_heading = "Manage features")]
    pub build_docs: bool,

    /// Generator used by cmake (default: "NMake Makefiles" on Windows)
    #[arg(long, value_name = "NAME", help_heading = "CMake")]
    pub cmake_generator: Option<String>,

    /// Space separated arguments handed directly to cmake
    #[arg(long, value_name = "ARGS", allow_hyphen_values = true, help_heading = "CMake")]
    pub cmake_args: Option<String>,

    /// Project file to use instead of ./configure.toml
    #[arg(long, value_name = "PATH", help_heading = "CMake")]
    pub config: Option<PathBuf>,

    /// Clean the build directory before configuring
    #[arg(long, help_heading = "Control")]
    pub clean: bool,

    /// Print the cmake command line instead of running it
    #[arg(long, help_heading = "Control")]
    pub drymode: bool,

    /// With --drymode, print the invocation as JSON
    #[arg(long, requires = "drymode", help_heading = "Control")]
    pub json: bool,

    /// Exit with a failure status when cmake fails
    #[arg(long, help_heading = "Control")]
    pub strict: bool,

    /// Logging level (default: INFO)
    #[arg(long, value_enum, help_heading = "Control")]
    pub log_level: Option<LogLevel>,

    /// Extra arguments forwarded to cmake unchanged; put hyphenated ones after `--`
    #[arg(value_name = "CMAKE_OPTIONS")]
    pub passthrough: Vec<String>,
}

impl ConfigureCommand {
    /// Execute the configure command
    pub fn execute(self, no_color: bool) -> Result<ExitCode> {
        let platform = PlatformInfo::current();
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let project = match &self.config {
            Some(path) => Some(ProjectConfig::load_from_path(&normalize(path)?)?),
            None => ProjectConfig::discover(&cwd)?,
        };
        let options = self.to_raw_options(project.as_ref());

        let reporter = Reporter::new(options.log_level, platform.supports_color() && !no_color);
        reporter.debug(&format!("Platform: {}", platform));
        if project.is_some() {
            reporter.debug("Loaded project file");
        }

        if !options.dry_run {
            require_program(&options.program)?;
        }

        let mode = match (options.dry_run, self.json) {
            (false, _) => Mode::Execute,
            (true, false) => Mode::DryText,
            (true, true) => Mode::DryJson,
        };

        let stdout = std::io::stdout();
        let outcome = run_with(
            &options,
            &platform,
            mode,
            &reporter,
            &mut SystemRunner,
            &mut stdout.lock(),
        )?;

        // A failed cmake run still exits 0 unless --strict is given.
        if self.strict && outcome.is_failure() {
            let exit_code = match outcome {
                Outcome::Failed(result) => result.exit_code,
                _ => None,
            };
            return Err(ConfigureError::Invocation {
                program: options.program,
                exit_code,
            }
            .into());
        }
        Ok(ExitCode::SUCCESS)
    }

    /// Merge the command line over the project file
    fn to_raw_options(&self, project: Option<&ProjectConfig>) -> RawOptions {
        let project = project.cloned().unwrap_or_default();

        let mut dependency_paths = project.dependencies;
        if let Some(hdf5) = &self.hdf5_dir {
            dependency_paths.insert(DEP_HDF5.to_string(), PathBuf::from(hdf5));
        }

        let mut feature_toggles = project.features;
        if self.build_docs {
            feature_toggles.insert(FEATURE_DOCS.to_string(), true);
        }

        let log_level = self
            .log_level
            .unwrap_or_else(|| LogLevel::parse_lenient(project.cmake.log_level.as_deref()));

        RawOptions {
            build_dir: self.build.as_ref().map(PathBuf::from),
            install_prefix: self.prefix.as_ref().map(PathBuf::from),
            flavor: self.flavor,
            dependency_paths,
            feature_toggles,
            generator_name: self.cmake_generator.clone().or(project.cmake.generator),
            extra_generator_args: self
                .cmake_args
                .clone()
                .or(project.cmake.args)
                .unwrap_or_default(),
            passthrough_args: self.passthrough.clone(),
            extra_defines: project.cmake.defines.into_iter().collect(),
            project_prefix: project
                .project
                .name
                .unwrap_or_else(|| DEFAULT_PROJECT_PREFIX.to_string()),
            program: project
                .cmake
                .program
                .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
            clean: self.clean,
            dry_run: self.drymode,
            log_level,
        }
    }
}

/// Run the pipeline for already merged options
///
/// Dry modes never touch the build directory. In execute mode the process
/// moves into the build directory for the run and back out afterwards; if
/// cmake cannot be started at all it stays there.
pub fn run_with(
    options: &RawOptions,
    platform: &PlatformInfo,
    mode: Mode,
    reporter: &Reporter,
    runner: &mut dyn ProcessRunner,
    out: &mut dyn Write,
) -> Result<Outcome> {
    let source_dir = std::env::current_dir().context("Failed to get current directory")?;
    let aggregation = aggregate(options, platform, &source_dir);
    if !aggregation.defines.is_empty() {
        reporter.debug(&format!("{} define(s) from options", aggregation.defines.len()));
    }
    for define in aggregation.defines.iter() {
        reporter.debug(&format!("define {}", define));
    }
    for define in &aggregation.shadowed {
        reporter.warn(&format!(
            "Ignoring project define {}: {} is already set by an option",
            define, define.name
        ));
    }

    let build_dir = options.build_dir.as_deref();
    let context = if mode.is_dry() {
        WorkingContext::plan(build_dir)?
    } else {
        WorkingContext::enter(build_dir, options.clean)?
    };

    if let Some(dir) = context.build_dir() {
        if mode.is_dry() {
            reporter.info(&format!("# cd {}", dir.display()));
        } else {
            reporter.debug(&format!("Build directory {:?}", context.state()));
            reporter.info(&format!("Configure in '{}'", dir.display()));
        }
    }

    let plan = InvocationPlan::new(&options.program, &context, &aggregation);
    if !mode.is_dry() {
        reporter.info(&format!("# {}", plan.command_line()));
        reporter.info("Configure the project");
    }

    let outcome = invoke(&plan, mode, runner, reporter, out)?;
    if mode.is_dry() {
        return Ok(outcome);
    }

    let build_dir = context.build_dir().map(|dir| dir.display().to_string());
    context.leave()?;
    report_guidance(reporter, build_dir.as_deref());
    Ok(outcome)
}

/// Tell the user how to carry on by hand
fn report_guidance(reporter: &Reporter, build_dir: Option<&str>) {
    reporter.info("To build the project run the following commands:");
    if let Some(dir) = build_dir {
        reporter.info(&format!("# cd {}", dir));
        reporter.info("# make");
        reporter.info("# make test");
        reporter.info("# make docs");
        reporter.info("# make coverage");
    }
    reporter.info("To adjust the configuration, run from the build directory:");
    reporter.info("# cmake-gui .");
    reporter.info("# cmake .");
}
