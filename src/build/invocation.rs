//! Generator invocation
//!
//! An [`InvocationPlan`] is the complete, resolved cmake command line.
//! [`invoke`] either prints it (dry mode) or runs it through a
//! [`ProcessRunner`].

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use super::options::Aggregation;
use super::workdir::WorkingContext;
use crate::error::{hints, ConfigureError};
use crate::exec::subprocess::{command_exists, CommandResult, ProcessRunner};
use crate::utils::terminal::Reporter;

/// Resolved generator command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvocationPlan {
    /// Generator executable, looked up on PATH
    pub program: String,
    /// Arguments after the program name
    pub args: Vec<String>,
    /// Directory the generator runs in
    pub working_dir: PathBuf,
    /// Source directory passed as first argument, only with a build directory
    pub source_dir: Option<PathBuf>,
}

impl InvocationPlan {
    /// Assemble `[source_dir?, defines.., trailing.., -G name?]`
    pub fn new(
        program: impl Into<String>,
        context: &WorkingContext,
        aggregation: &Aggregation,
    ) -> Self {
        let source_dir = context
            .build_dir()
            .map(|_| context.source_dir().to_path_buf());

        let mut args = Vec::new();
        if let Some(source) = &source_dir {
            args.push(source.display().to_string());
        }
        args.extend(aggregation.to_args());

        Self {
            program: program.into(),
            args,
            working_dir: context.working_dir().to_path_buf(),
            source_dir,
        }
    }

    /// Full argument vector including the program name
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.program.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Space-joined command line, as shown to the user
    pub fn command_line(&self) -> String {
        self.argv().join(" ")
    }
}

/// How the plan is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the command line as text
    DryText,
    /// Print the plan as JSON
    DryJson,
    /// Run the generator
    Execute,
}

impl Mode {
    pub fn is_dry(self) -> bool {
        !matches!(self, Mode::Execute)
    }
}

/// What [`invoke`] did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Dry mode: the plan was printed, nothing ran
    Printed,
    /// The generator ran and exited with status 0
    Succeeded(CommandResult),
    /// The generator ran and exited with a non-zero status
    Failed(CommandResult),
}

impl Outcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }
}

/// Fail early with an install hint when the generator is not on PATH
pub fn require_program(program: &str) -> Result<()> {
    if command_exists(program) {
        Ok(())
    } else {
        Err(
            ConfigureError::missing_tool(program, "configuring the project", hints::cmake())
                .into(),
        )
    }
}

/// Print or run `plan`
///
/// A non-zero generator exit is logged and returned as
/// [`Outcome::Failed`], not as an error. Errors are reserved for failing to
/// start the generator or to write the dry-mode output.
pub fn invoke(
    plan: &InvocationPlan,
    mode: Mode,
    runner: &mut dyn ProcessRunner,
    reporter: &Reporter,
    out: &mut dyn Write,
) -> Result<Outcome> {
    match mode {
        Mode::DryText => {
            writeln!(out, "{}", plan.command_line()).context("Failed to write command line")?;
            Ok(Outcome::Printed)
        }
        Mode::DryJson => {
            let json = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
            writeln!(out, "{}", json).context("Failed to write plan")?;
            Ok(Outcome::Printed)
        }
        Mode::Execute => {
            reporter.info("CMake output:");
            let result = runner.run(&plan.program, &plan.args, &plan.working_dir)?;
            reporter.debug(&format!(
                "{} finished in {:.2}s",
                plan.program,
                result.duration.as_secs_f64()
            ));
            if result.success {
                reporter.info("CMake end");
                Ok(Outcome::Succeeded(result))
            } else {
                reporter.error(&format!(
                    "Configure finished with an error ({})",
                    ConfigureError::Invocation {
                        program: plan.program.clone(),
                        exit_code: result.exit_code,
                    }
                ));
                Ok(Outcome::Failed(result))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    use crate::build::options::{aggregate, RawOptions, DEP_HDF5};
    use crate::build::platform::PlatformInfo;
    use crate::exec::subprocess::testing::RecordingRunner;
    use crate::utils::terminal::LogLevel;
    use serial_test::serial;

    fn quiet() -> Reporter {
        Reporter::new(LogLevel::Error, false)
    }

    fn hdf5_options() -> RawOptions {
        let mut options = RawOptions::default();
        options
            .dependency_paths
            .insert(DEP_HDF5.to_string(), PathBuf::from("/opt/hdf5"));
        options
    }

    fn linux() -> PlatformInfo {
        PlatformInfo::from_parts("linux", "x86_64")
    }

    #[test]
    #[serial]
    fn test_in_place_plan_has_no_source_dir() {
        let context = WorkingContext::plan(None).unwrap();
        let agg = aggregate(&RawOptions::default(), &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);
        assert_eq!(plan.source_dir, None);
        assert_eq!(plan.argv(), vec!["cmake"]);
        assert_eq!(plan.working_dir, context.source_dir());
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_build_dir_plan_starts_with_source_dir() {
        let context = WorkingContext::plan(Some(Path::new("out"))).unwrap();
        let options = RawOptions {
            passthrough_args: vec!["--fresh".to_string()],
            generator_name: Some("Ninja".to_string()),
            ..hdf5_options()
        };
        let agg = aggregate(&options, &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);

        let source = context.source_dir().display().to_string();
        assert_eq!(
            plan.argv(),
            vec![
                "cmake".to_string(),
                source,
                "-DHDF5_DIR:PATH=/opt/hdf5".to_string(),
                "--fresh".to_string(),
                "-G".to_string(),
                "Ninja".to_string(),
            ]
        );
        assert_eq!(plan.working_dir, context.source_dir().join("out"));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_dry_mode_prints_and_never_spawns() {
        let context = WorkingContext::plan(None).unwrap();
        let agg = aggregate(&hdf5_options(), &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);

        let mut runner = RecordingRunner::default();
        let mut out = Vec::new();
        let outcome = invoke(&plan, Mode::DryText, &mut runner, &quiet(), &mut out).unwrap();

        assert_eq!(outcome, Outcome::Printed);
        assert!(runner.calls.is_empty());
        let printed = String::from_utf8(out).unwrap();
        let tokens: Vec<&str> = printed.split_whitespace().collect();
        assert_eq!(
            tokens
                .iter()
                .filter(|t| **t == "-DHDF5_DIR:PATH=/opt/hdf5")
                .count(),
            1
        );
        assert_eq!(tokens[0], "cmake");
    }

    #[test]
    #[serial]
    fn test_dry_json_mode() {
        let context = WorkingContext::plan(Some(Path::new("out"))).unwrap();
        let agg = aggregate(&RawOptions::default(), &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);

        let mut runner = RecordingRunner::default();
        let mut out = Vec::new();
        invoke(&plan, Mode::DryJson, &mut runner, &quiet(), &mut out).unwrap();

        assert!(runner.calls.is_empty());
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["program"], "cmake");
        assert_eq!(value["args"].as_array().unwrap().len(), 1);
        assert!(value["source_dir"].is_string());
    }

    #[test]
    #[serial]
    fn test_execute_runs_plan_in_working_dir() {
        let context = WorkingContext::plan(Some(Path::new("out"))).unwrap();
        let agg = aggregate(&hdf5_options(), &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);

        let mut runner = RecordingRunner::default();
        let mut out = Vec::new();
        let outcome = invoke(&plan, Mode::Execute, &mut runner, &quiet(), &mut out).unwrap();

        assert!(matches!(outcome, Outcome::Succeeded(_)));
        assert!(out.is_empty());
        assert_eq!(runner.calls.len(), 1);
        let (program, args, cwd) = &runner.calls[0];
        assert_eq!(program, "cmake");
        assert_eq!(args, &plan.args);
        assert_eq!(cwd, &plan.working_dir);
    }

    #[test]
    #[serial]
    fn test_non_zero_exit_is_not_an_error() {
        let context = WorkingContext::plan(None).unwrap();
        let agg = aggregate(&RawOptions::default(), &linux(), context.source_dir());
        let plan = InvocationPlan::new("cmake", &context, &agg);

        let mut runner = RecordingRunner {
            exit_code: 1,
            ..Default::default()
        };
        let mut out = Vec::new();
        let outcome = invoke(&plan, Mode::Execute, &mut runner, &quiet(), &mut out).unwrap();
        assert!(outcome.is_failure());
        assert_eq!(runner.calls.len(), 1);
    }

    #[test]
    fn test_require_program() {
        assert!(require_program("definitely-not-a-real-program-xyz").is_err());
    }
}
