//! CLI argument parsing using clap derive macros

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::commands::configure::ConfigureCommand;

const AFTER_HELP: &str = "\
The main behaviour is to run cmake with the right command line options.

The dry mode (--drymode) is handy with IDEs that import a CMake project
(QtCreator, CLion, ...): copy the printed command line into the IDE
instead of remembering every define by hand.

Positional arguments are forwarded to cmake as is; put cmake flags
after `--`, e.g. `cmake-configure --build out -- -DFOO=ON`.";

/// Configure a CMake project from a few high-level options
#[derive(Parser, Debug)]
#[command(name = "cmake-configure")]
#[command(author, version, about, long_about = None)]
#[command(after_help = AFTER_HELP)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub configure: ConfigureCommand,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        if self.no_color {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }

        self.configure.execute(self.no_color)
    }
}
