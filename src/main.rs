//! cmake-configure - a thin front-end for configuring CMake projects
//!
//! Translates a small set of options (build directory, install prefix,
//! flavor, dependency locations, feature toggles, passthrough arguments)
//! into one CMake invocation, and manages the build directory around it.
//!
//! ## Architecture
//!
//! ```text
//! clap options → Option Aggregator → build dir lifecycle → cmake (or dry print)
//! ```

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod exec;
mod utils;

use std::process::ExitCode;

use clap::Parser;

use cli::Cli;
use error::ConfigureError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.execute() {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<ConfigureError>() {
                Some(configure_err) => configure_err.display_with_hints(),
                None => utils::terminal::print_error(&format!("{:#}", err)),
            }
            ExitCode::FAILURE
        }
    }
}
