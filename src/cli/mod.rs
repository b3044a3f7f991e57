//! CLI module for the bamboo harness
//!
//! ## Commands
//!
//! - `test` - Run unit-test cases (pytest-style, `-k` selects by name)
//! - `list` - List case names
//! - `command <compiler>` - Print the command line a case would run, without running it
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod test_runner;

use std::fmt;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::harness::HarnessConfig;
use crate::version::BAMBOO_VERSION;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Layer unit-test harness for pre-built training executables
#[derive(Parser, Debug)]
#[command(name = "bamboo")]
#[command(version = BAMBOO_VERSION)]
#[command(about = "Run layer unit-test cases against pre-built executables", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Fixture overrides shared by the commands that run or compose cases.
#[derive(Args, Debug, Clone, Default)]
pub struct FixtureArgs {
    /// Cluster name (default: $BAMBOO_CLUSTER, else hostname without digits)
    #[arg(long, value_name = "NAME")]
    pub cluster: Option<String>,

    /// Repository root (default: $BAMBOO_DIRNAME, else the git toplevel)
    #[arg(long = "dirname", value_name = "DIR")]
    pub dir_name: Option<String>,

    /// Slurm partition / LSF queue
    #[arg(long, value_name = "NAME")]
    pub partition: Option<String>,

    /// Add or replace an executable registry entry (repeatable)
    #[arg(long = "exes", value_name = "COMPILER=PATH", value_parser = parse_key_value)]
    pub exes: Vec<(String, String)>,

    /// Hand-picked executable for the `_exe` case
    #[arg(long, value_name = "PATH")]
    pub exe: Option<String>,
}

impl FixtureArgs {
    pub fn to_config(&self) -> HarnessConfig {
        let mut config = HarnessConfig::new();
        if let Some(cluster) = &self.cluster {
            config = config.with_cluster(cluster);
        }
        if let Some(dir_name) = &self.dir_name {
            config = config.with_dir_name(dir_name);
        }
        if let Some(partition) = &self.partition {
            config = config.with_partition(partition);
        }
        for (compiler, path) in &self.exes {
            config = config.with_executable(compiler, path);
        }
        if let Some(exe) = &self.exe {
            config = config.with_exe(exe);
        }
        config
    }
}

/// Output format for `test`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run unit-test cases (pytest-style)
    Test {
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
        /// Stop on first failure
        #[arg(short = 'x', long = "exitfirst")]
        stop_on_fail: bool,
        /// Filter cases by keyword
        #[arg(short = 'k', value_name = "EXPR")]
        filter: Option<String>,
        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        format: ReportFormat,
        #[command(flatten)]
        fixtures: FixtureArgs,
    },

    /// List case names
    List,

    /// Print the command line a case would run (dry run)
    Command {
        /// Compiler name, or `exe` together with --exe
        #[arg(value_name = "COMPILER")]
        compiler: String,
        #[command(flatten)]
        fixtures: FixtureArgs,
    },
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected COMPILER=PATH, got '{raw}'")),
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Test {
            verbose,
            stop_on_fail,
            filter,
            format,
            fixtures,
        } => commands::test_cases(&fixtures.to_config(), filter, stop_on_fail, verbose, format),
        Command::List => commands::list_cases(),
        Command::Command { compiler, fixtures } => commands::print_command(&fixtures.to_config(), &compiler),
    }
}

// ============================================================================
// Tests
// ============================================================================
