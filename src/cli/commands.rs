//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::io;

use bamboo_core::LAYER_SOFTPLUS;
use bamboo_core::compilers::EXPLICIT_EXE;

use crate::harness::cases::CASES;
use crate::harness::layer_softplus::{Prepared, prepare_case};
use crate::harness::{Executables, Fixtures, HarnessConfig, ShellExecutor};

use super::test_runner::{ConsoleReporter, JsonReporter, RunOptions, run_tests};
use super::{CliError, CliResult, ExitCode, ReportFormat};

fn resolve_fixtures(config: &HarnessConfig) -> CliResult<Fixtures> {
    Fixtures::resolve(config).map_err(|e| CliError::failure(format!("Error: {}", e)))
}

/// Run the selected cases.
pub fn test_cases(
    config: &HarnessConfig,
    filter: Option<String>,
    stop_on_fail: bool,
    verbose: bool,
    format: ReportFormat,
) -> CliResult<ExitCode> {
    let fixtures = resolve_fixtures(config)?;
    tracing::info!(
        cluster = %fixtures.session.cluster,
        dir_name = %fixtures.session.dir_name,
        "starting test session"
    );

    let options = RunOptions { filter, stop_on_fail };
    match format {
        ReportFormat::Console => {
            let mut reporter = ConsoleReporter::new(verbose);
            run_tests(&fixtures, &options, &ShellExecutor, &mut reporter)
        }
        ReportFormat::Json => {
            let mut reporter = JsonReporter::new(io::stdout().lock());
            run_tests(&fixtures, &options, &ShellExecutor, &mut reporter)
        }
    }
}

/// Print every case name, one per line.
pub fn list_cases() -> CliResult<ExitCode> {
    for case in CASES {
        println!("{}::{}", case.module, case.name);
    }
    Ok(ExitCode::SUCCESS)
}

/// Print the command line the softplus case would run for `compiler`.
///
/// `exe` selects the `--exe` executable, as the parameterized case does.
pub fn print_command(config: &HarnessConfig, compiler: &str) -> CliResult<ExitCode> {
    let fixtures = resolve_fixtures(config)?;

    let explicit;
    let executables = if compiler == EXPLICIT_EXE {
        let exe = fixtures
            .exe
            .clone()
            .ok_or_else(|| CliError::failure("Error: `command exe` requires --exe=<path>"))?;
        explicit = Executables::from([(EXPLICIT_EXE.to_string(), exe)]);
        &explicit
    } else {
        &fixtures.executables
    };

    match prepare_case(&LAYER_SOFTPLUS, &fixtures.session, executables, compiler) {
        Ok(Prepared::Ready { command, .. }) => {
            println!("{}", command);
            Ok(ExitCode::SUCCESS)
        }
        Ok(Prepared::Skip(reason)) => Err(CliError::failure(format!("Skip - {}", reason))),
        Err(e) => Err(CliError::failure(format!("Error: {}", e))),
    }
}
