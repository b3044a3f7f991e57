//! Softplus layer unit test
//!
//! Runs the softplus model on the synthetic data reader under each compiler build and checks
//! that the run exits cleanly. One entry point per compiler shares the [`run_case`] skeleton;
//! `test_unit_layer_softplus_exe` runs a hand-picked executable instead of a registry entry.

use std::fs;
use std::path::Path;

use bamboo_core::cases::UNIT_TESTS_DIR;
use bamboo_core::compilers::{self, CompilerId, EXPLICIT_EXE};
use bamboo_core::{LAYER_SOFTPLUS, LayerCase};

use super::command::{CommandSpec, get_command};
use super::fixtures::{Executables, Fixtures, Session};
use super::interfaces::{CommandExecutor, ExitStatus, TestError};

/// Outcome of one case run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseOutcome {
    Passed,
    Failed(String),
    /// Not applicable in this environment; never counts as a failure.
    Skipped(String),
}

impl CaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, CaseOutcome::Failed(_))
    }
}

/// Log files a case run redirects stdout and stderr into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogPaths {
    pub output_file_name: String,
    pub error_file_name: String,
}

/// Derive the log file paths for `case` built with `compiler_name`.
pub fn log_paths(case: &LayerCase, dir_name: &str, compiler_name: &str) -> LogPaths {
    let layer = case.layer;
    LogPaths {
        output_file_name: format!("{dir_name}/{UNIT_TESTS_DIR}/output/layer_{layer}_{compiler_name}_output.txt"),
        error_file_name: format!("{dir_name}/{UNIT_TESTS_DIR}/error/layer_{layer}_{compiler_name}_error.txt"),
    }
}

/// A command ready to run, or the reason the case does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prepared {
    Ready { spec: CommandSpec, command: String },
    Skip(String),
}

/// Resolve the executable for `compiler_name` and compose its command, without running it.
pub fn prepare_case(
    case: &LayerCase,
    session: &Session,
    executables: &Executables,
    compiler_name: &str,
) -> Result<Prepared, TestError> {
    let Some(executable) = executables.get(compiler_name) else {
        return Ok(Prepared::Skip(format!(
            "{}: default_exes[{compiler_name}] does not exist",
            case.skeleton_name()
        )));
    };

    if !Path::new(executable).exists() {
        return Ok(Prepared::Skip(format!("Executable does not exist: {executable}")));
    }

    let logs = log_paths(case, &session.dir_name, compiler_name);
    let spec = CommandSpec {
        cluster: session.cluster.clone(),
        executable: executable.clone(),
        num_nodes: case.num_nodes,
        time_limit: case.time_limit,
        num_processes: case.num_processes,
        dir_name: session.dir_name.clone(),
        data_reader_name: case.data_reader_name.to_string(),
        model_folder: case.model_folder.to_string(),
        model_name: case.model_name.to_string(),
        optimizer_name: case.optimizer_name.to_string(),
        output_file_name: Some(logs.output_file_name),
        error_file_name: Some(logs.error_file_name),
        partition: session.partition.clone(),
        existing_allocation: session.existing_allocation,
    };
    let command = get_command(&spec)?;

    Ok(Prepared::Ready { spec, command })
}

/// The shared skeleton of every softplus entry point.
///
/// Skips when `compiler_name` has no executable; otherwise runs the composed command and passes
/// iff it exits with code 0.
#[tracing::instrument(skip_all, fields(compiler = compiler_name, cluster = %session.cluster))]
pub fn run_case(
    session: &Session,
    executables: &Executables,
    compiler_name: &str,
    executor: &dyn CommandExecutor,
) -> CaseOutcome {
    match try_run_case(&LAYER_SOFTPLUS, session, executables, compiler_name, executor) {
        Ok(outcome) => outcome,
        Err(e) => CaseOutcome::Failed(e.to_string()),
    }
}

fn try_run_case(
    case: &LayerCase,
    session: &Session,
    executables: &Executables,
    compiler_name: &str,
    executor: &dyn CommandExecutor,
) -> Result<CaseOutcome, TestError> {
    let (spec, command) = match prepare_case(case, session, executables, compiler_name)? {
        Prepared::Ready { spec, command } => (spec, command),
        Prepared::Skip(reason) => {
            tracing::info!("Skip - {}", reason);
            return Ok(CaseOutcome::Skipped(reason));
        }
    };

    for log in [&spec.output_file_name, &spec.error_file_name].into_iter().flatten() {
        if let Some(parent) = Path::new(log).parent() {
            fs::create_dir_all(parent)?;
        }
    }

    tracing::info!(%command, "running case");
    let status = executor.execute(&command)?;
    if status.success() {
        return Ok(CaseOutcome::Passed);
    }
    let message = match status {
        ExitStatus::Code(code) => format!("exit code {code} != 0 for command: {command}"),
        ExitStatus::Terminated => format!("terminated without exit code: {command}"),
    };
    Ok(CaseOutcome::Failed(message))
}

fn run_compiler(fixtures: &Fixtures, compiler: CompilerId, executor: &dyn CommandExecutor) -> CaseOutcome {
    run_case(
        &fixtures.session,
        &fixtures.executables,
        compilers::as_str(compiler),
        executor,
    )
}

pub fn test_unit_layer_softplus_clang6(fixtures: &Fixtures, executor: &dyn CommandExecutor) -> CaseOutcome {
    run_compiler(fixtures, CompilerId::Clang6, executor)
}

pub fn test_unit_layer_softplus_gcc7(fixtures: &Fixtures, executor: &dyn CommandExecutor) -> CaseOutcome {
    run_compiler(fixtures, CompilerId::Gcc7, executor)
}

pub fn test_unit_layer_softplus_intel19(fixtures: &Fixtures, executor: &dyn CommandExecutor) -> CaseOutcome {
    run_compiler(fixtures, CompilerId::Intel19, executor)
}

/// Run with `bamboo test -k test_unit_layer_softplus_exe --exe=<executable>`.
pub fn test_unit_layer_softplus_exe(fixtures: &Fixtures, executor: &dyn CommandExecutor) -> CaseOutcome {
    let Some(exe) = &fixtures.exe else {
        let reason = format!("{}_exe: Non-local testing", LAYER_SOFTPLUS.test_prefix());
        tracing::info!("Skip - {}", reason);
        return CaseOutcome::Skipped(reason);
    };
    let exes = Executables::from([(EXPLICIT_EXE.to_string(), exe.clone())]);
    run_case(&fixtures.session, &exes, EXPLICIT_EXE, executor)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    /// Records commands and answers with a fixed status.
    struct Recorder {
        status: ExitStatus,
        commands: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn new(status: ExitStatus) -> Self {
            Self {
                status,
                commands: RefCell::new(Vec::new()),
            }
        }
    }

    impl CommandExecutor for Recorder {
        fn execute(&self, command: &str) -> Result<ExitStatus, TestError> {
            self.commands.borrow_mut().push(command.to_string());
            Ok(self.status)
        }
    }

    fn scratch_session(name: &str) -> Session {
        let dir = std::env::temp_dir().join(format!("bamboo_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        Session::new("local", dir.to_string_lossy().to_string())
    }

    #[test]
    fn test_log_paths_layout() {
        let logs = log_paths(&LAYER_SOFTPLUS, "/tmp/x", "gcc7");
        assert_eq!(
            logs.output_file_name,
            "/tmp/x/bamboo/unit_tests/output/layer_softplus_gcc7_output.txt"
        );
        assert_eq!(
            logs.error_file_name,
            "/tmp/x/bamboo/unit_tests/error/layer_softplus_gcc7_error.txt"
        );
    }

    #[test]
    fn test_missing_compiler_skips_without_executing() {
        let recorder = Recorder::new(ExitStatus::Code(0));
        let outcome = run_case(&Session::new("local", "/tmp/x"), &Executables::new(), "clang6", &recorder);
        assert_eq!(
            outcome,
            CaseOutcome::Skipped("skeleton_layer_softplus: default_exes[clang6] does not exist".to_string())
        );
        assert!(recorder.commands.borrow().is_empty());
    }

    #[test]
    fn test_missing_executable_file_skips() {
        let recorder = Recorder::new(ExitStatus::Code(0));
        let exes = Executables::from([("gcc7".to_string(), "/nonexistent/lbann".to_string())]);
        let outcome = run_case(&Session::new("local", "/tmp/x"), &exes, "gcc7", &recorder);
        assert!(matches!(outcome, CaseOutcome::Skipped(reason) if reason.contains("/nonexistent/lbann")));
    }

    #[test]
    fn test_nonzero_exit_fails() {
        let session = scratch_session("nonzero");
        let recorder = Recorder::new(ExitStatus::Code(1));
        let exes = Executables::from([("gcc7".to_string(), "/bin/sh".to_string())]);
        let outcome = run_case(&session, &exes, "gcc7", &recorder);
        assert!(outcome.is_failure());
        let _ = fs::remove_dir_all(&session.dir_name);
    }

    #[test]
    fn test_signal_termination_fails() {
        let session = scratch_session("terminated");
        let recorder = Recorder::new(ExitStatus::Terminated);
        let exes = Executables::from([("gcc7".to_string(), "/bin/sh".to_string())]);
        let outcome = run_case(&session, &exes, "gcc7", &recorder);
        assert!(outcome.is_failure());
        match outcome {
            CaseOutcome::Failed(msg) => assert!(msg.starts_with("terminated without exit code: /bin/sh "), "{msg}"),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(recorder.commands.borrow().len(), 1);
        let _ = fs::remove_dir_all(&session.dir_name);
    }

    #[test]
    fn test_run_creates_log_directories_and_passes_command() {
        let session = scratch_session("logdirs");
        let recorder = Recorder::new(ExitStatus::Code(0));
        let exes = Executables::from([("gcc7".to_string(), "/bin/sh".to_string())]);

        assert_eq!(run_case(&session, &exes, "gcc7", &recorder), CaseOutcome::Passed);

        let root = Path::new(&session.dir_name).join("bamboo/unit_tests");
        assert!(root.join("output").is_dir());
        assert!(root.join("error").is_dir());

        let commands = recorder.commands.borrow();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("/bin/sh --reader="));
        assert!(commands[0].ends_with("layer_softplus_gcc7_error.txt"));
        let _ = fs::remove_dir_all(&session.dir_name);
    }

    #[test]
    fn test_unsupported_cluster_fails() {
        let recorder = Recorder::new(ExitStatus::Code(0));
        let exes = Executables::from([("gcc7".to_string(), "/bin/sh".to_string())]);
        let outcome = run_case(&Session::new("quartz", "/tmp/x"), &exes, "gcc7", &recorder);
        assert_eq!(outcome, CaseOutcome::Failed("failed to build command: unsupported cluster: quartz".to_string()));
        assert!(recorder.commands.borrow().is_empty());
    }

    #[test]
    fn test_exe_entry_point_skips_without_exe() {
        let recorder = Recorder::new(ExitStatus::Code(0));
        let fixtures = Fixtures::new(Session::new("local", "/tmp/x"), Executables::new(), None);
        assert_eq!(
            test_unit_layer_softplus_exe(&fixtures, &recorder),
            CaseOutcome::Skipped("test_unit_layer_softplus_exe: Non-local testing".to_string())
        );
    }

    #[test]
    fn test_exe_entry_point_bypasses_registry() {
        let session = scratch_session("exe_entry");
        let recorder = Recorder::new(ExitStatus::Code(0));
        // The registry entry would fail to exist; --exe wins anyway.
        let exes = Executables::from([("exe".to_string(), "/nonexistent/lbann".to_string())]);
        let fixtures = Fixtures::new(session.clone(), exes, Some("/bin/sh".to_string()));

        assert_eq!(test_unit_layer_softplus_exe(&fixtures, &recorder), CaseOutcome::Passed);
        let commands = recorder.commands.borrow();
        assert!(commands[0].contains("layer_softplus_exe_output.txt"));
        let _ = fs::remove_dir_all(&session.dir_name);
    }
}
