//! Case runner (pytest-style)
//!
//! ## TestReporter Trait
//!
//! The runner uses a `TestReporter` trait to separate reporting from execution. Two reporters
//! ship: `ConsoleReporter` (pytest-like console output) and `JsonReporter` (one JSON object per
//! line, for CI log scrapers).

use std::io::Write;
use std::time::{Duration, Instant};

use serde_json::json;

use crate::harness::cases::{self, CaseInfo};
use crate::harness::{CaseOutcome, CommandExecutor, Fixtures};
use crate::version::BAMBOO_VERSION;

use super::{CliError, CliResult, ExitCode};

// ============================================================================
// Test Reporter Trait
// ============================================================================

/// Trait for reporting case results.
pub trait TestReporter {
    /// Called once the selected cases are known
    fn on_collection_complete(&mut self, test_count: usize);

    /// Called before a case runs
    fn on_test_start(&mut self, _test: &CaseInfo) {}

    /// Called when a case completes
    fn on_test_complete(&mut self, test: &CaseInfo, result: &TestResult);

    /// Called when all cases have completed
    fn on_run_complete(&mut self, summary: &TestSummary);
}

/// Result of running a single case
#[derive(Debug, Clone, PartialEq)]
pub enum TestResult {
    Passed(Duration),
    Failed(Duration, String),
    Skipped(String),
}

impl TestResult {
    fn from_outcome(outcome: CaseOutcome, duration: Duration) -> Self {
        match outcome {
            CaseOutcome::Passed => TestResult::Passed(duration),
            CaseOutcome::Failed(msg) => TestResult::Failed(duration, msg),
            CaseOutcome::Skipped(reason) => TestResult::Skipped(reason),
        }
    }

    fn status(&self) -> &'static str {
        match self {
            TestResult::Passed(_) => "passed",
            TestResult::Failed(..) => "failed",
            TestResult::Skipped(_) => "skipped",
        }
    }
}

/// Summary of a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TestSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub duration: Duration,
}

impl TestSummary {
    fn record(&mut self, result: &TestResult) {
        self.total += 1;
        match result {
            TestResult::Passed(_) => self.passed += 1,
            TestResult::Failed(..) => self.failed += 1,
            TestResult::Skipped(_) => self.skipped += 1,
        }
    }
}

/// Options for a run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Keyword a case name must contain
    pub filter: Option<String>,
    /// Stop on first failure
    pub stop_on_fail: bool,
}

// ============================================================================
// Console reporter
// ============================================================================

/// Default console reporter (pytest-style)
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
    failures: Vec<(&'static str, &'static str, String)>,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            failures: Vec::new(),
        }
    }
}

impl TestReporter for ConsoleReporter {
    fn on_collection_complete(&mut self, test_count: usize) {
        if test_count == 0 {
            eprintln!("No tests collected");
            return;
        }
        println!("\x1b[1m=================== test session starts ===================\x1b[0m");
        println!("collected {} item(s)", test_count);
        println!();
    }

    fn on_test_start(&mut self, test: &CaseInfo) {
        if self.verbose {
            eprintln!("{}::{} ...", test.module, test.name);
        }
    }

    fn on_test_complete(&mut self, test: &CaseInfo, result: &TestResult) {
        let status = match result {
            TestResult::Passed(d) => {
                if self.verbose {
                    format!("\x1b[32mPASSED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[32mPASSED\x1b[0m".to_string()
                }
            }
            TestResult::Failed(d, _) => {
                if self.verbose {
                    format!("\x1b[31mFAILED\x1b[0m ({:.0}ms)", d.as_millis())
                } else {
                    "\x1b[31mFAILED\x1b[0m".to_string()
                }
            }
            TestResult::Skipped(reason) => {
                if reason.is_empty() {
                    "\x1b[33mSKIPPED\x1b[0m".to_string()
                } else {
                    format!("\x1b[33mSKIPPED\x1b[0m ({})", reason)
                }
            }
        };

        println!("{}::{} {}", test.module, test.name, status);

        if let TestResult::Failed(_, msg) = result {
            self.failures.push((test.module, test.name, msg.clone()));
        }
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        if summary.total == 0 {
            return;
        }

        if !self.failures.is_empty() {
            println!();
            println!("\x1b[1;31m=================== FAILURES ===================\x1b[0m");
            for (module, name, msg) in &self.failures {
                println!();
                println!("\x1b[1m___________ {} ___________\x1b[0m", name);
                println!();
                println!("    {}", msg);
                println!();
                println!("    {}::{}", module, name);
            }
        }

        println!();
        let summary_color = if summary.failed > 0 { "\x1b[1;31m" } else { "\x1b[1;32m" };

        let mut parts = Vec::new();
        if summary.passed > 0 {
            parts.push(format!("{} passed", summary.passed));
        }
        if summary.failed > 0 {
            parts.push(format!("{} failed", summary.failed));
        }
        if summary.skipped > 0 {
            parts.push(format!("{} skipped", summary.skipped));
        }

        println!(
            "{}=================== {} in {:.2}s ===================\x1b[0m",
            summary_color,
            parts.join(", "),
            summary.duration.as_secs_f64()
        );
    }
}

// ============================================================================
// JSON reporter
// ============================================================================

/// Writes one JSON object per case and one for the summary.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, value: serde_json::Value) {
        if let Err(e) = writeln!(self.out, "{}", value) {
            tracing::warn!("failed to write report line: {}", e);
        }
    }
}

impl<W: Write> TestReporter for JsonReporter<W> {
    fn on_collection_complete(&mut self, test_count: usize) {
        self.emit(json!({ "event": "collected", "count": test_count, "version": BAMBOO_VERSION }));
    }

    fn on_test_complete(&mut self, test: &CaseInfo, result: &TestResult) {
        let (duration_ms, message) = match result {
            TestResult::Passed(d) => (Some(d.as_millis() as u64), None),
            TestResult::Failed(d, msg) => (Some(d.as_millis() as u64), Some(msg.as_str())),
            TestResult::Skipped(reason) => (None, Some(reason.as_str())),
        };
        self.emit(json!({
            "event": "case",
            "name": test.name,
            "module": test.module,
            "outcome": result.status(),
            "duration_ms": duration_ms,
            "message": message,
        }));
    }

    fn on_run_complete(&mut self, summary: &TestSummary) {
        self.emit(json!({
            "event": "summary",
            "total": summary.total,
            "passed": summary.passed,
            "failed": summary.failed,
            "skipped": summary.skipped,
            "duration_s": summary.duration.as_secs_f64(),
        }));
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Run the selected cases and report each outcome.
///
/// Skips never fail the run; any failed case yields exit code 1. Selecting no cases is not a
/// failure.
pub fn run_tests(
    fixtures: &Fixtures,
    options: &RunOptions,
    executor: &dyn CommandExecutor,
    reporter: &mut dyn TestReporter,
) -> CliResult<ExitCode> {
    let start_time = Instant::now();
    let selected = cases::select(options.filter.as_deref());
    tracing::debug!(selected = selected.len(), filter = ?options.filter, "collected cases");

    reporter.on_collection_complete(selected.len());

    let mut summary = TestSummary::default();
    for case in selected {
        reporter.on_test_start(case);

        let case_start = Instant::now();
        let outcome = (case.run)(fixtures, executor);
        let result = TestResult::from_outcome(outcome, case_start.elapsed());

        summary.record(&result);
        reporter.on_test_complete(case, &result);

        if options.stop_on_fail && matches!(result, TestResult::Failed(..)) {
            break;
        }
    }

    summary.duration = start_time.elapsed();
    reporter.on_run_complete(&summary);

    if summary.failed > 0 {
        // Summary already printed
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
