#![forbid(unsafe_code)]
//! bamboo: layer unit-test harness
//!
//! Runs layer unit-test cases against pre-built training executables. Each case composes one
//! scheduler command line (allocation, launcher, executable flags, log redirections), runs it
//! through the shell, and passes iff the command exits with code 0. Cases whose executable is
//! unavailable are skipped rather than failed.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` and `harness`
//!   modules enforce `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod cli;
pub mod harness;
pub mod version;

pub use harness::{CaseOutcome, Executables, Fixtures, HarnessConfig, Session, ShellExecutor, run_case};
