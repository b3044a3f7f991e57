//! Case harness
//!
//! Everything needed to run a layer unit-test case against a pre-built executable:
//!
//! - `fixtures` - cluster, repository root and executable registry resolution
//! - `command` - command-line composition per scheduler family
//! - `interfaces` - the process boundary (`CommandExecutor`) and harness errors
//! - `layer_softplus` - the softplus case skeleton and its entry points
//! - `cases` - the named case table used for selection

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod cases;
pub mod command;
pub mod fixtures;
pub mod interfaces;
pub mod layer_softplus;

pub use cases::{CASES, CaseInfo};
pub use command::{CommandError, CommandSpec, get_command};
pub use fixtures::{Executables, Fixtures, HarnessConfig, Session};
pub use interfaces::{CommandExecutor, ExitStatus, ShellExecutor, TestError};
pub use layer_softplus::{CaseOutcome, run_case};
