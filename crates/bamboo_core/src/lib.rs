//! Provide the canonical vocabulary of the bamboo test suite.
//!
//! This crate is small and dependency-free. It names the things the harness and the CLI both
//! need to agree on:
//! - compiler identifiers and the toolchain directory each one maps to,
//! - cluster names and the scheduler family that runs jobs on them,
//! - the fixed parameters of each layer unit-test case.
//!
//! ## Notes
//!
//! - No IO and no global state. Resolving hostnames, environment variables, or filesystem paths is
//!   the harness's job.

pub mod cases;
pub mod vocab;

pub use cases::{LAYER_SOFTPLUS, LayerCase};
pub use vocab::clusters::{self, ClusterId, SchedulerKind};
pub use vocab::compilers::{self, CompilerId};
