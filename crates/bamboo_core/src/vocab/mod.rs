//! Vocabulary registries for the test suite.
//!
//! Callers work with stable IDs (`CompilerId`, `ClusterId`) and look up spellings and metadata
//! through registry tables instead of comparing strings at each call site.
//!
//! ## Examples
//! ```rust
//! use bamboo_core::vocab::compilers::{self, CompilerId};
//!
//! assert_eq!(compilers::from_str("gcc7"), Some(CompilerId::Gcc7));
//! assert_eq!(compilers::as_str(CompilerId::Gcc7), "gcc7");
//! ```

pub mod clusters;
pub mod compilers;
pub mod registry;
