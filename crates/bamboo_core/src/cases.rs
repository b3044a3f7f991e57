//! Fixed parameters of layer unit-test cases.
//!
//! A layer case trains one small model on a synthetic dataset for a single layer type. The
//! resource request is deliberately tiny and identical across compilers, so the only true variable
//! of a case run is the executable.

/// Directory (relative to the repository root) holding unit-test logs.
pub const UNIT_TESTS_DIR: &str = "bamboo/unit_tests";

/// Parameters shared by every run of one layer case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerCase {
    /// Layer under test; also the log-file stem (`layer_<layer>_...`).
    pub layer: &'static str,
    pub num_nodes: u32,
    /// Minutes.
    pub time_limit: u32,
    pub num_processes: u32,
    pub data_reader_name: &'static str,
    pub model_folder: &'static str,
    pub model_name: &'static str,
    pub optimizer_name: &'static str,
}

impl LayerCase {
    /// Name used by the case skeleton in diagnostics (e.g. `skeleton_layer_softplus`).
    pub fn skeleton_name(&self) -> String {
        format!("skeleton_layer_{}", self.layer)
    }

    /// Prefix of every entry point of this case (e.g. `test_unit_layer_softplus`).
    pub fn test_prefix(&self) -> String {
        format!("test_unit_layer_{}", self.layer)
    }
}

/// The softplus layer case.
pub const LAYER_SOFTPLUS: LayerCase = LayerCase {
    layer: "softplus",
    num_nodes: 1,
    time_limit: 10,
    num_processes: 2,
    data_reader_name: "synthetic",
    model_folder: "tests/layer_tests",
    model_name: "softplus",
    optimizer_name: "sgd",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_softplus_names() {
        assert_eq!(LAYER_SOFTPLUS.skeleton_name(), "skeleton_layer_softplus");
        assert_eq!(LAYER_SOFTPLUS.test_prefix(), "test_unit_layer_softplus");
    }
}
