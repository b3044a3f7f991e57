//! Fixture resolution for case runs
//!
//! Cases receive the same four fixtures the suite has always provided:
//! - `cluster`: the scheduling context, normally the hostname with digits stripped
//! - `dir_name`: the repository root
//! - `executables`: compiler name → executable path
//! - `exe`: an optional, hand-picked executable for the parameterized case
//!
//! Each value comes from the first source that provides it: explicit configuration (CLI flags),
//! then an environment variable, then detection.

use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use bamboo_core::clusters;
use bamboo_core::compilers::{self, COMPILERS, CompilerId};

use super::interfaces::TestError;

/// Compiler name → executable path. Ordered so listings and dry runs are stable.
pub type Executables = BTreeMap<String, String>;

/// Overrides the detected cluster name.
pub const CLUSTER_ENV: &str = "BAMBOO_CLUSTER";

/// Overrides the detected repository root.
pub const DIRNAME_ENV: &str = "BAMBOO_DIRNAME";

/// Explicit fixture configuration.
///
/// Every field is optional; unset fields are resolved from the environment or detected.
#[derive(Debug, Clone, Default)]
pub struct HarnessConfig {
    pub cluster: Option<String>,
    pub dir_name: Option<String>,
    pub partition: Option<String>,
    /// `(compiler name, path)` entries layered over the default registry.
    pub exes: Vec<(String, String)>,
    pub exe: Option<String>,
}

impl HarnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_dir_name(mut self, dir_name: impl Into<String>) -> Self {
        self.dir_name = Some(dir_name.into());
        self
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = Some(partition.into());
        self
    }

    /// Add or replace one registry entry.
    pub fn with_executable(mut self, compiler: impl Into<String>, path: impl Into<String>) -> Self {
        self.exes.push((compiler.into(), path.into()));
        self
    }

    pub fn with_exe(mut self, exe: impl Into<String>) -> Self {
        self.exe = Some(exe.into());
        self
    }
}

/// Scheduling context shared by every case of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub cluster: String,
    pub dir_name: String,
    pub partition: Option<String>,
    pub existing_allocation: bool,
}

impl Session {
    /// A session with no partition override and no existing allocation.
    pub fn new(cluster: impl Into<String>, dir_name: impl Into<String>) -> Self {
        Self {
            cluster: cluster.into(),
            dir_name: dir_name.into(),
            partition: None,
            existing_allocation: false,
        }
    }
}

/// Resolved fixtures.
#[derive(Debug, Clone)]
pub struct Fixtures {
    pub session: Session,
    pub executables: Executables,
    pub exe: Option<String>,
}

impl Fixtures {
    pub fn new(session: Session, executables: Executables, exe: Option<String>) -> Self {
        Self {
            session,
            executables,
            exe,
        }
    }

    /// Resolve every fixture from `config`, the environment, and the host.
    pub fn resolve(config: &HarnessConfig) -> Result<Self, TestError> {
        let cluster = match non_empty(&config.cluster).or_else(|| env_value(CLUSTER_ENV)) {
            Some(cluster) => cluster,
            None => detect_cluster()?,
        };
        let dir_name = match non_empty(&config.dir_name).or_else(|| env_value(DIRNAME_ENV)) {
            Some(dir_name) => dir_name,
            None => detect_dir_name()?,
        };

        let mut executables = default_executables(&dir_name, &cluster);
        for (compiler, path) in &config.exes {
            executables.insert(compiler.clone(), path.clone());
        }

        let session = Session {
            existing_allocation: has_existing_allocation(&cluster),
            cluster,
            dir_name,
            partition: non_empty(&config.partition),
        };

        tracing::debug!(
            cluster = %session.cluster,
            dir_name = %session.dir_name,
            executables = executables.len(),
            existing_allocation = session.existing_allocation,
            "resolved fixtures"
        );

        Ok(Self::new(session, executables, config.exe.clone()))
    }
}

/// Derive a cluster name from a hostname by dropping its digits (`pascal83` → `pascal`).
pub fn cluster_from_hostname(hostname: &str) -> String {
    hostname.trim().chars().filter(|c| !c.is_ascii_digit()).collect()
}

/// Path of the compiler-test build of the executable for `compiler` on `cluster`.
pub fn default_executable_path(dir_name: &str, cluster: &str, compiler: CompilerId) -> String {
    format!(
        "{dir_name}/bamboo/compiler_tests/builds/{cluster}_{toolchain}_rel/build/model_zoo/lbann",
        toolchain = compilers::toolchain(compiler)
    )
}

/// Default registry: compiler-test builds that exist on disk.
///
/// Compilers whose build is missing are left out, so their cases skip rather than fail.
pub fn default_executables(dir_name: &str, cluster: &str) -> Executables {
    COMPILERS
        .iter()
        .map(|info| (info.item.canonical, default_executable_path(dir_name, cluster, info.item.id)))
        .filter(|(_, path)| Path::new(path).exists())
        .map(|(name, path)| (name.to_string(), path))
        .collect()
}

fn has_existing_allocation(cluster: &str) -> bool {
    existing_allocation_with(cluster, |var| env::var_os(var))
}

/// Whether `lookup` reports the allocation variable of `cluster`'s scheduler as set.
///
/// Clusters without a scheduler, and unknown clusters, never have an allocation.
pub fn existing_allocation_with(cluster: &str, lookup: impl Fn(&str) -> Option<OsString>) -> bool {
    clusters::from_str(cluster)
        .map(clusters::scheduler)
        .and_then(clusters::allocation_env)
        .is_some_and(|var| lookup(var).is_some())
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}

fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn detect_cluster() -> Result<String, TestError> {
    let hostname = match Command::new("hostname").output() {
        Ok(output) if output.status.success() => String::from_utf8_lossy(&output.stdout).to_string(),
        _ => env::var("HOSTNAME").map_err(|_| TestError::Fixture {
            name: "cluster",
            reason: format!("cannot determine hostname; pass --cluster or set {CLUSTER_ENV}"),
        })?,
    };
    Ok(cluster_from_hostname(&hostname))
}

fn detect_dir_name() -> Result<String, TestError> {
    let git = Command::new("git").args(["rev-parse", "--show-toplevel"]).output();
    if let Ok(output) = git {
        if output.status.success() {
            let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !root.is_empty() {
                return Ok(root);
            }
        }
    }

    tracing::warn!("not inside a git checkout; using the current directory as dirname");
    let cwd = env::current_dir()?;
    Ok(cwd.to_string_lossy().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_from_hostname_strips_digits() {
        assert_eq!(cluster_from_hostname("pascal83\n"), "pascal");
        assert_eq!(cluster_from_hostname("lassen709"), "lassen");
        assert_eq!(cluster_from_hostname("ray"), "ray");
    }

    #[test]
    fn test_default_executable_path_layout() {
        assert_eq!(
            default_executable_path("/repo", "pascal", CompilerId::Gcc7),
            "/repo/bamboo/compiler_tests/builds/pascal_gcc-7.1.0_rel/build/model_zoo/lbann"
        );
    }

    #[test]
    fn test_default_executables_keeps_only_existing_builds() {
        let root = env::temp_dir().join(format!("bamboo_default_exes_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&root);
        let dir_name = root.to_string_lossy().to_string();

        let gcc = default_executable_path(&dir_name, "local", CompilerId::Gcc7);
        std::fs::create_dir_all(Path::new(&gcc).parent().unwrap()).unwrap();
        std::fs::write(&gcc, "").unwrap();

        let exes = default_executables(&dir_name, "local");
        assert_eq!(exes.len(), 1);
        assert_eq!(exes.get("gcc7"), Some(&gcc));

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_resolve_layers_explicit_config() {
        let config = HarnessConfig::new()
            .with_cluster("local")
            .with_dir_name("/nonexistent/bamboo_repo")
            .with_partition("pdebug")
            .with_executable("gcc7", "/bin/true")
            .with_exe("/bin/false");

        let fixtures = Fixtures::resolve(&config).unwrap();
        assert_eq!(fixtures.session.cluster, "local");
        assert_eq!(fixtures.session.dir_name, "/nonexistent/bamboo_repo");
        assert_eq!(fixtures.session.partition.as_deref(), Some("pdebug"));
        assert!(!fixtures.session.existing_allocation);
        assert_eq!(fixtures.executables.get("gcc7").map(String::as_str), Some("/bin/true"));
        assert_eq!(fixtures.executables.len(), 1);
        assert_eq!(fixtures.exe.as_deref(), Some("/bin/false"));
    }

    fn only(var: &'static str) -> impl Fn(&str) -> Option<OsString> {
        move |name| (name == var).then(|| OsString::from("1"))
    }

    #[test]
    fn test_existing_allocation_follows_scheduler_variable() {
        assert!(existing_allocation_with("pascal", only("SLURM_JOB_NUM_NODES")));
        assert!(existing_allocation_with("lassen", only("LSB_HOSTS")));
        assert!(existing_allocation_with("ray", only("LSB_HOSTS")));
        assert!(!existing_allocation_with("pascal", only("LSB_HOSTS")));
        assert!(!existing_allocation_with("lassen", only("SLURM_JOB_NUM_NODES")));
        assert!(!existing_allocation_with("pascal", |_| None));
    }

    #[test]
    fn test_local_and_unknown_clusters_never_have_an_allocation() {
        let any = |_: &str| Some(OsString::from("1"));
        assert!(!existing_allocation_with("local", any));
        assert!(!existing_allocation_with("quartz", any));
    }

    #[test]
    fn test_empty_explicit_dir_name_falls_through_to_detection() {
        let config = HarnessConfig::new().with_cluster("local").with_dir_name("");

        let fixtures = Fixtures::resolve(&config).unwrap();
        assert!(!fixtures.session.dir_name.is_empty());
        assert!(!fixtures.session.dir_name.starts_with("/bamboo"));
    }

    #[test]
    fn test_empty_explicit_values_count_as_unset() {
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
        assert_eq!(non_empty(&Some("pascal".to_string())), Some("pascal".to_string()));
    }
}
