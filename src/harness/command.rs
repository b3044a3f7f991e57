//! Command builder - composes the shell command line of a case run
//!
//! A command has three parts, joined by spaces:
//! - the scheduler prefix (allocation + launcher), chosen from the cluster's scheduler family
//! - the executable with its `--reader`, `--model` and `--optimizer` prototext flags
//! - stdout/stderr redirections to the case's log files
//!
//! Nothing here touches the filesystem or the environment; callers resolve those into the
//! [`CommandSpec`] first.

use bamboo_core::clusters::{self, ClusterId, DEFAULT_PARTITION, SchedulerKind};
use thiserror::Error;

/// Errors produced while composing a command
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unsupported cluster: {0}")]
    UnsupportedCluster(String),

    #[error("invalid resource request: {num_nodes} node(s), {num_processes} process(es)")]
    InvalidResources { num_nodes: u32, num_processes: u32 },
}

/// Everything needed to compose one command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub cluster: String,
    pub executable: String,
    pub num_nodes: u32,
    /// Minutes.
    pub time_limit: u32,
    pub num_processes: u32,
    /// Repository root; prototext paths are resolved under `<dir_name>/model_zoo`.
    pub dir_name: String,
    pub data_reader_name: String,
    pub model_folder: String,
    pub model_name: String,
    pub optimizer_name: String,
    pub output_file_name: Option<String>,
    pub error_file_name: Option<String>,
    /// Slurm partition or LSF queue; [`DEFAULT_PARTITION`] when unset.
    pub partition: Option<String>,
    /// The caller already holds an allocation, so no `salloc`/`bsub` is prepended.
    pub existing_allocation: bool,
}

/// Path of a data reader prototext.
pub fn data_reader_path(dir_name: &str, data_reader_name: &str) -> String {
    format!("{dir_name}/model_zoo/data_readers/data_reader_{data_reader_name}.prototext")
}

/// Path of a model prototext.
pub fn model_path(dir_name: &str, model_folder: &str, model_name: &str) -> String {
    format!("{dir_name}/model_zoo/{model_folder}/model_{model_name}.prototext")
}

/// Path of an optimizer prototext.
pub fn optimizer_path(dir_name: &str, optimizer_name: &str) -> String {
    format!("{dir_name}/model_zoo/optimizers/opt_{optimizer_name}.prototext")
}

/// Compose the full command line for `spec`.
///
/// ## Errors
///
/// - `UnsupportedCluster` if the cluster name is not in the cluster registry
/// - `InvalidResources` if the node or process count is zero
pub fn get_command(spec: &CommandSpec) -> Result<String, CommandError> {
    if spec.num_nodes == 0 || spec.num_processes == 0 {
        return Err(CommandError::InvalidResources {
            num_nodes: spec.num_nodes,
            num_processes: spec.num_processes,
        });
    }

    let cluster =
        clusters::from_str(&spec.cluster).ok_or_else(|| CommandError::UnsupportedCluster(spec.cluster.clone()))?;

    let mut parts = scheduler_prefix(cluster, spec);
    parts.push(executable_command(spec));

    let mut command = parts.join(" ");
    if let Some(output) = &spec.output_file_name {
        command.push_str(&format!(" > {output}"));
    }
    if let Some(error) = &spec.error_file_name {
        command.push_str(&format!(" 2> {error}"));
    }
    Ok(command)
}

fn scheduler_prefix(cluster: ClusterId, spec: &CommandSpec) -> Vec<String> {
    let partition = spec.partition.as_deref().unwrap_or(DEFAULT_PARTITION);
    let procs = spec.num_processes;
    let mut parts = Vec::new();

    match clusters::scheduler(cluster) {
        SchedulerKind::Slurm => {
            let time = spec.time_limit;
            if !spec.existing_allocation {
                parts.push(format!(
                    "salloc --nodes={} --partition={partition} --time={time}",
                    spec.num_nodes
                ));
            }
            parts.push(format!("srun --mpibind=off --time={time} --ntasks={procs}"));
        }
        SchedulerKind::Lsf => {
            let time = clusters::clamp_time_limit(cluster, spec.time_limit);
            let per_node = procs.div_ceil(spec.num_nodes);
            if !spec.existing_allocation {
                parts.push(format!(
                    "bsub -x -G guests -Is -n {procs} -R \"span[ptile={per_node}]\" -q {partition} -W {time}"
                ));
            }
            // jsrun takes no time limit
            if cluster == ClusterId::Lassen {
                parts.push(format!("jsrun -n {procs}"));
            } else {
                parts.push(format!("mpirun --timeout {} -np {procs} -N {per_node}", time * 60));
            }
        }
        SchedulerKind::Local => {}
    }

    parts
}

fn executable_command(spec: &CommandSpec) -> String {
    format!(
        "{} --reader={} --model={} --optimizer={}",
        spec.executable,
        data_reader_path(&spec.dir_name, &spec.data_reader_name),
        model_path(&spec.dir_name, &spec.model_folder, &spec.model_name),
        optimizer_path(&spec.dir_name, &spec.optimizer_name),
    )
}
