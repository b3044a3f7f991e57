//! Cluster registry.
//!
//! Maps a cluster name (the machine's hostname with digits stripped) to the scheduler family
//! used to allocate nodes and launch processes there.

use crate::vocab::registry::ItemInfo;

/// Stable identifier for known clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClusterId {
    Catalyst,
    Corona,
    Pascal,
    Lassen,
    Ray,
    /// A workstation or CI runner: no scheduler, the executable runs directly.
    Local,
}

/// Scheduler family of a cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchedulerKind {
    /// `salloc` + `srun`
    Slurm,
    /// `bsub` + `jsrun`/`mpirun`
    Lsf,
    /// No allocation, no launcher.
    Local,
}

/// Partition (Slurm) or queue (LSF) used when the caller does not pick one.
pub const DEFAULT_PARTITION: &str = "pbatch";

/// Environment variable set inside an existing Slurm allocation.
pub const SLURM_ALLOCATION_ENV: &str = "SLURM_JOB_NUM_NODES";

/// Environment variable set inside an existing LSF allocation.
pub const LSF_ALLOCATION_ENV: &str = "LSB_HOSTS";

/// Metadata entry for a cluster.
#[derive(Debug, Clone, Copy)]
pub struct ClusterInfo {
    pub item: ItemInfo<ClusterId>,
    pub scheduler: SchedulerKind,
    /// Upper bound on the time limit in minutes, if the cluster enforces one.
    pub max_time_limit: Option<u32>,
}

/// Registry of known clusters, in `ClusterId` declaration order.
pub const CLUSTERS: &[ClusterInfo] = &[
    info(ClusterId::Catalyst, "catalyst", SchedulerKind::Slurm, None),
    info(ClusterId::Corona, "corona", SchedulerKind::Slurm, None),
    info(ClusterId::Pascal, "pascal", SchedulerKind::Slurm, None),
    info(ClusterId::Lassen, "lassen", SchedulerKind::Lsf, None),
    info(ClusterId::Ray, "ray", SchedulerKind::Lsf, Some(480)),
    ClusterInfo {
        item: ItemInfo {
            id: ClusterId::Local,
            canonical: "local",
            aliases: &["localhost"],
            description: "Run the executable directly, without a scheduler.",
        },
        scheduler: SchedulerKind::Local,
        max_time_limit: None,
    },
];

/// Resolve a cluster name to its stable id.
pub fn from_str(name: &str) -> Option<ClusterId> {
    CLUSTERS.iter().find(|c| c.item.matches(name)).map(|c| c.item.id)
}

/// Return the canonical spelling for a cluster.
pub fn as_str(id: ClusterId) -> &'static str {
    info_for(id).item.canonical
}

/// Return the scheduler family for a cluster.
pub fn scheduler(id: ClusterId) -> SchedulerKind {
    info_for(id).scheduler
}

/// Clamp a time limit (minutes) to the cluster's maximum, if any.
pub fn clamp_time_limit(id: ClusterId, minutes: u32) -> u32 {
    match info_for(id).max_time_limit {
        Some(max) => minutes.min(max),
        None => minutes,
    }
}

/// Return the environment variable that signals an existing allocation, if the scheduler has one.
pub fn allocation_env(kind: SchedulerKind) -> Option<&'static str> {
    match kind {
        SchedulerKind::Slurm => Some(SLURM_ALLOCATION_ENV),
        SchedulerKind::Lsf => Some(LSF_ALLOCATION_ENV),
        SchedulerKind::Local => None,
    }
}

/// Return the metadata entry for a cluster.
pub fn info_for(id: ClusterId) -> &'static ClusterInfo {
    &CLUSTERS[id as usize]
}

const fn info(
    id: ClusterId,
    canonical: &'static str,
    scheduler: SchedulerKind,
    max_time_limit: Option<u32>,
) -> ClusterInfo {
    ClusterInfo {
        item: ItemInfo {
            id,
            canonical,
            aliases: &[],
            description: "",
        },
        scheduler,
        max_time_limit,
    }
}
