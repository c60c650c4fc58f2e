mod stat;

pub use stat::{ProcessJiffies, ProcessStat};

use crate::Pid;

/// Point-in-time view of one process, assembled from its stat, status and
/// cmdline records plus the user database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pub process_id: Pid,
    pub user_id: Option<u32>,
    pub user: String,
    pub command: String,
    pub ram_mb: u64,
    pub active_ticks: u64,
    /// Seconds since boot at which the process started.
    pub start_seconds: u64,
}

impl Process {
    /// How long the process has been running, given the current system uptime.
    pub fn uptime_seconds(&self, system_uptime: u64) -> u64 {
        system_uptime.saturating_sub(self.start_seconds)
    }
}

/// Share of one CPU a process used between two jiffy totals taken `elapsed_secs` apart.
pub fn process_cpu_utilization(
    prev_ticks: u64,
    curr_ticks: u64,
    elapsed_secs: f64,
    ticks_per_second: u64,
) -> f64 {
    if elapsed_secs <= 0.0 || ticks_per_second == 0 {
        return 0.0;
    }
    let cpu_seconds = curr_ticks.saturating_sub(prev_ticks) as f64 / ticks_per_second as f64;
    cpu_seconds / elapsed_secs
}
