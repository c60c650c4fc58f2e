use tracing::{debug, warn};

use crate::config::ReaderConfig;
use crate::cpu::CpuSample;
use crate::error::ReadError;
use crate::memory::MemorySample;
use crate::process::Process;
use crate::Pid;

pub mod processes;
pub mod system;

/// Reads system and per-process state from `/proc` (or a fixture tree).
///
/// Every query opens, parses and closes its own record; nothing is cached
/// between calls. No query returns an error: a missing or malformed record,
/// or a process that exited since enumeration, yields an empty or zero value.
#[derive(Debug, Clone, Default)]
pub struct SystemReader {
    config: ReaderConfig,
}

impl SystemReader {
    pub fn new(config: ReaderConfig) -> Self {
        SystemReader { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    // System-wide

    /// Cumulative CPU counters from the aggregate `cpu` line. Zero-filled if unreadable.
    pub fn cpu_sample(&self) -> CpuSample {
        absorb(None, "cpu sample", system::read_cpu_sample(&self.config))
    }

    pub fn memory_sample(&self) -> MemorySample {
        absorb(None, "memory sample", system::read_memory(&self.config))
    }

    /// Used fraction of physical memory in `[0, 1]`; 0.0 if meminfo is unreadable.
    pub fn memory_utilization(&self) -> f64 {
        self.memory_sample().utilization()
    }

    pub fn uptime_seconds(&self) -> u64 {
        absorb(None, "uptime", system::read_uptime(&self.config))
    }

    /// Processes forked since boot (`processes` line of the stat record).
    pub fn total_processes(&self) -> u32 {
        absorb(
            None,
            "total processes",
            system::read_stat_counter(&self.config, "processes"),
        )
    }

    pub fn running_processes(&self) -> u32 {
        absorb(
            None,
            "running processes",
            system::read_stat_counter(&self.config, "procs_running"),
        )
    }

    pub fn operating_system(&self) -> String {
        absorb(None, "operating system", system::read_operating_system(&self.config))
    }

    pub fn kernel(&self) -> String {
        absorb(None, "kernel", system::read_kernel(&self.config))
    }

    // Per-process

    /// Numeric directory names under the proc root, ascending.
    pub fn pids(&self) -> Vec<Pid> {
        absorb(None, "process list", processes::list_pids(&self.config))
    }

    /// utime + stime + cutime + cstime, in clock ticks.
    pub fn process_active_ticks(&self, pid: Pid) -> u64 {
        absorb(
            Some(pid),
            "active ticks",
            processes::read_stat(&self.config, pid).map(|stat| stat.jiffies.total()),
        )
    }

    /// Start time of the process in clock ticks since boot.
    pub fn process_start_ticks(&self, pid: Pid) -> u64 {
        absorb(
            Some(pid),
            "start ticks",
            processes::read_stat(&self.config, pid).map(|stat| stat.start_ticks),
        )
    }

    pub fn process_start_seconds(&self, pid: Pid) -> u64 {
        self.process_start_ticks(pid)
            .checked_div(self.config.ticks_per_second)
            .unwrap_or(0)
    }

    /// Seconds the process has been running. Zero if it is gone.
    pub fn process_uptime_seconds(&self, pid: Pid) -> u64 {
        match processes::read_stat(&self.config, pid) {
            Ok(stat) => self
                .uptime_seconds()
                .saturating_sub(stat.start_seconds(self.config.ticks_per_second)),
            Err(e) => absorb(Some(pid), "process uptime", Err(e)),
        }
    }

    pub fn process_command(&self, pid: Pid) -> String {
        absorb(Some(pid), "command", processes::read_command(&self.config, pid))
    }

    /// Virtual memory size in whole megabytes.
    pub fn process_ram_mb(&self, pid: Pid) -> u64 {
        absorb(
            Some(pid),
            "ram",
            processes::read_vm_size_kb(&self.config, pid).map(|kb| kb / 1024),
        )
    }

    /// Real uid of the process. `None` if it cannot be read; 0 is root, not a default.
    pub fn process_uid(&self, pid: Pid) -> Option<u32> {
        absorb(
            Some(pid),
            "uid",
            processes::read_uid(&self.config, pid).map(Some),
        )
    }

    /// Name of the owning user, or an empty string if the uid has no passwd entry.
    pub fn process_user(&self, pid: Pid) -> String {
        absorb(Some(pid), "user", processes::read_user(&self.config, pid))
    }

    /// Snapshot of one process, `None` if it exited since it was enumerated.
    pub fn process(&self, pid: Pid) -> Option<Process> {
        absorb(
            Some(pid),
            "process snapshot",
            processes::read_process(&self.config, pid).map(Some),
        )
    }

    /// Snapshots of every live process; processes that vanish mid-scan are left out.
    pub fn processes(&self) -> Vec<Process> {
        self.pids()
            .into_iter()
            .filter_map(|pid| self.process(pid))
            .collect()
    }
}

//Converts an internal failure into the query's empty value.
//Vanished processes and absent keys are routine; anything else is worth a warning.
pub(crate) fn absorb<T: Default>(pid: Option<Pid>, what: &str, result: Result<T, ReadError>) -> T {
    match result {
        Ok(value) => value,
        Err(e) if e.is_expected() => {
            debug!(pid = ?pid, error = %e, "{what} unavailable, using default");
            T::default()
        }
        Err(e) => {
            warn!(pid = ?pid, error = %e, "could not read {what}");
            T::default()
        }
    }
}
