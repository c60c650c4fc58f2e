/// Cumulative time spent in each CPU state since boot, in clock ticks,
/// as reported on the aggregate `cpu` line of `/proc/stat`.
///
/// One sample is one instant. Utilization needs two samples, see [`cpu_utilization`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
    pub guest: u64,
    pub guest_nice: u64,
}

impl CpuSample {
    pub const FIELDS: usize = 10;

    /// Builds a sample from the counters in `/proc/stat` column order.
    pub fn from_fields(fields: [u64; Self::FIELDS]) -> Self {
        let [user, nice, system, idle, iowait, irq, softirq, steal, guest, guest_nice] = fields;
        CpuSample {
            user,
            nice,
            system,
            idle,
            iowait,
            irq,
            softirq,
            steal,
            guest,
            guest_nice,
        }
    }

    pub fn active_ticks(&self) -> u64 {
        [
            self.user,
            self.nice,
            self.system,
            self.irq,
            self.softirq,
            self.steal,
            self.guest,
            self.guest_nice,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }

    pub fn idle_ticks(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn total_ticks(&self) -> u64 {
        self.active_ticks().saturating_add(self.idle_ticks())
    }
}

/// Fraction of time the CPUs were busy between two samples, in `[0, 1]`.
///
/// Returns 0.0 when no ticks elapsed or the counters went backwards.
pub fn cpu_utilization(prev: &CpuSample, curr: &CpuSample) -> f64 {
    let total_delta = curr.total_ticks().saturating_sub(prev.total_ticks());
    let active_delta = curr.active_ticks().saturating_sub(prev.active_ticks());

    if total_delta == 0 {
        return 0.0;
    }
    (active_delta as f64 / total_delta as f64).min(1.0)
}
