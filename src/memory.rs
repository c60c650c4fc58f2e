/// Physical memory as reported by `/proc/meminfo`, in kilobytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub total_kb: u64,
    pub free_kb: u64,
}

impl MemorySample {
    /// Used fraction `(total - free) / total`.
    ///
    /// Zero when total is unknown. A free value above total is clamped rather than
    /// treated as an error, since the kernel occasionally reports it.
    pub fn utilization(&self) -> f64 {
        if self.total_kb == 0 {
            return 0.0;
        }
        let used = self.total_kb.saturating_sub(self.free_kb);
        used as f64 / self.total_kb as f64
    }

    pub fn used_kb(&self) -> u64 {
        self.total_kb.saturating_sub(self.free_kb)
    }
}
