use crate::config::{ReaderConfig, Source};
use crate::cpu::CpuSample;
use crate::error::ReadError;
use crate::memory::MemorySample;
use crate::records::{self, Normalize};

const KEY_VALUE: [Normalize; 1] = [Normalize::Replace(':', ' ')];

//`PRETTY_NAME="Debian GNU/Linux 12"` -> `PRETTY_NAME Debian_GNU/Linux_12`
const OS_RELEASE: [Normalize; 3] = [
    Normalize::Replace(' ', '_'),
    Normalize::Replace('=', ' '),
    Normalize::StripQuotes,
];

/// Aggregate `cpu` line of the stat record. `cpu0`, `cpu1`... are per-core and skipped.
///
/// Older kernels print fewer than ten columns; the missing trailing ones read as zero.
pub(crate) fn read_cpu_sample(config: &ReaderConfig) -> Result<CpuSample, ReadError> {
    let path = config.locate(Source::Stat);
    let values = records::find_fields(&path, &[], &["cpu"])?
        .pop()
        .flatten()
        .ok_or_else(|| ReadError::key_not_found(&path, "cpu"))?;

    let mut fields = [0u64; CpuSample::FIELDS];
    for (slot, raw) in fields.iter_mut().zip(&values) {
        *slot = records::parse_number(&path, "cpu", raw)?;
    }
    Ok(CpuSample::from_fields(fields))
}

/// `MemTotal` and `MemFree`, in kB. Scanning stops once both are seen.
pub(crate) fn read_memory(config: &ReaderConfig) -> Result<MemorySample, ReadError> {
    let path = config.locate(Source::Meminfo);
    let found = records::find_fields(&path, &KEY_VALUE, &["MemTotal", "MemFree"])?;

    let value = |idx: usize, key: &str| -> Result<u64, ReadError> {
        let raw = found[idx]
            .as_ref()
            .and_then(|values| values.first())
            .ok_or_else(|| ReadError::key_not_found(&path, key))?;
        records::parse_number(&path, key, raw)
    };

    Ok(MemorySample {
        total_kb: value(0, "MemTotal")?,
        free_kb: value(1, "MemFree")?,
    })
}

/// Whole seconds since boot, from the first column of the uptime record.
pub(crate) fn read_uptime(config: &ReaderConfig) -> Result<u64, ReadError> {
    let path = config.locate(Source::Uptime);
    let line = records::read_first_line(&path)?;
    let raw = records::tokenize(&line, &[])
        .into_iter()
        .next()
        .ok_or_else(|| ReadError::malformed(&path, "empty uptime record"))?;

    let seconds: f64 = records::parse_number(&path, "uptime", &raw)?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ReadError::malformed(&path, format!("uptime {raw:?} out of range")));
    }
    Ok(seconds as u64)
}

/// Single-valued summary lines of the stat record, e.g. `processes` or `procs_running`.
pub(crate) fn read_stat_counter(config: &ReaderConfig, key: &str) -> Result<u32, ReadError> {
    let path = config.locate(Source::Stat);
    let raw = records::find_first(&path, &[], key)?;
    records::parse_number(&path, key, &raw)
}

pub(crate) fn read_operating_system(config: &ReaderConfig) -> Result<String, ReadError> {
    let path = config.locate(Source::OsRelease);
    let value = records::find_first(&path, &OS_RELEASE, "PRETTY_NAME")?;
    //Single-quoted values keep their quotes through the tokenizer; apostrophes inside stay
    let value = value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(&value);
    Ok(value.replace('_', " "))
}

//`Linux version 6.1.0-13-amd64 (debian-kernel@...) ...` -> third token
pub(crate) fn read_kernel(config: &ReaderConfig) -> Result<String, ReadError> {
    let path = config.locate(Source::Version);
    let line = records::read_first_line(&path)?;
    records::tokenize(&line, &[])
        .into_iter()
        .nth(2)
        .ok_or_else(|| ReadError::malformed(&path, "version line has fewer than three fields"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn fixture(files: &[(&str, &str)]) -> (tempfile::TempDir, ReaderConfig) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("proc")).unwrap();
        fs::create_dir_all(dir.path().join("etc")).unwrap();
        for (name, contents) in files {
            fs::write(dir.path().join(name), contents).unwrap();
        }
        let config = ReaderConfig::with_root(dir.path()).ticks_per_second(100);
        (dir, config)
    }

    const STAT: &str = "cpu0 1 1 1 1 1 1 1 1 1 1\n\
        cpu  10132153 290696 3084719 46828483 16683 0 25195 0 0 0\n\
        cpu1 2 2 2 2 2 2 2 2 2 2\n\
        intr 4287231 0 0 0\n\
        ctxt 1234567\n\
        processes 12345\n\
        procs_running 2\n\
        procs_blocked 0\n";

    #[test]
    fn cpu_sample_uses_aggregate_line_only() {
        let (_dir, config) = fixture(&[("proc/stat", STAT)]);
        let sample = read_cpu_sample(&config).unwrap();
        assert_eq!(
            sample,
            CpuSample::from_fields([10132153, 290696, 3084719, 46828483, 16683, 0, 25195, 0, 0, 0])
        );
    }

    #[test]
    fn cpu_sample_with_short_line_zero_fills_tail() {
        let (_dir, config) = fixture(&[("proc/stat", "cpu 100 50 30 500 20\n")]);
        let sample = read_cpu_sample(&config).unwrap();
        assert_eq!(sample.iowait, 20);
        assert_eq!(sample.steal, 0);
        assert_eq!(sample.guest_nice, 0);
    }

    #[test]
    fn cpu_sample_rejects_non_numeric_counter() {
        let (_dir, config) = fixture(&[("proc/stat", "cpu 100 x 30 500 20\n")]);
        assert!(matches!(
            read_cpu_sample(&config),
            Err(ReadError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn cpu_sample_without_aggregate_line_is_not_found() {
        let (_dir, config) = fixture(&[("proc/stat", "cpu0 1 2 3 4\n")]);
        assert!(matches!(
            read_cpu_sample(&config),
            Err(ReadError::KeyNotFound { .. })
        ));
    }

    #[test]
    fn memory_reads_total_and_free() {
        let (_dir, config) = fixture(&[(
            "proc/meminfo",
            "MemTotal:        1000 kB\nMemFree:          250 kB\nMemAvailable:   600 kB\nMemFree: 1 kB\n",
        )]);
        let sample = read_memory(&config).unwrap();
        assert_eq!(sample, MemorySample { total_kb: 1000, free_kb: 250 });
        assert_eq!(sample.utilization(), 0.75);
    }

    #[test]
    fn memory_without_free_is_not_found() {
        let (_dir, config) = fixture(&[("proc/meminfo", "MemTotal: 1000 kB\n")]);
        assert!(matches!(read_memory(&config), Err(ReadError::KeyNotFound { .. })));
    }

    #[test]
    fn uptime_truncates_fractional_seconds() {
        let (_dir, config) = fixture(&[("proc/uptime", "350735.47 234388.90\n")]);
        assert_eq!(read_uptime(&config).unwrap(), 350735);
    }

    #[test]
    fn malformed_uptime_is_an_error() {
        let (_dir, config) = fixture(&[("proc/uptime", "soon\n")]);
        assert!(read_uptime(&config).is_err());
        let (_dir, config) = fixture(&[("proc/uptime", "-5.0 1.0\n")]);
        assert!(read_uptime(&config).is_err());
        let (_dir, config) = fixture(&[("proc/uptime", "")]);
        assert!(read_uptime(&config).is_err());
    }

    #[test]
    fn process_counters_come_from_stat_summary_lines() {
        let (_dir, config) = fixture(&[("proc/stat", STAT)]);
        assert_eq!(read_stat_counter(&config, "processes").unwrap(), 12345);
        assert_eq!(read_stat_counter(&config, "procs_running").unwrap(), 2);
    }

    #[test]
    fn operating_system_pretty_name() {
        let (_dir, config) = fixture(&[(
            "etc/os-release",
            "NAME=\"Debian GNU/Linux\"\nPRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\nID=debian\n",
        )]);
        assert_eq!(
            read_operating_system(&config).unwrap(),
            "Debian GNU/Linux 12 (bookworm)"
        );
    }

    #[test]
    fn operating_system_keeps_apostrophes() {
        let (_dir, config) = fixture(&[("etc/os-release", "PRETTY_NAME=\"Bob's Linux 1.0\"\n")]);
        assert_eq!(read_operating_system(&config).unwrap(), "Bob's Linux 1.0");
    }

    #[test]
    fn operating_system_single_quoted_value() {
        let (_dir, config) = fixture(&[("etc/os-release", "PRETTY_NAME='Alpine Linux v3.20'\n")]);
        assert_eq!(read_operating_system(&config).unwrap(), "Alpine Linux v3.20");
    }

    #[test]
    fn kernel_is_third_token_of_version() {
        let (_dir, config) = fixture(&[(
            "proc/version",
            "Linux version 6.1.0-13-amd64 (debian-kernel@lists.debian.org) (gcc-12) #1 SMP\n",
        )]);
        assert_eq!(read_kernel(&config).unwrap(), "6.1.0-13-amd64");
    }
}
