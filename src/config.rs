use std::path::{Path, PathBuf};

use crate::Pid;

//Logical record sources the reader knows how to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Stat,
    Meminfo,
    Uptime,
    Version,
    OsRelease,
    Passwd,
    ProcessStat(Pid),
    ProcessStatus(Pid),
    ProcessCmdline(Pid),
}

/// Where the reader finds its records, plus the kernel clock tick rate.
///
/// The default points at the live system. Tests point it at a fixture tree
/// with [`ReaderConfig::with_root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    pub proc_root: PathBuf,
    pub os_release: PathBuf,
    pub passwd: PathBuf,
    pub ticks_per_second: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        ReaderConfig {
            proc_root: PathBuf::from("/proc"),
            os_release: PathBuf::from("/etc/os-release"),
            passwd: PathBuf::from("/etc/passwd"),
            ticks_per_second: procfs::ticks_per_second(),
        }
    }
}

impl ReaderConfig {
    /// Lays out `<root>/proc`, `<root>/etc/os-release` and `<root>/etc/passwd`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        ReaderConfig {
            proc_root: root.join("proc"),
            os_release: root.join("etc").join("os-release"),
            passwd: root.join("etc").join("passwd"),
            ..ReaderConfig::default()
        }
    }

    pub fn proc_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.proc_root = path.into();
        self
    }

    pub fn os_release(mut self, path: impl Into<PathBuf>) -> Self {
        self.os_release = path.into();
        self
    }

    pub fn passwd(mut self, path: impl Into<PathBuf>) -> Self {
        self.passwd = path.into();
        self
    }

    pub fn ticks_per_second(mut self, hz: u64) -> Self {
        self.ticks_per_second = hz;
        self
    }

    /// Maps a logical source to its path. No I/O and no validation of the pid.
    pub fn locate(&self, source: Source) -> PathBuf {
        match source {
            Source::Stat => self.proc_root.join("stat"),
            Source::Meminfo => self.proc_root.join("meminfo"),
            Source::Uptime => self.proc_root.join("uptime"),
            Source::Version => self.proc_root.join("version"),
            Source::OsRelease => self.os_release.clone(),
            Source::Passwd => self.passwd.clone(),
            Source::ProcessStat(pid) => self.process_dir(pid).join("stat"),
            Source::ProcessStatus(pid) => self.process_dir(pid).join("status"),
            Source::ProcessCmdline(pid) => self.process_dir(pid).join("cmdline"),
        }
    }

    fn process_dir(&self, pid: Pid) -> PathBuf {
        self.proc_root.join(pid.to_string())
    }
}
