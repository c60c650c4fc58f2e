//! Reads CPU, memory, uptime and per-process counters from `/proc` and turns
//! them into percentages, seconds and megabytes.
//!
//! All queries go through [`SystemReader`]. They never fail: unreadable or
//! vanished sources come back as empty or zero values.

pub mod config;
pub mod cpu;
pub mod error;
pub mod format;
pub mod memory;
pub mod process;
pub mod reader;
pub mod records;
pub mod user;

/// Kernel process id. Only valid for the instant it was enumerated.
pub type Pid = u32;

pub use config::{ReaderConfig, Source};
pub use cpu::{CpuSample, cpu_utilization};
pub use error::ReadError;
pub use memory::MemorySample;
pub use process::{Process, ProcessJiffies, ProcessStat, process_cpu_utilization};
pub use reader::SystemReader;
pub use user::UserRecord;
