use std::fs;

use tracing::debug;

use super::absorb;
use crate::config::{ReaderConfig, Source};
use crate::error::ReadError;
use crate::process::{Process, ProcessStat};
use crate::records::{self, Normalize};
use crate::user;
use crate::Pid;

const STATUS: [Normalize; 1] = [Normalize::Replace(':', ' ')];

/// Directories directly under the proc root whose names are all digits.
pub(crate) fn list_pids(config: &ReaderConfig) -> Result<Vec<Pid>, ReadError> {
    let entries = fs::read_dir(&config.proc_root)
        .map_err(|e| ReadError::unavailable(&config.proc_root, e))?;

    let mut pids: Vec<Pid> = entries
        .flatten() //Skip entries that vanished while listing
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            if name.is_empty() || !name.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            name.parse::<Pid>().ok()
        })
        .collect();

    pids.sort_unstable();
    Ok(pids)
}

pub(crate) fn read_stat(config: &ReaderConfig, pid: Pid) -> Result<ProcessStat, ReadError> {
    let path = config.locate(Source::ProcessStat(pid));
    let line = records::read_first_line(&path).map_err(ReadError::into_stale)?;
    ProcessStat::parse(&line).map_err(|reason| ReadError::malformed(&path, reason))
}

/// First line of the cmdline record, verbatim (arguments stay NUL-separated).
pub(crate) fn read_command(config: &ReaderConfig, pid: Pid) -> Result<String, ReadError> {
    let path = config.locate(Source::ProcessCmdline(pid));
    records::read_first_line(&path).map_err(ReadError::into_stale)
}

fn read_status_value(config: &ReaderConfig, pid: Pid, key: &str) -> Result<String, ReadError> {
    let path = config.locate(Source::ProcessStatus(pid));
    records::find_first(&path, &STATUS, key).map_err(ReadError::into_stale)
}

/// `VmSize` from the status record, in kB. Kernel threads have none.
pub(crate) fn read_vm_size_kb(config: &ReaderConfig, pid: Pid) -> Result<u64, ReadError> {
    let raw = read_status_value(config, pid, "VmSize")?;
    records::parse_number(&config.locate(Source::ProcessStatus(pid)), "VmSize", &raw)
}

/// Real uid: the first of the four ids on the `Uid:` line.
pub(crate) fn read_uid(config: &ReaderConfig, pid: Pid) -> Result<u32, ReadError> {
    let raw = read_status_value(config, pid, "Uid")?;
    records::parse_number(&config.locate(Source::ProcessStatus(pid)), "Uid", &raw)
}

pub(crate) fn read_user(config: &ReaderConfig, pid: Pid) -> Result<String, ReadError> {
    let uid = read_uid(config, pid)?;
    let passwd = config.locate(Source::Passwd);
    user::lookup_user(&passwd, uid)?.ok_or_else(|| ReadError::key_not_found(&passwd, &uid.to_string()))
}

/// Builds a snapshot for `pid`. The stat record decides whether the process
/// still exists; the other fields fall back to empty values on their own.
pub(crate) fn read_process(config: &ReaderConfig, pid: Pid) -> Result<Process, ReadError> {
    let stat = read_stat(config, pid)?;
    debug!(pid, comm = %stat.comm, state = %stat.state, "read process stat");

    let user_id = absorb(Some(pid), "uid", read_uid(config, pid).map(Some));
    let user = match user_id {
        Some(uid) => absorb(
            Some(pid),
            "user",
            user::lookup_user(&config.locate(Source::Passwd), uid)
                .map(|name| name.unwrap_or_default()),
        ),
        None => String::new(),
    };

    Ok(Process {
        process_id: pid,
        user_id,
        user,
        command: absorb(Some(pid), "command", read_command(config, pid)),
        ram_mb: absorb(Some(pid), "ram", read_vm_size_kb(config, pid)) / 1024,
        active_ticks: stat.jiffies.total(),
        start_seconds: stat.start_seconds(config.ticks_per_second),
    })
}
