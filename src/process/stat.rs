use crate::Pid;

/// Jiffies charged to a process and its reaped children, in clock ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessJiffies {
    pub utime: u64,
    pub stime: u64,
    pub cutime: u64,
    pub cstime: u64,
}

impl ProcessJiffies {
    pub fn total(&self) -> u64 {
        self.utime
            .saturating_add(self.stime)
            .saturating_add(self.cutime)
            .saturating_add(self.cstime)
    }
}

/// The fields of `/proc/[pid]/stat` this crate uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStat {
    pub pid: Pid,
    pub comm: String,
    pub state: char,
    pub jiffies: ProcessJiffies,
    /// Start time in clock ticks since boot (field 22).
    pub start_ticks: u64,
}

//1-indexed field numbers from proc(5)
const FIELD_STATE: usize = 3;
const FIELD_UTIME: usize = 14;
const FIELD_STIME: usize = 15;
const FIELD_CUTIME: usize = 16;
const FIELD_CSTIME: usize = 17;
const FIELD_STARTTIME: usize = 22;

impl ProcessStat {
    /// Parses a stat line by position.
    ///
    /// The comm field sits in parentheses and may itself contain spaces and
    /// parentheses, so it runs from the first `(` to the *last* `)`. Fields
    /// after it are counted from field 3 (state).
    pub fn parse(line: &str) -> Result<ProcessStat, String> {
        let line = line.trim();
        let open = line.find('(').ok_or("missing '(' before comm")?;
        let close = line.rfind(')').ok_or("missing ')' after comm")?;
        if close < open {
            return Err("comm parentheses out of order".to_string());
        }

        let pid = line[..open]
            .trim()
            .parse::<Pid>()
            .map_err(|_| format!("invalid pid {:?}", line[..open].trim()))?;
        let comm = line[open + 1..close].to_string();
        let rest: Vec<&str> = line[close + 1..].split_whitespace().collect();

        //rest[0] is field 3
        let field = |number: usize| -> Result<&str, String> {
            rest.get(number - FIELD_STATE)
                .copied()
                .ok_or_else(|| format!("stat has no field {number}"))
        };
        let unsigned = |number: usize| -> Result<u64, String> {
            field(number)?
                .parse::<u64>()
                .map_err(|_| format!("field {number} is not an unsigned integer"))
        };
        //cutime and cstime are signed in the kernel record
        let signed = |number: usize| -> Result<u64, String> {
            field(number)?
                .parse::<i64>()
                .map(|v| v.max(0) as u64)
                .map_err(|_| format!("field {number} is not an integer"))
        };

        let state = field(FIELD_STATE)?.chars().next().unwrap_or('?');

        Ok(ProcessStat {
            pid,
            comm,
            state,
            jiffies: ProcessJiffies {
                utime: unsigned(FIELD_UTIME)?,
                stime: unsigned(FIELD_STIME)?,
                cutime: signed(FIELD_CUTIME)?,
                cstime: signed(FIELD_CSTIME)?,
            },
            start_ticks: unsigned(FIELD_STARTTIME)?,
        })
    }

    /// Start time in whole seconds since boot. Zero if `ticks_per_second` is zero.
    pub fn start_seconds(&self, ticks_per_second: u64) -> u64 {
        self.start_ticks.checked_div(ticks_per_second).unwrap_or(0)
    }
}
