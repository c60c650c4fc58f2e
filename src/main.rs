use std::collections::HashMap;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use lpm_monitor::format::elapsed_time;
use lpm_monitor::{ReaderConfig, SystemReader, cpu_utilization, process_cpu_utilization};
use tracing_subscriber::EnvFilter;

const SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

const HELP: &str = "lpm_monitor - one-shot snapshot of system and process state\n\n\
USAGE:\n  lpm_monitor [--root <dir>] [--log-level <error|warn|info|debug|trace>]\n\n\
OPTIONS:\n  --root <dir>       Read <dir>/proc and <dir>/etc instead of the live system\n  \
--log-level <lvl>  Log verbosity on stderr (default: warn, or RUST_LOG)\n  \
--help             Show this message\n";

#[derive(Debug, Default)]
struct Options {
    root: Option<String>,
    log_level: Option<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Option<Options>, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(None),
            "--root" => options.root = Some(args.next().ok_or("--root needs a directory")?),
            "--log-level" => {
                options.log_level = Some(args.next().ok_or("--log-level needs a value")?)
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(Some(options))
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let options = match parse_args(std::env::args().skip(1)) {
        Ok(Some(options)) => options,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}\n\n{HELP}");
            return ExitCode::FAILURE;
        }
    };
    init_logging(options.log_level.as_deref());

    let config = match &options.root {
        Some(root) => ReaderConfig::with_root(root),
        None => ReaderConfig::default(),
    };
    let reader = SystemReader::new(config);
    print_snapshot(&reader);
    ExitCode::SUCCESS
}

//Two samples SAMPLE_INTERVAL apart: the reader only exposes cumulative counters
fn print_snapshot(reader: &SystemReader) {
    let cpu_before = reader.cpu_sample();
    let ticks_before: HashMap<u32, u64> = reader
        .pids()
        .into_iter()
        .map(|pid| (pid, reader.process_active_ticks(pid)))
        .collect();
    let started = Instant::now();

    thread::sleep(SAMPLE_INTERVAL);

    let cpu_after = reader.cpu_sample();
    let elapsed = started.elapsed().as_secs_f64();
    let uptime = reader.uptime_seconds();
    let hz = reader.config().ticks_per_second;

    println!("OS:        {}", reader.operating_system());
    println!("Kernel:    {}", reader.kernel());
    println!("Uptime:    {}", elapsed_time(uptime));
    println!("CPU:       {:5.1}%", cpu_utilization(&cpu_before, &cpu_after) * 100.0);
    println!("Memory:    {:5.1}%", reader.memory_utilization() * 100.0);
    println!(
        "Processes: {} total, {} running",
        reader.total_processes(),
        reader.running_processes()
    );
    println!();
    println!(
        "{:>7}  {:<12} {:>6} {:>8} {:>10}  COMMAND",
        "PID", "USER", "CPU%", "RAM(MB)", "TIME+"
    );

    for process in reader.processes() {
        let cpu = ticks_before
            .get(&process.process_id)
            .map(|&before| process_cpu_utilization(before, process.active_ticks, elapsed, hz))
            .unwrap_or(0.0);
        println!(
            "{:>7}  {:<12} {:>6.1} {:>8} {:>10}  {}",
            process.process_id,
            process.user,
            cpu * 100.0,
            process.ram_mb,
            elapsed_time(process.uptime_seconds(uptime)),
            process.command.replace('\0', " ").trim_end()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_root_and_log_level() {
        let options = parse_args(args(&["--root", "/tmp/fx", "--log-level", "debug"]))
            .unwrap()
            .unwrap();
        assert_eq!(options.root.as_deref(), Some("/tmp/fx"));
        assert_eq!(options.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn help_short_circuits() {
        assert!(parse_args(args(&["--help"])).unwrap().is_none());
    }

    #[test]
    fn rejects_unknown_and_incomplete_flags() {
        assert!(parse_args(args(&["--bogus"])).is_err());
        assert!(parse_args(args(&["--root"])).is_err());
    }
}
