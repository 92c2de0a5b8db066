//! `/proc` backed [`ProcSource`].
//!
//! Reads:
//! - `/proc/<pid>/stat` - utime (field 14) and the command name
//! - `/proc/<pid>/statm` - resident pages (field 2)
//! - `/proc/<pid>/comm` - display name
//! - `/proc/stat` - aggregate `cpu` tick counters
//! - `/proc/meminfo` - `MemTotal` and `MemAvailable`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use super::source::{ProcSource, RawProcess, SystemCounters};
use crate::error::{LpmError, Result};

const DEFAULT_PROC_ROOT: &str = "/proc";

/// Clock ticks per second, fetched once per process lifetime
static CLOCK_TICKS: Lazy<u64> = Lazy::new(|| sysconf_or(SysconfName::ClockTicks, 100));

/// Memory page size in bytes, fetched once per process lifetime
static PAGE_SIZE: Lazy<u64> = Lazy::new(|| sysconf_or(SysconfName::PageSize, 4096));

enum SysconfName {
    ClockTicks,
    PageSize,
}

#[cfg(unix)]
fn sysconf_or(name: SysconfName, fallback: u64) -> u64 {
    let name = match name {
        SysconfName::ClockTicks => libc::_SC_CLK_TCK,
        SysconfName::PageSize => libc::_SC_PAGESIZE,
    };
    // SAFETY: sysconf has no preconditions for these names
    let value = unsafe { libc::sysconf(name) };
    if value > 0 {
        value as u64
    } else {
        fallback
    }
}

#[cfg(not(unix))]
fn sysconf_or(_name: SysconfName, fallback: u64) -> u64 {
    fallback
}

/// Process table reader for Linux procfs
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    clock_ticks: u64,
    page_size: u64,
}

impl ProcFs {
    /// Reader for the live `/proc` with the OS unit constants
    pub fn new() -> Self {
        Self::with_root(DEFAULT_PROC_ROOT)
    }

    /// Reader for a procfs-shaped tree at `root`
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self::with_units(root, *CLOCK_TICKS, *PAGE_SIZE)
    }

    /// Reader with explicit unit constants, used for recorded or fake trees
    pub fn with_units<P: Into<PathBuf>>(root: P, clock_ticks: u64, page_size: u64) -> Self {
        Self {
            root: root.into(),
            clock_ticks,
            page_size,
        }
    }

    fn process_file(&self, pid: u32, file: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(file)
    }
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcSource for ProcFs {
    fn list_pids(&self) -> Result<Vec<u32>> {
        let entries = fs::read_dir(&self.root).map_err(|e| {
            LpmError::system_counters(format!(
                "cannot read process table {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut pids: Vec<u32> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str()?.parse::<u32>().ok())
            .filter(|&pid| pid > 0)
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    fn read_process(&self, pid: u32) -> Result<Option<RawProcess>> {
        let Some(stat) = read_process_file(&self.process_file(pid, "stat"))? else {
            return Ok(None);
        };
        let (stat_name, cpu_ticks) = parse_stat(&stat)?;

        let Some(statm) = read_process_file(&self.process_file(pid, "statm"))? else {
            return Ok(None);
        };
        let rss_pages = parse_statm(&statm)?;

        // comm can vanish or be denied independently; stat already carries the name
        let name = match read_process_file(&self.process_file(pid, "comm")) {
            Ok(Some(comm)) => comm.trim_end_matches('\n').to_string(),
            _ => stat_name,
        };

        Ok(Some(RawProcess {
            pid,
            name,
            cpu_ticks,
            rss_pages,
        }))
    }

    fn read_system(&self) -> Result<SystemCounters> {
        let stat = read_system_file(&self.root.join("stat"))?;
        let meminfo = read_system_file(&self.root.join("meminfo"))?;

        let (user_ticks, nice_ticks, system_ticks, idle_ticks) = parse_cpu_line(&stat)?;
        let (total_mem_kb, available_mem_kb) = parse_meminfo(&meminfo)?;

        Ok(SystemCounters {
            user_ticks,
            nice_ticks,
            system_ticks,
            idle_ticks,
            total_mem_kb,
            available_mem_kb,
        })
    }

    fn clock_ticks_per_second(&self) -> u64 {
        self.clock_ticks
    }

    fn page_size_bytes(&self) -> u64 {
        self.page_size
    }
}

/// An exited process shows up as ENOENT on the path or ESRCH on the read
fn is_gone(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::NotFound {
        return true;
    }
    #[cfg(unix)]
    {
        e.raw_os_error() == Some(libc::ESRCH)
    }
    #[cfg(not(unix))]
    {
        false
    }
}

fn read_process_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if is_gone(&e) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Err(
            LpmError::permission_denied(format!("{}", path.display())),
        ),
        Err(e) => Err(LpmError::Io(e)),
    }
}

fn read_system_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        LpmError::system_counters(format!("cannot read {}: {}", path.display(), e))
    })
}

/// Parse `/proc/<pid>/stat` into the command name and utime.
///
/// Format: pid (comm) state ppid pgrp session tty_nr tpgid flags minflt cminflt majflt cmajflt
///         utime stime ...
/// The name may itself contain spaces and parentheses, so the fields start
/// after the last `)`.
pub fn parse_stat(content: &str) -> Result<(String, u64)> {
    let open = content
        .find('(')
        .ok_or_else(|| LpmError::parse("stat: no opening paren"))?;
    let close = content
        .rfind(')')
        .ok_or_else(|| LpmError::parse("stat: no closing paren"))?;
    if close < open {
        return Err(LpmError::parse("stat: unbalanced command name"));
    }

    let name = content[open + 1..close].to_string();
    let fields: Vec<&str> = content[close + 1..].split_whitespace().collect();

    // 0: state ... 11: utime
    let utime = fields
        .get(11)
        .ok_or_else(|| {
            LpmError::parse(format!("stat: expected 12+ fields after name, got {}", fields.len()))
        })?
        .parse::<u64>()
        .map_err(|_| LpmError::parse("stat: failed to parse utime"))?;

    Ok((name, utime))
}

/// Parse the resident page count out of `/proc/<pid>/statm`
pub fn parse_statm(content: &str) -> Result<u64> {
    content
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| LpmError::parse("statm: missing resident field"))?
        .parse::<u64>()
        .map_err(|_| LpmError::parse("statm: failed to parse resident pages"))
}

/// Parse user, nice, system and idle ticks from the aggregate `cpu` line
pub fn parse_cpu_line(content: &str) -> Result<(u64, u64, u64, u64)> {
    let line = content
        .lines()
        .find(|line| line.split_whitespace().next() == Some("cpu"))
        .ok_or_else(|| LpmError::system_counters("/proc/stat has no aggregate cpu line"))?;

    let values: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .take(4)
        .map(str::parse::<u64>)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| LpmError::system_counters("/proc/stat cpu line is not numeric"))?;

    match values[..] {
        [user, nice, system, idle] => Ok((user, nice, system, idle)),
        _ => Err(LpmError::system_counters(format!(
            "/proc/stat cpu line has {} fields, need 4",
            values.len()
        ))),
    }
}

/// Parse `MemTotal` and `MemAvailable` (kB) out of `/proc/meminfo`
pub fn parse_meminfo(content: &str) -> Result<(u64, u64)> {
    let mut total = None;
    let mut available = None;

    for line in content.lines() {
        // Format: "MemTotal:       16384000 kB"
        let mut parts = line.split_whitespace();
        let slot = match parts.next() {
            Some("MemTotal:") => &mut total,
            Some("MemAvailable:") => &mut available,
            _ => continue,
        };
        *slot = parts.next().and_then(|v| v.parse::<u64>().ok());
        if total.is_some() && available.is_some() {
            break;
        }
    }

    match (total, available) {
        (Some(total), Some(available)) => Ok((total, available)),
        (None, _) => Err(LpmError::system_counters("/proc/meminfo has no MemTotal")),
        (_, None) => Err(LpmError::system_counters("/proc/meminfo has no MemAvailable")),
    }
}
