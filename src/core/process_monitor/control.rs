//! Process control: terminate, renice, suspend and resume.
//!
//! [`ControlPort`] validates requests and maps OS results to
//! [`ControlOutcome`]; the raw system calls live behind [`ControlBackend`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use log::{info, warn};
use serde::Serialize;

/// Most favored scheduling priority
pub const MIN_NICE: i32 = -20;
/// Least favored scheduling priority
pub const MAX_NICE: i32 = 19;

/// Result of a control operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControlOutcome {
    Success,
    PermissionDenied,
    NotFound,
    InvalidValue,
    /// Any other OS failure, with the raw errno (-1 if none was reported)
    Unknown(i32),
}

impl ControlOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ControlOutcome::Success)
    }

    fn from_io_error(e: &io::Error) -> Self {
        if let Some(outcome) = e.raw_os_error().and_then(classify_errno) {
            return outcome;
        }
        match e.kind() {
            io::ErrorKind::NotFound => ControlOutcome::NotFound,
            io::ErrorKind::PermissionDenied => ControlOutcome::PermissionDenied,
            io::ErrorKind::InvalidInput => ControlOutcome::InvalidValue,
            _ => ControlOutcome::Unknown(e.raw_os_error().unwrap_or(-1)),
        }
    }
}

#[cfg(unix)]
fn classify_errno(code: i32) -> Option<ControlOutcome> {
    let outcome = match code {
        libc::ESRCH => ControlOutcome::NotFound,
        libc::EPERM | libc::EACCES => ControlOutcome::PermissionDenied,
        libc::EINVAL => ControlOutcome::InvalidValue,
        other => ControlOutcome::Unknown(other),
    };
    Some(outcome)
}

#[cfg(not(unix))]
fn classify_errno(_code: i32) -> Option<ControlOutcome> {
    None
}

impl fmt::Display for ControlOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlOutcome::Success => write!(f, "success"),
            ControlOutcome::PermissionDenied => write!(f, "permission denied"),
            ControlOutcome::NotFound => write!(f, "no such process"),
            ControlOutcome::InvalidValue => write!(f, "invalid value"),
            ControlOutcome::Unknown(code) => write!(f, "OS error {}", code),
        }
    }
}

/// Signals the control port sends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessSignal {
    /// Immediate, non-catchable termination
    Kill,
    Stop,
    Continue,
}

impl fmt::Display for ProcessSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessSignal::Kill => write!(f, "SIGKILL"),
            ProcessSignal::Stop => write!(f, "SIGSTOP"),
            ProcessSignal::Continue => write!(f, "SIGCONT"),
        }
    }
}

/// Raw OS calls used by [`ControlPort`]
pub trait ControlBackend {
    fn send_signal(&self, pid: i32, signal: ProcessSignal) -> io::Result<()>;

    /// Set the nice value of every thread of `pid`.
    ///
    /// Not atomic: threads are changed one at a time, leader first, so an
    /// error can leave the threads handled before it at the new value.
    fn set_priority(&self, pid: i32, nice: i32) -> io::Result<()>;
}

/// libc-backed [`ControlBackend`]
#[derive(Debug, Clone)]
pub struct SignalBackend {
    /// Used to enumerate `<root>/<pid>/task` when renicing
    proc_root: PathBuf,
}

impl SignalBackend {
    pub fn new() -> Self {
        Self {
            proc_root: PathBuf::from("/proc"),
        }
    }
}

impl Default for SignalBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl ControlBackend for SignalBackend {
    fn send_signal(&self, pid: i32, signal: ProcessSignal) -> io::Result<()> {
        let sig = match signal {
            ProcessSignal::Kill => libc::SIGKILL,
            ProcessSignal::Stop => libc::SIGSTOP,
            ProcessSignal::Continue => libc::SIGCONT,
        };
        // SAFETY: kill takes plain integers; pid is validated positive by the caller
        let rc = unsafe { libc::kill(pid, sig) };
        if rc == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }

    fn set_priority(&self, pid: i32, nice: i32) -> io::Result<()> {
        renice_all(pid, &self.thread_ids(pid), |tid| renice_thread(tid, nice))
    }
}

/// Apply `renice` to the leader, then to each other thread in `tids`.
///
/// Stops at the first error; threads already changed keep the new value.
/// A thread that exited after enumeration (ESRCH) is ignored.
#[cfg(unix)]
fn renice_all<F>(leader: i32, tids: &[i32], mut renice: F) -> io::Result<()>
where
    F: FnMut(i32) -> io::Result<()>,
{
    renice(leader)?;

    for &tid in tids.iter().filter(|&&tid| tid != leader) {
        match renice(tid) {
            Ok(()) => {}
            Err(e) if e.raw_os_error() == Some(libc::ESRCH) => {}
            Err(e) => {
                warn!(
                    "renice of pid {} stopped at thread {}; earlier threads keep the new value",
                    leader, tid
                );
                return Err(e);
            }
        }
    }
    Ok(())
}

#[cfg(unix)]
impl SignalBackend {
    /// Thread ids of `pid`; Linux `setpriority(PRIO_PROCESS)` acts on one thread
    #[cfg(target_os = "linux")]
    fn thread_ids(&self, pid: i32) -> Vec<i32> {
        let task_dir = self.proc_root.join(pid.to_string()).join("task");
        match std::fs::read_dir(task_dir) {
            Ok(entries) => entries
                .filter_map(|entry| entry.ok())
                .filter_map(|entry| entry.file_name().to_str()?.parse::<i32>().ok())
                .collect(),
            Err(_) => Vec::new(),
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn thread_ids(&self, _pid: i32) -> Vec<i32> {
        Vec::new()
    }
}

#[cfg(unix)]
fn renice_thread(tid: i32, nice: i32) -> io::Result<()> {
    // SAFETY: setpriority takes plain integers
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, tid as libc::id_t, nice) };
    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
impl ControlBackend for SignalBackend {
    fn send_signal(&self, _pid: i32, _signal: ProcessSignal) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "signals are not supported on this platform",
        ))
    }

    fn set_priority(&self, _pid: i32, _nice: i32) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "setpriority is not supported on this platform",
        ))
    }
}

/// Issues control operations against single processes.
///
/// Every operation is one attempt with no retry and never waits for the
/// target to change state.
pub struct ControlPort<B = SignalBackend> {
    backend: B,
}

impl ControlPort<SignalBackend> {
    pub fn new() -> Self {
        Self::with_backend(SignalBackend::new())
    }
}

impl Default for ControlPort<SignalBackend> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: ControlBackend> ControlPort<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Kill `pid` immediately (SIGKILL)
    pub fn terminate(&self, pid: u32) -> ControlOutcome {
        self.signal(pid, ProcessSignal::Kill)
    }

    /// Pause `pid` (SIGSTOP)
    pub fn suspend(&self, pid: u32) -> ControlOutcome {
        self.signal(pid, ProcessSignal::Stop)
    }

    /// Resume a stopped `pid` (SIGCONT)
    pub fn resume(&self, pid: u32) -> ControlOutcome {
        self.signal(pid, ProcessSignal::Continue)
    }

    /// Set the scheduling priority of the whole process.
    ///
    /// `nice` outside `MIN_NICE..=MAX_NICE` is rejected before any OS call.
    /// An OS failure on a later thread is reported after earlier threads,
    /// the leader included, have already been changed; there is no rollback.
    pub fn set_priority(&self, pid: u32, nice: i32) -> ControlOutcome {
        if !(MIN_NICE..=MAX_NICE).contains(&nice) {
            warn!("rejected nice value {} for pid {}", nice, pid);
            return ControlOutcome::InvalidValue;
        }
        let Some(os_pid) = os_pid(pid) else {
            return ControlOutcome::NotFound;
        };

        let outcome = match self.backend.set_priority(os_pid, nice) {
            Ok(()) => ControlOutcome::Success,
            Err(e) => ControlOutcome::from_io_error(&e),
        };
        info!("setpriority pid={} nice={}: {}", pid, nice, outcome);
        outcome
    }

    fn signal(&self, pid: u32, signal: ProcessSignal) -> ControlOutcome {
        let Some(os_pid) = os_pid(pid) else {
            return ControlOutcome::NotFound;
        };

        let outcome = match self.backend.send_signal(os_pid, signal) {
            Ok(()) => ControlOutcome::Success,
            Err(e) => ControlOutcome::from_io_error(&e),
        };
        info!("{} pid={}: {}", signal, pid, outcome);
        outcome
    }
}

/// 0 and values past `i32::MAX` would address process groups, not a process
fn os_pid(pid: u32) -> Option<i32> {
    match i32::try_from(pid) {
        Ok(p) if p > 0 => Some(p),
        _ => None,
    }
}
