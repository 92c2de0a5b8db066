use lpm::core::process_monitor::{ControlOutcome, ControlPort};

#[test]
fn test_out_of_range_nice_is_invalid() {
    let port = ControlPort::new();
    assert_eq!(
        port.set_priority(std::process::id(), 25),
        ControlOutcome::InvalidValue
    );
    assert_eq!(
        port.set_priority(std::process::id(), -21),
        ControlOutcome::InvalidValue
    );
}

#[test]
fn test_group_addressing_pids_are_not_found() {
    let port = ControlPort::new();
    assert_eq!(port.terminate(0), ControlOutcome::NotFound);
    assert_eq!(port.terminate(u32::MAX), ControlOutcome::NotFound);
}

#[cfg(target_os = "linux")]
#[test]
fn test_terminate_nonexistent_pid() {
    // Above the kernel's pid_max ceiling (4194304), so never allocated
    let port = ControlPort::new();
    assert_eq!(port.terminate(i32::MAX as u32), ControlOutcome::NotFound);
}

#[cfg(target_os = "linux")]
#[test]
fn test_control_real_child_process() {
    use lpm::core::process_monitor::{ProcFs, ProcSource};
    use std::process::Command;

    let mut child = Command::new("sleep").arg("30").spawn().unwrap();
    let pid = child.id();
    let port = ControlPort::new();

    // Raising nice never needs privileges
    assert_eq!(port.set_priority(pid, 10), ControlOutcome::Success);
    let stat = std::fs::read_to_string(format!("/proc/{}/stat", pid)).unwrap();
    let after_name = &stat[stat.rfind(')').unwrap() + 1..];
    let nice: i32 = after_name.split_whitespace().nth(16).unwrap().parse().unwrap();
    assert_eq!(nice, 10);

    assert_eq!(port.suspend(pid), ControlOutcome::Success);
    assert_eq!(port.resume(pid), ControlOutcome::Success);

    let raw = ProcFs::new().read_process(pid).unwrap().unwrap();
    assert_eq!(raw.name, "sleep");

    assert_eq!(port.terminate(pid), ControlOutcome::Success);
    let status = child.wait().unwrap();
    assert!(!status.success());
}
