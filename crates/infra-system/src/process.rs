// Process helpers: liveness checks and signal names
// reason: nix for portable signal handling on unix

/// Check if a process is still alive (zombies count as dead)
pub fn is_alive(pid: u32) -> bool {
    #[cfg(unix)]
    {
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        let Ok(raw) = i32::try_from(pid) else {
            return false;
        };

        // Signal 0 checks if process exists without actually sending a signal
        if kill(Pid::from_raw(raw), None).is_err() {
            return false;
        }

        !is_zombie(pid)
    }

    #[cfg(not(unix))]
    {
        let _ = pid;
        false
    }
}

/// Exited but not yet reaped by its parent
#[cfg(target_os = "linux")]
fn is_zombie(pid: u32) -> bool {
    let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) else {
        return false;
    };

    // Format: "pid (comm) state ..."; comm may contain spaces or parens
    stat.rfind(')')
        .and_then(|end| stat[end + 1..].split_whitespace().next())
        .map(|state| state == "Z" || state == "X")
        .unwrap_or(false)
}

#[cfg(all(unix, not(target_os = "linux")))]
fn is_zombie(_pid: u32) -> bool {
    false
}

/// Symbolic name of a signal number (e.g. 9 -> "SIGKILL")
pub fn signal_name(signal: i32) -> Option<&'static str> {
    #[cfg(unix)]
    {
        nix::sys::signal::Signal::try_from(signal)
            .ok()
            .map(|sig| sig.as_str())
    }

    #[cfg(not(unix))]
    {
        let _ = signal;
        None
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_is_alive() {
        assert!(is_alive(std::process::id()));
    }

    #[test]
    fn test_out_of_range_pid_is_dead() {
        assert!(!is_alive(u32::MAX));
    }

    #[test]
    fn test_signal_names() {
        assert_eq!(signal_name(9), Some("SIGKILL"));
        assert_eq!(signal_name(15), Some("SIGTERM"));
        assert_eq!(signal_name(0), None);
        assert_eq!(signal_name(1000), None);
    }

    #[test]
    fn test_reaped_child_is_dead() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();
        assert!(!is_alive(pid));
    }
}
