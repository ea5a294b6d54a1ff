// Probe constants (no magic values)
use std::time::Duration;

/// Android package probed by default (Spotify)
pub const DEFAULT_PACKAGE_ID: &str = "com.spotify.music";

/// Sailfish Android App Support launcher helper
pub const DEFAULT_LAUNCHER_PROGRAM: &str = "apkd-launcher";

/// Process lookup tool used for the running check
pub const DEFAULT_PGREP_PROGRAM: &str = "pgrep";

/// `apkd-launcher` argument listing installed packages
pub const LIST_PACKAGES_ARG: &str = "--list-packages";

/// `apkd-launcher` argument starting a package
pub const START_ARG: &str = "--start";

/// `pgrep` argument matching against the full command line
pub const PGREP_FULL_MATCH_ARG: &str = "-f";

/// Environment variables passed through to child processes
pub const DEFAULT_ENV_ALLOWLIST: &[&str] = &[
    "PATH",
    "HOME",
    "USER",
    "LANG",
    "XDG_RUNTIME_DIR",
    "DBUS_SESSION_BUS_ADDRESS",
];

/// Interval between running checks while waiting for a launched app (500ms)
pub const LAUNCH_WAIT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Running checks attempted while waiting for a launched app (20 = ~10s)
pub const LAUNCH_WAIT_MAX_ATTEMPTS: u32 = 20;
