//! Shared fixtures: fake `apkd-launcher` / `pgrep` scripts in a temp dir

#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use sona_core::application::{AndroidAppProbe, ProbeConfig, ProbeEvents};
use sona_core::domain::ProbeReport;
use sona_core::port::time_provider::SystemTimeProvider;
use sona_infra_system::SubprocessRunner;
use tokio::sync::{Mutex, MutexGuard};

pub const TIMEOUT: Duration = Duration::from_secs(5);

/// Freshly written scripts must not be open for writing while another test
/// thread forks (ETXTBSY), so tests using fake tools run one at a time.
static SERIAL: Mutex<()> = Mutex::const_new(());

pub async fn serial() -> MutexGuard<'static, ()> {
    SERIAL.lock().await
}

pub struct FakeTools {
    dir: tempfile::TempDir,
}

impl FakeTools {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write an executable `/bin/sh` script named `name`
    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path
    }

    /// Fake launcher: `--list-packages` runs `list_body`, `--start` runs `start_body`
    pub fn launcher(&self, list_body: &str, start_body: &str) -> PathBuf {
        self.script(
            "apkd-launcher",
            &format!(
                "case \"$1\" in\n  --list-packages)\n    {}\n    ;;\n  --start)\n    [ \"$2\" = \"com.spotify.music\" ] || exit 64\n    {}\n    ;;\n  *)\n    exit 64\n    ;;\nesac",
                list_body, start_body
            ),
        )
    }

    /// Fake pgrep that insists on `-f com.spotify.music`
    pub fn pgrep(&self, body: &str) -> PathBuf {
        self.script(
            "pgrep",
            &format!(
                "[ \"$1\" = \"-f\" ] && [ \"$2\" = \"com.spotify.music\" ] || exit 64\n{}",
                body
            ),
        )
    }

    /// Probe config pointing at the fake tools (missing tools stay missing)
    pub fn config(&self) -> ProbeConfig {
        ProbeConfig::default()
            .with_launcher_program(self.path("apkd-launcher").display().to_string())
            .with_pgrep_program(self.path("pgrep").display().to_string())
    }
}

pub fn start_probe(config: ProbeConfig) -> (AndroidAppProbe, ProbeEvents) {
    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    AndroidAppProbe::new(config, runner).expect("create probe")
}

pub async fn next_report(events: &mut ProbeEvents) -> ProbeReport {
    tokio::time::timeout(TIMEOUT, events.recv())
        .await
        .expect("timed out waiting for probe report")
        .expect("event stream closed")
}

/// Wait for a script to write its pid into `path`
pub async fn read_pid(path: &Path) -> u32 {
    tokio::time::timeout(TIMEOUT, async {
        loop {
            if let Ok(text) = std::fs::read_to_string(path) {
                if let Ok(pid) = text.trim().parse::<u32>() {
                    return pid;
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("script never wrote its pid")
}

pub async fn wait_for_exit(pid: u32) {
    tokio::time::timeout(TIMEOUT, async {
        while sona_infra_system::is_alive(pid) {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("probe child process was not terminated");
}
