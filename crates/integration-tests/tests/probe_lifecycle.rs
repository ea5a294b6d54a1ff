//! Handle lifecycle with real child processes:
//! last-request-wins, teardown on drop, and timeouts

#![cfg(unix)]

mod common;

use std::time::Duration;

use common::*;
use sona_core::application::SlotState;
use sona_core::domain::{ProbeFailure, ProbeKind};

#[tokio::test]
async fn test_second_check_terminates_first() {
    let _serial = serial().await;
    let tools = FakeTools::new();
    let counter = tools.path("calls");
    let first_pid = tools.path("first.pid");
    tools.launcher(
        &format!(
            "n=$(cat {counter} 2>/dev/null || echo 0); n=$((n + 1)); echo $n > {counter}\n    \
             if [ $n -eq 1 ]; then echo $$ > {pid}; exec sleep 30; fi\n    \
             echo com.spotify.music",
            counter = counter.display(),
            pid = first_pid.display()
        ),
        "exit 0",
    );

    let (probe, mut events) = start_probe(tools.config());
    probe.check_installed();
    let pid = read_pid(&first_pid).await;
    assert_eq!(probe.state(ProbeKind::CheckInstalled), SlotState::Running);

    probe.check_installed();
    let report = next_report(&mut events).await;
    assert!(report.success);
    assert_eq!(probe.state(ProbeKind::CheckInstalled), SlotState::Idle);

    wait_for_exit(pid).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(events.try_recv().is_none(), "discarded check reported a result");
}

#[tokio::test]
async fn test_drop_kills_outstanding_children() {
    let _serial = serial().await;
    let tools = FakeTools::new();
    let pgrep_pid = tools.path("pgrep.pid");
    let launch_pid = tools.path("launch.pid");
    tools.pgrep(&format!("echo $$ > {}; exec sleep 30", pgrep_pid.display()));
    tools.launcher(
        "exit 0",
        &format!("echo $$ > {}; exec sleep 30", launch_pid.display()),
    );

    let (probe, mut events) = start_probe(tools.config());
    probe.check_running();
    probe.launch();
    let pids = [read_pid(&pgrep_pid).await, read_pid(&launch_pid).await];

    drop(probe);

    for pid in pids {
        wait_for_exit(pid).await;
    }
    let closed = tokio::time::timeout(TIMEOUT, events.recv())
        .await
        .expect("event stream did not close");
    assert!(closed.is_none(), "dropped probe emitted a result");
}

#[tokio::test]
async fn test_timeout_kills_hung_launcher() {
    let _serial = serial().await;
    let tools = FakeTools::new();
    let launch_pid = tools.path("launch.pid");
    tools.launcher(
        "exit 0",
        &format!("echo $$ > {}; exec sleep 30", launch_pid.display()),
    );

    let config = tools
        .config()
        .with_timeout(Some(Duration::from_millis(300)));
    let (probe, mut events) = start_probe(config);
    probe.launch();

    let report = next_report(&mut events).await;
    assert!(!report.success);
    assert_eq!(report.failure, Some(ProbeFailure::Timeout { timeout_ms: 300 }));

    let pid = read_pid(&launch_pid).await;
    wait_for_exit(pid).await;
}

#[tokio::test]
async fn test_probe_is_reusable_after_completion() {
    let _serial = serial().await;
    let tools = FakeTools::new();
    let state = tools.path("running");
    tools.pgrep(&format!("[ -f {} ] && echo 31337", state.display()));

    let (probe, mut events) = start_probe(tools.config());

    probe.check_running();
    assert!(!next_report(&mut events).await.success);

    std::fs::write(&state, "").unwrap();
    probe.check_running();
    assert!(next_report(&mut events).await.success);
}
