//! Sona probe CLI - check, inspect and launch the Android Spotify app
//! through Sailfish Android App Support helper tools

mod logging;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use sona_core::application::constants::{
    DEFAULT_LAUNCHER_PROGRAM, DEFAULT_PACKAGE_ID, DEFAULT_PGREP_PROGRAM,
    LAUNCH_WAIT_MAX_ATTEMPTS, LAUNCH_WAIT_POLL_INTERVAL,
};
use sona_core::application::{AndroidAppProbe, ProbeConfig, ProbeEvents};
use sona_core::domain::{ProbeKind, ProbeReport};
use sona_core::port::time_provider::SystemTimeProvider;
use sona_infra_system::SubprocessRunner;

#[derive(Parser)]
#[command(name = "sona-probe")]
#[command(about = "Check, inspect and launch an Android app on Sailfish OS", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Android package to probe
    #[arg(long, env = "SONA_PACKAGE_ID", default_value = DEFAULT_PACKAGE_ID)]
    package: String,

    /// Android launcher helper executable
    #[arg(long, env = "SONA_LAUNCHER", default_value = DEFAULT_LAUNCHER_PROGRAM)]
    launcher: String,

    /// pgrep executable
    #[arg(long, env = "SONA_PGREP", default_value = DEFAULT_PGREP_PROGRAM)]
    pgrep: String,

    /// Kill helper processes after this many milliseconds (default: wait forever)
    #[arg(long, env = "SONA_PROBE_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Print reports as JSON lines
    #[arg(long, global = true)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the package is installed
    Installed,

    /// Check whether the package is running
    Running,

    /// Launch the package
    Launch {
        /// Poll until the app reports running
        #[arg(long)]
        wait: bool,
    },

    /// Check installed and running state together
    Status,
}

impl Cli {
    fn probe_config(&self) -> ProbeConfig {
        ProbeConfig::default()
            .with_package_id(&self.package)
            .with_launcher_program(&self.launcher)
            .with_pgrep_program(&self.pgrep)
            .with_timeout(self.timeout_ms.map(Duration::from_millis))
    }
}

/// Wait for `count` reports of any kind, returned in slot order
async fn collect_reports(events: &mut ProbeEvents, count: usize) -> Result<Vec<ProbeReport>> {
    let mut reports = Vec::with_capacity(count);
    while reports.len() < count {
        let report = events
            .recv()
            .await
            .context("Probe stopped before reporting")?;
        reports.push(report);
    }
    reports.sort_by_key(|r| r.kind.index());
    Ok(reports)
}

async fn expect_report(events: &mut ProbeEvents, kind: ProbeKind) -> Result<ProbeReport> {
    events
        .recv_kind(kind)
        .await
        .with_context(|| format!("Probe stopped before reporting {}", kind.notification()))
}

/// Poll the running check until the launched app shows up
async fn wait_until_running(
    probe: &AndroidAppProbe,
    events: &mut ProbeEvents,
) -> Result<ProbeReport> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        tokio::time::sleep(LAUNCH_WAIT_POLL_INTERVAL).await;

        probe.check_running();
        let report = expect_report(events, ProbeKind::CheckRunning).await?;
        if report.success || attempt >= LAUNCH_WAIT_MAX_ATTEMPTS {
            info!(attempts = attempt, running = report.success, "Finished waiting for launch");
            return Ok(report);
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose)?;

    let config = cli.probe_config();
    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    let (probe, mut events) =
        AndroidAppProbe::new(config, runner).context("Failed to create probe")?;

    info!(package = %probe.package_id(), "Sona probe v{}", sona_core::VERSION);

    let reports = match cli.command {
        Commands::Installed => {
            probe.check_installed();
            vec![expect_report(&mut events, ProbeKind::CheckInstalled).await?]
        }

        Commands::Running => {
            probe.check_running();
            vec![expect_report(&mut events, ProbeKind::CheckRunning).await?]
        }

        Commands::Launch { wait } => {
            probe.launch();
            let launched = expect_report(&mut events, ProbeKind::Launch).await?;
            let mut reports = vec![launched];
            if wait && reports[0].success {
                reports.push(wait_until_running(&probe, &mut events).await?);
            }
            reports
        }

        Commands::Status => {
            probe.check_installed();
            probe.check_running();
            collect_reports(&mut events, 2).await?
        }
    };

    output::print_reports(probe.package_id(), &reports, cli.json)?;

    if reports.iter().all(|r| r.success) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
