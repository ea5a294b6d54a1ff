// AndroidAppProbe - installed / running / launch checks for an Android package

mod events;
mod slot;

pub use events::ProbeEvents;
pub use slot::SlotState;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use events::EventSender;
use slot::SlotTable;

use crate::application::config::ProbeConfig;
use crate::domain::{ProbeFailure, ProbeKind, ProbeReport, ProbeRequest, ProcessOutput};
use crate::error::{AppError, Result};
use crate::port::time_provider::SystemTimeProvider;
use crate::port::{CommandRunner, ProbeError, TimeProvider};

/// Probe for one Android package, driven through external helper tools
///
/// Each `ProbeKind` owns one slot. Requesting a kind that is already in
/// flight terminates the previous child first (last request wins). Results
/// arrive on the `ProbeEvents` returned by `new`. Dropping the probe
/// terminates every in-flight child without reporting.
pub struct AndroidAppProbe {
    config: ProbeConfig,
    runner: Arc<dyn CommandRunner>,
    time_provider: Arc<dyn TimeProvider>,
    slots: Arc<Mutex<SlotTable>>,
    events: EventSender,
    runtime: Handle,
}

impl AndroidAppProbe {
    /// Create a probe bound to the current tokio runtime
    ///
    /// # Errors
    /// - AppError::Config if the configuration is invalid
    /// - AppError::Runtime if called outside a tokio runtime
    pub fn new(
        config: ProbeConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Result<(Self, ProbeEvents)> {
        Self::with_time_provider(config, runner, Arc::new(SystemTimeProvider))
    }

    pub fn with_time_provider(
        config: ProbeConfig,
        runner: Arc<dyn CommandRunner>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Result<(Self, ProbeEvents)> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|e| AppError::Runtime(e.to_string()))?;
        let (events, receiver) = ProbeEvents::channel();

        let probe = Self {
            config,
            runner,
            time_provider,
            slots: Arc::new(Mutex::new(SlotTable::default())),
            events,
            runtime,
        };
        Ok((probe, receiver))
    }

    pub fn package_id(&self) -> &str {
        &self.config.package_id
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Check whether the package is installed (reports `installedResult`)
    pub fn check_installed(&self) {
        self.request(ProbeKind::CheckInstalled);
    }

    /// Check whether the package is running (reports `runningResult`)
    pub fn check_running(&self) {
        self.request(ProbeKind::CheckRunning);
    }

    /// Launch the package (reports `launchResult`)
    pub fn launch(&self) {
        self.request(ProbeKind::Launch);
    }

    /// Start a probe of `kind`, discarding any in-flight probe of the same kind
    pub fn request(&self, kind: ProbeKind) {
        let request = self.config.request_for(kind);
        info!(
            kind = %kind,
            package = %self.config.package_id,
            command = %request.invocation,
            "Starting probe"
        );

        let mut slots = lock_slots(&self.slots);
        let (generation, discarded) = slots.begin(kind);
        if discarded {
            warn!(kind = %kind, "Discarded in-flight probe, last request wins");
        }

        let task = ProbeTask {
            runner: Arc::clone(&self.runner),
            time_provider: Arc::clone(&self.time_provider),
            slots: Arc::clone(&self.slots),
            events: self.events.clone(),
            timeout: self.config.timeout,
        };
        let handle = self.runtime.spawn(task.run(request, generation));
        slots.attach(kind, generation, handle);
    }

    /// Current state of the slot for `kind`
    pub fn state(&self, kind: ProbeKind) -> SlotState {
        lock_slots(&self.slots).state(kind)
    }
}

impl Drop for AndroidAppProbe {
    fn drop(&mut self) {
        let discarded = lock_slots(&self.slots).discard_all();
        if discarded > 0 {
            debug!(discarded = discarded, "Probe dropped, terminated in-flight probes");
        }
    }
}

fn lock_slots(slots: &Mutex<SlotTable>) -> MutexGuard<'_, SlotTable> {
    slots.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Everything a spawned probe task needs, detached from the probe itself
struct ProbeTask {
    runner: Arc<dyn CommandRunner>,
    time_provider: Arc<dyn TimeProvider>,
    slots: Arc<Mutex<SlotTable>>,
    events: EventSender,
    timeout: Option<Duration>,
}

impl ProbeTask {
    /// spawn -> await completion -> classify -> emit once -> release
    async fn run(self, request: ProbeRequest, generation: u64) {
        let kind = request.kind;
        let outcome = self.execute(&request).await;
        let report = build_report(&request, outcome, self.time_provider.now_millis());
        log_report(&request, &report);

        // Emit under the slot lock so a concurrent re-request cannot interleave
        let mut slots = lock_slots(&self.slots);
        if !slots.finish(kind, generation) {
            debug!(kind = %kind, generation = generation, "Dropping result of discarded probe");
            return;
        }
        if self.events.send(report).is_err() {
            debug!(kind = %kind, "No listener for probe result");
        }
    }

    async fn execute(
        &self,
        request: &ProbeRequest,
    ) -> std::result::Result<ProcessOutput, ProbeFailure> {
        let run = self.runner.run(&request.invocation);
        match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, run).await {
                Ok(result) => result.map_err(failure_from_error),
                Err(_) => Err(ProbeFailure::Timeout {
                    timeout_ms: saturating_millis(limit),
                }),
            },
            None => run.await.map_err(failure_from_error),
        }
    }
}

fn saturating_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn failure_from_error(err: ProbeError) -> ProbeFailure {
    match err {
        ProbeError::SpawnFailed(message) => ProbeFailure::SpawnFailure { message },
        ProbeError::Io(_) => ProbeFailure::AbnormalExit { signal: None },
    }
}

fn build_report(
    request: &ProbeRequest,
    outcome: std::result::Result<ProcessOutput, ProbeFailure>,
    finished_at: i64,
) -> ProbeReport {
    match outcome {
        Ok(output) => {
            let success = request.classify(&output);
            ProbeReport::completed(request.kind, success, output, finished_at)
        }
        Err(failure) => ProbeReport::failed(request.kind, failure, finished_at),
    }
}

fn log_report(request: &ProbeRequest, report: &ProbeReport) {
    if let Some(output) = &report.output {
        debug!(
            kind = %request.kind,
            exit_kind = ?output.exit_kind,
            exit_code = ?output.exit_code,
            signal = ?output.signal,
            stdout = %output.stdout,
            stderr = %output.stderr,
            duration_ms = output.duration_ms,
            "Probe process finished"
        );
    }

    match &report.failure {
        Some(failure @ ProbeFailure::SpawnFailure { .. })
        | Some(failure @ ProbeFailure::AbnormalExit { .. })
        | Some(failure @ ProbeFailure::Timeout { .. }) => warn!(
            kind = %request.kind,
            command = %request.invocation,
            failure = %failure,
            "Probe process failed"
        ),
        _ => {}
    }

    info!(
        kind = %request.kind,
        notification = request.kind.notification(),
        result = report.success,
        "Probe completed"
    );
}
