// Subprocess runner implementation
// reason: async-trait, tokio for async process management
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, warn};

use sona_core::application::constants::DEFAULT_ENV_ALLOWLIST;
use sona_core::domain::{Invocation, ProcessOutput};
use sona_core::port::{CommandRunner, ProbeError, TimeProvider};

use crate::process::signal_name;

/// Subprocess runner
///
/// Spawns each invocation, captures stdout/stderr, and owns the child until
/// it exits. The child is killed if the `run` future is dropped first.
///
/// Children inherit the parent environment unless an allowlist is set with
/// `with_env_allowlist`, in which case they only see allowlisted variables.
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Option<Vec<String>>,
}

impl SubprocessRunner {
    /// Create a new subprocess runner inheriting the full parent environment
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(Arc::new(SystemTimeProvider))
    ///     .with_env_allowlist(vec!["PATH".to_string()]);
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            env_allowlist: None,
        }
    }

    /// Restrict children to a cleared environment plus `allowlist`
    pub fn with_env_allowlist(mut self, allowlist: Vec<String>) -> Self {
        self.env_allowlist = Some(allowlist);
        self
    }

    /// Restrict children to `DEFAULT_ENV_ALLOWLIST` (PATH, HOME, D-Bus, ...)
    pub fn with_default_env_allowlist(self) -> Self {
        self.with_env_allowlist(DEFAULT_ENV_ALLOWLIST.iter().map(|s| s.to_string()).collect())
    }

    /// Keep only allowlisted variables (everything when no allowlist is set)
    fn filter_env<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter(|(k, _)| match &self.env_allowlist {
                Some(allowlist) => allowlist.contains(k),
                None => true,
            })
            .collect()
    }

    /// Spawn child process and wait for output
    async fn spawn_and_wait(
        &self,
        invocation: &Invocation,
    ) -> Result<std::process::Output, ProbeError> {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args);

        if self.env_allowlist.is_some() {
            // Non-UTF-8 variables are never passed through a filtered environment
            let env = self.filter_env(
                std::env::vars_os()
                    .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
            );
            cmd.env_clear().envs(&env);
        }

        let child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProbeError::SpawnFailed(format!("{}: {}", invocation.program, e)))?;

        debug!(command = %invocation, pid = ?child.id(), "Spawned probe process");

        child
            .wait_with_output()
            .await
            .map_err(|e| ProbeError::Io(e.to_string()))
    }

    /// Build process output from the raw std output
    fn build_output(&self, output: std::process::Output, duration_ms: i64) -> ProcessOutput {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        let result = match output.status.code() {
            Some(code) => ProcessOutput::exited(code, stdout, stderr),
            None => {
                let mut crashed = ProcessOutput::crashed(terminating_signal(&output.status));
                crashed.stdout = stdout;
                crashed.stderr = stderr;
                crashed
            }
        };
        result.with_duration(duration_ms)
    }
}

#[cfg(unix)]
fn terminating_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn terminating_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProbeError> {
        let start_time = self.time_provider.now_millis();

        let output = match self.spawn_and_wait(invocation).await {
            Ok(output) => output,
            Err(e) => {
                warn!(command = %invocation, error = %e, "Probe process could not run");
                return Err(e);
            }
        };

        let duration_ms = self.time_provider.now_millis() - start_time;
        let result = self.build_output(output, duration_ms);

        if let Some(signal) = result.signal {
            warn!(
                command = %invocation,
                signal = signal,
                signal_name = signal_name(signal).unwrap_or("unknown"),
                "Probe process terminated by signal"
            );
        }

        debug!(
            command = %invocation,
            duration_ms = duration_ms,
            exit_code = ?result.exit_code,
            "Probe process exited"
        );

        Ok(result)
    }
}
