// Probe Report - payload of a result notification

use super::probe::{ExitKind, ProbeKind, ProcessOutput};
use serde::{Deserialize, Serialize};

/// Why a probe did not complete with a clean zero exit
///
/// Diagnostic only: the functional result is always `ProbeReport::success`,
/// which is `false` for every failure class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeFailure {
    /// Executable not found or not launchable
    SpawnFailure { message: String },
    /// Child crashed or was killed by a signal
    AbnormalExit { signal: Option<i32> },
    /// Child exited cleanly with a non-zero status
    NonZeroExit { code: i32 },
    /// Child exceeded the configured timeout and was killed
    Timeout { timeout_ms: u64 },
}

impl ProbeFailure {
    /// Failure class of a completed process, if any
    pub fn from_output(output: &ProcessOutput) -> Option<Self> {
        match (output.exit_kind, output.exit_code) {
            (ExitKind::NormalExit, Some(0)) => None,
            (ExitKind::NormalExit, Some(code)) => Some(ProbeFailure::NonZeroExit { code }),
            _ => Some(ProbeFailure::AbnormalExit {
                signal: output.signal,
            }),
        }
    }
}

impl std::fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeFailure::SpawnFailure { message } => write!(f, "spawn failed: {}", message),
            ProbeFailure::AbnormalExit { signal: Some(sig) } => {
                write!(f, "terminated by signal {}", sig)
            }
            ProbeFailure::AbnormalExit { signal: None } => write!(f, "crashed"),
            ProbeFailure::NonZeroExit { code } => write!(f, "exited with code {}", code),
            ProbeFailure::Timeout { timeout_ms } => write!(f, "timed out after {}ms", timeout_ms),
        }
    }
}

/// Result notification for one completed probe operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeReport {
    pub kind: ProbeKind,
    /// Boolean result (installed / running / launched)
    pub success: bool,
    pub failure: Option<ProbeFailure>,
    /// Captured process outcome (None when the process never completed)
    pub output: Option<ProcessOutput>,
    pub finished_at: i64, // epoch ms
}

impl ProbeReport {
    /// Report for a process that ran to completion
    pub fn completed(
        kind: ProbeKind,
        success: bool,
        output: ProcessOutput,
        finished_at: i64,
    ) -> Self {
        Self {
            kind,
            success,
            failure: ProbeFailure::from_output(&output),
            output: Some(output),
            finished_at,
        }
    }

    /// Report for a process that could not be run or was killed on timeout
    pub fn failed(kind: ProbeKind, failure: ProbeFailure, finished_at: i64) -> Self {
        Self {
            kind,
            success: false,
            failure: Some(failure),
            output: None,
            finished_at,
        }
    }

    /// True when the external tool itself could not be executed
    pub fn is_execution_failure(&self) -> bool {
        matches!(
            self.failure,
            Some(ProbeFailure::SpawnFailure { .. }) | Some(ProbeFailure::Timeout { .. })
        )
    }
}
