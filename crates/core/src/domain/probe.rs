// Probe Domain Model

use serde::{Deserialize, Serialize};

/// Kind of probe request. Each kind owns one independent slot on the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProbeKind {
    CheckInstalled,
    CheckRunning,
    Launch,
}

impl ProbeKind {
    /// All kinds, in slot order
    pub const ALL: [ProbeKind; 3] = [
        ProbeKind::CheckInstalled,
        ProbeKind::CheckRunning,
        ProbeKind::Launch,
    ];

    /// Slot index for this kind
    pub fn index(self) -> usize {
        match self {
            ProbeKind::CheckInstalled => 0,
            ProbeKind::CheckRunning => 1,
            ProbeKind::Launch => 2,
        }
    }

    /// Name of the result notification this kind reports through
    pub fn notification(self) -> &'static str {
        match self {
            ProbeKind::CheckInstalled => "installedResult",
            ProbeKind::CheckRunning => "runningResult",
            ProbeKind::Launch => "launchResult",
        }
    }
}

impl std::fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeKind::CheckInstalled => write!(f, "CHECK_INSTALLED"),
            ProbeKind::CheckRunning => write!(f, "CHECK_RUNNING"),
            ProbeKind::Launch => write!(f, "LAUNCH"),
        }
    }
}

/// External command to run: program plus argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Command line as a single display string (program followed by args)
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// How a child process terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExitKind {
    /// Process called exit; an exit code is available
    NormalExit,
    /// Process was killed by a signal or otherwise crashed
    CrashExit,
}

/// Captured outcome of a completed child process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub exit_kind: ExitKind,
    /// Exit code (only for NormalExit)
    pub exit_code: Option<i32>,
    /// Terminating signal number (only for CrashExit on unix)
    pub signal: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub duration_ms: i64,
}

impl ProcessOutput {
    /// Normal exit with the given code and captured output
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_kind: ExitKind::NormalExit,
            exit_code: Some(code),
            signal: None,
            stdout: stdout.into(),
            stderr: stderr.into(),
            duration_ms: 0,
        }
    }

    /// Abnormal termination (signal / crash)
    pub fn crashed(signal: Option<i32>) -> Self {
        Self {
            exit_kind: ExitKind::CrashExit,
            exit_code: None,
            signal,
            stdout: String::new(),
            stderr: String::new(),
            duration_ms: 0,
        }
    }

    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    pub fn is_normal_exit(&self) -> bool {
        self.exit_kind == ExitKind::NormalExit
    }

    /// Normal exit with code 0
    pub fn is_success(&self) -> bool {
        self.is_normal_exit() && self.exit_code == Some(0)
    }
}
