// Probe configuration

use std::time::Duration;

use super::constants::*;
use crate::domain::{Invocation, ProbeKind, ProbeRequest, ResultPolicy};
use crate::error::{AppError, Result};

/// Target package and helper tools used by `AndroidAppProbe`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    pub package_id: String,
    pub launcher_program: String,
    pub pgrep_program: String,
    /// Kill a probe child after this long (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            package_id: DEFAULT_PACKAGE_ID.to_string(),
            launcher_program: DEFAULT_LAUNCHER_PROGRAM.to_string(),
            pgrep_program: DEFAULT_PGREP_PROGRAM.to_string(),
            timeout: None,
        }
    }
}

impl ProbeConfig {
    pub fn with_package_id(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = package_id.into();
        self
    }

    pub fn with_launcher_program(mut self, program: impl Into<String>) -> Self {
        self.launcher_program = program.into();
        self
    }

    pub fn with_pgrep_program(mut self, program: impl Into<String>) -> Self {
        self.pgrep_program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reject blank package ids, blank program names and zero timeouts
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("package_id", &self.package_id),
            ("launcher_program", &self.launcher_program),
            ("pgrep_program", &self.pgrep_program),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(AppError::Config(format!("{} must not be empty", name)));
            }
        }

        if self.timeout == Some(Duration::ZERO) {
            return Err(AppError::Config("timeout must be greater than zero".to_string()));
        }

        Ok(())
    }

    /// Build the command and result policy for a probe kind
    pub fn request_for(&self, kind: ProbeKind) -> ProbeRequest {
        match kind {
            ProbeKind::CheckInstalled => ProbeRequest::new(
                kind,
                Invocation::new(&self.launcher_program, [LIST_PACKAGES_ARG]),
                ResultPolicy::StdoutContains(self.package_id.clone()),
            ),
            ProbeKind::CheckRunning => ProbeRequest::new(
                kind,
                Invocation::new(
                    &self.pgrep_program,
                    [PGREP_FULL_MATCH_ARG, self.package_id.as_str()],
                ),
                ResultPolicy::SuccessWithOutput,
            ),
            ProbeKind::Launch => ProbeRequest::new(
                kind,
                Invocation::new(&self.launcher_program, [START_ARG, self.package_id.as_str()]),
                ResultPolicy::SuccessOnly,
            ),
        }
    }
}
