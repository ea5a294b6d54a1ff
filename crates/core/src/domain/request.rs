// Probe Request - what to run for one probe kind and how to judge it

use super::policy::ResultPolicy;
use super::probe::{Invocation, ProbeKind, ProcessOutput};

/// Fully resolved probe request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub kind: ProbeKind,
    pub invocation: Invocation,
    pub policy: ResultPolicy,
}

impl ProbeRequest {
    pub fn new(kind: ProbeKind, invocation: Invocation, policy: ResultPolicy) -> Self {
        Self {
            kind,
            invocation,
            policy,
        }
    }

    /// Apply this request's policy to a completed process
    pub fn classify(&self, output: &ProcessOutput) -> bool {
        self.policy.classify(output)
    }
}
