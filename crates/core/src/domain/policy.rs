// Result Policies - map a raw process outcome to a boolean result

use super::probe::ProcessOutput;

/// Classifier applied to a completed child process
///
/// One policy per probe kind:
/// - installed check: `StdoutContains(package_id)`
/// - running check: `SuccessWithOutput`
/// - launch: `SuccessOnly`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPolicy {
    /// Normal exit and stdout contains the needle (exit code ignored)
    StdoutContains(String),
    /// Exit code 0 and non-empty stdout after trimming
    SuccessWithOutput,
    /// Normal exit with exit code 0
    SuccessOnly,
}

impl ResultPolicy {
    pub fn classify(&self, output: &ProcessOutput) -> bool {
        if !output.is_normal_exit() {
            return false;
        }

        match self {
            ResultPolicy::StdoutContains(needle) => output.stdout.contains(needle.as_str()),
            ResultPolicy::SuccessWithOutput => {
                output.is_success() && !output.stdout.trim().is_empty()
            }
            ResultPolicy::SuccessOnly => output.is_success(),
        }
    }
}
