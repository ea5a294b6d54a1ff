// Command Runner Port
// Abstraction for running one external command to completion

use crate::domain::{Invocation, ProcessOutput};
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised before a process could run to completion
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("IO error: {0}")]
    Io(String),
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner (infra-system): spawns a real child process
/// - MockCommandRunner: scripted outcomes for tests
///
/// Cancellation contract: dropping the future returned by `run` must
/// terminate the child process it owns.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation and capture its outcome
    ///
    /// # Errors
    /// - ProbeError::SpawnFailed if the executable cannot be started
    /// - ProbeError::Io if waiting on the child failed
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProbeError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock runner behavior for one call
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit normally with code and stdout
        Exit { code: i32, stdout: String },
        /// Terminated by signal
        Crash(Option<i32>),
        /// Fail to spawn with message
        SpawnFail(String),
        /// Never complete (until dropped)
        Hang,
        /// Sleep, then behave as the inner behavior
        Delay(Duration, Box<MockBehavior>),
    }

    impl MockBehavior {
        pub fn exit(code: i32, stdout: impl Into<String>) -> Self {
            MockBehavior::Exit {
                code,
                stdout: stdout.into(),
            }
        }

        pub fn delayed(self, delay: Duration) -> Self {
            MockBehavior::Delay(delay, Box::new(self))
        }
    }

    /// Counts runs that were dropped before completing
    struct CancelGuard {
        cancelled: Arc<AtomicUsize>,
        armed: bool,
    }

    impl Drop for CancelGuard {
        fn drop(&mut self) {
            if self.armed {
                self.cancelled.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    /// Mock Command Runner
    ///
    /// Behaviors are scripted per command line (`program arg1 arg2`) and
    /// consumed in FIFO order; the last one repeats once the queue drains.
    /// Unscripted commands fail to spawn.
    #[derive(Default)]
    pub struct MockCommandRunner {
        scripts: Mutex<HashMap<String, VecDeque<MockBehavior>>>,
        calls: Mutex<Vec<Invocation>>,
        cancelled: Arc<AtomicUsize>,
    }

    impl MockCommandRunner {
        pub fn new() -> Self {
            Self::default()
        }

        /// Script the next outcome for a command line
        pub fn on(self, command_line: &str, behavior: MockBehavior) -> Self {
            self.scripts
                .lock()
                .unwrap()
                .entry(command_line.to_string())
                .or_default()
                .push_back(behavior);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }

        /// Number of runs dropped before they completed
        pub fn cancelled_count(&self) -> usize {
            self.cancelled.load(Ordering::SeqCst)
        }

        fn next_behavior(&self, invocation: &Invocation) -> MockBehavior {
            let mut scripts = self.scripts.lock().unwrap();
            match scripts.get_mut(&invocation.command_line()) {
                Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
                Some(queue) if !queue.is_empty() => queue[0].clone(),
                _ => MockBehavior::SpawnFail(format!("{}: not scripted", invocation.program)),
            }
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ProbeError> {
            self.calls.lock().unwrap().push(invocation.clone());
            let mut behavior = self.next_behavior(invocation);

            let mut guard = CancelGuard {
                cancelled: Arc::clone(&self.cancelled),
                armed: true,
            };

            let result = loop {
                match behavior {
                    MockBehavior::Exit { code, stdout } => {
                        break Ok(ProcessOutput::exited(code, stdout, ""));
                    }
                    MockBehavior::Crash(signal) => break Ok(ProcessOutput::crashed(signal)),
                    MockBehavior::SpawnFail(msg) => break Err(ProbeError::SpawnFailed(msg)),
                    MockBehavior::Hang => break std::future::pending().await,
                    MockBehavior::Delay(delay, inner) => {
                        tokio::time::sleep(delay).await;
                        behavior = *inner;
                    }
                }
            };

            guard.armed = false;
            result
        }
    }
}
