// Sona Infrastructure - System Adapters
// Implements: CommandRunner

pub mod process;
pub mod subprocess_runner;

pub use process::{is_alive, signal_name};
pub use subprocess_runner::SubprocessRunner;
