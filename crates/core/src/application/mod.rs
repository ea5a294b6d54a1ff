// Application Layer - Probe service and configuration

pub mod config;
pub mod constants;
pub mod probe;

// Re-exports
pub use config::ProbeConfig;
pub use probe::{AndroidAppProbe, ProbeEvents, SlotState};
