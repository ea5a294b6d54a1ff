// Domain Layer - Probe entities and result policies

pub mod policy;
pub mod probe;
pub mod report;
pub mod request;

// Re-exports
pub use policy::ResultPolicy;
pub use probe::{ExitKind, Invocation, ProbeKind, ProcessOutput};
pub use report::{ProbeFailure, ProbeReport};
pub use request::ProbeRequest;
