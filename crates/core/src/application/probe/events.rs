// Probe result notifications

use tokio::sync::mpsc;

use crate::domain::{ProbeKind, ProbeReport};

pub(crate) type EventSender = mpsc::UnboundedSender<ProbeReport>;

/// Receiver for `installedResult` / `runningResult` / `launchResult`
///
/// Every started operation delivers at most one report. The stream ends
/// (`recv` returns `None`) once the probe is dropped and no task is left.
pub struct ProbeEvents {
    rx: mpsc::UnboundedReceiver<ProbeReport>,
}

impl ProbeEvents {
    pub(crate) fn channel() -> (EventSender, ProbeEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, ProbeEvents { rx })
    }

    /// Wait for the next report of any kind
    pub async fn recv(&mut self) -> Option<ProbeReport> {
        self.rx.recv().await
    }

    /// Wait for the next report of one kind, discarding other kinds
    pub async fn recv_kind(&mut self, kind: ProbeKind) -> Option<ProbeReport> {
        while let Some(report) = self.rx.recv().await {
            if report.kind == kind {
                return Some(report);
            }
        }
        None
    }

    /// Take a report if one is already queued
    pub fn try_recv(&mut self) -> Option<ProbeReport> {
        self.rx.try_recv().ok()
    }
}
