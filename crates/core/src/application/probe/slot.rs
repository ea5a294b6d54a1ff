// Per-kind ownership slots for in-flight probe tasks

use tokio::task::JoinHandle;

use crate::domain::ProbeKind;

/// Observable state of one probe slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Running,
}

/// One slot: the current generation and the task holding its child process
///
/// Invariant: a task may only report if its generation is still current.
#[derive(Default)]
struct Slot {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl Slot {
    /// Abort the in-flight task, if any. Returns true if one was running.
    fn discard(&mut self) -> bool {
        self.generation += 1;
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}

/// Slots for every probe kind
#[derive(Default)]
pub(crate) struct SlotTable {
    slots: [Slot; 3],
}

impl SlotTable {
    fn slot(&self, kind: ProbeKind) -> &Slot {
        &self.slots[kind.index()]
    }

    fn slot_mut(&mut self, kind: ProbeKind) -> &mut Slot {
        &mut self.slots[kind.index()]
    }

    /// Discard any prior task of this kind and reserve a new generation
    ///
    /// Returns (generation, whether a prior task was discarded)
    pub(crate) fn begin(&mut self, kind: ProbeKind) -> (u64, bool) {
        let slot = self.slot_mut(kind);
        let discarded = slot.discard();
        (slot.generation, discarded)
    }

    /// Store the task started for `generation`
    pub(crate) fn attach(&mut self, kind: ProbeKind, generation: u64, task: JoinHandle<()>) {
        let slot = self.slot_mut(kind);
        if slot.generation == generation {
            slot.task = Some(task);
        } else {
            task.abort();
        }
    }

    /// Release the slot if `generation` is current. Returns false for stale tasks.
    pub(crate) fn finish(&mut self, kind: ProbeKind, generation: u64) -> bool {
        let slot = self.slot_mut(kind);
        if slot.generation != generation {
            return false;
        }
        slot.task = None;
        true
    }

    pub(crate) fn state(&self, kind: ProbeKind) -> SlotState {
        match self.slot(kind).task {
            Some(_) => SlotState::Running,
            None => SlotState::Idle,
        }
    }

    /// Abort every in-flight task. Returns how many were running.
    pub(crate) fn discard_all(&mut self) -> usize {
        self.slots
            .iter_mut()
            .map(|slot| slot.discard())
            .filter(|discarded| *discarded)
            .count()
    }
}
