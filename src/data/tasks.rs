//! Done/todo counters derived from the raw task and event listings.

use crate::source::ProbeResult;

/// Event marker emitted by the agent tool when a task is closed.
pub const CLOSE_MARKER: &str = "task.close";

/// Task counts shown in the task panel title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCounts {
    pub done: usize,
    pub todo: usize,
    /// `done` came from the ceiling heuristic rather than close events.
    pub estimated: bool,
}

impl TaskCounts {
    /// Derive counts from the two listings.
    ///
    /// A failed probe contributes zero. When no close events are visible but
    /// open tasks are, `done` is approximated as `ceiling - todo`; the event
    /// log the tool prints is windowed, so this is only an estimate.
    pub fn derive(tasks: &ProbeResult, events: &ProbeResult, ceiling: usize) -> Self {
        let done = events.text().map_or(0, |t| t.matches(CLOSE_MARKER).count());
        let todo = tasks
            .text()
            .map_or(0, |t| t.to_lowercase().matches("open").count());

        if done == 0 && todo > 0 {
            Self {
                done: ceiling.saturating_sub(todo),
                todo,
                estimated: true,
            }
        } else {
            Self {
                done,
                todo,
                estimated: false,
            }
        }
    }

    /// "12 Done" or "~188 Done" when estimated.
    pub fn done_label(&self) -> String {
        if self.estimated {
            format!("~{} Done", self.done)
        } else {
            format!("{} Done", self.done)
        }
    }
}
