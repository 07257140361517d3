//! Virtual-time cooperative scheduler
//!
//! Time only moves when the owner calls `pop_due` with a later limit, which
//! keeps sessions deterministic under test.

use super::{Scheduler, TaskHandle};
use crate::sim::Task;

#[derive(Debug, Clone)]
struct Entry {
    handle: TaskHandle,
    task: Task,
    due_ms: u64,
    period_ms: u32,
}

/// Scheduled tasks ordered by due time, ties broken by scheduling order
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    entries: Vec<Entry>,
    now_ms: u64,
    next_handle: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of scheduled tasks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a handle is still scheduled
    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Scheduled tasks matching a predicate
    pub fn count_matching(&self, mut pred: impl FnMut(&Task) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.task)).count()
    }

    /// Pop the next task due at or before `limit_ms`
    ///
    /// Recurring tasks are re-armed before being returned, so a callback that
    /// cancels itself removes the re-armed entry. When nothing is due the
    /// clock jumps to `limit_ms`.
    pub fn pop_due(&mut self, limit_ms: u64) -> Option<Task> {
        let index = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= limit_ms)
            .min_by_key(|(_, e)| (e.due_ms, e.handle))
            .map(|(i, _)| i);

        let Some(index) = index else {
            self.now_ms = self.now_ms.max(limit_ms);
            return None;
        };

        let entry = &mut self.entries[index];
        self.now_ms = self.now_ms.max(entry.due_ms);
        let task = entry.task;
        if entry.period_ms == 0 {
            self.entries.swap_remove(index);
        } else {
            entry.due_ms += u64::from(entry.period_ms);
        }
        Some(task)
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&mut self, task: Task, delay_ms: u32, period_ms: u32) -> TaskHandle {
        self.next_handle += 1;
        let handle = TaskHandle::from_raw(self.next_handle);
        self.entries.push(Entry {
            handle,
            task,
            due_ms: self.now_ms + u64::from(delay_ms),
            period_ms,
        });
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(index) => {
                self.entries.swap_remove(index);
                true
            }
            None => false,
        }
    }
}
