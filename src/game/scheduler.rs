//! Virtual-clock task queue.
//!
//! The worker has no timers of its own: the host page reports a monotonic
//! clock (milliseconds) and the controller calls [`Scheduler::pop_due`] until
//! nothing is due. Every scheduled task gets a [`TaskHandle`] that cancels it.
//!
//! Ordering: earliest due time first, ties broken by scheduling order.
//! Repeating tasks re-arm at `due + period`, so a host that reports the
//! clock late still observes every firing.

/// The callbacks a round can have pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// One second of round time elapsed.
    RoundTick,
    /// Time to show a new target.
    SpawnTick,
    /// The visible target's window closed.
    HideTarget,
    /// The post-hit click cooldown ended.
    RestoreClick,
}

/// Cancellation handle for a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone)]
struct Entry {
    handle: TaskHandle,
    // scheduling order, refreshed when a repeating task re-arms
    seq: u64,
    due: u64,
    period: Option<u64>,
    task: Task,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` once, `delay` ms after `now`.
    pub fn schedule_once(&mut self, now: u64, delay: u64, task: Task) -> TaskHandle {
        self.push(now.saturating_add(delay), None, task)
    }

    /// Run `task` every `period` ms, first at `now + period`.
    pub fn schedule_every(&mut self, now: u64, period: u64, task: Task) -> TaskHandle {
        let period = period.max(1);
        self.push(now.saturating_add(period), Some(period), task)
    }

    fn push(&mut self, due: u64, period: Option<u64>, task: Task) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            handle,
            seq,
            due,
            period,
            task,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a pending task. Returns false if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Take the earliest task due at or before `now`, along with the time it
    /// was due. One-shot tasks are removed; repeating tasks keep their handle
    /// and move to the next period.
    pub fn pop_due(&mut self, now: u64) -> Option<(TaskHandle, Task, u64)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;

        let entry = &self.entries[idx];
        let fired = (entry.handle, entry.task, entry.due);
        match self.entries[idx].period {
            Some(period) => {
                // re-armed tasks queue behind anything already due at the same time
                let seq = self.bump_seq();
                let entry = &mut self.entries[idx];
                entry.due = entry.due.saturating_add(period);
                entry.seq = seq;
            }
            None => {
                self.entries.swap_remove(idx);
            }
        }
        Some(fired)
    }
}
