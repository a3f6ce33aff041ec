//! Time-ordered event queue with stable FIFO tie-breaking.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::clock::Minutes;

/// Opaque handle to a process registered with the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessId(pub(crate) usize);

impl ProcessId {
    /// Index of the process in the scheduler's process table.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A scheduled resume of one process at a future virtual time.
///
/// Ordered by `fire_time`, ties broken by `seq` (insertion order), which
/// makes dispatch deterministic: events scheduled for identical times fire
/// in the order they were originally scheduled.
#[derive(Debug, Clone, Copy)]
pub struct ScheduledEvent {
    /// Virtual time at which the process resumes.
    pub fire_time: Minutes,
    /// Global insertion sequence number.
    pub seq: u64,
    /// The process to resume.
    pub pid: ProcessId,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    /// Reversed comparison so that `BinaryHeap` behaves as a min-heap:
    /// earliest fire time first, lowest sequence number first on ties.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .fire_time
            .total_cmp(&self.fire_time)
            .then(other.seq.cmp(&self.seq))
    }
}

/// Priority queue of pending events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
    next_seq: u64,
}

impl EventQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// Inserts a resume for `pid` at `fire_time`, stamping the next
    /// sequence number.
    pub fn push(&mut self, fire_time: Minutes, pid: ProcessId) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(ScheduledEvent {
            fire_time,
            seq,
            pid,
        });
    }

    /// Removes and returns the earliest event.
    pub fn pop(&mut self) -> Option<ScheduledEvent> {
        self.heap.pop()
    }

    /// Fire time of the earliest pending event, if any.
    pub fn peek_time(&self) -> Option<Minutes> {
        self.heap.peek().map(|e| e.fire_time)
    }

    /// Returns `true` when no events are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
