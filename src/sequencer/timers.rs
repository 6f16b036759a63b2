//! Pending delayed transitions
//!
//! A min-heap of tasks ordered by due time, ties broken by scheduling order.

use crate::sequencer::job::{Capture, JobId};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::Instant;

/// A delayed transition and the press or job it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum TimerTask {
    /// Turn the flash off, if no newer press re-lit it
    ClearFlash {
        /// Press generation that lit the flash
        generation: u64,
    },
    /// Start the print for a press, if no newer press superseded it
    StartPrint {
        /// Press generation that scheduled the print
        generation: u64,
        /// Preset and film captured at the press
        capture: Capture,
    },
    /// Develop a print, if it is still the current one
    Develop {
        /// Job the timer was scheduled for
        job: JobId,
    },
}

#[derive(Debug)]
struct Scheduled {
    due: Instant,
    seq: u64,
    task: TimerTask,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Queue of pending timer tasks
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<Scheduled>>,
    next_seq: u64,
}

impl TimerQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` to fire at `due`
    pub fn schedule(&mut self, due: Instant, task: TimerTask) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Scheduled { due, seq, task }));
    }

    /// Remove and return the earliest task due at or before `now`
    pub fn pop_due(&mut self, now: Instant) -> Option<(Instant, TimerTask)> {
        if self.heap.peek().is_some_and(|Reverse(s)| s.due <= now) {
            self.heap.pop().map(|Reverse(s)| (s.due, s.task))
        } else {
            None
        }
    }

    /// Due time of the earliest pending task
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(s)| s.due)
    }

    /// Number of pending tasks
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Iterate over pending tasks in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &TimerTask> {
        self.heap.iter().map(|Reverse(s)| &s.task)
    }
}
