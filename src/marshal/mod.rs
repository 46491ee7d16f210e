//! Marshaling queue between command producers and the processing context.
//!
//! Any thread may enqueue a [`TrackerEvent`] through a [`MarshalSender`];
//! only the processing context holds the [`MarshalReceiver`] and drains it
//! between frames. The queue is a single unbounded FIFO, so work enqueued
//! by one producer is executed in the order it was enqueued and nothing is
//! dropped while the consumer is alive. Ordering between different
//! producers follows whatever order their enqueues happened to land in.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;

use crate::domain::Origin;
use crate::error::ControlError;
use crate::subsystem::TrackerEvent;

/// One unit of marshaled work.
#[derive(Debug, Clone)]
pub struct WorkItem {
    /// Who raised the event.
    pub origin: Origin,
    /// The raised event.
    pub event: TrackerEvent,
    /// When the event entered the queue.
    pub enqueued_at: Instant,
}

impl WorkItem {
    /// Time spent waiting in the queue so far.
    #[must_use]
    pub fn queued_for(&self) -> Duration {
        self.enqueued_at.elapsed()
    }
}

/// Creates a connected sender/receiver pair.
#[must_use]
pub fn channel() -> (MarshalSender, MarshalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        MarshalSender { tx },
        MarshalReceiver { rx, closed: false },
    )
}

/// Thread-safe producer side. Cheap to clone.
#[derive(Debug, Clone)]
pub struct MarshalSender {
    tx: mpsc::UnboundedSender<WorkItem>,
}

impl MarshalSender {
    /// Enqueues `event` for execution in the processing context.
    ///
    /// Never blocks.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::QueueClosed`] if the receiver was dropped.
    pub fn enqueue(&self, origin: Origin, event: TrackerEvent) -> Result<(), ControlError> {
        self.tx
            .send(WorkItem {
                origin,
                event,
                enqueued_at: Instant::now(),
            })
            .map_err(|_| ControlError::QueueClosed)
    }

    /// Returns `true` once the processing context has gone away.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Single-consumer side, owned by the processing context.
#[derive(Debug)]
pub struct MarshalReceiver {
    rx: mpsc::UnboundedReceiver<WorkItem>,
    closed: bool,
}

impl MarshalReceiver {
    /// Removes up to `budget` queued items in FIFO order without waiting.
    ///
    /// A `budget` of zero drains everything currently queued. Items beyond
    /// the budget stay queued for the next call.
    pub fn drain(&mut self, budget: usize) -> Vec<WorkItem> {
        let limit = if budget == 0 { usize::MAX } else { budget };
        let mut items = Vec::new();

        while items.len() < limit {
            match self.rx.try_recv() {
                Ok(item) => items.push(item),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.closed = true;
                    break;
                }
            }
        }

        items
    }

    /// Returns `true` once a drain observed that every sender is gone and
    /// nothing is left to execute.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
