/*!
    Buffer status contract.
*/

use serde::Serialize;

use sidechannel_types::Result;

use crate::ThreadPriority;

/**
    Occupancy of one internal buffer.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct BufferStatus {
    /// Number of queued samples (packets, frames).
    pub samples: usize,
    /// Total size of the queued samples in bytes.
    pub size_bytes: usize,
}

impl BufferStatus {
    pub const fn new(samples: usize, size_bytes: usize) -> Self {
        Self {
            samples,
            size_bytes,
        }
    }
}

/**
    A point-in-time view of every buffer and the worker priority.

    Queue state is live, so two snapshots may differ arbitrarily.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BufferStatusSnapshot {
    /// Per-buffer occupancy, in buffer index order.
    pub buffers: Vec<BufferStatus>,
    /// Priority of the buffering worker thread.
    pub priority: ThreadPriority,
}

impl BufferStatusSnapshot {
    /**
        Number of buffers in the snapshot.
    */
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    /**
        Samples summed over all buffers.
    */
    pub fn total_samples(&self) -> usize {
        self.buffers.iter().map(|b| b.samples).sum()
    }

    /**
        Bytes summed over all buffers.
    */
    pub fn total_bytes(&self) -> usize {
        self.buffers.iter().map(|b| b.size_bytes).sum()
    }
}

/**
    Read-only diagnostics for a component that queues data internally.

    Polled on demand by external monitors such as a statistics overlay. There
    is no ordering guarantee between [`BufferInfo::buffer_count`] and
    [`BufferInfo::buffer_status`]: buffers may come and go in between, and a
    stale index fails with `OutOfRange`. Nothing here signals backpressure.
*/
pub trait BufferInfo: Send + Sync {
    /**
        Number of buffers currently tracked.
    */
    fn buffer_count(&self) -> usize;

    /**
        Occupancy of buffer `index`, or `OutOfRange`.
    */
    fn buffer_status(&self, index: usize) -> Result<BufferStatus>;

    /**
        Scheduling priority of the buffering worker thread.
    */
    fn priority(&self) -> ThreadPriority;

    /**
        Collect every buffer's status in one pass.

        Stops early if buffers disappear while collecting.
    */
    fn snapshot(&self) -> BufferStatusSnapshot {
        let buffers = (0..self.buffer_count())
            .map_while(|index| self.buffer_status(index).ok())
            .collect();
        BufferStatusSnapshot {
            buffers,
            priority: self.priority(),
        }
    }
}
