/*!
    Queue gauges and the monitor that reports them.
*/

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use sidechannel_types::{Error, Result};

use crate::{BufferInfo, BufferStatus, ThreadPriority};

/**
    Soft fill limits for each monitored queue.

    Limits only drive [`QueueGauge::is_full`]; the producing stage decides
    what to do about a full queue.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferLimits {
    /// Maximum number of queued samples.
    pub max_samples: usize,
    /// Maximum total queued bytes.
    pub max_bytes: usize,
}

impl BufferLimits {
    pub const DEFAULT_MAX_SAMPLES: usize = 350;
    pub const DEFAULT_MAX_BYTES: usize = 256 * 1024 * 1024;

    /**
        Check that both limits are non-zero.
    */
    pub fn validate(&self) -> Result<()> {
        if self.max_samples == 0 || self.max_bytes == 0 {
            return Err(Error::invalid_argument("buffer limits must be non-zero"));
        }
        Ok(())
    }
}

impl Default for BufferLimits {
    fn default() -> Self {
        Self {
            max_samples: Self::DEFAULT_MAX_SAMPLES,
            max_bytes: Self::DEFAULT_MAX_BYTES,
        }
    }
}

#[derive(Debug)]
struct QueueState {
    label: String,
    samples: AtomicUsize,
    bytes: AtomicUsize,
}

impl QueueState {
    fn status(&self) -> BufferStatus {
        BufferStatus::new(
            self.samples.load(Ordering::Relaxed),
            self.bytes.load(Ordering::Relaxed),
        )
    }
}

/**
    Producer-side handle for one monitored queue.

    The owning stage updates the gauge as it queues and dequeues samples.
    Dropping the gauge removes the queue from the monitor.
*/
#[derive(Debug)]
pub struct QueueGauge {
    state: Arc<QueueState>,
    limits: BufferLimits,
}

impl QueueGauge {
    /**
        Record one sample of `bytes` entering the queue.
    */
    pub fn push(&self, bytes: usize) {
        self.state.samples.fetch_add(1, Ordering::Relaxed);
        self.state.bytes.fetch_add(bytes, Ordering::Relaxed);
    }

    /**
        Record one sample of `bytes` leaving the queue.

        Counts saturate at zero.
    */
    pub fn pop(&self, bytes: usize) {
        saturating_sub(&self.state.samples, 1);
        saturating_sub(&self.state.bytes, bytes);
    }

    /**
        Overwrite both counts, e.g. after the producer recounts its queue.
    */
    pub fn set(&self, samples: usize, bytes: usize) {
        self.state.samples.store(samples, Ordering::Relaxed);
        self.state.bytes.store(bytes, Ordering::Relaxed);
    }

    /**
        Reset both counts to zero, e.g. after a flush.
    */
    pub fn clear(&self) {
        trace!(queue = %self.state.label, "queue cleared");
        self.set(0, 0);
    }

    /**
        Current occupancy.
    */
    pub fn status(&self) -> BufferStatus {
        self.state.status()
    }

    /**
        Returns true if either count has reached its limit.
    */
    pub fn is_full(&self) -> bool {
        let status = self.status();
        status.samples >= self.limits.max_samples || status.size_bytes >= self.limits.max_bytes
    }

    /**
        Label the queue was registered with.
    */
    pub fn label(&self) -> &str {
        &self.state.label
    }
}

impl Drop for QueueGauge {
    fn drop(&mut self) {
        debug!(queue = %self.state.label, "queue released");
    }
}

fn saturating_sub(counter: &AtomicUsize, amount: usize) {
    // The closure always returns Some, so this never fails
    let _ = counter.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |value| {
        Some(value.saturating_sub(amount))
    });
}

/**
    Tracks the queues of one component and reports them through [`BufferInfo`].

    Queues are reported in registration order. A queue whose gauge has been
    dropped disappears from the report, shifting later indices down.
*/
#[derive(Debug)]
pub struct BufferMonitor {
    queues: Mutex<Vec<Weak<QueueState>>>,
    priority: AtomicI32,
    limits: BufferLimits,
}

impl BufferMonitor {
    /**
        Create a monitor with the given limits and normal worker priority.
    */
    pub fn new(limits: BufferLimits) -> Self {
        Self {
            queues: Mutex::new(Vec::new()),
            priority: AtomicI32::new(ThreadPriority::NORMAL.0),
            limits,
        }
    }

    /**
        Register a new queue and return its gauge.
    */
    pub fn register(&self, label: impl Into<String>) -> QueueGauge {
        let state = Arc::new(QueueState {
            label: label.into(),
            samples: AtomicUsize::new(0),
            bytes: AtomicUsize::new(0),
        });
        debug!(queue = %state.label, "queue registered");
        let mut queues = self.queues.lock();
        queues.retain(|queue| queue.strong_count() > 0);
        queues.push(Arc::downgrade(&state));
        QueueGauge {
            state,
            limits: self.limits,
        }
    }

    /**
        Record the priority the buffering worker runs at.
    */
    pub fn set_priority(&self, priority: ThreadPriority) {
        self.priority.store(priority.0, Ordering::Relaxed);
    }

    /**
        The limits handed to new gauges.
    */
    pub fn limits(&self) -> BufferLimits {
        self.limits
    }

    /**
        Labels of the live queues, in index order.
    */
    pub fn labels(&self) -> Vec<String> {
        self.live().iter().map(|state| state.label.clone()).collect()
    }

    fn live(&self) -> Vec<Arc<QueueState>> {
        let mut queues = self.queues.lock();
        queues.retain(|queue| queue.strong_count() > 0);
        queues.iter().filter_map(Weak::upgrade).collect()
    }
}

impl Default for BufferMonitor {
    fn default() -> Self {
        Self::new(BufferLimits::default())
    }
}

impl BufferInfo for BufferMonitor {
    fn buffer_count(&self) -> usize {
        let mut queues = self.queues.lock();
        queues.retain(|queue| queue.strong_count() > 0);
        queues.len()
    }

    fn buffer_status(&self, index: usize) -> Result<BufferStatus> {
        let mut queues = self.queues.lock();
        queues.retain(|queue| queue.strong_count() > 0);
        let count = queues.len();
        queues
            .get(index)
            .and_then(Weak::upgrade)
            .map(|state| state.status())
            .ok_or_else(|| Error::out_of_range(index, count))
    }

    fn priority(&self) -> ThreadPriority {
        ThreadPriority(self.priority.load(Ordering::Relaxed))
    }
}

static_assertions::assert_impl_all!(BufferMonitor: Send, Sync, BufferInfo);
static_assertions::assert_impl_all!(QueueGauge: Send, Sync);

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn gauges_report_through_monitor() {
        let monitor = BufferMonitor::default();
        let video = monitor.register("video");
        let audio = monitor.register("audio");

        video.push(1000);
        video.push(500);
        audio.push(200);
        video.pop(1000);

        assert_eq!(monitor.buffer_count(), 2);
        assert_eq!(monitor.buffer_status(0).unwrap(), BufferStatus::new(1, 500));
        assert_eq!(monitor.buffer_status(1).unwrap(), BufferStatus::new(1, 200));
        assert_eq!(monitor.labels(), vec!["video", "audio"]);
    }

    #[test]
    fn status_past_count_is_out_of_range() {
        let monitor = BufferMonitor::default();
        assert!(monitor.buffer_status(0).unwrap_err().is_out_of_range());
        let _gauge = monitor.register("video");
        assert!(monitor.buffer_status(1).unwrap_err().is_out_of_range());
        assert!(monitor.buffer_status(usize::MAX).unwrap_err().is_out_of_range());
    }

    #[test]
    fn dropped_gauge_disappears() {
        let monitor = BufferMonitor::default();
        let first = monitor.register("first");
        let second = monitor.register("second");
        second.push(10);

        let stale_count = monitor.buffer_count();
        drop(first);

        assert_eq!(stale_count, 2);
        assert!(monitor.buffer_status(1).unwrap_err().is_out_of_range());
        assert_eq!(monitor.buffer_status(0).unwrap(), BufferStatus::new(1, 10));
        assert_eq!(monitor.buffer_count(), 1);
    }

    #[test]
    fn pop_saturates_at_zero() {
        let monitor = BufferMonitor::default();
        let gauge = monitor.register("q");
        gauge.push(10);
        gauge.pop(100);
        gauge.pop(0);
        assert_eq!(gauge.status(), BufferStatus::new(0, 0));
    }

    #[test]
    fn set_and_clear() {
        let monitor = BufferMonitor::default();
        let gauge = monitor.register("q");
        gauge.set(12, 3400);
        assert_eq!(gauge.status(), BufferStatus::new(12, 3400));
        gauge.clear();
        assert_eq!(gauge.status(), BufferStatus::default());
    }

    #[test]
    fn full_by_samples_or_bytes() {
        let monitor = BufferMonitor::new(BufferLimits {
            max_samples: 2,
            max_bytes: 1000,
        });
        let gauge = monitor.register("q");
        gauge.push(10);
        assert!(!gauge.is_full());
        gauge.push(10);
        assert!(gauge.is_full());

        gauge.clear();
        gauge.push(1000);
        assert!(gauge.is_full());
    }

    #[test]
    fn priority_round_trip() {
        let monitor = BufferMonitor::default();
        assert_eq!(monitor.priority(), ThreadPriority::NORMAL);
        monitor.set_priority(ThreadPriority::ABOVE_NORMAL);
        assert_eq!(monitor.priority(), ThreadPriority::ABOVE_NORMAL);
        assert_eq!(monitor.snapshot().priority, ThreadPriority::ABOVE_NORMAL);
    }

    #[test]
    fn limits_validation() {
        assert!(BufferLimits::default().validate().is_ok());
        let limits = BufferLimits {
            max_samples: 0,
            max_bytes: 1,
        };
        assert!(limits.validate().is_err());
    }

    #[test]
    fn concurrent_producers_and_poller() {
        let monitor = Arc::new(BufferMonitor::default());
        let producers: Vec<_> = (0..4)
            .map(|i| {
                let monitor = Arc::clone(&monitor);
                thread::spawn(move || {
                    let gauge = monitor.register(format!("queue-{i}"));
                    for _ in 0..1000 {
                        gauge.push(8);
                        gauge.pop(8);
                    }
                })
            })
            .collect();

        for _ in 0..1000 {
            let count = monitor.buffer_count();
            for index in 0..count + 1 {
                // Never panics, stale indices just fail
                let _ = monitor.buffer_status(index);
            }
            let snapshot = monitor.snapshot();
            assert!(snapshot.buffer_count() <= 4);
        }

        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(monitor.buffer_count(), 0);
    }
}
