/*!
    Buffer status reporting.

    Components that queue data internally (a demuxer's read-ahead queues, a
    decoder's output queue) expose their occupancy and worker priority
    through [`BufferInfo`] for diagnostics. The producing stage updates a
    [`QueueGauge`] per queue; the [`BufferMonitor`] that handed out the
    gauges answers the queries.

    # Example

    ```ignore
    use sidechannel_buffers::{BufferInfo, BufferMonitor, ThreadPriority};

    let monitor = BufferMonitor::default();
    monitor.set_priority(ThreadPriority::ABOVE_NORMAL);

    let video = monitor.register("video");
    video.push(packet.len());

    // On the statistics overlay
    for (index, status) in monitor.snapshot().buffers.iter().enumerate() {
        println!("{index}: {} samples, {} bytes", status.samples, status.size_bytes);
    }
    ```
*/

pub use sidechannel_types::{Error, Result};

mod monitor;
mod priority;
mod status;

pub use monitor::{BufferLimits, BufferMonitor, QueueGauge};
pub use priority::ThreadPriority;
pub use status::{BufferInfo, BufferStatus, BufferStatusSnapshot};
