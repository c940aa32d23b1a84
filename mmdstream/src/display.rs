//! Display sink: consumes per-update frames from the controller.

use flume::Receiver;
use std::thread;
use tracing::info;

/// One update's view of the run, ready for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    /// Photon counts per bin.
    pub bins: Vec<u64>,
    /// Bin edges in ns; `bins.len() + 1` values, for step-mode plots.
    pub edges: Vec<f64>,
    /// Status line shown above the histogram.
    pub status: String,
    pub stopped: bool,
}

/// Spawn the sink thread. Stands in for the plot widget: one summary
/// log line per frame. Returns once the run reports stopped or the
/// controller goes away.
pub fn main(rx: Receiver<DisplayFrame>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(frame) = rx.recv() {
            let total: u64 = frame.bins.iter().sum();
            let peak_bin = frame
                .bins
                .iter()
                .enumerate()
                .max_by_key(|&(_, &count)| count)
                .map(|(i, _)| i)
                .unwrap_or(0);
            info!(
                total,
                peak_bin,
                stopped = frame.stopped,
                status = %frame.status,
                "histogram",
            );
            if frame.stopped {
                break;
            }
        }
    })
}
