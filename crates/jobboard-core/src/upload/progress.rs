use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// Rounded completion percentage in `0..=100`.
///
/// An unknown or zero total counts as 1 byte so the division is always
/// defined.
pub fn percent_complete(bytes_sent: u64, bytes_total: u64) -> u8 {
    let total = bytes_total.max(1);
    let percent = (bytes_sent.saturating_mul(100).saturating_add(total / 2)) / total;
    percent.min(100) as u8
}

type ProgressCallback = Box<dyn Fn(u8) + Send + Sync>;

/// Counts bytes handed to the transport and reports percentages.
///
/// Reported values never decrease; a value equal to the last one is not
/// reported again.
pub(crate) struct ProgressCounter {
    total: u64,
    sent: AtomicU64,
    percent: Arc<AtomicU8>,
    callback: ProgressCallback,
}

impl ProgressCounter {
    pub(crate) fn new(total: u64, percent: Arc<AtomicU8>, callback: ProgressCallback) -> Self {
        Self {
            total,
            sent: AtomicU64::new(0),
            percent,
            callback,
        }
    }

    /// Emit the starting value
    pub(crate) fn start(&self) {
        (self.callback)(self.percent.load(Ordering::SeqCst));
    }

    pub(crate) fn record(&self, bytes: usize) {
        let sent = self.sent.fetch_add(bytes as u64, Ordering::SeqCst) + bytes as u64;
        self.report(percent_complete(sent, self.total));
    }

    /// The backend accepted the upload
    pub(crate) fn complete(&self) {
        self.report(100);
    }

    fn report(&self, percent: u8) {
        let previous = self.percent.fetch_max(percent, Ordering::SeqCst);
        if percent > previous {
            (self.callback)(percent);
        }
    }
}
