use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Session counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub snapshots_applied: Arc<AtomicUsize>,
    pub snapshots_dropped: Arc<AtomicUsize>,
    pub list_resyncs: Arc<AtomicUsize>,
    pub controls_sent: Arc<AtomicUsize>,
    pub thumbnails_fetched: Arc<AtomicUsize>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            snapshots_applied: Arc::new(AtomicUsize::new(0)),
            snapshots_dropped: Arc::new(AtomicUsize::new(0)),
            list_resyncs: Arc::new(AtomicUsize::new(0)),
            controls_sent: Arc::new(AtomicUsize::new(0)),
            thumbnails_fetched: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_snapshots_applied(&self) {
        self.snapshots_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshots_dropped(&self) {
        self.snapshots_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_list_resyncs(&self) {
        self.list_resyncs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_controls_sent(&self) {
        self.controls_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_thumbnails_fetched(&self) {
        self.thumbnails_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_applied: self.snapshots_applied.load(Ordering::Relaxed),
            snapshots_dropped: self.snapshots_dropped.load(Ordering::Relaxed),
            list_resyncs: self.list_resyncs.load(Ordering::Relaxed),
            controls_sent: self.controls_sent.load(Ordering::Relaxed),
            thumbnails_fetched: self.thumbnails_fetched.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub snapshots_applied: usize,
    pub snapshots_dropped: usize,
    pub list_resyncs: usize,
    pub controls_sent: usize,
    pub thumbnails_fetched: usize,
    pub uptime_seconds: u64,
}
