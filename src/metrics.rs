// Dispatch metrics module
//
// Lightweight counters for what the host-processing thread did

use crate::models::RequestCode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Request dispatch metrics
///
/// Uses atomic operations so the host thread can record and the UI thread
/// can read without locks. Logged on shutdown.
#[derive(Debug)]
pub struct DispatchMetrics {
    /// `Initial` requests dispatched
    pub initial_requests: AtomicU64,

    /// `ChangeSelection` requests dispatched
    pub selection_requests: AtomicU64,

    /// Wake-ups that found the mailbox empty
    pub empty_wakes: AtomicU64,

    /// Mailbox values that named no known request
    pub unrecognized_requests: AtomicU64,

    /// Dispatches that returned an error or panicked
    pub failed_dispatches: AtomicU64,

    /// Requests overwritten in the mailbox before being taken
    pub preempted_requests: AtomicU64,

    /// Completed catalog builds
    pub catalog_builds: AtomicU64,

    /// Total catalog build time in milliseconds
    pub total_build_time_ms: AtomicU64,

    start_time: Instant,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self {
            initial_requests: AtomicU64::new(0),
            selection_requests: AtomicU64::new(0),
            empty_wakes: AtomicU64::new(0),
            unrecognized_requests: AtomicU64::new(0),
            failed_dispatches: AtomicU64::new(0),
            preempted_requests: AtomicU64::new(0),
            catalog_builds: AtomicU64::new(0),
            total_build_time_ms: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a taken request
    pub fn record_request(&self, code: RequestCode) {
        let counter = match code {
            RequestCode::None => &self.empty_wakes,
            RequestCode::Initial => &self.initial_requests,
            RequestCode::ChangeSelection => &self.selection_requests,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unrecognized(&self) {
        self.unrecognized_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed_dispatches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_preempted(&self) {
        self.preempted_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one completed catalog build
    pub fn record_catalog_build(&self, duration: Duration) {
        self.catalog_builds.fetch_add(1, Ordering::Relaxed);
        self.total_build_time_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Get total uptime
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average catalog build time in milliseconds
    pub fn avg_build_time_ms(&self) -> f64 {
        let total = self.total_build_time_ms.load(Ordering::Relaxed);
        let count = self.catalog_builds.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Dispatch Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Requests: {} initial, {} selection, {} empty wakes, {} unrecognized",
            self.initial_requests.load(Ordering::Relaxed),
            self.selection_requests.load(Ordering::Relaxed),
            self.empty_wakes.load(Ordering::Relaxed),
            self.unrecognized_requests.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Failures: {}, preempted: {}",
            self.failed_dispatches.load(Ordering::Relaxed),
            self.preempted_requests.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Catalog builds: {} (avg: {:.2}ms)",
            self.catalog_builds.load(Ordering::Relaxed),
            self.avg_build_time_ms()
        );
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}
