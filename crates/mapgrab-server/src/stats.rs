//! Ingestion counters.
//!
//! Owned by the server state and injected at construction, never a process
//! global, so tests get a fresh instance each. Counters only ever grow for
//! the lifetime of the process; a restart is the only reset.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct IngestionStats {
    received: AtomicU64,
    saved: AtomicU64,
    errors: AtomicU64,
    started_at: Instant,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Copy)]
pub struct StatsSnapshot {
    pub received: u64,
    pub saved: u64,
    pub errors: u64,
    pub uptime: Duration,
}

impl IngestionStats {
    #[must_use]
    pub fn new() -> Self {
        Self {
            received: AtomicU64::new(0),
            saved: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            started_at: Instant::now(),
        }
    }

    pub fn record_received(&self, n: u64) {
        self.received.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_saved(&self, n: u64) {
        self.saved.fetch_add(n, Ordering::Relaxed);
    }

    pub fn record_errors(&self, n: u64) {
        self.errors.fetch_add(n, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            saved: self.saved.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            uptime: self.started_at.elapsed(),
        }
    }
}

impl Default for IngestionStats {
    fn default() -> Self {
        Self::new()
    }
}
