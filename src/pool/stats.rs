//! Pool usage figures and lifetime statistics

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Point-in-time usage of a pool, taken under the registry lock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryUsage {
    /// Bytes of every buffer the pool holds, in use or free
    pub total_bytes: usize,
    /// Number of buffers the pool holds, in use or free
    pub total_buffers: usize,
    /// Bytes held by callers
    pub locked_bytes: usize,
    /// Buffers held by callers
    pub locked_buffers: usize,
}

impl MemoryUsage {
    /// Resident bytes available for reuse
    pub fn free_bytes(&self) -> usize {
        self.total_bytes - self.locked_bytes
    }

    /// Resident buffers available for reuse
    pub fn free_buffers(&self) -> usize {
        self.total_buffers - self.locked_buffers
    }
}

/// Lifetime counters for a pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolStats {
    /// Non-empty allocation requests that succeeded
    pub allocations: u64,
    /// Allocations served from a free buffer
    pub reuse_hits: u64,
    /// Allocations that acquired new memory
    pub fresh_acquisitions: u64,
    /// Allocations that failed
    pub allocation_failures: u64,
    /// Buffers returned to the pool
    pub releases: u64,
    /// Releases of handles the pool did not track
    pub foreign_releases: u64,
    /// Releases of handles that were already free
    pub double_releases: u64,
    /// Sweeps run
    pub sweeps: u64,
    /// Buffers handed back to the system by sweeps
    pub buffers_reclaimed: u64,
    /// Bytes handed back to the system by sweeps
    pub bytes_reclaimed: u64,
    /// Highest locked byte count observed
    pub peak_locked_bytes: usize,
}

impl PoolStats {
    /// Fraction of allocations served without new memory (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        if self.allocations == 0 {
            return 0.0;
        }
        self.reuse_hits as f64 / self.allocations as f64
    }

    /// Get a summary string of the statistics
    pub fn summary(&self) -> String {
        format!(
            "PoolStats {{ allocations: {}, hits: {}, fresh: {}, failures: {}, releases: {}, \
             foreign: {}, double: {}, sweeps: {}, reclaimed: {} buffers / {} bytes, \
             peak_locked: {} bytes, hit_rate: {:.2}% }}",
            self.allocations,
            self.reuse_hits,
            self.fresh_acquisitions,
            self.allocation_failures,
            self.releases,
            self.foreign_releases,
            self.double_releases,
            self.sweeps,
            self.buffers_reclaimed,
            self.bytes_reclaimed,
            self.peak_locked_bytes,
            self.hit_rate() * 100.0
        )
    }
}

/// Thread-safe lifetime counters
#[derive(Debug, Default)]
pub(crate) struct AtomicPoolStats {
    allocations: AtomicU64,
    reuse_hits: AtomicU64,
    fresh_acquisitions: AtomicU64,
    allocation_failures: AtomicU64,
    releases: AtomicU64,
    foreign_releases: AtomicU64,
    double_releases: AtomicU64,
    sweeps: AtomicU64,
    buffers_reclaimed: AtomicU64,
    bytes_reclaimed: AtomicU64,
    peak_locked_bytes: AtomicUsize,
}

impl AtomicPoolStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an allocation served from a free buffer
    pub fn record_hit(&self, locked_bytes: usize) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.reuse_hits.fetch_add(1, Ordering::Relaxed);
        self.update_peak(locked_bytes);
    }

    /// Record an allocation that acquired new memory
    pub fn record_fresh(&self, locked_bytes: usize) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
        self.fresh_acquisitions.fetch_add(1, Ordering::Relaxed);
        self.update_peak(locked_bytes);
    }

    /// Record an allocation failure
    pub fn record_failure(&self) {
        self.allocation_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a buffer returned to the pool
    pub fn record_release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a release of an untracked handle
    pub fn record_foreign_release(&self) {
        self.foreign_releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a release of an already free handle
    pub fn record_double_release(&self) {
        self.double_releases.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed sweep
    pub fn record_sweep(&self, buffers: usize, bytes: usize) {
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.buffers_reclaimed.fetch_add(buffers as u64, Ordering::Relaxed);
        self.bytes_reclaimed.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    fn update_peak(&self, locked_bytes: usize) {
        self.peak_locked_bytes.fetch_max(locked_bytes, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            allocations: self.allocations.load(Ordering::Relaxed),
            reuse_hits: self.reuse_hits.load(Ordering::Relaxed),
            fresh_acquisitions: self.fresh_acquisitions.load(Ordering::Relaxed),
            allocation_failures: self.allocation_failures.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            foreign_releases: self.foreign_releases.load(Ordering::Relaxed),
            double_releases: self.double_releases.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            buffers_reclaimed: self.buffers_reclaimed.load(Ordering::Relaxed),
            bytes_reclaimed: self.bytes_reclaimed.load(Ordering::Relaxed),
            peak_locked_bytes: self.peak_locked_bytes.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_derived_fields() {
        let usage = MemoryUsage {
            total_bytes: 4096,
            total_buffers: 3,
            locked_bytes: 1024,
            locked_buffers: 1,
        };
        assert_eq!(usage.free_bytes(), 3072);
        assert_eq!(usage.free_buffers(), 2);
    }

    #[test]
    fn test_hit_rate() {
        let stats = AtomicPoolStats::new();
        assert_eq!(stats.snapshot().hit_rate(), 0.0);

        stats.record_fresh(1024);
        stats.record_hit(2048);
        stats.record_hit(1024);
        stats.record_fresh(4096);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.allocations, 4);
        assert_eq!(snapshot.reuse_hits, 2);
        assert_eq!(snapshot.fresh_acquisitions, 2);
        assert_eq!(snapshot.peak_locked_bytes, 4096);
        assert!((snapshot.hit_rate() - 0.5).abs() < f64::EPSILON);
        assert!(snapshot.summary().contains("hit_rate: 50.00%"));
    }

    #[test]
    fn test_sweep_counters() {
        let stats = AtomicPoolStats::new();
        stats.record_sweep(3, 3072);
        stats.record_sweep(0, 0);
        stats.record_double_release();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.sweeps, 2);
        assert_eq!(snapshot.buffers_reclaimed, 3);
        assert_eq!(snapshot.bytes_reclaimed, 3072);
        assert_eq!(snapshot.double_releases, 1);
        assert_eq!(snapshot.allocations, 0);
    }
}
