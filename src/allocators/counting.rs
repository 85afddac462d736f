//! Allocator wrapper that counts calls into the underlying allocator

use std::{
    ptr::NonNull,
    sync::atomic::{AtomicU64, AtomicUsize, Ordering},
};

use crate::error::Result;

use super::{malloc::MallocAllocator, traits::SystemAllocator};

/// Snapshot of the calls made through a [`CountingAllocator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocatorCounters {
    /// Successful acquisitions
    pub acquisitions: u64,
    /// Failed acquisitions
    pub failures: u64,
    /// Releases
    pub releases: u64,
    /// Bytes handed out by successful acquisitions
    pub bytes_acquired: usize,
}

impl AllocatorCounters {
    /// Acquisitions not yet matched by a release
    pub fn outstanding(&self) -> u64 {
        self.acquisitions.saturating_sub(self.releases)
    }
}

/// Wraps another allocator and records every call made through it
#[derive(Debug, Default)]
pub struct CountingAllocator<A: SystemAllocator = MallocAllocator> {
    inner: A,
    acquisitions: AtomicU64,
    failures: AtomicU64,
    releases: AtomicU64,
    bytes_acquired: AtomicUsize,
}

impl CountingAllocator<MallocAllocator> {
    /// Count calls into the C heap
    pub fn new() -> Self {
        Self::wrap(MallocAllocator::new())
    }
}

impl<A: SystemAllocator> CountingAllocator<A> {
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            acquisitions: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            bytes_acquired: AtomicUsize::new(0),
        }
    }

    /// Current counter values
    pub fn counters(&self) -> AllocatorCounters {
        AllocatorCounters {
            acquisitions: self.acquisitions.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            bytes_acquired: self.bytes_acquired.load(Ordering::Relaxed),
        }
    }
}

impl<A: SystemAllocator> SystemAllocator for CountingAllocator<A> {
    fn acquire(&self, bytes: usize) -> Result<NonNull<u8>> {
        match self.inner.acquire(bytes) {
            Ok(ptr) => {
                self.acquisitions.fetch_add(1, Ordering::Relaxed);
                self.bytes_acquired.fetch_add(bytes, Ordering::Relaxed);
                Ok(ptr)
            }
            Err(err) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                Err(err)
            }
        }
    }

    unsafe fn release(&self, ptr: NonNull<u8>) {
        self.releases.fetch_add(1, Ordering::Relaxed);
        self.inner.release(ptr);
    }

    fn type_name(&self) -> &'static str {
        self.inner.type_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_calls() {
        let allocator = CountingAllocator::new();
        let a = allocator.acquire(1024).unwrap();
        let b = allocator.acquire(2048).unwrap();
        unsafe { allocator.release(a) };

        let counters = allocator.counters();
        assert_eq!(counters.acquisitions, 2);
        assert_eq!(counters.releases, 1);
        assert_eq!(counters.bytes_acquired, 3072);
        assert_eq!(counters.outstanding(), 1);

        unsafe { allocator.release(b) };
        assert_eq!(allocator.counters().outstanding(), 0);
    }

    #[test]
    fn test_counts_failures() {
        let allocator = CountingAllocator::new();
        assert!(allocator.acquire(0).is_err());
        assert_eq!(allocator.counters().failures, 1);
        assert_eq!(allocator.counters().acquisitions, 0);
    }
}
