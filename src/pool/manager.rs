//! Pool manager: allocation, release, sweep and usage reporting

use std::ptr::NonNull;

use log::{debug, trace, warn};
use parking_lot::Mutex;

use crate::{
    allocators::{MallocAllocator, SystemAllocator},
    element::{Element, ElementKind},
    error::{PoolError, Result},
};

use super::{
    config::PoolConfig,
    handle::BufferHandle,
    registry::{BufferState, MarkFree, Registry, SweepReport},
    round_up,
    stats::{AtomicPoolStats, MemoryUsage, PoolStats},
};

/// What [`MemoryPool::release`] did with a handle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The empty handle; nothing happened
    Empty,
    /// The buffer stays resident and can be reused
    Cached,
    /// The handle was not tracked; its memory went straight back to the system
    Foreign,
    /// The buffer was already free; nothing changed
    AlreadyFree,
}

/// Caching pool in front of a [`SystemAllocator`]
///
/// One mutex guards the registry and its counters. Every operation takes it
/// for its whole critical section, so operations are linearizable and a
/// usage snapshot never sees counters that disagree with the registry.
#[derive(Debug)]
pub struct MemoryPool<A: SystemAllocator = MallocAllocator> {
    config: PoolConfig,
    allocator: A,
    registry: Mutex<Registry>,
    stats: AtomicPoolStats,
}

impl MemoryPool<MallocAllocator> {
    /// Create a pool on top of the C heap
    pub fn new(config: PoolConfig) -> Result<Self> {
        Self::with_allocator(config, MallocAllocator::new())
    }
}

impl<A: SystemAllocator> MemoryPool<A> {
    /// Create a pool on top of `allocator`
    pub fn with_allocator(config: PoolConfig, allocator: A) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated(config, allocator))
    }

    pub(crate) fn with_validated(config: PoolConfig, allocator: A) -> Self {
        debug!(
            "creating memory pool over {} (max_buffers={}, max_bytes={})",
            allocator.type_name(),
            config.max_buffers,
            config.max_bytes
        );

        Self {
            config,
            allocator,
            registry: Mutex::new(Registry::new()),
            stats: AtomicPoolStats::new(),
        }
    }

    /// Allocate a buffer for `count` elements of `T`
    pub fn allocate<T: Element>(&self, count: usize) -> Result<BufferHandle> {
        self.allocate_kind(T::KIND, count)
    }

    /// Allocate a buffer for `count` elements of `kind`
    ///
    /// Returns [`BufferHandle::EMPTY`] when `count` is zero. Otherwise the size
    /// is rounded up to the granularity and served from a free buffer of that
    /// exact size if one exists, or from the underlying allocator if not.
    pub fn allocate_kind(&self, kind: ElementKind, count: usize) -> Result<BufferHandle> {
        if count == 0 {
            return Ok(BufferHandle::EMPTY);
        }

        let element_size = kind.size_of();
        let alloc_bytes = element_size
            .checked_mul(count)
            .and_then(round_up)
            .ok_or_else(|| PoolError::size_overflow(element_size, count))?;

        let mut registry = self.registry.lock();

        if self.under_pressure(&registry) {
            self.sweep_locked(&mut registry);
        }

        if let Some(handle) = registry.take_free(alloc_bytes) {
            trace!("reused {:?} for {} x {} ({} bytes)", handle, count, kind, alloc_bytes);
            self.stats.record_hit(registry.locked_bytes());
            return Ok(handle);
        }

        let ptr = match self.acquire(&mut registry, alloc_bytes) {
            Ok(ptr) => ptr,
            Err(err) => {
                self.stats.record_failure();
                return Err(err);
            }
        };

        let handle = BufferHandle::from_non_null(ptr);
        registry.insert_in_use(handle, alloc_bytes);
        self.stats.record_fresh(registry.locked_bytes());

        debug!(
            "acquired {:?} for {} x {} ({} bytes, {} buffers tracked)",
            handle,
            count,
            kind,
            alloc_bytes,
            registry.len()
        );

        Ok(handle)
    }

    /// Allocate a buffer for callers that need pinned host memory
    ///
    /// Host memory is not distinguished from pinned memory here, so this is
    /// [`MemoryPool::allocate`].
    pub fn pinned_allocate<T: Element>(&self, count: usize) -> Result<BufferHandle> {
        self.allocate::<T>(count)
    }

    /// Pinned variant of [`MemoryPool::allocate_kind`]
    pub fn pinned_allocate_kind(&self, kind: ElementKind, count: usize) -> Result<BufferHandle> {
        self.allocate_kind(kind, count)
    }

    /// Give a buffer back to the pool
    ///
    /// A tracked buffer stays resident for reuse. An untracked handle is
    /// released straight to the underlying allocator. Releasing a buffer that
    /// is already free is ignored.
    ///
    /// # Safety
    /// `handle` must be empty, have come from this pool, or have come from an
    /// allocator sharing this pool's release path. The memory must not be
    /// accessed through `handle` afterwards.
    pub unsafe fn release(&self, handle: BufferHandle) -> ReleaseOutcome {
        let Some(ptr) = handle.as_non_null() else {
            return ReleaseOutcome::Empty;
        };

        let mut registry = self.registry.lock();
        match registry.mark_free(handle) {
            MarkFree::Cached(size) => {
                trace!("cached {:?} ({} bytes)", handle, size);
                self.stats.record_release();
                ReleaseOutcome::Cached
            }
            MarkFree::AlreadyFree => {
                warn!("ignoring release of {:?}: buffer is already free", handle);
                self.stats.record_double_release();
                ReleaseOutcome::AlreadyFree
            }
            MarkFree::Unknown => {
                drop(registry);
                debug!("releasing untracked {:?} directly", handle);
                self.allocator.release(ptr);
                self.stats.record_foreign_release();
                ReleaseOutcome::Foreign
            }
        }
    }

    /// Pinned variant of [`MemoryPool::release`]
    ///
    /// # Safety
    /// Same contract as [`MemoryPool::release`].
    pub unsafe fn pinned_release(&self, handle: BufferHandle) -> ReleaseOutcome {
        self.release(handle)
    }

    /// Release every free buffer to the underlying allocator
    pub fn sweep(&self) -> SweepReport {
        let mut registry = self.registry.lock();
        self.sweep_locked(&mut registry)
    }

    /// Final sweep at backend teardown
    ///
    /// Buffers still in use are leaked by their callers; they are reported
    /// and left alone.
    pub fn shutdown(&self) -> SweepReport {
        let mut registry = self.registry.lock();
        let report = self.sweep_locked(&mut registry);
        warn_leaks(&registry);
        report
    }

    /// Consistent snapshot of the usage counters
    pub fn query_usage(&self) -> MemoryUsage {
        self.registry.lock().usage()
    }

    /// State of a tracked buffer, or `None` if the pool does not track it
    pub fn buffer_state(&self, handle: BufferHandle) -> Option<BufferState> {
        self.registry.lock().get(handle).map(|record| record.state)
    }

    /// Lifetime statistics
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Get pool configuration
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Get the underlying allocator
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    fn under_pressure(&self, registry: &Registry) -> bool {
        registry.len() > self.config.max_buffers || registry.locked_bytes() >= self.config.max_bytes
    }

    /// Acquire new memory, sweeping once and retrying if the first attempt fails
    fn acquire(&self, registry: &mut Registry, bytes: usize) -> Result<NonNull<u8>> {
        match self.allocator.acquire(bytes) {
            Ok(ptr) => Ok(ptr),
            Err(err) if registry.free_buffers() > 0 => {
                debug!("acquiring {} bytes failed ({}), sweeping and retrying", bytes, err);
                self.sweep_locked(registry);
                self.allocator
                    .acquire(bytes)
                    .map_err(|_| PoolError::out_of_memory(bytes))
            }
            Err(_) => Err(PoolError::out_of_memory(bytes)),
        }
    }

    fn sweep_locked(&self, registry: &mut Registry) -> SweepReport {
        reclaim(&self.allocator, &self.stats, registry)
    }
}

impl<A: SystemAllocator> Drop for MemoryPool<A> {
    fn drop(&mut self) {
        let registry = self.registry.get_mut();
        reclaim(&self.allocator, &self.stats, registry);
        warn_leaks(registry);
    }
}

fn reclaim<A: SystemAllocator>(
    allocator: &A,
    stats: &AtomicPoolStats,
    registry: &mut Registry,
) -> SweepReport {
    let drained = registry.drain_free();
    let mut report = SweepReport::default();

    for (handle, size) in drained {
        if let Some(ptr) = handle.as_non_null() {
            // SAFETY: the registry only tracks memory this allocator handed out,
            // and a free buffer has no caller left to touch it.
            unsafe { allocator.release(ptr) };
        }
        report.buffers += 1;
        report.bytes += size;
    }

    stats.record_sweep(report.buffers, report.bytes);
    debug!(
        "sweep released {} buffers ({} bytes), {} still tracked",
        report.buffers,
        report.bytes,
        registry.len()
    );

    report
}

fn warn_leaks(registry: &Registry) {
    if registry.locked_buffers() > 0 {
        warn!(
            "{} buffers ({} bytes) still in use at shutdown",
            registry.locked_buffers(),
            registry.locked_bytes()
        );
    }
}
