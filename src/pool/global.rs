//! Process-wide pool, created on first use
//!
//! Backends that can own a [`MemoryPool`] should construct one and share it.
//! This instance exists for callers that cannot thread a pool through, such
//! as the C API.

use std::sync::atomic::{AtomicBool, Ordering};

use lazy_static::lazy_static;
use log::{info, warn};

use super::{config::PoolConfig, manager::MemoryPool, registry::SweepReport};
use crate::allocators::MallocAllocator;

lazy_static! {
    static ref GLOBAL_POOL: MemoryPool<MallocAllocator> = create_global_pool();
}

static INITIALIZED: AtomicBool = AtomicBool::new(false);

fn create_global_pool() -> MemoryPool<MallocAllocator> {
    let config = PoolConfig::from_env().unwrap_or_else(|err| {
        warn!("invalid pool configuration in environment ({}), using defaults", err);
        PoolConfig::default()
    });

    info!(
        "initializing global memory pool (max_buffers={}, max_bytes={})",
        config.max_buffers, config.max_bytes
    );

    let pool = MemoryPool::with_validated(config, MallocAllocator::new());
    INITIALIZED.store(true, Ordering::Release);
    pool
}

/// Create the global pool if it does not exist yet
///
/// Safe to call from any number of threads; the pool is built exactly once.
pub fn ensure_initialized() {
    lazy_static::initialize(&GLOBAL_POOL);
}

/// The global pool, created on first use
pub fn global() -> &'static MemoryPool<MallocAllocator> {
    &GLOBAL_POOL
}

/// Whether the global pool has been created
pub fn is_initialized() -> bool {
    INITIALIZED.load(Ordering::Acquire)
}

/// Final sweep of the global pool
///
/// Statics are never dropped, so backends call this at teardown. Does nothing
/// if the pool was never created; the pool stays usable afterwards.
pub fn shutdown_global() -> SweepReport {
    if !is_initialized() {
        return SweepReport::default();
    }
    global().shutdown()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{registry::BufferState, ReleaseOutcome};

    #[test]
    fn test_concurrent_initialization() {
        let pools: Vec<usize> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        ensure_initialized();
                        global() as *const _ as usize
                    })
                })
                .collect();
            workers.into_iter().map(|w| w.join().unwrap()).collect()
        });

        assert!(is_initialized());
        assert!(pools.windows(2).all(|pair| pair[0] == pair[1]));
    }

    #[test]
    fn test_global_allocate_release() {
        let handle = global().allocate::<f64>(3).unwrap();
        assert_eq!(global().buffer_state(handle), Some(BufferState::InUse));

        assert_eq!(unsafe { global().release(handle) }, ReleaseOutcome::Cached);
        shutdown_global();
        assert!(is_initialized());
    }
}
