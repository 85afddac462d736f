//! Caching buffer pool
//!
//! Released buffers stay resident and are handed back out to later requests
//! of the same rounded size. Memory goes back to the system only when a sweep
//! runs: under pressure, on request, or at shutdown.

pub mod config;
pub mod global;
pub mod handle;
pub mod manager;
pub mod registry;
pub mod stats;

// Re-export main types
pub use config::{PoolConfig, PoolConfigBuilder};
pub use global::{ensure_initialized, global, is_initialized, shutdown_global};
pub use handle::BufferHandle;
pub use manager::{MemoryPool, ReleaseOutcome};
pub use registry::{BufferState, SweepReport};
pub use stats::{MemoryUsage, PoolStats};

/// Allocation granularity in bytes; every buffer size is a multiple of this
pub const GRANULARITY: usize = 1024;

/// Round `bytes` up to the allocation granularity
///
/// Returns `None` if the rounded size does not fit in `usize`.
pub fn round_up(bytes: usize) -> Option<usize> {
    bytes
        .checked_add(GRANULARITY - 1)
        .map(|padded| padded / GRANULARITY * GRANULARITY)
}
