//! # hostpool - Caching Host Memory Pool
//!
//! hostpool sits between numeric array kernels and the system allocator.
//! Buffers released by a kernel stay resident and are handed to the next
//! request of the same rounded size, so hot loops that allocate and free
//! temporaries of the same shape stop hitting `malloc`.
//!
//! ## Features
//!
//! - **Exact-size reuse**: requests are rounded to 1KB and matched against
//!   free buffers of exactly that size
//! - **Deferred reclamation**: free buffers go back to the system only when a
//!   sweep runs (pressure thresholds, explicit request, or shutdown)
//! - **Thread-safe**: one lock guards the registry and its counters
//! - **Typed requests**: one generic path over a closed set of element kinds
//! - **C API**: process-wide pool for non-Rust backends
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  MemoryPool                     │
//! ├─────────────────────────────────────────────────┤
//! │  Registry                 │  Counters           │
//! │  - handle → record        │  - locked bytes     │
//! │  - free list by size      │  - locked buffers   │
//! └─────────────────────────────────────────────────┘
//!           │ acquire / release (miss, sweep)
//!           ▼
//! ┌─────────────────────────────────────────────────┐
//! │          SystemAllocator (malloc / free)        │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod allocators;
pub mod element;
pub mod error;
pub mod pool;

#[cfg(feature = "c-api")]
pub mod ffi;

// Main API re-exports
pub use allocators::{AllocatorCounters, CountingAllocator, MallocAllocator, SystemAllocator};
pub use element::{Complex, Complex32, Complex64, Element, ElementKind};
pub use error::{PoolError, Result};
pub use pool::{
    ensure_initialized, global, is_initialized, shutdown_global, BufferHandle, BufferState,
    MemoryPool, MemoryUsage, PoolConfig, PoolConfigBuilder, PoolStats, ReleaseOutcome,
    SweepReport, GRANULARITY,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
