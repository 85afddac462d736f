//! Underlying system allocators the pool delegates to

pub mod counting;
pub mod malloc;
pub mod traits;

pub use counting::{AllocatorCounters, CountingAllocator};
pub use malloc::MallocAllocator;
pub use traits::SystemAllocator;
