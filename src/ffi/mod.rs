//! C Foreign Function Interface (FFI) over the process-wide pool
//!
//! Every function here works on [`crate::pool::global`]. Handles cross the
//! boundary as plain `void*` buffer addresses.

pub mod memory;
pub mod types;
pub mod version;

pub use types::HostpoolErrorCode;

pub use memory::{
    hostpool_alloc, hostpool_free, hostpool_garbage_collect, hostpool_memory_info,
    hostpool_pinned_alloc, hostpool_pinned_free, hostpool_shutdown,
};

pub use version::hostpool_version_string;
