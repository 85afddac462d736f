//! Underlying allocator trait definition

use std::ptr::NonNull;

use crate::error::Result;

/// Source of raw memory for the pool
///
/// The pool never frees memory itself; every acquisition and release of real
/// memory goes through this trait.
pub trait SystemAllocator: Send + Sync + std::fmt::Debug {
    /// Acquire `bytes` bytes of uninitialized memory
    fn acquire(&self, bytes: usize) -> Result<NonNull<u8>>;

    /// Return memory to the system
    ///
    /// # Safety
    /// `ptr` must have come from [`SystemAllocator::acquire`] on an allocator
    /// sharing this release path, and must not be used afterwards.
    unsafe fn release(&self, ptr: NonNull<u8>);

    /// Get allocator type name for debugging
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
