//! C heap allocator

use std::ptr::NonNull;

use crate::error::{PoolError, Result};

use super::traits::SystemAllocator;

/// Allocator backed by `malloc` / `free`
///
/// `free` needs no size, so memory of unknown origin can still be returned.
#[derive(Debug, Default, Clone, Copy)]
pub struct MallocAllocator;

impl MallocAllocator {
    pub fn new() -> Self {
        Self
    }
}

impl SystemAllocator for MallocAllocator {
    fn acquire(&self, bytes: usize) -> Result<NonNull<u8>> {
        if bytes == 0 {
            return Err(PoolError::invalid_parameter("bytes", "Size must be greater than 0"));
        }

        let ptr = unsafe { libc::malloc(bytes) } as *mut u8;
        NonNull::new(ptr).ok_or_else(|| PoolError::out_of_memory(bytes))
    }

    unsafe fn release(&self, ptr: NonNull<u8>) {
        libc::free(ptr.as_ptr() as *mut libc::c_void);
    }
}
