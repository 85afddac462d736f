//! FFI functions for pooled memory

use std::ffi::c_void;

use crate::{
    allocators::MallocAllocator,
    element::ElementKind,
    error::Result,
    pool::{self, BufferHandle, MemoryPool},
};

use super::types::HostpoolErrorCode;

type Allocate = fn(&MemoryPool<MallocAllocator>, ElementKind, usize) -> Result<BufferHandle>;

fn alloc_into(kind: u32, count: usize, out: *mut *mut c_void, allocate: Allocate) -> HostpoolErrorCode {
    if out.is_null() {
        return HostpoolErrorCode::InvalidParameter;
    }

    let kind = match ElementKind::try_from(kind) {
        Ok(kind) => kind,
        Err(err) => return err.into(),
    };

    match allocate(pool::global(), kind, count) {
        Ok(handle) => {
            unsafe { *out = handle.as_ptr::<c_void>() };
            HostpoolErrorCode::Success
        }
        Err(err) => err.into(),
    }
}

/// Allocate `count` elements of element kind `kind`
///
/// Writes the buffer address (null when `count` is 0) to `out`.
#[no_mangle]
pub extern "C" fn hostpool_alloc(kind: u32, count: usize, out: *mut *mut c_void) -> HostpoolErrorCode {
    alloc_into(kind, count, out, MemoryPool::<MallocAllocator>::allocate_kind)
}

/// Return a buffer to the pool; untracked pointers are freed directly
///
/// # Safety
/// `ptr` must be null, come from `hostpool_alloc`/`hostpool_pinned_alloc`, or
/// come from `malloc`. It must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn hostpool_free(ptr: *mut c_void) {
    pool::global().release(BufferHandle::from_ptr(ptr));
}

/// Allocate host memory for callers that need pinned buffers
#[no_mangle]
pub extern "C" fn hostpool_pinned_alloc(kind: u32, count: usize, out: *mut *mut c_void) -> HostpoolErrorCode {
    alloc_into(kind, count, out, MemoryPool::<MallocAllocator>::pinned_allocate_kind)
}

/// Return a buffer obtained from `hostpool_pinned_alloc`
///
/// # Safety
/// Same contract as `hostpool_free`.
#[no_mangle]
pub unsafe extern "C" fn hostpool_pinned_free(ptr: *mut c_void) {
    pool::global().pinned_release(BufferHandle::from_ptr(ptr));
}

/// Report pool usage; any out pointer may be null
///
/// # Safety
/// Every non-null pointer must be valid for a `size_t` write.
#[no_mangle]
pub unsafe extern "C" fn hostpool_memory_info(
    alloc_bytes: *mut usize,
    alloc_buffers: *mut usize,
    lock_bytes: *mut usize,
    lock_buffers: *mut usize,
) {
    let usage = pool::global().query_usage();

    for (out, value) in [
        (alloc_bytes, usage.total_bytes),
        (alloc_buffers, usage.total_buffers),
        (lock_bytes, usage.locked_bytes),
        (lock_buffers, usage.locked_buffers),
    ] {
        if !out.is_null() {
            *out = value;
        }
    }
}

/// Release every free buffer to the system; returns the number released
#[no_mangle]
pub extern "C" fn hostpool_garbage_collect() -> usize {
    pool::global().sweep().buffers
}

/// Final sweep at backend teardown; returns the number of buffers released
#[no_mangle]
pub extern "C" fn hostpool_shutdown() -> usize {
    pool::shutdown_global().buffers
}
