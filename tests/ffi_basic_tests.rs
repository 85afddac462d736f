//! FFI (C API) Integration Tests
//!
//! Exercises the C entry points against the process-wide pool. Tests in this
//! file share that pool, so assertions only look at their own buffers.

#[cfg(feature = "c-api")]
use hostpool::ffi::{
    hostpool_alloc, hostpool_free, hostpool_garbage_collect, hostpool_memory_info,
    hostpool_pinned_alloc, hostpool_pinned_free, hostpool_version_string, HostpoolErrorCode,
};
use std::ffi::{c_void, CStr};
use std::ptr;

#[cfg(test)]
#[cfg(feature = "c-api")]
mod ffi_tests {
    use super::*;
    use hostpool::{BufferHandle, BufferState, ElementKind};

    fn alloc(kind: ElementKind, count: usize) -> *mut c_void {
        let mut out = ptr::null_mut();
        assert_eq!(hostpool_alloc(kind as u32, count, &mut out), HostpoolErrorCode::Success);
        out
    }

    #[test]
    fn test_version_information() {
        let version = unsafe { CStr::from_ptr(hostpool_version_string()) };
        assert_eq!(version.to_str().unwrap(), hostpool::VERSION);
    }

    #[test]
    fn test_alloc_and_free() {
        let ptr = alloc(ElementKind::F32, 1000);
        assert!(!ptr.is_null());

        let handle = BufferHandle::from_ptr(ptr);
        assert_eq!(hostpool::global().buffer_state(handle), Some(BufferState::InUse));

        unsafe {
            let floats = ptr as *mut f32;
            floats.write(1.5);
            floats.add(999).write(2.5);
            assert_eq!(floats.read(), 1.5);

            hostpool_free(ptr);
        }
    }

    #[test]
    fn test_zero_count_returns_null() {
        let mut out = 1usize as *mut c_void;
        assert_eq!(
            hostpool_alloc(ElementKind::C64 as u32, 0, &mut out),
            HostpoolErrorCode::Success
        );
        assert!(out.is_null());
        unsafe { hostpool_free(out) };
    }

    #[test]
    fn test_invalid_arguments() {
        assert_eq!(
            hostpool_alloc(ElementKind::U8 as u32, 16, ptr::null_mut()),
            HostpoolErrorCode::InvalidParameter
        );

        let mut out = ptr::null_mut();
        assert_eq!(hostpool_alloc(42, 16, &mut out), HostpoolErrorCode::InvalidParameter);
        assert!(out.is_null());

        assert_eq!(
            hostpool_alloc(ElementKind::C64 as u32, usize::MAX, &mut out),
            HostpoolErrorCode::SizeOverflow
        );
        assert!(out.is_null());
    }

    #[test]
    fn test_pinned_alloc_and_free() {
        let mut out = ptr::null_mut();
        assert_eq!(
            hostpool_pinned_alloc(ElementKind::U64 as u32, 64, &mut out),
            HostpoolErrorCode::Success
        );
        assert!(!out.is_null());
        assert_eq!(
            hostpool::global().buffer_state(BufferHandle::from_ptr(out)),
            Some(BufferState::InUse)
        );
        unsafe { hostpool_pinned_free(out) };
    }

    #[test]
    fn test_free_of_malloc_pointer() {
        unsafe {
            let raw = libc::malloc(256);
            assert!(!raw.is_null());
            hostpool_free(raw);
        }
    }

    #[test]
    fn test_memory_info_accepts_null_outputs() {
        let ptr = alloc(ElementKind::I8, 4096);

        let (mut total_bytes, mut total_buffers, mut locked_bytes, mut locked_buffers) =
            (0usize, 0usize, 0usize, 0usize);
        unsafe {
            hostpool_memory_info(
                &mut total_bytes,
                &mut total_buffers,
                &mut locked_bytes,
                &mut locked_buffers,
            );
        }
        assert!(locked_buffers >= 1);
        assert!(locked_bytes >= 4096);
        assert!(total_buffers >= locked_buffers);
        assert!(total_bytes >= locked_bytes);

        unsafe {
            hostpool_memory_info(ptr::null_mut(), ptr::null_mut(), &mut locked_bytes, ptr::null_mut());
            hostpool_free(ptr);
        }
    }

    #[test]
    fn test_garbage_collect_keeps_live_buffers() {
        let live = alloc(ElementKind::F64, 300);
        let dead = alloc(ElementKind::F64, 301);
        unsafe { hostpool_free(dead) };

        hostpool_garbage_collect();

        let global = hostpool::global();
        assert_eq!(global.buffer_state(BufferHandle::from_ptr(live)), Some(BufferState::InUse));

        unsafe { hostpool_free(live) };
    }
}
