//! Opaque buffer handles

use std::{fmt, ptr::NonNull};

/// Identifies one buffer handed out by the pool
///
/// A handle is the buffer's address. It carries no ownership: copying a
/// handle does not copy the buffer, and the pool decides when the memory
/// behind it goes back to the system.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferHandle {
    addr: usize,
}

impl BufferHandle {
    /// The empty handle returned for zero-element requests
    pub const EMPTY: BufferHandle = BufferHandle { addr: 0 };

    pub(crate) fn from_non_null(ptr: NonNull<u8>) -> Self {
        Self {
            addr: ptr.as_ptr() as usize,
        }
    }

    /// Wrap a raw pointer; null becomes [`BufferHandle::EMPTY`]
    pub fn from_ptr<T>(ptr: *mut T) -> Self {
        Self { addr: ptr as usize }
    }

    /// Whether this is the empty handle
    pub fn is_empty(&self) -> bool {
        self.addr == 0
    }

    /// Buffer address as a typed raw pointer (null for the empty handle)
    pub fn as_ptr<T>(&self) -> *mut T {
        self.addr as *mut T
    }

    /// Buffer address, or `None` for the empty handle
    pub fn as_non_null(&self) -> Option<NonNull<u8>> {
        NonNull::new(self.addr as *mut u8)
    }

    /// Buffer address as an integer key
    pub fn addr(&self) -> usize {
        self.addr
    }
}

impl Default for BufferHandle {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for BufferHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            f.write_str("BufferHandle(empty)")
        } else {
            write!(f, "BufferHandle({:#x})", self.addr)
        }
    }
}
