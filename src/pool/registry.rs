//! Buffer registry: every live buffer the pool owns, plus its usage counters

use std::collections::HashMap;

use super::{handle::BufferHandle, stats::MemoryUsage};

/// Lifecycle state of a tracked buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// A caller holds the buffer
    InUse,
    /// The pool holds the buffer and may reuse or reclaim it
    Free,
}

/// Metadata for one underlying allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BufferRecord {
    /// Size of the underlying allocation, a multiple of the granularity
    pub size_bytes: usize,
    /// Current state
    pub state: BufferState,
}

/// Buffers and bytes handed back to the system by a sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Buffers released to the underlying allocator
    pub buffers: usize,
    /// Bytes released to the underlying allocator
    pub bytes: usize,
}

impl SweepReport {
    /// Whether the sweep found nothing to release
    pub fn is_empty(&self) -> bool {
        self.buffers == 0
    }
}

/// Result of marking a handle free
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkFree {
    /// Record flipped to free; carries its size
    Cached(usize),
    /// Record was already free
    AlreadyFree,
    /// Handle is not tracked
    Unknown,
}

/// Handle → record map with a per-size free list
///
/// The free list holds exactly the handles whose record is [`BufferState::Free`],
/// grouped by size, so an exact-size lookup does not scan the whole map.
/// Counters are updated in the same call that changes a record.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    records: HashMap<BufferHandle, BufferRecord>,
    free_lists: HashMap<usize, Vec<BufferHandle>>,
    locked_bytes: usize,
    locked_buffers: usize,
    total_bytes: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracked buffers (in use and free)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Look up a tracked buffer
    pub fn get(&self, handle: BufferHandle) -> Option<&BufferRecord> {
        self.records.get(&handle)
    }

    /// Bytes held by callers
    pub fn locked_bytes(&self) -> usize {
        self.locked_bytes
    }

    /// Buffers held by callers
    pub fn locked_buffers(&self) -> usize {
        self.locked_buffers
    }

    /// Buffers waiting for reuse or reclamation
    pub fn free_buffers(&self) -> usize {
        self.records.len() - self.locked_buffers
    }

    /// Point-in-time usage figures
    pub fn usage(&self) -> MemoryUsage {
        MemoryUsage {
            total_bytes: self.total_bytes,
            total_buffers: self.records.len(),
            locked_bytes: self.locked_bytes,
            locked_buffers: self.locked_buffers,
        }
    }

    /// Claim a free buffer of exactly `size_bytes`
    pub(crate) fn take_free(&mut self, size_bytes: usize) -> Option<BufferHandle> {
        let list = self.free_lists.get_mut(&size_bytes)?;
        let handle = list.pop()?;
        if list.is_empty() {
            self.free_lists.remove(&size_bytes);
        }

        if let Some(record) = self.records.get_mut(&handle) {
            debug_assert_eq!(record.state, BufferState::Free);
            record.state = BufferState::InUse;
        }
        self.locked_bytes += size_bytes;
        self.locked_buffers += 1;

        Some(handle)
    }

    /// Track a freshly acquired buffer as in use
    pub(crate) fn insert_in_use(&mut self, handle: BufferHandle, size_bytes: usize) {
        let previous = self.records.insert(
            handle,
            BufferRecord {
                size_bytes,
                state: BufferState::InUse,
            },
        );
        debug_assert!(previous.is_none(), "address {:?} tracked twice", handle);

        self.locked_bytes += size_bytes;
        self.locked_buffers += 1;
        self.total_bytes += size_bytes;
    }

    /// Hand a buffer back to the pool
    pub(crate) fn mark_free(&mut self, handle: BufferHandle) -> MarkFree {
        let Some(record) = self.records.get_mut(&handle) else {
            return MarkFree::Unknown;
        };

        if record.state == BufferState::Free {
            return MarkFree::AlreadyFree;
        }

        record.state = BufferState::Free;
        let size = record.size_bytes;
        self.free_lists.entry(size).or_default().push(handle);
        self.locked_bytes -= size;
        self.locked_buffers -= 1;

        MarkFree::Cached(size)
    }

    /// Untrack every free buffer and return them for release
    ///
    /// The caller must hand each returned buffer back to the system.
    pub(crate) fn drain_free(&mut self) -> Vec<(BufferHandle, usize)> {
        let mut drained = Vec::with_capacity(self.free_buffers());

        for (size, handles) in self.free_lists.drain() {
            for handle in handles {
                self.records.remove(&handle);
                drained.push((handle, size));
            }
        }

        let bytes: usize = drained.iter().map(|(_, size)| size).sum();
        self.total_bytes -= bytes;

        drained
    }
}
