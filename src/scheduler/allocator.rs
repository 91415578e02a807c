use crate::error::{Result, SchedulerError};
use crate::scheduler::job::Assignment;

/// A contiguous run of slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: u32,
    pub len: u32,
}

/// Partitions the slot pool `1..=N` among running jobs.
///
/// Free ranges live on a LIFO stack: freed ranges are pushed back unchanged
/// and never merged with adjacent free ranges. Fragmentation is accepted;
/// job widths are small relative to the pool and a run is a short-lived
/// batch, so a sorted structure is not worth the bookkeeping.
#[derive(Debug)]
pub struct SlotAllocator {
    free: Vec<Range>,
    in_use: u32,
    pool_size: u32,
}

impl SlotAllocator {
    pub fn new(pool_size: u32) -> Self {
        Self {
            free: vec![Range {
                start: 1,
                len: pool_size,
            }],
            in_use: 0,
            pool_size,
        }
    }

    /// True iff some free range exists. This does not check whether the top
    /// range is wide enough for a given request; [`allocate`](Self::allocate)
    /// may grant fewer slots than requested.
    pub fn has_capacity(&self) -> bool {
        !self.free.is_empty()
    }

    /// True iff every slot has been returned to the pool.
    pub fn all_free(&self) -> bool {
        self.in_use == 0
    }

    pub fn in_use(&self) -> u32 {
        self.in_use
    }

    pub fn pool_size(&self) -> u32 {
        self.pool_size
    }

    /// Total slots currently in free ranges.
    pub fn free_slots(&self) -> u32 {
        self.free.iter().map(|range| range.len).sum()
    }

    /// Carve an assignment out of the top free range.
    ///
    /// Slot 1 is the coordinator slot: it does not count toward a multi-slot
    /// job's width, so a request of `k > 1` slots served from a range
    /// starting at slot 1 is granted `k - 1`. A single-slot job may occupy
    /// slot 1 outright.
    ///
    /// The grant is clamped to the popped range's length, so the caller can
    /// receive fewer slots than it asked for and must treat the returned
    /// width, not the requested one, as the job's effective width. The grant
    /// is always at least 1.
    ///
    /// Errors with [`SchedulerError::NoCapacity`] if no free range exists;
    /// callers must check [`has_capacity`](Self::has_capacity) first.
    pub fn allocate(&mut self, requested: u32) -> Result<Assignment> {
        let range = self.free.pop().ok_or(SchedulerError::NoCapacity)?;
        let mut granted = requested;
        if range.start == 1 && requested != 1 {
            granted -= 1;
        }
        granted = granted.min(range.len);
        if range.len > granted {
            self.free.push(Range {
                start: range.start + granted,
                len: range.len - granted,
            });
        }
        self.in_use += granted;
        Ok(Assignment {
            start_slot: range.start,
            slot_count: granted,
        })
    }

    /// Return a range to the pool. The range is pushed back as-is; no
    /// coalescing with adjacent free ranges happens.
    pub fn free(&mut self, start_slot: u32, slot_count: u32) {
        self.in_use -= slot_count;
        self.free.push(Range {
            start: start_slot,
            len: slot_count,
        });
    }
}
