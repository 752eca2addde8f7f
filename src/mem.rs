use core::alloc::{GlobalAlloc, Layout};
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::{self, NonNull};
use core::{fmt, mem, slice};
use std::alloc::System;

use bytemuck::Zeroable;
use tracing::trace;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    #[error("requested element count overflows the addressable size")]
    CapacityOverflow,
    #[error("system allocator could not provide {bytes} bytes")]
    OutOfMemory { bytes: usize },
}

/// Allocator that commits every page of an allocation before handing it out.
///
/// Fresh allocations from the system are usually only reserved address space;
/// the kernel maps physical pages on first touch. Writing zeroes across the
/// whole region moves those page faults out of whatever the caller times
/// afterwards. `alloc_zeroed` is not used here since calloc may hand back
/// untouched zero pages.
///
/// The allocator holds no state, so every instance is interchangeable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PreFaultAllocator;

impl PreFaultAllocator {
    pub const fn new() -> Self {
        PreFaultAllocator
    }

    /// Returns `count` zero-filled, physically backed slots of `T`.
    ///
    /// Zero-sized requests don't touch the system allocator and yield a
    /// dangling, aligned pointer.
    pub fn allocate<T>(&self, count: usize) -> Result<NonNull<T>, AllocError> {
        let layout = Layout::array::<T>(count).map_err(|_| AllocError::CapacityOverflow)?;

        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        let ptr = unsafe { System.alloc(layout) };
        let Some(ptr) = NonNull::new(ptr) else {
            return Err(AllocError::OutOfMemory {
                bytes: layout.size(),
            });
        };

        // touch every byte so the OS maps the pages now rather than inside a
        // timed region
        unsafe {
            ptr::write_bytes(ptr.as_ptr(), 0, layout.size());
        }
        trace!(bytes = layout.size(), "allocated and pre-faulted");

        Ok(ptr.cast())
    }

    /// # Safety
    ///
    /// `ptr` must come from [`PreFaultAllocator::allocate`] with the same `T`
    /// and `count`, and must not be used or released again afterwards.
    pub unsafe fn deallocate<T>(&self, ptr: NonNull<T>, count: usize) {
        // the layout was valid when the region was allocated
        let layout = Layout::array::<T>(count).unwrap_unchecked();

        if layout.size() == 0 {
            return;
        }

        trace!(bytes = layout.size(), "releasing");
        System.dealloc(ptr.as_ptr().cast(), layout);
    }
}

/// Owned slice of `T` backed by a [`PreFaultAllocator`] region.
///
/// The region is released exactly once, either through [`PreFaultBox::release`]
/// or when the box goes out of scope.
pub struct PreFaultBox<T: Zeroable> {
    ptr: NonNull<T>,
    len: usize,
    alloc: PreFaultAllocator,
    _marker: PhantomData<T>,
}

impl<T: Zeroable> PreFaultBox<T> {
    pub fn new_zeroed(len: usize) -> Result<Self, AllocError> {
        let alloc = PreFaultAllocator::new();
        let ptr = alloc.allocate::<T>(len)?;

        Ok(PreFaultBox {
            ptr,
            len,
            alloc,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Releases the region now instead of at the end of the scope.
    pub fn release(self) {
        drop(self);
    }
}

impl<T: Zeroable> Deref for PreFaultBox<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // all-zero bytes are a valid T, and the region is initialized on allocation
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> DerefMut for PreFaultBox<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Zeroable> Drop for PreFaultBox<T> {
    fn drop(&mut self) {
        if mem::needs_drop::<T>() {
            unsafe {
                ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), self.len));
            }
        }

        unsafe {
            self.alloc.deallocate(self.ptr, self.len);
        }
    }
}

impl<T: Zeroable + fmt::Debug> fmt::Debug for PreFaultBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// same rules as Box<[T]>
unsafe impl<T: Zeroable + Send> Send for PreFaultBox<T> {}
unsafe impl<T: Zeroable + Sync> Sync for PreFaultBox<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_are_interchangeable() {
        assert_eq!(PreFaultAllocator::new(), PreFaultAllocator::default());
    }

    #[test]
    fn fresh_region_reads_zero() {
        let alloc = PreFaultAllocator::new();

        for count in [1, 7, 8096, 1 << 20] {
            let ptr = alloc.allocate::<u8>(count).unwrap();
            let bytes = unsafe { slice::from_raw_parts(ptr.as_ptr(), count) };
            assert!(bytes.iter().all(|&b| b == 0), "non-zero byte in {count} byte region");
            unsafe { alloc.deallocate(ptr, count) };
        }
    }

    #[test]
    fn wide_elements_read_zero() {
        let words = PreFaultBox::<u64>::new_zeroed(127).unwrap();
        assert_eq!(words.len(), 127);
        assert!(words.iter().all(|&w| w == 0));
    }

    #[test]
    fn zero_count_skips_system_allocator() {
        let mut empty = PreFaultBox::<u64>::new_zeroed(0).unwrap();
        assert!(empty.is_empty());
        assert!(empty.iter_mut().next().is_none());
        empty.release();
    }

    #[test]
    fn overflowing_count_is_rejected() {
        let alloc = PreFaultAllocator::new();
        assert_eq!(
            alloc.allocate::<u64>(usize::MAX).unwrap_err(),
            AllocError::CapacityOverflow
        );
        assert_eq!(
            PreFaultBox::<u32>::new_zeroed(usize::MAX / 2).unwrap_err(),
            AllocError::CapacityOverflow
        );
    }

    #[test]
    fn writes_survive_until_release() {
        let mut bytes = PreFaultBox::<u8>::new_zeroed(4096).unwrap();
        bytes[0] = 1;
        bytes[4095] = 1;
        assert_eq!(bytes.iter().map(|&b| b as usize).sum::<usize>(), 2);
        bytes.release();
    }
}
