use std::{
  alloc::{self, Layout},
  fmt, mem,
  ops::{Index, IndexMut},
  ptr::{self, NonNull},
  slice,
};

use crate::{
  error::{Error, Result},
  layout::{array_layout, needs_allocation},
};

/// Exclusive owner of one fixed-size heap allocation of `T`.
///
/// Every slot in `[0, capacity)` holds an initialised `T` for as long as the
/// buffer owns the storage. The slot count is fixed at construction; growing
/// means building a new buffer and swapping it in.
///
/// A buffer with no slots stores a null pointer and never touches the
/// allocator. Copying is not offered: ownership moves only through Rust moves,
/// [`Buffer::swap`] or [`Buffer::release`].
pub struct Buffer<T> {
  ptr: *mut T,
  capacity: usize,
}

// Frees a partially initialised allocation if a slot constructor panics.
struct InitGuard<T> {
  ptr: *mut T,
  init: usize,
  capacity: usize,
}

impl<T> Drop for InitGuard<T> {
  fn drop(&mut self) {
    unsafe {
      ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr, self.init));
      dealloc_slots(self.ptr, self.capacity);
    }
  }
}

// Returns the storage of `capacity` slots to the allocator. Slots must
// already be dropped.
unsafe fn dealloc_slots<T>(
  ptr: *mut T,
  capacity: usize,
) {
  if !needs_allocation::<T>(capacity) {
    return;
  }

  unsafe {
    // The same layout succeeded when the storage was allocated.
    let layout = Layout::array::<T>(capacity).unwrap_unchecked();
    alloc::dealloc(ptr as *mut u8, layout);
  }

  log::trace!("freed {capacity} slots at {ptr:p}");
}

impl<T> Buffer<T> {
  /// Creates a buffer that owns nothing.
  pub const fn empty() -> Self {
    Self {
      ptr: ptr::null_mut(),
      capacity: 0,
    }
  }

  /// Allocates `count` slots, each holding `T::default()`.
  ///
  /// `count == 0` performs no allocation.
  pub fn new(count: usize) -> Result<Self>
  where
    T: Default,
  {
    Self::from_fn(count, |_| T::default())
  }

  /// Allocates `count` slots, initialising slot `i` with `f(i)` in order.
  pub fn from_fn<F>(
    count: usize,
    mut f: F,
  ) -> Result<Self>
  where
    F: FnMut(usize) -> T,
  {
    if count == 0 {
      return Ok(Self::empty());
    }

    let layout = array_layout::<T>(count)?;
    let ptr = if needs_allocation::<T>(count) {
      let raw = unsafe { alloc::alloc(layout) } as *mut T;
      if raw.is_null() {
        return Err(Error::AllocFailed { layout });
      }
      log::trace!("allocated {} bytes for {count} slots at {raw:p}", layout.size());
      raw
    } else {
      NonNull::dangling().as_ptr()
    };

    let mut guard = InitGuard {
      ptr,
      init: 0,
      capacity: count,
    };
    while guard.init < count {
      unsafe { ptr.add(guard.init).write(f(guard.init)) };
      guard.init += 1;
    }
    mem::forget(guard);

    Ok(Self {
      ptr,
      capacity: count,
    })
  }

  /// Adopts storage the caller already owns.
  ///
  /// # Safety
  ///
  /// Either `ptr` is null and `capacity` is zero, or `(ptr, capacity)` is a
  /// pair returned by [`Buffer::release`] on a `Buffer<T>` whose storage has
  /// not been adopted since. All `capacity` slots must still be initialised.
  pub unsafe fn from_raw_parts(
    ptr: *mut T,
    capacity: usize,
  ) -> Self {
    debug_assert_eq!(ptr.is_null(), capacity == 0);
    Self { ptr, capacity }
  }

  /// Gives up ownership of the storage and returns its pointer and slot
  /// count. The buffer is empty afterwards and frees nothing on drop.
  #[must_use = "the released storage leaks unless handed to `Buffer::from_raw_parts`"]
  pub fn release(&mut self) -> (*mut T, usize) {
    let parts = (self.ptr, self.capacity);
    self.ptr = ptr::null_mut();
    self.capacity = 0;
    log::trace!("released {} slots at {:p}", parts.1, parts.0);
    parts
  }

  /// Number of slots owned.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.capacity
  }

  /// `true` if the buffer currently owns storage.
  #[inline]
  pub fn is_allocated(&self) -> bool {
    !self.ptr.is_null()
  }

  /// Address of the first slot, or null when empty.
  #[inline]
  pub fn as_ptr(&self) -> *const T {
    self.ptr
  }

  /// Mutable address of the first slot, or null when empty.
  #[inline]
  pub fn as_mut_ptr(&mut self) -> *mut T {
    self.ptr
  }

  /// Returns a reference to slot `index` without a bounds check.
  ///
  /// # Safety
  ///
  /// `index` must be less than [`Buffer::capacity`].
  #[inline]
  pub unsafe fn get_unchecked(
    &self,
    index: usize,
  ) -> &T {
    debug_assert!(index < self.capacity);
    unsafe { &*self.ptr.add(index) }
  }

  /// Returns a mutable reference to slot `index` without a bounds check.
  ///
  /// # Safety
  ///
  /// `index` must be less than [`Buffer::capacity`].
  #[inline]
  pub unsafe fn get_unchecked_mut(
    &mut self,
    index: usize,
  ) -> &mut T {
    debug_assert!(index < self.capacity);
    unsafe { &mut *self.ptr.add(index) }
  }

  /// All slots as a slice.
  #[inline]
  pub fn as_slice(&self) -> &[T] {
    if self.ptr.is_null() {
      return &[];
    }
    unsafe { slice::from_raw_parts(self.ptr, self.capacity) }
  }

  /// All slots as a mutable slice.
  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    if self.ptr.is_null() {
      return &mut [];
    }
    unsafe { slice::from_raw_parts_mut(self.ptr, self.capacity) }
  }

  /// Exchanges storage with `other`. No slot is touched.
  #[inline]
  pub fn swap(
    &mut self,
    other: &mut Buffer<T>,
  ) {
    mem::swap(self, other);
  }
}

impl<T> Drop for Buffer<T> {
  fn drop(&mut self) {
    if self.ptr.is_null() {
      return;
    }

    unsafe {
      ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr, self.capacity));
      dealloc_slots(self.ptr, self.capacity);
    }
  }
}

impl<T> Default for Buffer<T> {
  fn default() -> Self {
    Self::empty()
  }
}

impl<T> Index<usize> for Buffer<T> {
  type Output = T;

  fn index(
    &self,
    index: usize,
  ) -> &T {
    &self.as_slice()[index]
  }
}

impl<T> IndexMut<usize> for Buffer<T> {
  fn index_mut(
    &mut self,
    index: usize,
  ) -> &mut T {
    &mut self.as_mut_slice()[index]
  }
}

impl<T: fmt::Debug> fmt::Debug for Buffer<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.as_slice()).finish()
  }
}

// The buffer owns its slots exclusively, same as `Box<[T]>`.
unsafe impl<T: Send> Send for Buffer<T> {}
unsafe impl<T: Sync> Sync for Buffer<T> {}

#[cfg(test)]
mod tests {
  use std::panic::{self, AssertUnwindSafe};

  use super::*;
  use crate::testing::{Tracked, drops};

  #[test]
  fn test_new_default_fills() {
    let buffer = Buffer::<u64>::new(5).unwrap();

    assert!(buffer.is_allocated());
    assert_eq!(buffer.capacity(), 5);
    assert_eq!(buffer.as_slice(), &[0, 0, 0, 0, 0]);
  }

  #[test]
  fn test_zero_count_is_null() {
    let buffer = Buffer::<String>::new(0).unwrap();

    assert!(!buffer.is_allocated());
    assert!(buffer.as_ptr().is_null());
    assert_eq!(buffer.capacity(), 0);
    assert!(buffer.as_slice().is_empty());
  }

  #[test]
  fn test_from_fn_order() {
    let buffer = Buffer::from_fn(4, |i| i * 10).unwrap();

    assert_eq!(buffer.as_slice(), &[0, 10, 20, 30]);
  }

  #[test]
  fn test_index() {
    let mut buffer = Buffer::<i32>::new(3).unwrap();

    buffer[1] = 7;
    unsafe {
      *buffer.get_unchecked_mut(2) = 9;
      assert_eq!(*buffer.get_unchecked(1), 7);
    }

    assert_eq!(buffer[2], 9);
    assert_eq!(buffer[0], 0);
  }

  #[test]
  #[should_panic]
  fn test_index_past_capacity_panics() {
    let buffer = Buffer::<i32>::new(3).unwrap();
    let value = buffer[3];
    assert_eq!(value, 0);
  }

  #[test]
  fn test_release_and_adopt() {
    let mut buffer = Buffer::from_fn(3, |i| i as u32 + 1).unwrap();
    let address = buffer.as_ptr();

    let (ptr, capacity) = buffer.release();

    assert!(!buffer.is_allocated());
    assert_eq!(buffer.capacity(), 0);
    assert_eq!(ptr as *const u32, address);
    assert_eq!(capacity, 3);

    let adopted = unsafe { Buffer::from_raw_parts(ptr, capacity) };
    assert_eq!(adopted.as_slice(), &[1, 2, 3]);
  }

  #[test]
  fn test_release_skips_drop() {
    let before = drops();
    let mut buffer = Buffer::<Tracked>::new(4).unwrap();
    let (ptr, capacity) = buffer.release();

    drop(buffer);
    assert_eq!(drops(), before);

    drop(unsafe { Buffer::from_raw_parts(ptr, capacity) });
    assert_eq!(drops() - before, 4);
  }

  #[test]
  fn test_adopt_null() {
    let buffer = unsafe { Buffer::<u8>::from_raw_parts(ptr::null_mut(), 0) };

    assert!(!buffer.is_allocated());
  }

  #[test]
  fn test_swap() {
    let mut a = Buffer::from_fn(2, |i| i).unwrap();
    let mut b = Buffer::from_fn(3, |i| i + 100).unwrap();
    let (a_ptr, b_ptr) = (a.as_ptr(), b.as_ptr());

    a.swap(&mut b);

    assert_eq!(a.as_ptr(), b_ptr);
    assert_eq!(b.as_ptr(), a_ptr);
    assert_eq!(a.as_slice(), &[100, 101, 102]);
    assert_eq!(b.as_slice(), &[0, 1]);
  }

  #[test]
  fn test_drop_runs_for_every_slot() {
    let before = drops();
    let buffer = Buffer::<Tracked>::new(6).unwrap();
    drop(buffer);

    assert_eq!(drops() - before, 6);
  }

  #[test]
  fn test_panicking_init_drops_written_slots() {
    let before = drops();
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
      Buffer::from_fn(5, |i| {
        if i == 3 {
          panic!("boom");
        }
        Tracked(i as i32)
      })
    }));

    assert!(result.is_err());
    assert_eq!(drops() - before, 3);
  }

  #[test]
  fn test_zero_sized_slots() {
    let buffer = Buffer::<()>::new(1000).unwrap();

    assert!(buffer.is_allocated());
    assert_eq!(buffer.capacity(), 1000);
    assert_eq!(buffer.as_slice().len(), 1000);
  }

  #[test]
  fn test_capacity_overflow() {
    let err = Buffer::<u64>::new(usize::MAX).unwrap_err();

    assert!(err.is_resource_exhaustion());
  }
}
