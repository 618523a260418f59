use std::{
  alloc,
  cmp::Ordering,
  fmt,
  hash::{Hash, Hasher},
  mem,
  ops::{Deref, DerefMut},
  slice,
};

use crate::{
  buffer::Buffer,
  error::{Error, Result},
  reserve::Reserve,
};

/// Capacity multiplier applied when an insertion finds the array full.
const GROWTH_FACTOR: usize = 2;

/// Capacity of the first allocation made by inserting into a zero-capacity
/// array.
const MIN_NON_ZERO_CAP: usize = 1;

/// A resizable sequence stored in one [`Buffer`].
///
/// `len()` counts the live elements at the front of the buffer, while
/// `capacity()` counts every slot the buffer owns. Slots in
/// `[len, capacity)` hold default or stale values; they are still valid `T`
/// and are dropped together with the buffer.
///
/// ```text
///   buffer: ┌────┬────┬────┬────┬────┬────┬────┬────┐
///           │ 10 │ 20 │ 30 │ 40 │ ·· │ ·· │ ·· │ ·· │
///           └────┴────┴────┴────┴────┴────┴────┴────┘
///           ◄──────── len ──────►
///           ◄────────────────── capacity ───────────►
/// ```
///
/// Indexing with `[]` goes through [`Deref<Target = [T]>`](Deref) and is
/// bounds-checked against `len`, panicking on misuse. The slice's
/// `get_unchecked` is the unchecked fast path. [`DynamicArray::at`] returns
/// an error instead, and checks against *capacity*.
///
/// Any mutating call may move the elements, so indices are the only
/// positions that survive one.
pub struct DynamicArray<T> {
  size: usize,
  buffer: Buffer<T>,
}

impl<T> DynamicArray<T> {
  /// Creates an empty array without allocating.
  pub const fn new() -> Self {
    Self {
      size: 0,
      buffer: Buffer::empty(),
    }
  }

  /// Builds an array from an iterator of known length, keeping its order.
  /// Capacity equals the iterator's length.
  pub fn from_exact_iter<I>(items: I) -> Result<Self>
  where
    I: IntoIterator<Item = T>,
    I::IntoIter: ExactSizeIterator,
    T: Default,
  {
    let mut items = items.into_iter();
    let size = items.len();
    let buffer = Buffer::from_fn(size, |_| items.next().unwrap_or_default())?;

    Ok(Self { size, buffer })
  }

  /// Number of live elements.
  #[inline]
  pub fn len(&self) -> usize {
    self.size
  }

  /// Number of allocated slots.
  #[inline]
  pub fn capacity(&self) -> usize {
    self.buffer.capacity()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.size == 0
  }

  /// The live elements.
  #[inline]
  pub fn as_slice(&self) -> &[T] {
    &self.buffer.as_slice()[..self.size]
  }

  #[inline]
  pub fn as_mut_slice(&mut self) -> &mut [T] {
    let size = self.size;
    &mut self.buffer.as_mut_slice()[..size]
  }

  pub fn iter(&self) -> slice::Iter<'_, T> {
    self.as_slice().iter()
  }

  pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
    self.as_mut_slice().iter_mut()
  }

  /// Returns slot `index`, failing when `index >= capacity()`.
  ///
  /// The bound is the capacity, not the length: an index past the live
  /// elements but inside the allocation yields whatever the slot holds.
  ///
  /// ```rust
  /// use dynarray::{DynamicArray, reserve};
  ///
  /// let array = DynamicArray::<u8>::with_reserve(reserve(4)).unwrap();
  /// assert!(array.is_empty());
  /// assert_eq!(array.at(3), Ok(&0));
  /// assert!(array.at(4).is_err());
  /// ```
  pub fn at(
    &self,
    index: usize,
  ) -> Result<&T> {
    self.check_slot(index)?;
    // SAFETY: `index < capacity` was checked above.
    Ok(unsafe { self.buffer.get_unchecked(index) })
  }

  /// Mutable counterpart of [`DynamicArray::at`].
  pub fn at_mut(
    &mut self,
    index: usize,
  ) -> Result<&mut T> {
    self.check_slot(index)?;
    // SAFETY: `index < capacity` was checked above.
    Ok(unsafe { self.buffer.get_unchecked_mut(index) })
  }

  fn check_slot(
    &self,
    index: usize,
  ) -> Result<()> {
    if index >= self.capacity() {
      return Err(Error::OutOfRange {
        index,
        bound: self.capacity(),
      });
    }
    Ok(())
  }

  /// Forgets every element. Capacity and slot contents stay as they are.
  #[inline]
  pub fn clear(&mut self) {
    self.size = 0;
  }

  /// Drops the last element from the live range.
  ///
  /// Fails with [`Error::InvalidArgument`] on an empty array, leaving it
  /// untouched.
  pub fn pop_back(&mut self) -> Result<()> {
    if self.size == 0 {
      return Err(Error::InvalidArgument("pop_back on an empty array"));
    }
    self.size -= 1;
    Ok(())
  }

  /// Removes the element at `pos`, shifting the tail one slot left.
  ///
  /// Returns `pos`, which now holds the following element or equals
  /// `len()` if the last element was removed. Positions past `len()` fail
  /// with [`Error::OutOfRange`]; an empty array fails with
  /// [`Error::InvalidArgument`]. `pos == len()` names no element and is
  /// out of range on a non-empty array.
  pub fn erase(
    &mut self,
    pos: usize,
  ) -> Result<usize> {
    if pos > self.size {
      return Err(Error::OutOfRange {
        index: pos,
        bound: self.size,
      });
    }
    if self.size == 0 {
      return Err(Error::InvalidArgument("erase on an empty array"));
    }
    if pos == self.size {
      return Err(Error::OutOfRange {
        index: pos,
        bound: self.size,
      });
    }

    self.as_mut_slice()[pos..].rotate_left(1);
    self.size -= 1;
    Ok(pos)
  }

  /// Exchanges contents, length and capacity with `other` in constant time.
  pub fn swap(
    &mut self,
    other: &mut DynamicArray<T>,
  ) {
    self.buffer.swap(&mut other.buffer);
    mem::swap(&mut self.size, &mut other.size);
  }

  /// Moves `other`'s storage into a new array, leaving `other` empty with
  /// no allocation.
  pub fn take_from(other: &mut DynamicArray<T>) -> Self {
    mem::take(other)
  }

  /// Replaces the contents of `self` with `other`'s storage, leaving
  /// `other` empty. The previous storage of `self` is dropped.
  pub fn assign_take(
    &mut self,
    other: &mut DynamicArray<T>,
  ) {
    let mut moved = Self::take_from(other);
    self.swap(&mut moved);
  }
}

impl<T: Default> DynamicArray<T> {
  /// Creates `len` default elements; capacity equals `len`.
  pub fn with_len(len: usize) -> Result<Self> {
    Ok(Self {
      size: len,
      buffer: Buffer::new(len)?,
    })
  }

  /// Creates an empty array with `request.capacity` slots already allocated.
  pub fn with_reserve(request: Reserve) -> Result<Self> {
    Ok(Self {
      size: 0,
      buffer: Buffer::new(request.capacity)?,
    })
  }

  /// Changes the length to `new_len`.
  ///
  /// Growing reallocates to exactly `new_len` slots, moves the live
  /// elements over and exposes default values in the new tail. Passing the
  /// current length resets every live element to its default. Shrinking only
  /// lowers the length.
  pub fn resize(
    &mut self,
    new_len: usize,
  ) -> Result<()> {
    match new_len.cmp(&self.size) {
      Ordering::Greater => self.reallocate(new_len)?,
      Ordering::Equal => self.as_mut_slice().fill_with(T::default),
      Ordering::Less => {}
    }
    self.size = new_len;
    Ok(())
  }

  /// Grows the allocation to exactly `new_capacity` slots, keeping length
  /// and contents. Requests not above the current capacity do nothing.
  pub fn reserve(
    &mut self,
    new_capacity: usize,
  ) -> Result<()> {
    if new_capacity <= self.capacity() {
      return Ok(());
    }
    self.reallocate(new_capacity)
  }

  /// Appends `value`. Amortised O(1): a full array doubles its capacity.
  pub fn push_back(
    &mut self,
    value: T,
  ) -> Result<()> {
    self.insert(self.size, value).map(drop)
  }

  /// Inserts `value` at `pos`, shifting the tail one slot right, and
  /// returns `pos`.
  ///
  /// `pos` may equal `len()`. A full array first grows to twice its
  /// capacity, or to one slot when the capacity is zero.
  pub fn insert(
    &mut self,
    pos: usize,
    value: T,
  ) -> Result<usize> {
    let size = self.size;
    if pos > size {
      return Err(Error::OutOfRange {
        index: pos,
        bound: size,
      });
    }

    if size < self.capacity() {
      let slots = self.buffer.as_mut_slice();
      slots[size] = value;
      slots[pos..=size].rotate_right(1);
    } else {
      let new_capacity = self.grown_capacity()?;
      let mut fresh = Buffer::new(new_capacity)?;
      let (old, new) = (self.buffer.as_mut_slice(), fresh.as_mut_slice());

      new[..pos].swap_with_slice(&mut old[..pos]);
      new[pos] = value;
      new[pos + 1..=size].swap_with_slice(&mut old[pos..size]);

      log::debug!(
        "grew array from {} to {new_capacity} slots on insert at {pos}",
        self.capacity()
      );
      self.buffer.swap(&mut fresh);
    }

    self.size += 1;
    Ok(pos)
  }

  fn grown_capacity(&self) -> Result<usize> {
    match self.capacity() {
      0 => Ok(MIN_NON_ZERO_CAP),
      capacity => capacity
        .checked_mul(GROWTH_FACTOR)
        .ok_or(Error::CapacityOverflow {
          count: capacity,
          elem_size: mem::size_of::<T>(),
        }),
    }
  }

  // Moves the live elements into a fresh buffer of `new_capacity` default
  // slots and adopts it. `new_capacity` must not be below the length.
  fn reallocate(
    &mut self,
    new_capacity: usize,
  ) -> Result<()> {
    debug_assert!(new_capacity >= self.size);

    let size = self.size;
    let mut fresh = Buffer::new(new_capacity)?;
    fresh.as_mut_slice()[..size].swap_with_slice(&mut self.buffer.as_mut_slice()[..size]);

    log::debug!(
      "reallocated array from {} to {new_capacity} slots",
      self.capacity()
    );
    self.buffer.swap(&mut fresh);
    Ok(())
  }
}

impl<T: Clone> DynamicArray<T> {
  /// Creates `len` copies of `value`; capacity equals `len`.
  pub fn from_elem(
    value: T,
    len: usize,
  ) -> Result<Self> {
    Ok(Self {
      size: len,
      buffer: Buffer::from_fn(len, |_| value.clone())?,
    })
  }

  /// Copies `items` in order; capacity equals `items.len()`.
  pub fn from_slice(items: &[T]) -> Result<Self> {
    Ok(Self {
      size: items.len(),
      buffer: Buffer::from_fn(items.len(), |i| items[i].clone())?,
    })
  }
}

impl<T: Clone + Default> DynamicArray<T> {
  /// Deep copy with the same length and capacity. Slots past the length
  /// start out as defaults in the copy.
  pub fn try_clone(&self) -> Result<Self> {
    let live = self.as_slice();
    let buffer = Buffer::from_fn(self.capacity(), |i| match live.get(i) {
      Some(item) => item.clone(),
      None => T::default(),
    })?;

    Ok(Self {
      size: self.size,
      buffer,
    })
  }

  /// Replaces the contents of `self` with a deep copy of `other`.
  ///
  /// The copy is fully built before anything in `self` changes, so on error
  /// `self` is left as it was.
  pub fn assign(
    &mut self,
    other: &DynamicArray<T>,
  ) -> Result<()> {
    let mut copy = other.try_clone()?;
    self.swap(&mut copy);
    Ok(())
  }
}

impl<T: Clone + Default> Clone for DynamicArray<T> {
  fn clone(&self) -> Self {
    match self.try_clone() {
      Ok(copy) => copy,
      Err(Error::AllocFailed { layout }) => alloc::handle_alloc_error(layout),
      Err(err) => panic!("cannot clone array: {err}"),
    }
  }
}

impl<T> Default for DynamicArray<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Deref for DynamicArray<T> {
  type Target = [T];

  fn deref(&self) -> &[T] {
    self.as_slice()
  }
}

impl<T> DerefMut for DynamicArray<T> {
  fn deref_mut(&mut self) -> &mut [T] {
    self.as_mut_slice()
  }
}

impl<'a, T> IntoIterator for &'a DynamicArray<T> {
  type Item = &'a T;
  type IntoIter = slice::Iter<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a, T> IntoIterator for &'a mut DynamicArray<T> {
  type Item = &'a mut T;
  type IntoIter = slice::IterMut<'a, T>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter_mut()
  }
}

impl<T: PartialEq> PartialEq for DynamicArray<T> {
  fn eq(
    &self,
    other: &Self,
  ) -> bool {
    self.as_slice() == other.as_slice()
  }
}

impl<T: Eq> Eq for DynamicArray<T> {}

impl<T: PartialOrd> PartialOrd for DynamicArray<T> {
  fn partial_cmp(
    &self,
    other: &Self,
  ) -> Option<Ordering> {
    self.as_slice().partial_cmp(other.as_slice())
  }
}

impl<T: Ord> Ord for DynamicArray<T> {
  fn cmp(
    &self,
    other: &Self,
  ) -> Ordering {
    self.as_slice().cmp(other.as_slice())
  }
}

impl<T: Hash> Hash for DynamicArray<T> {
  fn hash<H: Hasher>(
    &self,
    state: &mut H,
  ) {
    self.as_slice().hash(state);
  }
}

impl<T: fmt::Debug> fmt::Debug for DynamicArray<T> {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_list().entries(self.iter()).finish()
  }
}

/// Builds a [`DynamicArray`] the way `vec!` builds a `Vec`, returning
/// [`Result`](crate::Result) since the allocation may fail.
///
/// # Examples
///
/// ```rust
/// use dynarray::dyn_array;
///
/// let array = dyn_array![1, 2, 3].unwrap();
/// assert_eq!(array.as_slice(), &[1, 2, 3]);
/// assert_eq!(array.capacity(), 3);
///
/// let zeros = dyn_array![0u8; 4].unwrap();
/// assert_eq!(zeros.as_slice(), &[0, 0, 0, 0]);
/// ```
#[macro_export]
macro_rules! dyn_array {
  () => {
    ::core::result::Result::<_, $crate::Error>::Ok($crate::DynamicArray::new())
  };
  ($elem:expr; $n:expr) => {
    $crate::DynamicArray::from_elem($elem, $n)
  };
  ($($x:expr),+ $(,)?) => {
    $crate::DynamicArray::from_exact_iter([$($x),+])
  };
}
