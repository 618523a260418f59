use std::{alloc::Layout, mem};

use crate::error::{Error, Result};

/// Computes the layout of a contiguous run of `count` elements of `T`.
///
/// Fails with [`Error::CapacityOverflow`] when the total byte size does not
/// fit in `isize::MAX`, which is the limit the global allocator accepts.
///
/// # Examples
///
/// ```rust
/// use dynarray::layout::array_layout;
///
/// let layout = array_layout::<u32>(6).unwrap();
/// assert_eq!(layout.size(), 24);
/// assert_eq!(layout.align(), 4);
///
/// assert!(array_layout::<u64>(usize::MAX).is_err());
/// ```
pub fn array_layout<T>(count: usize) -> Result<Layout> {
  Layout::array::<T>(count).map_err(|_| Error::CapacityOverflow {
    count,
    elem_size: mem::size_of::<T>(),
  })
}

/// Returns `true` when a buffer of `count` elements of `T` needs a real
/// allocation. Empty buffers and zero-sized types never touch the allocator.
#[inline]
pub(crate) fn needs_allocation<T>(count: usize) -> bool {
  count != 0 && mem::size_of::<T>() != 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_array_layout() {
    for count in 0..16 {
      let layout = array_layout::<u16>(count).unwrap();
      assert_eq!(layout.size(), count * 2);
      assert_eq!(layout.align(), mem::align_of::<u16>());
    }

    let layout = array_layout::<(u8, u32)>(3).unwrap();
    assert_eq!(layout.size(), 3 * mem::size_of::<(u8, u32)>());
  }

  #[test]
  fn test_array_layout_overflow() {
    let err = array_layout::<u32>(usize::MAX / 2).unwrap_err();
    assert_eq!(
      err,
      Error::CapacityOverflow {
        count: usize::MAX / 2,
        elem_size: 4
      }
    );
  }

  #[test]
  fn test_needs_allocation() {
    assert!(!needs_allocation::<u64>(0));
    assert!(needs_allocation::<u64>(1));
    assert!(!needs_allocation::<()>(100));
  }
}
