/// A capacity hint carried into [`DynamicArray::with_reserve`].
///
/// Building the hint allocates nothing; the array that consumes it does.
///
/// [`DynamicArray::with_reserve`]: crate::DynamicArray::with_reserve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reserve {
  pub capacity: usize,
}

impl Reserve {
  pub fn new(capacity: usize) -> Self {
    Self { capacity }
  }
}

/// Shorthand for [`Reserve::new`].
///
/// ```rust
/// use dynarray::{DynamicArray, reserve};
///
/// let array = DynamicArray::<i32>::with_reserve(reserve(8)).unwrap();
/// assert_eq!(array.len(), 0);
/// assert_eq!(array.capacity(), 8);
/// ```
pub fn reserve(capacity: usize) -> Reserve {
  Reserve::new(capacity)
}
