use std::alloc::Layout;

/// Errors raised by [`Buffer`](crate::Buffer) and
/// [`DynamicArray`](crate::DynamicArray) operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
  /// An index or position fell outside the range the operation accepts.
  #[error("index {index} is out of range (bound {bound})")]
  OutOfRange { index: usize, bound: usize },

  /// The operation is not valid for the current state of the array.
  #[error("invalid argument: {0}")]
  InvalidArgument(&'static str),

  /// The requested element count cannot be represented as an allocation.
  #[error("capacity overflow: {count} elements of {elem_size} bytes")]
  CapacityOverflow { count: usize, elem_size: usize },

  /// The global allocator could not satisfy the request.
  #[error("allocation of {} bytes (align {}) failed", .layout.size(), .layout.align())]
  AllocFailed { layout: Layout },
}

impl Error {
  /// Returns `true` for the out-of-memory family of errors.
  pub fn is_resource_exhaustion(&self) -> bool {
    matches!(self, Error::CapacityOverflow { .. } | Error::AllocFailed { .. })
  }
}

pub type Result<T> = std::result::Result<T, Error>;
