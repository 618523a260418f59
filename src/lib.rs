//! # dynarray - A Growable Array Built on an Owned Buffer
//!
//! This crate provides a minimal **dynamic array** in two layers: a move-only
//! owner of one fixed-size heap allocation, and a resizable sequence that
//! tracks how much of that allocation is in use.
//!
//! ## Overview
//!
//! ```text
//!   Two Layers:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │  DynamicArray<T>                                                     │
//!   │    size: 3                                                           │
//!   │    buffer ──┐                                                        │
//!   │             ▼                                                        │
//!   │   ┌───────────────────────────────────────────────────────────────┐  │
//!   │   │  Buffer<T>   (capacity: 4, exclusive owner, never resized)    │  │
//!   │   │   ┌──────┬──────┬──────┬──────┐                               │  │
//!   │   │   │  T0  │  T1  │  T2  │  ··  │   heap                        │  │
//!   │   │   └──────┴──────┴──────┴──────┘                               │  │
//!   │   │   ◄──── live (size) ───►                                      │  │
//!   │   └───────────────────────────────────────────────────────────────┘  │
//!   └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every slot of the buffer always holds a valid `T`. Slots past `len()` hold
//! default or stale values, which keeps [`DynamicArray::at`] memory safe even
//! though it is bounded by the capacity.
//!
//! ## Crate Structure
//!
//! ```text
//!   dynarray
//!   ├── array      - DynamicArray, comparisons, dyn_array! macro
//!   ├── buffer     - Buffer, the owned fixed-size allocation
//!   ├── error      - Error taxonomy and Result alias
//!   ├── layout     - Checked array layouts (internal helpers public)
//!   └── reserve    - Reserve, the capacity hint for construction
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use dynarray::{DynamicArray, Error};
//!
//! fn main() -> Result<(), Error> {
//!     let mut array = DynamicArray::new();
//!
//!     array.push_back(1)?;
//!     array.push_back(2)?;
//!     array.insert(1, 9)?;
//!     assert_eq!(array.as_slice(), &[1, 9, 2]);
//!
//!     array.erase(0)?;
//!     array.pop_back()?;
//!     assert_eq!(array.as_slice(), &[9]);
//!     Ok(())
//! }
//! ```
//!
//! ## How Growth Works
//!
//! An insertion into a full array never resizes the buffer in place:
//!
//! ```text
//!   insert(1, X) on a full array, capacity 2 -> 4:
//!
//!   old buffer:  ┌────┬────┐
//!                │ A  │ B  │
//!                └────┴────┘
//!                  │     └──────────────┐
//!                  ▼                    ▼
//!   new buffer:  ┌────┬────┬────┬────┐
//!                │ A  │ X  │ B  │ ·· │   allocated with default slots
//!                └────┴────┴────┴────┘
//!
//!   Then the buffers are swapped and the old one is dropped.
//! ```
//!
//! Capacity doubles on every full insertion and starts at one, so a run of
//! `push_back` calls costs amortised O(1) and visits capacities 1, 2, 4, 8...
//!
//! ## Errors
//!
//! Every fallible operation returns [`Result`]:
//!
//! - [`Error::OutOfRange`]: `at` past capacity, `insert`/`erase` past the end
//! - [`Error::InvalidArgument`]: `pop_back`/`erase` on an empty array
//! - [`Error::CapacityOverflow`], [`Error::AllocFailed`]: out of memory
//!
//! ## Limitations
//!
//! - **Single-threaded only**: no synchronization; `Send`/`Sync` follow `T`
//! - **Defaultable elements**: growth fills new slots with `T::default()`
//! - **No custom allocators**: storage comes from the global allocator
//! - **No strong exception safety**: a failed call leaves the array valid,
//!   not necessarily unchanged
//!
//! ## Safety
//!
//! The raw storage lives in [`Buffer`]. Its unchecked accessors and
//! [`Buffer::from_raw_parts`] are `unsafe`; everything on [`DynamicArray`]
//! is safe.
//!
//! ## Logging
//!
//! Buffer allocation and release are reported at `trace` level and array
//! reallocations at `debug` level through the [`log`] facade.

mod array;
mod buffer;
mod error;
pub mod layout;
mod reserve;

#[cfg(test)]
mod testing;

pub use array::DynamicArray;
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use reserve::{Reserve, reserve};
