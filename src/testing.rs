use std::cell::Cell;

thread_local! {
  static DROPS: Cell<usize> = const { Cell::new(0) };
}

/// Element type that counts how many values were dropped on this thread.
#[derive(Debug, Default)]
pub(crate) struct Tracked(pub i32);

impl Drop for Tracked {
  fn drop(&mut self) {
    DROPS.with(|drops| drops.set(drops.get() + 1));
  }
}

pub(crate) fn drops() -> usize {
  DROPS.with(Cell::get)
}
