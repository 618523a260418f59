use dynarray::{DynamicArray, Error, reserve};
use libc::sbrk;

/// Prints the current program break using `sbrk(0)`.
/// Large buffers usually come from `mmap` instead, so the break only moves
/// while the array is small.
unsafe fn print_program_break(label: &str) {
  println!(
    "[{}] PID = {}, program break (sbrk(0)) = {:?}",
    label,
    std::process::id(),
    unsafe { sbrk(0) },
  );
}

fn print_array<T>(
  step: &str,
  array: &DynamicArray<T>,
) {
  println!(
    "[{}] len = {}, capacity = {}, buffer = {:?}",
    step,
    array.len(),
    array.capacity(),
    array.as_ptr(),
  );
}

fn main() -> Result<(), Error> {
  unsafe { print_program_break("start") };

  // --------------------------------------------------------------------
  // 1) Push into an empty array and watch the capacity double.
  //    Every change of capacity is a new buffer at a new address.
  // --------------------------------------------------------------------
  let mut array = DynamicArray::new();
  let mut last_capacity = array.capacity();

  println!("\n[1] push_back 0..=1000");
  for i in 0..=1000u64 {
    array.push_back(i)?;
    if array.capacity() != last_capacity {
      print_array("1", &array);
      last_capacity = array.capacity();
    }
  }

  unsafe { print_program_break("after pushes") };

  // --------------------------------------------------------------------
  // 2) Reserve ahead: one allocation up front, no growth afterwards.
  // --------------------------------------------------------------------
  let mut reserved = DynamicArray::<u64>::with_reserve(reserve(1024))?;
  let address = reserved.as_ptr();

  println!("\n[2] push_back into a reserved array");
  for i in 0..1024 {
    reserved.push_back(i)?;
  }
  print_array("2", &reserved);
  println!(
    "[2] buffer moved? {}",
    if reserved.as_ptr() == address { "No" } else { "Yes" }
  );

  // --------------------------------------------------------------------
  // 3) Insert at the front and erase it again. The contents round-trip,
  //    the capacity does not shrink.
  // --------------------------------------------------------------------
  println!("\n[3] insert(0) then erase(0) on a full array");
  reserved.insert(0, u64::MAX)?;
  print_array("3", &reserved);
  reserved.erase(0)?;
  print_array("3", &reserved);
  println!("[3] contents equal to the pushed array? {}", reserved.iter().eq(array.iter().take(1024)));

  // --------------------------------------------------------------------
  // 4) Checked access is bounded by capacity, not length.
  // --------------------------------------------------------------------
  reserved.clear();
  println!("\n[4] after clear: len = {}, at(5) = {:?}", reserved.len(), reserved.at(5));
  println!("[4] at(capacity) = {:?}", reserved.at(reserved.capacity()));

  // --------------------------------------------------------------------
  // 5) End of demo. Both arrays drop here and free their buffers.
  // --------------------------------------------------------------------
  println!("\n[5] End of example.");
  Ok(())
}
