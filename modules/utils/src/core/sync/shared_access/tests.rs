use alloc::{string::String, vec::Vec};

use crate::core::sync::{LocalShared, SharedAccess};

#[test]
fn with_write_modifies_value() {
  let shared = LocalShared::new(42);
  let result = shared.with_write(|value| {
    *value = 100;
    *value
  });
  assert_eq!(result, 100);
  let current_value = shared.with_read(|value: &i32| *value);
  assert_eq!(current_value, 100);
}

#[test]
fn with_read_returns_derived_value() {
  let shared = LocalShared::new(String::from("sluice"));
  let length = shared.with_read(|value| value.len());
  assert_eq!(length, 6);
}

#[test]
fn callbacks_collected_inside_scope_can_reenter_after_release() {
  let shared = LocalShared::new(Vec::<u32>::new());
  let reentrant = shared.clone();
  let pending: Vec<u32> = shared.with_write(|values| {
    values.push(1);
    values.clone()
  });
  for value in pending {
    reentrant.with_write(|values| values.push(value + 1));
  }
  assert_eq!(shared.with_read(Clone::clone), [1, 2]);
}
