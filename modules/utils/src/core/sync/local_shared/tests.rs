use crate::core::sync::{LocalShared, SharedAccess};

#[test]
fn clones_observe_the_same_value() {
  let shared = LocalShared::new(1_u32);
  let cloned = shared.clone();
  cloned.with_write(|value| *value = 7);
  assert_eq!(shared.with_read(|value| *value), 7);
  assert!(shared.ptr_eq(&cloned));
}

#[test]
fn weak_handle_upgrades_while_strong_alive() {
  let shared = LocalShared::new(5_u32);
  let weak = shared.downgrade();
  let upgraded = weak.upgrade().expect("value alive");
  assert!(upgraded.ptr_eq(&shared));
  assert_eq!(shared.strong_count(), 2);
}

#[test]
fn weak_handle_fails_after_drop() {
  let shared = LocalShared::new(5_u32);
  let weak = shared.downgrade();
  drop(shared);
  assert!(weak.upgrade().is_none());
}

#[test]
fn distinct_allocations_are_not_equal() {
  let left = LocalShared::new(0_u8);
  let right = LocalShared::new(0_u8);
  assert!(!left.ptr_eq(&right));
  assert!(!left.downgrade().ptr_eq(&right.downgrade()));
}
