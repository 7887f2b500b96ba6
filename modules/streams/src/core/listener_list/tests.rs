use alloc::{rc::Rc, vec::Vec};
use core::cell::RefCell;

use super::ListenerList;

fn recorder(log: &Rc<RefCell<Vec<u32>>>, tag: u32) -> Rc<dyn Fn(&u32)> {
  let log = log.clone();
  Rc::new(move |value: &u32| log.borrow_mut().push(tag * 100 + *value))
}

#[test]
fn snapshot_preserves_registration_order() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut list = ListenerList::new();
  list.add(recorder(&log, 1), false);
  list.add(recorder(&log, 2), false);

  for callback in list.snapshot() {
    callback(&7);
  }
  assert_eq!(*log.borrow(), [107, 207]);
  assert_eq!(list.len(), 2);
}

#[test]
fn once_listeners_are_dropped_after_one_snapshot() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut list = ListenerList::new();
  list.add(recorder(&log, 1), true);
  list.add(recorder(&log, 2), false);

  assert_eq!(list.snapshot().len(), 2);
  assert_eq!(list.snapshot().len(), 1);
}

#[test]
fn remove_reports_whether_the_listener_existed() {
  let log = Rc::new(RefCell::new(Vec::new()));
  let mut list = ListenerList::new();
  let id = list.add(recorder(&log, 1), false);
  assert!(list.remove(id));
  assert!(!list.remove(id));
  assert!(list.snapshot().is_empty());
  list.add(recorder(&log, 3), false);
  list.clear();
  assert_eq!(list.len(), 0);
}
