use alloc::{rc::Rc, vec::Vec};
use core::cell::RefCell;

use super::DoneCallback;
use crate::core::StreamError;

fn recording() -> (DoneCallback, Rc<RefCell<Vec<Result<(), StreamError>>>>) {
  let log = Rc::new(RefCell::new(Vec::new()));
  let sink = log.clone();
  (DoneCallback::new(move |result| sink.borrow_mut().push(result)), log)
}

#[test]
fn succeed_settles_with_ok() {
  let (done, log) = recording();
  done.succeed();
  assert_eq!(*log.borrow(), [Ok(())]);
}

#[test]
fn fail_settles_with_the_error() {
  let (done, log) = recording();
  done.fail(StreamError::consumer("disk full"));
  assert_eq!(*log.borrow(), [Err(StreamError::consumer("disk full"))]);
}

#[test]
fn dropping_an_unsettled_callback_reports_it() {
  let (done, log) = recording();
  drop(done);
  assert_eq!(*log.borrow(), [Err(StreamError::CallbackDropped)]);
}
