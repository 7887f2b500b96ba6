//! Tokio host loop for the cooperative scheduler.

extern crate std;

#[cfg(test)]
mod tests;

use core::{future::Future, pin::pin};
use std::sync::Arc;

use tokio::sync::Notify;
use tracing::trace;

use crate::core::Scheduler;

/// Clears the wake hook when the driver returns or is dropped mid-flight.
struct WakeHookGuard<'a> {
  scheduler: &'a Scheduler,
}

impl Drop for WakeHookGuard<'_> {
  fn drop(&mut self) {
    self.scheduler.clear_wake_hook();
  }
}

/// Runs `scheduler` tasks and polls `future` until it completes.
///
/// Tasks are drained in bursts; between bursts the driver parks on a [`Notify`] that the
/// scheduler's wake hook signals, so it yields to the runtime while nothing is runnable. Meant for
/// a current-thread runtime or a `LocalSet`, since endpoints are not `Send`.
pub async fn drive_until<F: Future>(scheduler: &Scheduler, future: F) -> F::Output {
  let notify = Arc::new(Notify::new());
  {
    let notify = notify.clone();
    scheduler.set_wake_hook(move || notify.notify_one());
  }
  let _guard = WakeHookGuard { scheduler };
  let mut future = pin!(future);
  loop {
    let ran = scheduler.run_until_idle();
    if ran > 0 {
      trace!(ran, "scheduler burst drained");
    }
    tokio::select! {
      biased;
      output = &mut future => return output,
      () = notify.notified() => {},
    }
  }
}
