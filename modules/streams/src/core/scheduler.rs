//! Cooperative single-threaded task scheduler.

#[cfg(test)]
mod tests;

use alloc::{boxed::Box, collections::VecDeque, rc::Rc};

use sluice_utils_rs::core::sync::{LocalShared, SharedAccess};

use super::DriveOutcome;

type Task = Box<dyn FnOnce()>;

struct SchedulerState {
  tasks:     VecDeque<Task>,
  wake_hook: Option<Rc<dyn Fn()>>,
  executed:  u64,
}

/// FIFO of deferred tasks shared by every endpoint built on it.
///
/// Tasks never run inside [`schedule`](Self::schedule); they run one at a time when the host
/// calls [`drive`](Self::drive) or [`run_until_idle`](Self::run_until_idle). A task may schedule
/// further tasks, which run after everything already queued.
pub struct Scheduler {
  inner: LocalShared<SchedulerState>,
}

impl Scheduler {
  /// Creates an empty scheduler.
  #[must_use]
  pub fn new() -> Self {
    Self { inner: LocalShared::new(SchedulerState { tasks: VecDeque::new(), wake_hook: None, executed: 0 }) }
  }

  /// Enqueues `task` to run after all previously scheduled tasks.
  pub fn schedule(&self, task: impl FnOnce() + 'static) {
    let hook = self.inner.with_write(|state| {
      let was_idle = state.tasks.is_empty();
      state.tasks.push_back(Box::new(task));
      if was_idle { state.wake_hook.clone() } else { None }
    });
    if let Some(hook) = hook {
      hook();
    }
  }

  /// Runs the oldest pending task.
  pub fn drive(&self) -> DriveOutcome {
    let task = self.inner.with_write(|state| {
      let task = state.tasks.pop_front();
      if task.is_some() {
        state.executed += 1;
      }
      task
    });
    match task {
      | Some(task) => {
        task();
        DriveOutcome::Progressed
      },
      | None => DriveOutcome::Idle,
    }
  }

  /// Runs tasks until none are pending and returns how many ran.
  pub fn run_until_idle(&self) -> usize {
    let mut ran = 0;
    while self.drive() == DriveOutcome::Progressed {
      ran += 1;
    }
    ran
  }

  /// Runs at most `max_tasks` tasks and returns how many ran.
  pub fn run_for(&self, max_tasks: usize) -> usize {
    let mut ran = 0;
    while ran < max_tasks && self.drive() == DriveOutcome::Progressed {
      ran += 1;
    }
    ran
  }

  /// Returns the number of tasks waiting to run.
  #[must_use]
  pub fn pending_tasks(&self) -> usize {
    self.inner.with_read(|state| state.tasks.len())
  }

  /// Returns the number of tasks run since creation.
  #[must_use]
  pub fn executed_tasks(&self) -> u64 {
    self.inner.with_read(|state| state.executed)
  }

  /// Installs a hook called whenever a task is scheduled on an idle queue.
  ///
  /// Hosts use it to wake whatever loop drives the scheduler.
  pub fn set_wake_hook(&self, hook: impl Fn() + 'static) {
    self.inner.with_write(|state| state.wake_hook = Some(Rc::new(hook)));
  }

  /// Removes the wake hook.
  pub fn clear_wake_hook(&self) {
    self.inner.with_write(|state| state.wake_hook = None);
  }

  /// Returns `true` when both handles refer to the same scheduler.
  #[must_use]
  pub fn ptr_eq(&self, other: &Self) -> bool {
    self.inner.ptr_eq(&other.inner)
  }
}

impl Clone for Scheduler {
  fn clone(&self) -> Self {
    Self { inner: self.inner.clone() }
  }
}

impl Default for Scheduler {
  fn default() -> Self {
    Self::new()
  }
}
