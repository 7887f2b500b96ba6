#[cfg(test)]
mod tests;

use alloc::{rc::Rc, vec::Vec};

use super::ListenerId;

/// Shared listener callback.
pub(crate) type Listener<A> = Rc<dyn Fn(&A)>;

struct ListenerEntry<A: ?Sized> {
  id:       ListenerId,
  once:     bool,
  callback: Listener<A>,
}

/// Ordered registry of listeners for one event.
///
/// Emission works on a snapshot: callers take the snapshot while holding the endpoint borrow,
/// release it, then invoke the callbacks. Listeners added during an emission only see later events.
pub(crate) struct ListenerList<A: ?Sized> {
  entries: Vec<ListenerEntry<A>>,
}

impl<A: ?Sized> ListenerList<A> {
  pub(crate) const fn new() -> Self {
    Self { entries: Vec::new() }
  }

  pub(crate) fn add(&mut self, callback: Listener<A>, once: bool) -> ListenerId {
    let id = ListenerId::next();
    self.entries.push(ListenerEntry { id, once, callback });
    id
  }

  pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
    let before = self.entries.len();
    self.entries.retain(|entry| entry.id != id);
    before != self.entries.len()
  }

  /// Returns the callbacks to invoke for one emission and drops `once` entries.
  pub(crate) fn snapshot(&mut self) -> Vec<Listener<A>> {
    let callbacks = self.entries.iter().map(|entry| entry.callback.clone()).collect();
    self.entries.retain(|entry| !entry.once);
    callbacks
  }

  pub(crate) fn clear(&mut self) {
    self.entries.clear();
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.len()
  }
}
