//! Access helpers for shared backends guarded by interior mutability.

#[cfg(test)]
mod tests;

/// Abstraction offering scoped access to shared backends.
///
/// # Design
///
/// - Callers do not need to bind the shared handle as `mut`.
/// - The borrow lives only for the duration of the closure. Callbacks that may re-enter the owner must
///   be collected inside the closure and invoked after it returns.
pub trait SharedAccess<B> {
  /// Executes the provided closure with read-only access to the backend.
  fn with_read<R>(&self, f: impl FnOnce(&B) -> R) -> R;

  /// Executes the provided closure with mutable access to the backend.
  fn with_write<R>(&self, f: impl FnOnce(&mut B) -> R) -> R;
}
