use alloc::boxed::Box;

use crate::core::ConsumerKind;

pub(crate) type DataHandler<T> = Box<dyn FnMut(T)>;

/// Consumer currently attached to a readable endpoint.
pub(crate) enum ConsumerSlot<T> {
  Vacant,
  /// `handler` is `None` while it is being invoked.
  Flowing {
    handler:    Option<DataHandler<T>>,
    generation: u64,
  },
  Iterating,
}

impl<T> ConsumerSlot<T> {
  pub(crate) const fn kind(&self) -> Option<ConsumerKind> {
    match self {
      | Self::Vacant => None,
      | Self::Flowing { .. } => Some(ConsumerKind::Flowing),
      | Self::Iterating => Some(ConsumerKind::Iterating),
    }
  }

  pub(crate) const fn has_handler(&self) -> bool {
    matches!(self, Self::Flowing { handler: Some(_), .. })
  }
}
