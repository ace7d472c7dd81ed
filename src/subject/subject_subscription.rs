use std::fmt;

use super::registry::Registry;
use crate::{
  observer::CallComplete,
  rc::{RcDeref, RcDerefMut, WeakArc, WeakRc},
  subscription::Subscription,
};

/// A non-owning reference back to a subject's observers.
pub trait Detach {
  /// Remove the observer registered under `id`, if it is still there.
  fn detach(&self, id: usize);

  fn is_attached(&self, id: usize) -> bool;
}

macro_rules! impl_detach_for_weak {
  ($weak:ident) => {
    impl<NP, C: CallComplete> Detach for $weak<Registry<NP, C>> {
      fn detach(&self, id: usize) {
        let Some(registry) = self.upgrade() else { return };
        let removed = registry.rc_deref_mut().remove(id);
        if removed.is_some() {
          log::trace!("observer {id} detached");
        }
        // `removed` drops here, after the registry is released: its
        // callbacks may own handles to this very subject.
        drop(removed);
      }

      fn is_attached(&self, id: usize) -> bool {
        let Some(registry) = self.upgrade() else { return false };
        let attached = registry.rc_deref().contains(id);
        attached
      }
    }
  };
}

impl_detach_for_weak!(WeakRc);
impl_detach_for_weak!(WeakArc);

/// Handle for one observer registered on a subject.
///
/// The handle keeps the observer registered for as long as it lives:
/// dropping it cancels the registration. It never keeps the subject itself
/// alive.
///
/// After the subject terminates, or after the subject is dropped, the
/// handle is inert and reports [`is_closed`](Subscription::is_closed).
#[must_use = "dropping a subscription cancels it; keep it or store it in a SubscriptionGroup"]
pub struct SubjectSubscription<W: Detach> {
  source: W,
  id: usize,
  closed: bool,
}

impl<W: Detach> SubjectSubscription<W> {
  pub(crate) fn new(source: W, id: usize) -> Self { Self { source, id, closed: false } }

  /// A handle that was never registered, e.g. for a late subscriber.
  pub(crate) fn inert(source: W, id: usize) -> Self { Self { source, id, closed: true } }

  /// The id this observer is registered under.
  #[inline]
  pub fn id(&self) -> usize { self.id }
}

impl<W: Detach> Subscription for SubjectSubscription<W> {
  fn unsubscribe(&mut self) {
    if !self.closed {
      self.closed = true;
      self.source.detach(self.id);
    }
  }

  fn is_closed(&self) -> bool { self.closed || !self.source.is_attached(self.id) }
}

impl<W: Detach> Drop for SubjectSubscription<W> {
  fn drop(&mut self) { self.unsubscribe() }
}

impl<W: Detach> fmt::Debug for SubjectSubscription<W> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SubjectSubscription")
      .field("id", &self.id)
      .field("is_closed", &self.is_closed())
      .finish()
  }
}
