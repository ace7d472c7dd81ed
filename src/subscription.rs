//! Subscription handles and owning groups of them.
//!
//! Every `subscribe` call returns a handle implementing [`Subscription`].
//! The handle is the only thing keeping its observer registered: cancel it
//! with [`unsubscribe`](Subscription::unsubscribe), drop it, or move it into
//! a [`SubscriptionGroup`] that cancels all of its members together.

mod boxed;
mod group;
mod slots;

pub use boxed::{BoxedSubscription, BoxedSubscriptionSend, IntoBoxedSubscription};
pub use group::SubscriptionGroup;
pub use slots::Slots;

/// A revocable registration.
pub trait Subscription {
  /// Detach from the source. Calling this more than once is a no-op.
  fn unsubscribe(&mut self);

  /// `true` once the registration no longer receives anything.
  fn is_closed(&self) -> bool;

  /// Hand this subscription over to `group`, returning its id there.
  ///
  /// The subscription now lives exactly as long as the group keeps it.
  fn store_in<U>(self, group: &mut SubscriptionGroup<U>) -> usize
  where
    Self: Sized + IntoBoxedSubscription<U>,
    U: Subscription,
  {
    group.add(self.into_boxed())
  }
}
