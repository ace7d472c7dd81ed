use super::{BoxedSubscription, Slots, Subscription};

/// An owning collection of subscriptions that are cancelled together.
///
/// Put every handle an object depends on into one group held by that
/// object; dropping the object drops the group, and dropping the group
/// cancels every handle in it.
///
/// Once the group itself is unsubscribed, anything added afterwards is
/// cancelled on the spot.
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxsubject::prelude::*;
///
/// let subject = Subject::local::<&'static str, Infallible>();
/// {
///   let mut group: SubscriptionGroup = SubscriptionGroup::new();
///   subject.subscribe(|v| println!("{v}")).store_in(&mut group);
///   subject.subscribe(|v| println!("{v}!")).store_in(&mut group);
///   assert_eq!(subject.subscriber_count(), 2);
/// }
/// assert!(subject.is_empty());
/// ```
pub struct SubscriptionGroup<U: Subscription = BoxedSubscription> {
  subscriptions: Slots<U>,
  closed: bool,
  prune_at: usize,
}

/// Group size at which closed members are first swept out.
const PRUNE_THRESHOLD: usize = 8;

impl<U: Subscription> Default for SubscriptionGroup<U> {
  fn default() -> Self {
    Self { subscriptions: Slots::default(), closed: false, prune_at: PRUNE_THRESHOLD }
  }
}

impl<U: Subscription> SubscriptionGroup<U> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Take ownership of `subscription` and return its id within the group.
  pub fn add(&mut self, mut subscription: U) -> usize {
    if self.closed {
      subscription.unsubscribe();
      return self.subscriptions.reserve_id();
    }
    // Handles that closed on their own (their subject terminated, say) are
    // swept out whenever the group doubles, so a long-lived group stays
    // bounded and each add costs amortized O(1) closed checks.
    if self.subscriptions.len() >= self.prune_at {
      self.subscriptions.retain(|s| !s.is_closed());
      self.prune_at = (self.subscriptions.len() * 2).max(PRUNE_THRESHOLD);
    }
    self.subscriptions.add(subscription)
  }

  /// Cancel and forget the subscription stored under `id`.
  pub fn cancel(&mut self, id: usize) {
    if let Some(mut subscription) = self.subscriptions.remove(id) {
      subscription.unsubscribe();
    }
  }

  #[inline]
  pub fn len(&self) -> usize { self.subscriptions.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.subscriptions.is_empty() }
}

impl<U: Subscription> Subscription for SubscriptionGroup<U> {
  fn unsubscribe(&mut self) {
    self.closed = true;
    for mut subscription in self.subscriptions.drain() {
      subscription.unsubscribe();
    }
  }

  #[inline]
  fn is_closed(&self) -> bool { self.closed }
}

impl<U: Subscription> Drop for SubscriptionGroup<U> {
  fn drop(&mut self) { self.unsubscribe(); }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  #[derive(Clone, Default)]
  struct Tracker {
    cancels: Rc<Cell<usize>>,
    closed: Rc<Cell<bool>>,
    checks: Rc<Cell<usize>>,
  }

  impl Subscription for Tracker {
    fn unsubscribe(&mut self) {
      self.cancels.set(self.cancels.get() + 1);
      self.closed.set(true);
    }

    fn is_closed(&self) -> bool {
      self.checks.set(self.checks.get() + 1);
      self.closed.get()
    }
  }

  #[test]
  fn drop_cancels_everything() {
    let a = Tracker::default();
    let b = Tracker::default();
    {
      let mut group = SubscriptionGroup::<Tracker>::new();
      group.add(a.clone());
      group.add(b.clone());
      assert_eq!(group.len(), 2);
    }
    assert_eq!(a.cancels.get(), 1);
    assert_eq!(b.cancels.get(), 1);
  }

  #[test]
  fn cancel_by_id() {
    let a = Tracker::default();
    let b = Tracker::default();
    let mut group = SubscriptionGroup::<Tracker>::new();
    let id = group.add(a.clone());
    group.add(b.clone());

    group.cancel(id);
    group.cancel(id);
    assert_eq!(a.cancels.get(), 1);
    assert_eq!(b.cancels.get(), 0);
    assert_eq!(group.len(), 1);
  }

  #[test]
  fn add_after_unsubscribe_cancels_immediately() {
    let late = Tracker::default();
    let mut group = SubscriptionGroup::<Tracker>::new();
    group.unsubscribe();
    group.add(late.clone());

    assert!(group.is_closed());
    assert!(group.is_empty());
    assert_eq!(late.cancels.get(), 1);
  }

  #[test]
  fn closed_members_are_pruned_on_add() {
    let finished = Tracker::default();
    let mut group = SubscriptionGroup::<Tracker>::new();
    for _ in 0..PRUNE_THRESHOLD {
      group.add(finished.clone());
    }
    finished.closed.set(true);

    group.add(Tracker::default());
    assert_eq!(group.len(), 1);
  }

  #[test]
  fn filling_a_group_checks_members_linearly() {
    let member = Tracker::default();
    let mut group = SubscriptionGroup::<Tracker>::new();
    for _ in 0..256 {
      group.add(member.clone());
    }

    assert_eq!(group.len(), 256);
    assert!(member.checks.get() <= 2 * 256);
  }
}
