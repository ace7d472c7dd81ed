use super::Subscription;

/// A type-erased subscription for single-threaded code.
///
/// Lets handles of different concrete types live in one collection, most
/// commonly a [`SubscriptionGroup`](super::SubscriptionGroup).
///
/// # Examples
///
/// ```rust
/// use std::convert::Infallible;
///
/// use rxsubject::prelude::*;
///
/// let numbers = Subject::local::<i32, Infallible>();
/// let words = Subject::local::<String, Infallible>();
///
/// let mut subs: Vec<BoxedSubscription> = vec![
///   BoxedSubscription::new(numbers.subscribe(|_| {})),
///   BoxedSubscription::new(words.subscribe(|_| {})),
/// ];
///
/// for sub in subs.iter_mut() {
///   sub.unsubscribe();
/// }
/// assert!(numbers.is_empty() && words.is_empty());
/// ```
pub struct BoxedSubscription(Box<dyn Subscription>);

/// A type-erased subscription that can move across threads.
pub struct BoxedSubscriptionSend(Box<dyn Subscription + Send>);

impl BoxedSubscription {
  #[inline]
  pub fn new(subscription: impl Subscription + 'static) -> Self { Self(Box::new(subscription)) }
}

impl BoxedSubscriptionSend {
  #[inline]
  pub fn new(subscription: impl Subscription + Send + 'static) -> Self {
    Self(Box::new(subscription))
  }
}

/// Converts a subscription into the boxed form a group stores.
pub trait IntoBoxedSubscription<Target> {
  fn into_boxed(self) -> Target;
}

impl<T: Subscription + 'static> IntoBoxedSubscription<BoxedSubscription> for T {
  #[inline]
  fn into_boxed(self) -> BoxedSubscription { BoxedSubscription::new(self) }
}

impl<T: Subscription + Send + 'static> IntoBoxedSubscription<BoxedSubscriptionSend> for T {
  #[inline]
  fn into_boxed(self) -> BoxedSubscriptionSend { BoxedSubscriptionSend::new(self) }
}

impl Subscription for BoxedSubscription {
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl Subscription for BoxedSubscriptionSend {
  #[inline]
  fn unsubscribe(&mut self) { self.0.unsubscribe() }

  #[inline]
  fn is_closed(&self) -> bool { self.0.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, rc::Rc};

  use super::*;

  struct MockSubscription {
    cancels: Rc<Cell<usize>>,
  }

  impl Subscription for MockSubscription {
    fn unsubscribe(&mut self) { self.cancels.set(self.cancels.get() + 1); }

    fn is_closed(&self) -> bool { self.cancels.get() > 0 }
  }

  #[test]
  fn boxed_delegates() {
    let cancels = Rc::new(Cell::new(0));
    let mut boxed = BoxedSubscription::new(MockSubscription { cancels: cancels.clone() });

    assert!(!boxed.is_closed());
    boxed.unsubscribe();
    assert!(boxed.is_closed());
    assert_eq!(cancels.get(), 1);
  }

  #[test]
  fn send_box_is_send() {
    fn assert_send<T: Send>(_: &T) {}
    let boxed = BoxedSubscriptionSend::new(crate::subscription::SubscriptionGroup::<
      BoxedSubscriptionSend,
    >::new());
    assert_send(&boxed);
  }
}
