//! The producer side of a subject.

use crate::completion::Completion;

/// Something values can be pushed into.
///
/// Every subject is a publisher. Producers such as
/// [`forward`](crate::producer::forward) are written against this trait so
/// they feed local and shared subjects alike.
///
/// Pushing into a publisher that has already terminated is not an error:
/// the value or signal is silently dropped.
pub trait Publisher {
  type Item;
  type Err;

  /// Deliver `value` to every current observer, synchronously and in
  /// registration order.
  fn send(&self, value: Self::Item);

  /// Terminate with `completion`. Only the first call has any effect.
  fn send_completion(&self, completion: Completion<Self::Err>);

  fn is_terminated(&self) -> bool;

  #[inline]
  fn complete(&self) { self.send_completion(Completion::Finished) }

  #[inline]
  fn error(&self, err: Self::Err) { self.send_completion(Completion::Failed(err)) }
}
