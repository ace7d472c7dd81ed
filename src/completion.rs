//! Terminal signal of a subject.
//!
//! A subject ends exactly once, either because the producer is done
//! (`Finished`) or because it hit a failure (`Failed`). Subjects that can
//! never fail use [`Infallible`](std::convert::Infallible) as `Err`, which
//! makes `Failed` unconstructible.

/// The terminal signal delivered to every observer at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Completion<Err> {
  /// The producer completed normally.
  Finished,
  /// The producer stopped with a failure.
  Failed(Err),
}

impl<Err> Completion<Err> {
  #[inline]
  pub fn is_finished(&self) -> bool { matches!(self, Completion::Finished) }

  #[inline]
  pub fn is_failed(&self) -> bool { matches!(self, Completion::Failed(_)) }

  /// Borrow the failure, if any.
  pub fn failure(&self) -> Option<&Err> {
    match self {
      Completion::Finished => None,
      Completion::Failed(err) => Some(err),
    }
  }

  /// Convert the failure type, keeping `Finished` as is.
  pub fn map_err<E2>(self, f: impl FnOnce(Err) -> E2) -> Completion<E2> {
    match self {
      Completion::Finished => Completion::Finished,
      Completion::Failed(err) => Completion::Failed(f(err)),
    }
  }

  /// `Finished` becomes `Ok(())`, `Failed(err)` becomes `Err(err)`.
  pub fn into_result(self) -> Result<(), Err> {
    match self {
      Completion::Finished => Ok(()),
      Completion::Failed(err) => Err(err),
    }
  }
}

impl<Err> From<Result<(), Err>> for Completion<Err> {
  fn from(result: Result<(), Err>) -> Self {
    match result {
      Ok(()) => Completion::Finished,
      Err(err) => Completion::Failed(err),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::convert::Infallible;

  use super::*;

  #[derive(Debug, Clone, PartialEq)]
  enum MyError {
    Failed,
  }

  #[test]
  fn predicates() {
    let done: Completion<MyError> = Completion::Finished;
    let failed = Completion::Failed(MyError::Failed);

    assert!(done.is_finished());
    assert!(!done.is_failed());
    assert!(failed.is_failed());
    assert_eq!(failed.failure(), Some(&MyError::Failed));
    assert_eq!(done.failure(), None);
  }

  #[test]
  fn result_conversion() {
    let failed: Completion<MyError> = Err(MyError::Failed).into();
    assert_eq!(failed.clone().into_result(), Err(MyError::Failed));
    assert_eq!(Completion::<MyError>::from(Ok(())), Completion::Finished);
    assert_eq!(failed.map_err(|_| "boom"), Completion::Failed("boom"));
  }

  #[test]
  fn infallible_only_finishes() {
    let done: Completion<Infallible> = Completion::Finished;
    assert!(done.into_result().is_ok());
  }
}
