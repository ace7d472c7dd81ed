//! Subject: a hot event stream that both receives and broadcasts.
//!
//! A producer pushes values with [`Publisher::send`] and ends the stream
//! with [`Publisher::send_completion`]; every observer registered at that
//! moment is called synchronously, in registration order, on the calling
//! thread. Late subscribers miss earlier values but still learn how the
//! stream ended.

mod registry;
mod subject_subscription;

use smallvec::SmallVec;

pub use self::{
  registry::Registry,
  subject_subscription::{Detach, SubjectSubscription},
};
use self::registry::Entry;
use crate::{
  completion::Completion,
  observer::{BoxedComplete, BoxedCompleteSend, BoxedNext, BoxedNextSend, CallComplete, CallNext},
  publisher::Publisher,
  rc::{Downgrade, MutArc, MutRc, RcDerefMut, WeakArc, WeakRc},
};

// ============================================================================
// Type Aliases
// ============================================================================

/// Observer registry of a single-threaded subject.
pub type LocalRegistry<Item, Err> = Registry<MutRc<BoxedNext<Item>>, BoxedComplete<Err>>;

/// Observer registry of a subject shared across threads.
pub type SharedRegistry<Item, Err> = Registry<MutArc<BoxedNextSend<Item>>, BoxedCompleteSend<Err>>;

/// A subject for single-threaded use. Observers may be any `'static`
/// closure.
pub type LocalSubject<Item, Err> = Subject<MutRc<LocalRegistry<Item, Err>>>;

/// A `Send + Sync` subject. Observers must be `Send`.
pub type SharedSubject<Item, Err> = Subject<MutArc<SharedRegistry<Item, Err>>>;

pub type LocalSubjectSubscription<Item, Err> = SubjectSubscription<WeakRc<LocalRegistry<Item, Err>>>;

pub type SharedSubjectSubscription<Item, Err> =
  SubjectSubscription<WeakArc<SharedRegistry<Item, Err>>>;

/// Subject: multicasts every value it is sent to all of its observers.
///
/// The subject is parameterized by the scope pointer `P` that holds its
/// [`Registry`]: `Rc<RefCell<_>>` for [`LocalSubject`] and
/// `Arc<Mutex<_>>` for [`SharedSubject`]. Cloning a subject yields another
/// handle to the same stream.
///
/// # Example
///
/// ```rust
/// use std::{cell::RefCell, convert::Infallible, rc::Rc};
///
/// use rxsubject::prelude::*;
///
/// let subject = Subject::local::<&'static str, Infallible>();
/// let seen = Rc::new(RefCell::new(vec![]));
///
/// let c_seen = seen.clone();
/// let _a = subject.subscribe(move |v| c_seen.borrow_mut().push(v));
/// subject.send("a");
/// subject.complete();
/// subject.send("u");
///
/// assert_eq!(*seen.borrow(), vec!["a"]);
/// ```
///
/// # Terminal state
///
/// The first `send_completion` wins. It is delivered once to every current
/// observer, the observer set is cleared, and from then on `send` and
/// further completions are silently dropped. A subscriber arriving later
/// receives the stored completion immediately and is never registered.
///
/// # Re-entrancy
///
/// The registry is never borrowed or locked while observer callbacks run, so
/// callbacks may subscribe, cancel, send or complete on the same subject:
///
/// - an observer added during a broadcast does not see the value in flight;
/// - an observer cancelled during a broadcast still sees the value in flight
///   and nothing after it;
/// - if a callback terminates the subject, the rest of the broadcast is
///   abandoned;
/// - a nested `send` skips any observer whose value callback is already
///   running further up the stack, and logs a warning.
///
/// # Threads
///
/// `SharedSubject` may be used from many threads, but concurrent `send`
/// calls are not ordered against each other. Each observer runs one value
/// at a time: a send from another thread waits for the observer's current
/// callback to return, so every value still arrives exactly once. Only a
/// nested send on the same thread skips a busy observer.
pub struct Subject<P> {
  observers: P,
}

// ============================================================================
// Factory Methods
// ============================================================================

impl Subject<()> {
  /// Create a new single-threaded subject.
  pub fn local<Item, Err>() -> LocalSubject<Item, Err> { Subject::default() }

  /// Create a new thread-safe subject.
  pub fn shared<Item, Err>() -> SharedSubject<Item, Err> { Subject::default() }
}

// ============================================================================
// Standard Traits
// ============================================================================

impl<P: Clone> Clone for Subject<P> {
  fn clone(&self) -> Self { Self { observers: self.observers.clone() } }
}

impl<P: Default> Default for Subject<P> {
  fn default() -> Self { Self { observers: P::default() } }
}

// ============================================================================
// Core Operations
// ============================================================================

impl<P, NP, N, C> Subject<P>
where
  P: RcDerefMut<Target = Registry<NP, C>> + Downgrade,
  P::Weak: Detach,
  NP: RcDerefMut<Target = N> + Clone + From<N>,
  N: CallNext,
  C: CallComplete,
  C::Err: Clone,
{
  /// Number of observers currently registered.
  pub fn subscriber_count(&self) -> usize { self.observers.rc_deref().len() }

  pub fn is_empty(&self) -> bool { self.observers.rc_deref().is_empty() }

  /// The terminal signal, once the subject has ended.
  pub fn completion(&self) -> Option<Completion<C::Err>> {
    self.observers.rc_deref().terminal().cloned()
  }

  /// Detach the observer registered under `id`. Unknown ids are ignored.
  ///
  /// Normally reached through [`SubjectSubscription`].
  pub fn cancel(&self, id: usize) { self.observers.downgrade().detach(id) }

  fn attach(&self, next: N, complete: Option<C>) -> SubjectSubscription<P::Weak> {
    let source = self.observers.downgrade();
    let mut registry = self.observers.rc_deref_mut();
    let terminal = registry.terminal().cloned();
    if let Some(completion) = terminal {
      let id = registry.reserve_id();
      drop(registry);
      log::debug!("late subscriber {id} served the stored completion");
      if let Some(complete) = complete {
        complete.call_complete(completion);
      }
      return SubjectSubscription::inert(source, id);
    }

    let id = registry.add(Entry { next: NP::from(next), complete });
    drop(registry);
    log::trace!("observer {id} attached");
    SubjectSubscription::new(source, id)
  }
}

fn deliver<NP, N>(next: &NP, value: N::Item)
where
  NP: RcDerefMut<Target = N>,
  N: CallNext,
{
  match next.reentrant_deref_mut() {
    Some(mut callback) => CallNext::call_next(&mut *callback, value),
    None => log::warn!("observer skipped: its value callback is already running on this thread"),
  }
}

impl<P, NP, N, C> Publisher for Subject<P>
where
  P: RcDerefMut<Target = Registry<NP, C>>,
  NP: RcDerefMut<Target = N> + Clone,
  N: CallNext,
  N::Item: Clone,
  C: CallComplete,
  C::Err: Clone,
{
  type Item = N::Item;
  type Err = C::Err;

  fn send(&self, value: N::Item) {
    let targets = {
      let registry = self.observers.rc_deref();
      if registry.is_terminated() {
        log::debug!("value dropped: subject already terminated");
        return;
      }
      registry.snapshot()
    };

    // Clone for every observer but the last, which gets the moved value.
    let mut iter = targets.into_iter().peekable();
    while let Some(next) = iter.next() {
      if self.is_terminated() {
        return;
      }
      if iter.peek().is_some() {
        deliver(&next, value.clone());
      } else {
        deliver(&next, value);
        break;
      }
    }
  }

  fn send_completion(&self, completion: Completion<C::Err>) {
    let finished = self
      .observers
      .rc_deref_mut()
      .terminate(completion.clone());
    let Some(entries) = finished else {
      log::debug!("completion dropped: subject already terminated");
      return;
    };
    log::trace!("subject terminated, notifying {} observer(s)", entries.len());

    let completes: SmallVec<[C; 4]> = entries
      .into_iter()
      .filter_map(|entry| entry.complete)
      .collect();
    let mut iter = completes.into_iter().peekable();
    while let Some(complete) = iter.next() {
      if iter.peek().is_some() {
        complete.call_complete(completion.clone());
      } else {
        complete.call_complete(completion);
        break;
      }
    }
  }

  fn is_terminated(&self) -> bool { self.observers.rc_deref().is_terminated() }
}

// ============================================================================
// Subscribe
// ============================================================================

/// Generates `subscribe` / `subscribe_all` for one scope. The scopes differ
/// only in whether the callbacks must be `Send`.
macro_rules! impl_subscribe_for_subject {
  ($ptr:ident, $weak:ident, $next:ident, $complete:ident $(, $send:ident)?) => {
    impl<Item: 'static, Err: Clone + 'static> Subject<$ptr<Registry<$ptr<$next<Item>>, $complete<Err>>>> {
      /// Register a value callback. The terminal signal is not observed.
      ///
      /// The returned handle must be kept: dropping it cancels the
      /// registration.
      pub fn subscribe<F>(
        &self, on_next: F,
      ) -> SubjectSubscription<$weak<Registry<$ptr<$next<Item>>, $complete<Err>>>>
      where
        F: FnMut(Item) $(+ $send)? + 'static,
      {
        let next: $next<Item> = Box::new(on_next);
        self.attach(next, None)
      }

      /// Register a value callback and a completion callback.
      ///
      /// `on_completion` runs at most once, with `Finished` or
      /// `Failed(err)`. On a subject that has already terminated it runs
      /// immediately and `on_next` is never called.
      pub fn subscribe_all<F, G>(
        &self, on_next: F, on_completion: G,
      ) -> SubjectSubscription<$weak<Registry<$ptr<$next<Item>>, $complete<Err>>>>
      where
        F: FnMut(Item) $(+ $send)? + 'static,
        G: FnOnce(Completion<Err>) $(+ $send)? + 'static,
      {
        let next: $next<Item> = Box::new(on_next);
        let complete: $complete<Err> = Box::new(on_completion);
        self.attach(next, Some(complete))
      }
    }
  };
}

impl_subscribe_for_subject!(MutRc, WeakRc, BoxedNext, BoxedComplete);
impl_subscribe_for_subject!(MutArc, WeakArc, BoxedNextSend, BoxedCompleteSend, Send);

// ============================================================================
// Tests
// ============================================================================
