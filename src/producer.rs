//! Adapters that feed external event sources into a publisher.
//!
//! An external source (a timer, a channel fed by some OS notification
//! callback, a socket) is modelled as a [`Stream`]. [`forward`] turns such a
//! stream into a future that pushes every item into a subject; spawn it on
//! whatever executor the application already runs.
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use futures::{executor::block_on, stream};
//! use rxsubject::{prelude::*, producer::forward};
//!
//! let subject = Subject::local::<i32, Infallible>();
//! let seen = Rc::new(RefCell::new(vec![]));
//! let c_seen = seen.clone();
//! let _sub = subject.subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! block_on(forward(stream::iter(1..4), subject.clone()));
//!
//! assert_eq!(*seen.borrow(), vec![1, 2, 3]);
//! assert!(subject.is_terminated());
//! ```

use std::{
  future::Future,
  pin::Pin,
  task::{Context, Poll},
};

use futures::{ready, Stream};
use pin_project_lite::pin_project;

use crate::publisher::Publisher;

/// Push every item of `stream` into `publisher`, then complete it.
///
/// Forwarding stops as soon as the publisher has terminated, whoever
/// terminated it; the stream is not polled again after that.
pub fn forward<S, P>(stream: S, publisher: P) -> Forward<S, P>
where
  S: Stream,
  P: Publisher<Item = S::Item>,
{
  Forward { stream, publisher }
}

/// Like [`forward`], for a fallible stream: the first `Err` terminates the
/// publisher with `Completion::Failed`.
///
/// [`Completion::Failed`]: crate::completion::Completion::Failed
pub fn forward_result<S, P, Item, Err>(stream: S, publisher: P) -> ForwardResult<S, P>
where
  S: Stream<Item = Result<Item, Err>>,
  P: Publisher<Item = Item, Err = Err>,
{
  ForwardResult { stream, publisher }
}

pin_project! {
    /// Future returned by [`forward`].
    #[must_use = "futures do nothing unless polled"]
    pub struct Forward<S, P> {
        #[pin]
        stream: S,
        publisher: P,
    }
}

pin_project! {
    /// Future returned by [`forward_result`].
    #[must_use = "futures do nothing unless polled"]
    pub struct ForwardResult<S, P> {
        #[pin]
        stream: S,
        publisher: P,
    }
}

impl<S, P> Future for Forward<S, P>
where
  S: Stream,
  P: Publisher<Item = S::Item>,
{
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut this = self.project();
    loop {
      if this.publisher.is_terminated() {
        return Poll::Ready(());
      }
      match ready!(this.stream.as_mut().poll_next(cx)) {
        Some(value) => this.publisher.send(value),
        None => {
          this.publisher.complete();
          return Poll::Ready(());
        }
      }
    }
  }
}

impl<S, P, Item, Err> Future for ForwardResult<S, P>
where
  S: Stream<Item = Result<Item, Err>>,
  P: Publisher<Item = Item, Err = Err>,
{
  type Output = ();

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let mut this = self.project();
    loop {
      if this.publisher.is_terminated() {
        return Poll::Ready(());
      }
      match ready!(this.stream.as_mut().poll_next(cx)) {
        Some(Ok(value)) => this.publisher.send(value),
        Some(Err(err)) => {
          this.publisher.error(err);
          return Poll::Ready(());
        }
        None => {
          this.publisher.complete();
          return Poll::Ready(());
        }
      }
    }
  }
}

/// A stream of tick counts `0, 1, 2, ...`, one every `period`.
///
/// The first tick fires one `period` after the stream is first polled.
#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
pub fn interval(period: std::time::Duration) -> impl Stream<Item = usize> {
  use futures::StreamExt;

  futures_time::stream::interval(futures_time::time::Duration::from(period))
    .enumerate()
    .map(|(tick, _)| tick)
}

#[cfg(test)]
mod tests {
  use std::{cell::RefCell, convert::Infallible, rc::Rc};

  use futures::{executor::block_on, stream, StreamExt};

  use super::*;
  use crate::prelude::*;

  #[test]
  fn forward_sends_then_completes() {
    let subject = Subject::local::<i32, Infallible>();
    let seen = Rc::new(RefCell::new(vec![]));
    let done = Rc::new(RefCell::new(None));

    let _sub = subject.subscribe_all(
      {
        let seen = seen.clone();
        move |v| seen.borrow_mut().push(v)
      },
      {
        let done = done.clone();
        move |c| *done.borrow_mut() = Some(c)
      },
    );

    block_on(forward(stream::iter(vec![1, 2, 3]), subject.clone()));

    assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    assert_eq!(*done.borrow(), Some(Completion::Finished));
  }

  #[test]
  fn forward_stops_pulling_once_terminated() {
    let subject = Subject::local::<i32, Infallible>();
    let pulled = Rc::new(RefCell::new(0));

    let _sub = subject.subscribe({
      let subject = subject.clone();
      move |v| {
        if v == 2 {
          subject.complete();
        }
      }
    });

    let source = stream::iter(1..=5).inspect({
      let pulled = pulled.clone();
      move |_| *pulled.borrow_mut() += 1
    });
    block_on(forward(source, subject.clone()));

    assert_eq!(*pulled.borrow(), 2);
  }

  #[test]
  fn forward_result_fails_on_first_error() {
    let subject = Subject::local::<i32, &'static str>();
    let seen = Rc::new(RefCell::new(vec![]));
    let done = Rc::new(RefCell::new(None));

    let _sub = subject.subscribe_all(
      {
        let seen = seen.clone();
        move |v| seen.borrow_mut().push(v)
      },
      {
        let done = done.clone();
        move |c| *done.borrow_mut() = Some(c)
      },
    );

    let source = stream::iter(vec![Ok(1), Err("broken pipe"), Ok(3)]);
    block_on(forward_result(source, subject.clone()));

    assert_eq!(*seen.borrow(), vec![1]);
    assert_eq!(*done.borrow(), Some(Completion::Failed("broken pipe")));
  }

  #[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
  #[test]
  fn interval_ticks_into_subject() {
    use std::time::Duration;

    let subject = Subject::local::<usize, Infallible>();
    let seen = Rc::new(RefCell::new(vec![]));
    let c_seen = seen.clone();
    let _sub = subject.subscribe(move |v| c_seen.borrow_mut().push(v));

    block_on(forward(interval(Duration::from_millis(1)).take(3), subject.clone()));

    assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    assert_eq!(subject.completion(), Some(Completion::Finished));
  }
}
