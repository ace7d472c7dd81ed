//! Observer callback storage.
//!
//! An observer is a pair of callbacks: a value handler that may run many
//! times and an optional completion handler that runs at most once. They are
//! boxed separately so a subject can finish an observer even while that
//! observer's value handler is still on the stack.

use crate::completion::Completion;

// ============================================================================
// Boxed Callback Types
// ============================================================================

/// Value callback for single-threaded subjects.
pub type BoxedNext<Item> = Box<dyn FnMut(Item)>;

/// Value callback for subjects shared across threads.
pub type BoxedNextSend<Item> = Box<dyn FnMut(Item) + Send>;

/// Completion callback for single-threaded subjects.
pub type BoxedComplete<Err> = Box<dyn FnOnce(Completion<Err>)>;

/// Completion callback for subjects shared across threads.
pub type BoxedCompleteSend<Err> = Box<dyn FnOnce(Completion<Err>) + Send>;

// ============================================================================
// Dispatch Traits
// ============================================================================

/// A stored value callback.
pub trait CallNext {
  type Item;

  fn call_next(&mut self, value: Self::Item);
}

/// A stored completion callback, consumed when called.
pub trait CallComplete {
  type Err;

  fn call_complete(self, completion: Completion<Self::Err>);
}

macro_rules! impl_call_for_box {
  ($($send:ident)?) => {
    impl<Item> CallNext for Box<dyn FnMut(Item) $(+ $send)?> {
      type Item = Item;

      #[inline]
      fn call_next(&mut self, value: Item) { (**self)(value) }
    }

    impl<Err> CallComplete for Box<dyn FnOnce(Completion<Err>) $(+ $send)?> {
      type Err = Err;

      #[inline]
      fn call_complete(self, completion: Completion<Err>) { self(completion) }
    }
  };
}

impl_call_for_box!();
impl_call_for_box!(Send);
