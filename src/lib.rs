//! # rxsubject: a minimal reactive subject
//!
//! A [`Subject`] is a hot event stream: a producer pushes typed values into
//! it and every observer registered at that moment receives them,
//! synchronously and in registration order. The stream ends with exactly
//! one terminal signal, [`Completion::Finished`] or
//! [`Completion::Failed`], after which nothing more is delivered.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::{cell::RefCell, convert::Infallible, rc::Rc};
//!
//! use rxsubject::prelude::*;
//!
//! let subject = Subject::local::<i32, Infallible>();
//! let seen = Rc::new(RefCell::new(vec![]));
//!
//! let c_seen = seen.clone();
//! let mut sub = subject.subscribe(move |v| c_seen.borrow_mut().push(v));
//!
//! subject.send(1);
//! sub.unsubscribe();
//! subject.send(2);
//!
//! assert_eq!(*seen.borrow(), vec![1]);
//! ```
//!
//! ## Key Concepts
//!
//! | Type | Description |
//! |------|-------------|
//! | [`LocalSubject`] / [`SharedSubject`] | Single-threaded vs thread-safe subject |
//! | [`Publisher`] | The producer side: `send`, `complete`, `error` |
//! | [`SubjectSubscription`] | Cancels its observer on `unsubscribe` or drop |
//! | [`SubscriptionGroup`] | Owns many handles and cancels them together |
//! | [`producer`] | Feeds a `Stream` (timer, channel) into a subject |
//!
//! ## Feature Flags
//!
//! - **`timer`** (default): [`producer::interval`], a periodic tick source
//!
//! [`Subject`]: subject::Subject
//! [`Completion::Finished`]: completion::Completion::Finished
//! [`Completion::Failed`]: completion::Completion::Failed
//! [`LocalSubject`]: subject::LocalSubject
//! [`SharedSubject`]: subject::SharedSubject
//! [`Publisher`]: publisher::Publisher
//! [`SubjectSubscription`]: subject::SubjectSubscription
//! [`SubscriptionGroup`]: subscription::SubscriptionGroup

pub mod completion;
pub mod observer;
pub mod prelude;
pub mod producer;
pub mod publisher;
pub mod rc;
pub mod subject;
pub mod subscription;

pub use prelude::*;
