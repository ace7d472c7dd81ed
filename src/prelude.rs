//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Terminal signal
pub use crate::completion::Completion;
// Producers
#[cfg(all(feature = "timer", not(target_arch = "wasm32")))]
pub use crate::producer::interval;
pub use crate::producer::{forward, forward_result};
// Publisher trait
pub use crate::publisher::Publisher;
// Subject
pub use crate::subject::{
  LocalRegistry, LocalSubject, LocalSubjectSubscription, Registry, SharedRegistry, SharedSubject,
  SharedSubjectSubscription, Subject, SubjectSubscription,
};
// Subscription
pub use crate::subscription::{
  BoxedSubscription, BoxedSubscriptionSend, IntoBoxedSubscription, Subscription,
  SubscriptionGroup,
};
