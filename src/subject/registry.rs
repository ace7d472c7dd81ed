use smallvec::SmallVec;

use crate::{completion::Completion, observer::CallComplete, subscription::Slots};

/// One registered observer.
///
/// The value callback sits behind its own scope pointer so a broadcast can
/// run it after the registry has been released.
pub(crate) struct Entry<NP, C> {
  pub(crate) next: NP,
  pub(crate) complete: Option<C>,
}

/// The observers of a subject, in registration order, plus its terminal
/// state.
///
/// Once `terminal` is set the registry is empty and stays empty.
pub struct Registry<NP, C: CallComplete> {
  observers: Slots<Entry<NP, C>>,
  terminal: Option<Completion<C::Err>>,
}

impl<NP, C: CallComplete> Default for Registry<NP, C> {
  fn default() -> Self { Self { observers: Slots::default(), terminal: None } }
}

impl<NP, C: CallComplete> Registry<NP, C> {
  #[inline]
  pub fn len(&self) -> usize { self.observers.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.observers.is_empty() }

  #[inline]
  pub fn is_terminated(&self) -> bool { self.terminal.is_some() }

  #[inline]
  pub fn terminal(&self) -> Option<&Completion<C::Err>> { self.terminal.as_ref() }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.observers.contains(id) }

  #[inline]
  pub(crate) fn add(&mut self, entry: Entry<NP, C>) -> usize { self.observers.add(entry) }

  #[inline]
  pub(crate) fn reserve_id(&mut self) -> usize { self.observers.reserve_id() }

  /// The caller drops the returned entry once the registry is released.
  #[inline]
  pub(crate) fn remove(&mut self, id: usize) -> Option<Entry<NP, C>> { self.observers.remove(id) }

  /// Value callbacks of every active observer, in registration order.
  pub(crate) fn snapshot(&self) -> SmallVec<[NP; 4]>
  where
    NP: Clone,
  {
    self
      .observers
      .iter()
      .map(|entry| entry.next.clone())
      .collect()
  }

  /// Record the terminal signal and hand back every observer that must be
  /// told about it. Returns `None` if the registry was already terminal.
  pub(crate) fn terminate(
    &mut self, completion: Completion<C::Err>,
  ) -> Option<SmallVec<[Entry<NP, C>; 4]>> {
    if self.terminal.is_some() {
      return None;
    }
    self.terminal = Some(completion);
    Some(self.observers.drain().collect())
  }
}
