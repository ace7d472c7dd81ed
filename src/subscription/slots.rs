use smallvec::SmallVec;

/// An insertion-ordered container whose items are addressed by a unique id.
///
/// Ids are handed out from a monotonically increasing counter and never
/// reused, so a stale id can at worst miss. Removal keeps the relative
/// order of the remaining items.
///
/// `SmallVec<[_; 2]>` keeps the common case of one or two items off the
/// heap.
///
/// # Examples
///
/// ```rust
/// use rxsubject::subscription::Slots;
///
/// let mut slots = Slots::default();
/// let a = slots.add("a");
/// let b = slots.add("b");
/// assert_ne!(a, b);
///
/// assert_eq!(slots.remove(a), Some("a"));
/// assert_eq!(slots.remove(a), None);
/// assert_eq!(slots.iter().copied().collect::<Vec<_>>(), vec!["b"]);
/// ```
pub struct Slots<U> {
  next_id: usize,
  items: SmallVec<[(usize, U); 2]>,
}

impl<U> Default for Slots<U> {
  fn default() -> Self { Self { next_id: 0, items: SmallVec::new() } }
}

impl<U> Slots<U> {
  #[inline]
  pub fn new() -> Self { Self::default() }

  /// Append an item and return its id.
  #[inline]
  pub fn add(&mut self, item: U) -> usize {
    let id = self.reserve_id();
    self.items.push((id, item));
    id
  }

  /// Burn the next id without storing anything under it.
  #[inline]
  pub fn reserve_id(&mut self) -> usize {
    let id = self.next_id;
    self.next_id += 1;
    id
  }

  pub fn remove(&mut self, id: usize) -> Option<U> {
    self
      .items
      .iter()
      .position(|(i, _)| *i == id)
      .map(|pos| self.items.remove(pos).1)
  }

  #[inline]
  pub fn contains(&self, id: usize) -> bool { self.items.iter().any(|(i, _)| *i == id) }

  #[inline]
  pub fn len(&self) -> usize { self.items.len() }

  #[inline]
  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Keep only the items `f` approves of.
  #[inline]
  pub fn retain(&mut self, mut f: impl FnMut(&U) -> bool) { self.items.retain(|(_, item)| f(item)) }

  /// Take every item out, in insertion order.
  #[inline]
  pub fn drain(&mut self) -> impl Iterator<Item = U> + '_ {
    self.items.drain(..).map(|(_, item)| item)
  }

  #[inline]
  pub fn iter(&self) -> impl Iterator<Item = &U> { self.items.iter().map(|(_, item)| item) }
}
