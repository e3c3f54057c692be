use std::{
  collections::{HashSet, VecDeque},
  hash::Hash,
};

/// FIFO queue that accepts each distinct item at most once over its lifetime.
///
/// The seen-set is cumulative: an item that has already been dequeued is
/// still rejected by later [`enqueue`](Self::enqueue) calls, so shared or
/// mutually-referential types are processed once per run.
#[derive(Debug, Clone)]
pub struct VisitationQueue<T> {
  seen: HashSet<T>,
  pending: VecDeque<T>,
}

impl<T> Default for VisitationQueue<T> {
  fn default() -> Self {
    Self {
      seen: HashSet::new(),
      pending: VecDeque::new(),
    }
  }
}

impl<T: Clone + Eq + Hash> VisitationQueue<T> {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns `true` when the item was accepted.
  pub fn enqueue(&mut self, item: T) -> bool {
    if !self.seen.insert(item.clone()) {
      return false;
    }
    self.pending.push_back(item);
    true
  }

  pub fn dequeue(&mut self) -> Option<T> {
    self.pending.pop_front()
  }

  #[must_use]
  pub fn has_seen(&self, item: &T) -> bool {
    self.seen.contains(item)
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.pending.is_empty()
  }

  #[must_use]
  pub fn pending_len(&self) -> usize {
    self.pending.len()
  }

  #[must_use]
  pub fn seen_len(&self) -> usize {
    self.seen.len()
  }
}
