use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

/// A keyed table of positive counts that remembers the order keys were first seen
pub(crate) struct CountTable<T> {
    items: HashMap<T, (u64, u64), RandomState>,  // item -> (count, sequence)
    sequence: u64,
}

// Higher count first, then earlier sequence.
fn rank_order(a: &(u64, u64), b: &(u64, u64)) -> Ordering {
    match b.0.cmp(&a.0) {
        Ordering::Equal => a.1.cmp(&b.1),
        other => other,
    }
}

impl<T: Clone + Hash + Eq> CountTable<T> {
    pub(crate) fn with_capacity_and_hasher(capacity: usize, hasher: RandomState) -> Self {
        Self {
            items: HashMap::with_capacity_and_hasher(capacity, hasher),
            sequence: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn get<Q>(&self, item: &Q) -> Option<u64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.get(item).map(|(count, _)| *count)
    }

    /// Bumps the count of a tracked item, returning the new count, or `None`
    /// if the item is not tracked.
    pub(crate) fn increment<Q>(&mut self, item: &Q) -> Option<u64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.items.get_mut(item).map(|(count, _)| {
            *count += 1;
            *count
        })
    }

    /// Starts tracking an item at count 1. The caller checks it is not already present.
    pub(crate) fn insert_new(&mut self, item: T) {
        self.sequence += 1;
        self.items.insert(item, (1, self.sequence));
    }

    /// Decrements every count by one and drops entries that reach zero.
    /// Returns the dropped items.
    pub(crate) fn decrement_all(&mut self) -> Vec<T> {
        let mut dropped = Vec::new();
        self.items.retain(|item, (count, _)| {
            *count -= 1;
            if *count == 0 {
                dropped.push(item.clone());
            }
            *count > 0
        });
        dropped
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
    }

    /// The `k` highest-ranked entries, highest count first, ties in first-seen order.
    pub(crate) fn ranked(&self, k: usize) -> Vec<(&T, u64)> {
        let mut items: Vec<_> = self
            .items
            .iter()
            .map(|(item, &(count, seq))| (item, (count, seq)))
            .collect();

        // Only the first k need a full sort.
        if k < items.len() {
            if k == 0 {
                return Vec::new();
            }
            items.select_nth_unstable_by(k - 1, |(_, a), (_, b)| rank_order(a, b));
            items.truncate(k);
        }
        items.sort_unstable_by(|(_, a), (_, b)| rank_order(a, b));

        items.into_iter().map(|(item, (count, _))| (item, count)).collect()
    }

    /// Removes up to `n` entries, lowest count first, ties by earliest first-seen.
    /// Returns the removed items in removal order.
    pub(crate) fn remove_lowest(&mut self, n: usize) -> Vec<(T, u64)> {
        let n = n.min(self.items.len());
        if n == 0 {
            return Vec::new();
        }

        let mut items: Vec<_> = self
            .items
            .iter()
            .map(|(item, &(count, seq))| (count, seq, item))
            .collect();
        items.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let victims: Vec<T> = items.into_iter().take(n).map(|(_, _, item)| item.clone()).collect();
        victims
            .into_iter()
            .filter_map(|item| self.items.remove(&item).map(|(count, _)| (item, count)))
            .collect()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.items.iter().map(|(item, (count, _))| (item, *count))
    }
}
