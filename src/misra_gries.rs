use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::collector::{Collector, Entry};
use crate::count_table::CountTable;
use crate::error::{Error, Result};

/// Approximate frequent items of a stream using the Misra-Gries summary.
///
/// At most `limit` distinct items are tracked. When an untracked item arrives
/// at a full table, every tracked count is decremented by one and items that
/// reach zero are dropped; the new item is not admitted.
///
/// After `n` offered items, any item occurring more than `n / (limit + 1)`
/// times is still tracked, and every tracked count underestimates the true
/// count by at most [`MisraGries::maximum_error`].
pub struct MisraGries<T = String> {
    table: CountTable<T>,
    limit: usize,
    stream_weight: u64,
    eviction_rounds: u64,
}

impl<T: Clone + Debug + Hash + Eq> MisraGries<T> {
    /// Creates a summary that tracks at most `limit` distinct items.
    pub fn new(limit: usize) -> Result<Self> {
        if limit < 1 {
            return Err(Error::configuration("summary limit must be at least 1"));
        }

        Ok(MisraGries {
            table: CountTable::with_capacity(limit),
            limit,
            stream_weight: 0,
            eviction_rounds: 0,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Tracked count of `item`, if it is tracked.
    pub fn get<Q>(&self, item: &Q) -> Option<u64>
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.table.get(item)
    }

    /// Items offered since creation or the last reset, admitted or not.
    pub fn stream_weight(&self) -> u64 {
        self.stream_weight
    }

    /// Upper bound on how far any tracked count falls below the true count.
    ///
    /// This is the number of eviction rounds, and never exceeds
    /// `stream_weight / (limit + 1)`.
    pub fn maximum_error(&self) -> u64 {
        self.eviction_rounds
    }

    /// Offers one occurrence of `item`. Returns whether it was counted.
    pub fn insert<Q>(&mut self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = T> + ?Sized,
    {
        self.stream_weight += 1;

        if self.table.increment(item).is_some() {
            return true;
        }

        if self.table.len() < self.limit {
            self.table.insert_new(item.to_owned());
            return true;
        }

        let dropped = self.table.decrement_all();
        self.eviction_rounds += 1;
        for item in &dropped {
            debug!(?item, "evicted");
        }
        debug!(dropped = dropped.len(), remaining = self.table.len(), "eviction round");
        false
    }

    /// Up to `k` tracked items, highest count first, ties in first-seen order.
    pub fn top(&self, k: usize) -> Vec<Entry<T>> {
        self.table
            .ranked(k)
            .into_iter()
            .map(|(item, count)| Entry::new(item.clone(), count))
            .collect()
    }

    /// Drops every tracked item and starts a fresh stream.
    pub fn reset(&mut self) {
        debug!(dropped = self.table.len(), "reset");
        self.table.clear();
        self.stream_weight = 0;
        self.eviction_rounds = 0;
    }

    /// Removes the `count` lowest-count items, or `len / 2` (rounded down) when
    /// `count` is `None`. Ties go to the earliest-seen item first.
    pub fn purge(&mut self, count: Option<usize>) -> usize {
        let count = count.unwrap_or(self.table.len() / 2);
        let removed = self.table.remove_lowest(count);
        for (item, tracked) in &removed {
            debug!(?item, count = tracked, "purged");
        }
        debug!(requested = count, removed = removed.len(), "purge");
        removed.len()
    }

    /// Iterates over tracked items in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&T, u64)> {
        self.table.iter()
    }
}

impl Collector for MisraGries<String> {
    fn insert(&mut self, key: &str) -> bool {
        MisraGries::insert(self, key)
    }

    fn top(&self, k: usize) -> Vec<Entry> {
        MisraGries::top(self, k)
    }

    fn reset(&mut self) {
        MisraGries::reset(self)
    }

    fn purge(&mut self, count: Option<usize>) -> usize {
        MisraGries::purge(self, count)
    }
}

/// Converts a signed requested count into one the summary accepts.
pub fn requested_count(value: i64) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::invalid_argument(format!("requested count must not be negative, got {}", value)))
}
