/// A ranked row reported by a [`Collector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T = String> {
    pub item: T,
    pub count: u64,
}

impl<T> Entry<T> {
    pub fn new(item: T, count: u64) -> Self {
        Entry { item, count }
    }
}

/// The capability set a bounded-memory frequency summary offers to the
/// ingestion pipeline. Other summaries (lossy counting, count-min with a heap)
/// can stand in for [`crate::MisraGries`] without touching the pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait Collector {
    /// Offers one occurrence of `key`. Returns `false` when the key was not
    /// admitted to the table.
    fn insert(&mut self, key: &str) -> bool;

    /// Up to `k` entries, highest count first. Never mutates the summary.
    fn top(&self, k: usize) -> Vec<Entry>;

    /// Forgets everything tracked so far.
    fn reset(&mut self);

    /// Drops the `count` lowest entries, or about half when `None`.
    /// Returns how many were dropped.
    fn purge(&mut self, count: Option<usize>) -> usize;
}
