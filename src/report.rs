use std::fmt;
use std::io::{self, Write};

use crate::collector::Entry;

const ITEM_WIDTH: usize = 48;

/// The ranking handed out at the end of a stream.
///
/// A report with fewer entries than requested is incomplete and renders only
/// its header, since a short ranking would be misleading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    requested: usize,
    entries: Vec<Entry>,
}

impl Report {
    pub fn new(requested: usize, entries: Vec<Entry>) -> Self {
        Report { requested, entries }
    }

    pub fn requested(&self) -> usize {
        self.requested
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_complete(&self) -> bool {
        self.entries.len() >= self.requested
    }

    /// Renders the report into `out`, surfacing write failures such as a closed pipe.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Top {} elements:", self.requested)?;
        if !self.is_complete() {
            return Ok(());
        }
        for (rank, entry) in self.entries.iter().take(self.requested).enumerate() {
            writeln!(
                f,
                "#{}\t {:<width$} {}",
                rank + 1,
                entry.item,
                entry.count,
                width = ITEM_WIDTH
            )?;
        }
        Ok(())
    }
}
