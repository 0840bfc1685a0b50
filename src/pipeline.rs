use std::fs::File;
use std::io::{self, BufRead, BufReader};

use tracing::{debug, error, info};

use crate::collector::Collector;
use crate::error::{Error, Result};
use crate::report::Report;
use crate::scanner::Scanner;
use crate::settings::{Settings, Source};

/// Counters kept while draining a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub lines: u64,
    pub matched: u64,
    pub accepted: u64,
}

/// Opens the configured source for line reads.
pub fn open(source: &Source) -> Result<Box<dyn BufRead>> {
    match source {
        Source::Stdin => {
            info!("Reading from STDIN");
            Ok(Box::new(io::stdin().lock()))
        }
        Source::File(path) => {
            info!(path = %path.display(), "Reading from file");
            let file = File::open(path)
                .map_err(|e| Error::configuration(format!("cannot open {}: {}", path.display(), e)))?;
            Ok(Box::new(BufReader::new(file)))
        }
    }
}

/// Reads lines, extracts keys and feeds them to a collector one at a time.
pub struct Pipeline<R, C> {
    source: R,
    scanner: Scanner,
    collector: C,
    count: usize,
    stats: PipelineStats,
}

impl<R: BufRead, C: Collector> Pipeline<R, C> {
    pub fn new(source: R, scanner: Scanner, collector: C, settings: &Settings) -> Self {
        Pipeline {
            source,
            scanner,
            collector,
            count: settings.count,
            stats: PipelineStats::default(),
        }
    }

    pub fn collector(&self) -> &C {
        &self.collector
    }

    pub fn collector_mut(&mut self) -> &mut C {
        &mut self.collector
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Handles one raw line. Uninteresting lines never reach the collector.
    pub fn feed(&mut self, line: &[u8]) -> Result<()> {
        self.stats.lines += 1;
        let key = match self.scanner.extract(line) {
            Ok(key) => key,
            Err(Error::NoInterest) => return Ok(()),
            Err(e) => return Err(e),
        };
        self.stats.matched += 1;
        if self.collector.insert(&key) {
            self.stats.accepted += 1;
        }
        Ok(())
    }

    /// Drains the source, then ranks what the collector holds.
    pub fn run(&mut self) -> Result<Report> {
        let mut line = Vec::new();
        loop {
            line.clear();
            let read = self.source.read_until(b'\n', &mut line).map_err(|e| {
                error!(error = %e, lines = self.stats.lines, "read failed");
                Error::Stream(e)
            })?;
            if read == 0 {
                break;
            }
            self.feed(&line)?;
        }

        info!(
            lines = self.stats.lines,
            matched = self.stats.matched,
            accepted = self.stats.accepted,
            "stream exhausted"
        );

        let report = Report::new(self.count, self.collector.top(self.count));
        if !report.is_complete() {
            debug!(
                requested = report.requested(),
                found = report.entries().len(),
                "Not enough yet..."
            );
        }
        Ok(report)
    }
}
