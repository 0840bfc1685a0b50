//! Observer finds the most frequent interesting values in an unbounded, line-oriented stream
//! while holding a fixed amount of memory.
//!
//! Each line is matched against a pattern with a single capture group. Captured keys are fed
//! to a Misra-Gries summary that tracks at most `limit` distinct keys. Any key occurring more
//! than `n / (limit + 1)` times in a stream of `n` keys is guaranteed to be tracked, and every
//! reported count underestimates the true count by at most that much.
//!
//! ```
//! use observer::MisraGries;
//!
//! let mut summary: MisraGries = MisraGries::new(2).unwrap();
//! for key in ["a", "b", "a", "c", "a"] {
//!     summary.insert(key);
//! }
//! let top = summary.top(1);
//! assert_eq!(top[0].item, "a");
//! ```

mod collector;
pub use collector::{Collector, Entry};

mod count_table;

mod error;
pub use error::{Error, Result};

pub mod misra_gries;
pub use misra_gries::MisraGries;

pub mod pipeline;
pub use pipeline::{Pipeline, PipelineStats};

mod report;
pub use report::Report;

pub mod scanner;
pub use scanner::Scanner;

pub mod settings;
pub use settings::{Settings, Source};
