//! Startup configuration.
//!
//! Options come from three layers, highest precedence first: command line
//! flags, a JSON config file, built-in defaults. They are resolved once into an
//! immutable [`Settings`] that is handed to the scanner, summary and pipeline.
//!
//! ```json
//! {
//!     "source": "/var/log/nginx/access.log",
//!     "pattern": "^(\\S+)",
//!     "count": 20,
//!     "log": "info",
//!     "limit": 10000
//! }
//! ```

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;

use crate::error::{Error, Result};
use crate::misra_gries::requested_count;
use crate::scanner::DEFAULT_PATTERN;

pub const DEFAULT_CONFIG_PATH: &str = "observer.json";
pub const DEFAULT_COUNT: usize = 10;
pub const DEFAULT_LIMIT: usize = 5000;
pub const STDIN_MARKER: &str = "-";

/// Find interesting things in a stream and count them.
#[derive(Parser, Debug, Default)]
#[command(name = "observer")]
#[command(about = "Report the most frequent interesting values in a line-oriented stream")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error, off)
    #[arg(short, long)]
    pub log: Option<String>,

    /// Source to read from. Use "-" for stdin
    #[arg(short, long)]
    pub source: Option<String>,

    /// Regex with one capture group selecting the interesting part of a line
    #[arg(long)]
    pub pattern: Option<String>,

    /// Report this many top entries
    #[arg(long, allow_negative_numbers = true)]
    pub count: Option<i64>,

    /// Maximum number of distinct values tracked at once
    #[arg(long)]
    pub limit: Option<usize>,
}

/// Keys accepted in the config file. All are optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub source: Option<String>,
    pub pattern: Option<String>,
    pub count: Option<i64>,
    pub log: Option<String>,
    pub limit: Option<i64>,
}

impl FileConfig {
    /// Reads `path`. A missing file yields the empty config unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                return Ok(FileConfig::default());
            }
            Err(e) => {
                return Err(Error::configuration(format!(
                    "cannot read config file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        serde_json::from_str(&content).map_err(|source| Error::ConfigFile {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Where lines are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    fn parse(value: &str) -> Self {
        if value == STDIN_MARKER {
            Source::Stdin
        } else {
            Source::File(PathBuf::from(value))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Stdin => write!(f, "STDIN"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: Source,
    pub pattern: String,
    pub count: usize,
    pub log: LevelFilter,
    pub limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            source: Source::Stdin,
            pattern: DEFAULT_PATTERN.to_string(),
            count: DEFAULT_COUNT,
            log: LevelFilter::WARN,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Settings {
    /// Parses the process arguments and resolves them against the config file.
    pub fn load() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    pub fn from_args(args: Args) -> Result<Self> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path, true)?,
            None => FileConfig::load(Path::new(DEFAULT_CONFIG_PATH), false)?,
        };
        Self::resolve(args, file)
    }

    /// Layers `args` over `file` over the defaults.
    pub fn resolve(args: Args, file: FileConfig) -> Result<Self> {
        let defaults = Settings::default();

        let source = args
            .source
            .or(file.source)
            .map(|s| Source::parse(&s))
            .unwrap_or(defaults.source);

        let pattern = args.pattern.or(file.pattern).unwrap_or(defaults.pattern);

        let count = match args.count.or(file.count) {
            Some(count) => requested_count(count)?,
            None => defaults.count,
        };

        let log = match args.log.or(file.log) {
            Some(level) => parse_level(&level)?,
            None => defaults.log,
        };

        let limit = match (args.limit, file.limit) {
            (Some(limit), _) => limit,
            (None, Some(limit)) => usize::try_from(limit)
                .map_err(|_| Error::configuration(format!("limit must not be negative, got {}", limit)))?,
            (None, None) => defaults.limit,
        };
        if limit < 1 {
            return Err(Error::configuration("limit must be at least 1"));
        }

        Ok(Settings {
            source,
            pattern,
            count,
            log,
            limit,
        })
    }
}

/// Parses a log level name, case-insensitively. `warning` is accepted for `warn`.
pub fn parse_level(value: &str) -> Result<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "critical" => Ok(LevelFilter::ERROR),
        "off" => Ok(LevelFilter::OFF),
        _ => Err(Error::configuration(format!("unknown log level {:?}", value))),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn args(argv: &[&str]) -> Args {
        let mut full = vec!["observer"];
        full.extend_from_slice(argv);
        Args::try_parse_from(full).unwrap()
    }

    fn config_file(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(Args::default(), FileConfig::default()).unwrap();
        assert_eq!(settings.source, Source::Stdin);
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
        assert_eq!(settings.count, 10);
        assert_eq!(settings.log, LevelFilter::WARN);
        assert_eq!(settings.limit, 5000);
    }

    #[test]
    fn test_file_fills_in_defaults() {
        let file = config_file(r#"{"source": "access.log", "count": 3, "log": "DEBUG", "limit": 64}"#);
        let settings = Settings::from_args(args(&["--config", file.path().to_str().unwrap()])).unwrap();

        assert_eq!(settings.source, Source::File(PathBuf::from("access.log")));
        assert_eq!(settings.count, 3);
        assert_eq!(settings.log, LevelFilter::DEBUG);
        assert_eq!(settings.limit, 64);
        assert_eq!(settings.pattern, DEFAULT_PATTERN);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = config_file(r#"{"source": "access.log", "pattern": "(a)", "count": 3, "log": "info"}"#);
        let settings = Settings::from_args(args(&[
            "-c",
            file.path().to_str().unwrap(),
            "-s",
            "-",
            "--pattern",
            "user=(\\w+)",
            "--count",
            "7",
            "-l",
            "warning",
            "--limit",
            "12",
        ]))
        .unwrap();

        assert_eq!(settings.source, Source::Stdin);
        assert_eq!(settings.pattern, "user=(\\w+)");
        assert_eq!(settings.count, 7);
        assert_eq!(settings.log, LevelFilter::WARN);
        assert_eq!(settings.limit, 12);
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let result = Settings::from_args(args(&["--config", path.to_str().unwrap()]));
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    #[test]
    fn test_missing_default_config_is_ignored() {
        let file = FileConfig::load(Path::new("definitely/not/here/observer.json"), false).unwrap();
        assert!(file.source.is_none());
        assert!(file.count.is_none());
    }

    #[test]
    fn test_malformed_config_file() {
        let file = config_file("{ not json");
        let result = FileConfig::load(file.path(), true);
        assert!(matches!(result, Err(Error::ConfigFile { .. })));

        let file = config_file(r#"{"colour": "blue"}"#);
        assert!(matches!(FileConfig::load(file.path(), true), Err(Error::ConfigFile { .. })));
    }

    #[test]
    fn test_negative_count() {
        let result = Settings::resolve(args(&["--count", "-2"]), FileConfig::default());
        assert!(matches!(result, Err(Error::InvalidArgument(_))));

        let file = FileConfig {
            count: Some(-5),
            ..Default::default()
        };
        assert!(matches!(Settings::resolve(Args::default(), file), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_invalid_limit() {
        let result = Settings::resolve(args(&["--limit", "0"]), FileConfig::default());
        assert!(matches!(result, Err(Error::Configuration(_))));

        let file = FileConfig {
            limit: Some(-1),
            ..Default::default()
        };
        assert!(matches!(Settings::resolve(Args::default(), file), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE").unwrap(), LevelFilter::TRACE);
        assert_eq!(parse_level(" Info ").unwrap(), LevelFilter::INFO);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::OFF);
        assert!(matches!(parse_level("loud"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_source_display() {
        assert_eq!(Source::parse("-").to_string(), "STDIN");
        assert_eq!(Source::parse("/tmp/x.log").to_string(), "/tmp/x.log");
    }
}
