use regex::bytes::Regex;
use tracing::trace;

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Matches the first whitespace-delimited token on a line. Byte-oriented, so
/// invalid UTF-8 stays inside the token until it is decoded.
pub const DEFAULT_PATTERN: &str = r"(?-u)^\s*(\S+)";

/// Pulls the interesting part out of each line using a pattern with exactly
/// one capture group.
#[derive(Debug, Clone)]
pub struct Scanner {
    regex: Regex,
}

impl Scanner {
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_pattern(&settings.pattern)
    }

    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::configuration(format!("invalid pattern {:?}: {}", pattern, e)))?;

        // captures_len counts the implicit whole-match group
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(Error::configuration(format!(
                "pattern {:?} must have exactly one capture group, found {}",
                pattern, groups
            )));
        }

        Ok(Scanner { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns the captured key, or [`Error::NoInterest`] when the line does
    /// not match or the capture is empty.
    pub fn extract(&self, line: &[u8]) -> Result<String> {
        let line = trim_line_ending(line);
        let interest = self
            .regex
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_bytes())
            .filter(|bytes| !bytes.is_empty());

        match interest {
            Some(bytes) => Ok(String::from_utf8_lossy(bytes).into_owned()),
            None => {
                trace!(line = %String::from_utf8_lossy(line), "nothing of interest");
                Err(Error::NoInterest)
            }
        }
    }
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_takes_first_token() {
        let scanner = Scanner::with_pattern(DEFAULT_PATTERN).unwrap();
        assert_eq!(scanner.extract(b"10.0.0.1 - - GET /index.html\n").unwrap(), "10.0.0.1");
        assert_eq!(scanner.extract(b"   indented token\r\n").unwrap(), "indented");
    }

    #[test]
    fn test_no_match_is_no_interest() {
        let scanner = Scanner::with_pattern(r"user=(\w+)").unwrap();
        assert!(matches!(scanner.extract(b"anonymous request\n"), Err(Error::NoInterest)));
        assert!(matches!(scanner.extract(b""), Err(Error::NoInterest)));
    }

    #[test]
    fn test_empty_capture_is_no_interest() {
        let scanner = Scanner::with_pattern(r"user=(\w*)").unwrap();
        assert!(matches!(scanner.extract(b"user= logged in"), Err(Error::NoInterest)));
        assert_eq!(scanner.extract(b"user=alice logged in").unwrap(), "alice");
    }

    #[test]
    fn test_blank_line_is_no_interest() {
        let scanner = Scanner::with_pattern(DEFAULT_PATTERN).unwrap();
        assert!(matches!(scanner.extract(b"   \n"), Err(Error::NoInterest)));
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        // byte-oriented classes so the invalid byte stays inside the token
        let scanner = Scanner::with_pattern(r"(?-u)^(\S+)").unwrap();
        let key = scanner.extract(b"ab\xffcd rest").unwrap();
        assert_eq!(key, "ab\u{fffd}cd");
    }

    #[test]
    fn test_default_pattern_keeps_invalid_bytes() {
        let scanner = Scanner::with_pattern(DEFAULT_PATTERN).unwrap();
        assert_eq!(scanner.extract(b"ab\xffcd rest").unwrap(), "ab\u{fffd}cd");
        assert_eq!(scanner.extract(b"\xffcd rest").unwrap(), "\u{fffd}cd");

        // distinct tokens sharing a valid prefix stay distinct
        let first = scanner.extract(b"ab\xffcd rest").unwrap();
        let second = scanner.extract(b"ab\xfezz rest").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_pattern() {
        assert!(matches!(Scanner::with_pattern(r"(unclosed"), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_capture_group_count() {
        assert!(matches!(Scanner::with_pattern(r"\w+"), Err(Error::Configuration(_))));
        assert!(matches!(Scanner::with_pattern(r"(\w+) (\w+)"), Err(Error::Configuration(_))));
        assert!(Scanner::with_pattern(r"(?:GET|PUT) (\S+)").is_ok());
    }
}
