use std::io::{self, BufRead};

use observer::{MisraGries, Report, Scanner};

// Reports the top keys of stdin every `window` lines, then starts afresh.
// The summary never expires anything by itself; the caller picks the boundary.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let window: u64 = std::env::args()
        .nth(1)
        .map(|w| w.parse())
        .transpose()?
        .unwrap_or(1_000);

    let scanner = Scanner::with_pattern(observer::scanner::DEFAULT_PATTERN)?;
    let mut summary: MisraGries = MisraGries::new(256)?;

    let mut seen = 0;
    for line in io::stdin().lock().split(b'\n') {
        if let Ok(key) = scanner.extract(&line?) {
            summary.insert(key.as_str());
        }
        seen += 1;
        if seen % window == 0 {
            print!("{}", Report::new(5, summary.top(5)));
            summary.reset();
        }
    }
    print!("{}", Report::new(5, summary.top(5)));
    Ok(())
}
