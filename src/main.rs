use std::io;

use anyhow::{Context, Result};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use observer::{pipeline, MisraGries, Pipeline, Scanner, Settings};

fn main() -> Result<()> {
    let settings = Settings::load().context("failed to resolve settings")?;

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log.to_string()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    info!("Starting...");
    debug!(pattern = %settings.pattern, limit = settings.limit, "Scanning");

    let scanner = Scanner::new(&settings).context("failed to compile pattern")?;
    let summary: MisraGries = MisraGries::new(settings.limit).context("failed to build summary")?;
    let source = pipeline::open(&settings.source).context("failed to open source")?;

    let mut pipeline = Pipeline::new(source, scanner, summary, &settings);
    let report = pipeline
        .run()
        .with_context(|| format!("failed while reading {}", settings.source))?;

    match report.write_to(&mut io::stdout().lock()) {
        // a reader that stopped early (`| head`) is not a failure
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        result => result.context("failed to write report"),
    }
}
