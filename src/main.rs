mod cli;
mod error;
mod models;
mod output;
mod scrapers;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use output::JsonFileSink;
use scrapers::{ChromeSession, CrawlOrchestrator, DatasetSink, SiteSelectors};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "booking_scout=debug,info" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("🏨 Booking Scout - hotel and review crawler");

    let query = cli.query();
    query.validate(chrono::Local::now().date_naive())?;

    let site = match &cli.selectors {
        Some(path) => SiteSelectors::from_json_file(path)
            .with_context(|| format!("Failed to load selectors from {}", path.display()))?,
        None => SiteSelectors::default(),
    };
    let selectors = site.compile()?;
    let config = cli.config();
    let limits = cli.limits();
    let sink = JsonFileSink::for_query(&cli.output_dir, &query);
    info!("Results will be written to {}", sink.path().display());

    // Ctrl-C only flags the crawl; it stops before the next listing.
    // The terminal delivers the same SIGINT to Chrome, so the listing in
    // progress can still fail and is then skipped rather than saved half done.
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Stopped by user, finishing the current listing and saving...");
                cancel.store(true, Ordering::SeqCst);
            }
        });
    }

    let headless = !cli.headful;
    let timeout = cli.timeout();
    let crawl_query = query.clone();
    let report = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let session = ChromeSession::launch(headless, timeout)?;
        let report = CrawlOrchestrator::new(&session, &selectors, &config).run(
            &crawl_query,
            limits,
            &cancel,
        )?;
        Ok(report)
    })
    .await
    .context("Crawl task panicked")??;

    for skipped in &report.skipped {
        warn!("Skipped {}: {}", skipped.url, skipped.reason);
    }
    if report.interrupted {
        info!("Crawl interrupted, saving data collected so far");
    }

    sink.persist(&report.records).await?;
    info!(
        "✅ {} of {} listings saved to {}",
        report.records.len(),
        report.discovered,
        sink.describe()
    );

    Ok(())
}
