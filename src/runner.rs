//! Scheduler loop and mode entry points.
//!
//! Service mode connects to the store once, then alternates poll cycles with
//! an interval sleep until the shutdown token is cancelled. Test mode performs
//! exactly one render+send to a literal address and never touches the store.

use crate::config::Config;
use crate::email::{Mailer, TemplateEngine};
use crate::prelude::*;
use crate::processor::{self, BatchProcessor};
use crate::store::MongoStore;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fixed relative path of the welcome template
pub const TEMPLATE_PATH: &str = "templates/welcome_email.html.hbs";

/// Placeholder first name for test-mode sends
pub const TEST_FIRST_NAME: &str = "Test User";

/// Service mode: acquire the store connection (fatal on failure), then poll
/// until interrupted.
pub async fn run_service(
	config: &Config,
	interval: Duration,
	shutdown: CancellationToken,
) -> Result<()> {
	let store = MongoStore::connect(&config.store_uri, config.store_db.as_deref()).await?;
	let templates = TemplateEngine::load(Path::new(TEMPLATE_PATH))?;
	let mailer = Mailer::new(config)?;
	let processor = BatchProcessor { store: Arc::new(store), templates, mailer };

	info!("Starting continuous check for new users every {} seconds", interval.as_secs());
	run(&processor, interval, shutdown).await
}

/// The polling loop itself, separated from connection setup so tests can
/// drive it with a fake store and a fake clock.
pub async fn run(
	processor: &BatchProcessor,
	interval: Duration,
	shutdown: CancellationToken,
) -> Result<()> {
	loop {
		if shutdown.is_cancelled() {
			info!("Interrupted, exiting gracefully");
			return Ok(());
		}

		let stats = processor.run_cycle().await?;
		debug!(?stats, "Poll cycle finished");

		info!("Sleeping for {} seconds before next check", interval.as_secs());
		tokio::select! {
			() = tokio::time::sleep(interval) => (),
			() = shutdown.cancelled() => {
				info!("Interrupted, exiting gracefully");
				return Ok(());
			}
		}
	}
}

/// Test mode: one render+send to the given address, zero store interaction.
pub async fn run_test_send(config: &Config, to: &str) -> Result<()> {
	let templates = TemplateEngine::load(Path::new(TEMPLATE_PATH))?;
	let mailer = Mailer::new(config)?;

	info!("Sending test email to {}...", to);
	processor::send_welcome(&templates, &mailer, to, TEST_FIRST_NAME).await?;
	info!("Test email sent to {} successfully", to);
	Ok(())
}

// vim: ts=4
