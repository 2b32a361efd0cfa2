//! Batch processor: one poll cycle over the pending candidates.
//!
//! Per cycle: count pending, then for each candidate render, send, and mark.
//! A failure for one candidate never aborts the cycle; the candidate is left
//! unmarked and picked up again on the next poll. A failed mark after a
//! successful send causes a duplicate email next cycle (at-least-once
//! delivery, a known limitation). A candidate with no email address is skipped
//! with a warning and never marked.

use crate::email::{EmailMessage, Mailer, TemplateEngine, WELCOME_SUBJECT};
use crate::prelude::*;
use crate::store::UserStore;
use chrono::{Datelike, Utc};
use futures::StreamExt;
use std::sync::Arc;

/// Placeholder when a record has no first name
pub const FALLBACK_FIRST_NAME: &str = "User";

/// Outcome counters for one poll cycle
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
	pub pending: u64,
	pub sent: u64,
	pub marked: u64,
	pub skipped: u64,
	pub failed: u64,
}

pub struct BatchProcessor {
	pub store: Arc<dyn UserStore>,
	pub templates: TemplateEngine,
	pub mailer: Mailer,
}

impl BatchProcessor {
	/// Run one poll cycle. Errors returned here are query-level (count or
	/// cursor acquisition) and abort the cycle; everything per-candidate is
	/// logged and counted instead.
	pub async fn run_cycle(&self) -> Result<CycleStats> {
		let pending = self.store.count_pending().await?;
		if pending == 0 {
			info!("No new users to send welcome emails to");
			return Ok(CycleStats::default());
		}
		info!("Found {} users to send welcome emails to", pending);

		let mut candidates = self.store.fetch_pending().await?;
		let mut stats = CycleStats { pending, ..CycleStats::default() };

		while let Some(candidate) = candidates.next().await {
			let user = match candidate {
				Ok(user) => user,
				Err(e) => {
					error!(error = %e, "Failed to read candidate from store");
					stats.failed += 1;
					continue;
				}
			};

			let email = match user.email.as_deref() {
				Some(addr) if !addr.is_empty() => addr,
				_ => {
					warn!("User with ID {} has no email address, skipping", user.id);
					stats.skipped += 1;
					continue;
				}
			};
			let first_name = user.first_name.as_deref().unwrap_or(FALLBACK_FIRST_NAME);

			match send_welcome(&self.templates, &self.mailer, email, first_name).await {
				Ok(()) => {
					stats.sent += 1;
					match self.store.mark_sent(&user.id).await {
						Ok(()) => {
							stats.marked += 1;
							info!("Marked user {} as emailed", email);
						}
						Err(e) => {
							error!(error = %e, "Failed to mark user {} as emailed", email);
						}
					}
				}
				Err(e) => {
					stats.failed += 1;
					error!(
						error = %e,
						"Failed to send welcome email to {}, will retry next cycle", email
					);
				}
			}
		}

		Ok(stats)
	}
}

/// Render and dispatch one welcome email. Shared by the batch processor and
/// the one-shot test mode.
pub async fn send_welcome(
	templates: &TemplateEngine,
	mailer: &Mailer,
	to: &str,
	first_name: &str,
) -> Result<()> {
	let year = Utc::now().year();
	let html_body = templates.render(first_name, year)?;

	let message = EmailMessage {
		to: to.to_string(),
		subject: WELCOME_SUBJECT.to_string(),
		text_body: format!(
			"Hi {},\n\nWelcome aboard! This message is best viewed in an HTML-capable mail client.",
			first_name
		),
		html_body: Some(html_body),
	};

	mailer.send(&message).await
}

// vim: ts=4
