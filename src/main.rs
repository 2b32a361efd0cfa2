//! Entry point: CLI parsing, logging setup, mode dispatch, exit codes.

use clap::Parser;
use std::process;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};
use welcomail::config::Config;
use welcomail::prelude::*;
use welcomail::runner;

/// Directory for rotating log files
const LOG_DIR: &str = "logs";
/// How many rotated log files to keep
const LOG_BACKUP_COUNT: usize = 5;

/// Send welcome emails to new users, or a single test email.
#[derive(Debug, Parser)]
#[command(name = "welcomail", version, about)]
struct Args {
	/// Interval in seconds between checks
	#[arg(long, default_value_t = 60)]
	interval: u64,

	/// Send a single test email and exit
	#[arg(long, requires = "test_email")]
	test: bool,

	/// The email address to send the test email to
	#[arg(long)]
	test_email: Option<String>,
}

/// Timestamped leveled lines to stdout and to rotating files simultaneously.
fn init_logging() -> Result<()> {
	let file_appender = tracing_appender::rolling::Builder::new()
		.rotation(tracing_appender::rolling::Rotation::DAILY)
		.filename_prefix("welcomail")
		.filename_suffix("log")
		.max_log_files(LOG_BACKUP_COUNT)
		.build(LOG_DIR)
		.map_err(|e| Error::Config(format!("failed to open log directory '{}': {}", LOG_DIR, e)))?;

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(fmt::layer())
		.with(fmt::layer().with_ansi(false).with_writer(file_appender))
		.init();
	Ok(())
}

async fn run(args: Args) -> Result<()> {
	let config = Config::from_env()?;

	if args.test {
		let Some(to) = args.test_email.as_deref() else {
			return Err(Error::Usage(
				"please provide an email address with the --test-email argument".to_string(),
			));
		};
		runner::run_test_send(&config, to).await
	} else {
		let shutdown = CancellationToken::new();
		let signal = shutdown.clone();
		tokio::spawn(async move {
			if tokio::signal::ctrl_c().await.is_ok() {
				info!("Interrupt received");
				signal.cancel();
			}
		});

		runner::run_service(&config, Duration::from_secs(args.interval), shutdown).await
	}
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	dotenvy::dotenv().ok();
	let args = Args::parse();

	if let Err(e) = init_logging() {
		eprintln!("{}", e);
		process::exit(1);
	}

	if let Err(e) = run(args).await {
		error!("{}", e);
		process::exit(1);
	}
}

// vim: ts=4
