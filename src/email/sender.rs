//! SMTP email delivery using lettre.
//!
//! The relay endpoint is fixed (implicit TLS on port 465); the account
//! identifier and credential come from configuration. The transport sits
//! behind a trait so tests can inject a recording fake.

use crate::config::Config;
use crate::email::EmailMessage;
use crate::prelude::*;
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;

/// Fixed mail-relay endpoint. `relay()` connects on port 465 with wrapper TLS.
const SMTP_RELAY_HOST: &str = "smtp.gmail.com";

/// Transport seam for tests
#[async_trait]
pub trait MailTransport: Send + Sync {
	async fn send_message(&self, message: Message) -> Result<()>;
}

struct SmtpRelay {
	inner: AsyncSmtpTransport<Tokio1Executor>,
}

#[async_trait]
impl MailTransport for SmtpRelay {
	async fn send_message(&self, message: Message) -> Result<()> {
		self.inner
			.send(message)
			.await
			.map(|_| ())
			.map_err(|e| Error::Smtp(e.to_string()))
	}
}

/// Mail dispatcher. One outbound email per successful `send` call; no
/// idempotency guarantee.
pub struct Mailer {
	transport: Arc<dyn MailTransport>,
	from: Mailbox,
}

impl Mailer {
	/// Build a dispatcher over the fixed relay with credentials from config.
	pub fn new(config: &Config) -> Result<Self> {
		let from: Mailbox = format!("{} <{}>", config.from_name, config.smtp_username)
			.parse()
			.map_err(|e| {
				Error::Config(format!("invalid sender address '{}': {}", config.smtp_username, e))
			})?;

		let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(SMTP_RELAY_HOST)
			.map_err(|e| Error::Smtp(format!("failed to configure SMTP relay: {}", e)))?
			.credentials(Credentials::new(
				config.smtp_username.clone(),
				config.smtp_password.clone(),
			))
			.build();

		Ok(Self { transport: Arc::new(SmtpRelay { inner: transport }), from })
	}

	pub fn with_transport(transport: Arc<dyn MailTransport>, from: Mailbox) -> Self {
		Self { transport, from }
	}

	/// Transmit one message. Every transport, authentication, or protocol
	/// failure is reported as `Error::Smtp`; nothing panics past this boundary.
	pub async fn send(&self, message: &EmailMessage) -> Result<()> {
		let to: Mailbox = message.to.parse().map_err(|e| {
			Error::Smtp(format!("invalid recipient address '{}': {}", message.to, e))
		})?;

		let builder = Message::builder()
			.from(self.from.clone())
			.to(to)
			.subject(message.subject.clone());

		let email = if let Some(html_body) = &message.html_body {
			builder.multipart(
				MultiPart::alternative()
					.singlepart(SinglePart::plain(message.text_body.clone()))
					.singlepart(SinglePart::html(html_body.clone())),
			)
		} else {
			builder.singlepart(SinglePart::plain(message.text_body.clone()))
		}
		.map_err(|e| Error::Smtp(format!("failed to build email: {}", e)))?;

		match self.transport.send_message(email).await {
			Ok(()) => {
				info!("Email sent to {} successfully", message.to);
				Ok(())
			}
			Err(e) => {
				warn!("Failed to send email to {}: {}", message.to, e);
				Err(e)
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Mutex;

	struct RecordingTransport {
		sent: Mutex<Vec<Message>>,
	}

	impl RecordingTransport {
		fn new() -> Self {
			Self { sent: Mutex::new(Vec::new()) }
		}
	}

	#[async_trait]
	impl MailTransport for RecordingTransport {
		async fn send_message(&self, message: Message) -> Result<()> {
			self.sent.lock().unwrap().push(message);
			Ok(())
		}
	}

	fn test_mailer(transport: Arc<RecordingTransport>) -> Mailer {
		let from: Mailbox = "Example App <mailer@example.com>".parse().unwrap();
		Mailer::with_transport(transport, from)
	}

	#[tokio::test]
	async fn test_send_builds_multipart_message() {
		let transport = Arc::new(RecordingTransport::new());
		let mailer = test_mailer(transport.clone());

		let message = EmailMessage {
			to: "user@example.com".to_string(),
			subject: "Welcome!".to_string(),
			text_body: "Hi Ada, welcome aboard!".to_string(),
			html_body: Some("<h1>Hi Ada</h1>".to_string()),
		};

		mailer.send(&message).await.unwrap();

		let sent = transport.sent.lock().unwrap();
		assert_eq!(sent.len(), 1);

		let recipients: Vec<String> =
			sent[0].envelope().to().iter().map(|a| a.to_string()).collect();
		assert_eq!(recipients, vec!["user@example.com".to_string()]);

		let raw = String::from_utf8_lossy(&sent[0].formatted()).to_string();
		assert!(raw.contains("Welcome!"));
		assert!(raw.contains("multipart/alternative"));
	}

	#[tokio::test]
	async fn test_invalid_recipient_is_smtp_error() {
		let transport = Arc::new(RecordingTransport::new());
		let mailer = test_mailer(transport.clone());

		let message = EmailMessage {
			to: "not-an-address".to_string(),
			subject: "Welcome!".to_string(),
			text_body: "hi".to_string(),
			html_body: None,
		};

		let err = mailer.send(&message).await.unwrap_err();
		assert!(matches!(err, Error::Smtp(_)));
		assert!(transport.sent.lock().unwrap().is_empty());
	}
}

// vim: ts=4
