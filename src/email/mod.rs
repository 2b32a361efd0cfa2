//! Email message value, template rendering, and SMTP delivery.

pub mod sender;
pub mod template;

pub use sender::{MailTransport, Mailer};
pub use template::TemplateEngine;

/// Subject line for every welcome email
pub const WELCOME_SUBJECT: &str = "Welcome!";

/// Email message to be sent. Ephemeral: constructed per send, never persisted.
#[derive(Debug, Clone)]
pub struct EmailMessage {
	pub to: String,
	pub subject: String,
	pub text_body: String,
	pub html_body: Option<String>,
}

// vim: ts=4
