//! Environment-sourced configuration.
//!
//! A single immutable `Config` is built once at entry and passed by reference
//! into every component that needs it. No component reads ambient environment
//! state directly.

use crate::prelude::*;

/// Default sender display name when `FROM_NAME` is not set
const DEFAULT_FROM_NAME: &str = "Your App";

#[derive(Debug, Clone)]
pub struct Config {
	/// MongoDB connection URI (`MONGODB_URI`, required)
	pub store_uri: String,
	/// Database name (`MONGODB_DATABASE`); falls back to the URI's default database
	pub store_db: Option<String>,
	/// SMTP account identifier, also used as the sender address (`SMTP_USERNAME`, required)
	pub smtp_username: String,
	/// SMTP account credential (`SMTP_PASSWORD`, required)
	pub smtp_password: String,
	/// Sender display name (`FROM_NAME`)
	pub from_name: String,
}

impl Config {
	pub fn from_env() -> Result<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	fn from_lookup<F: Fn(&str) -> Option<String>>(get: F) -> Result<Self> {
		let required = |key: &str| {
			get(key)
				.filter(|v| !v.is_empty())
				.ok_or_else(|| Error::Config(format!("{} is not set", key)))
		};

		Ok(Self {
			store_uri: required("MONGODB_URI")?,
			store_db: get("MONGODB_DATABASE").filter(|v| !v.is_empty()),
			smtp_username: required("SMTP_USERNAME")?,
			smtp_password: required("SMTP_PASSWORD")?,
			from_name: get("FROM_NAME")
				.filter(|v| !v.is_empty())
				.unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
	}

	#[test]
	fn test_full_config() {
		let vars = env(&[
			("MONGODB_URI", "mongodb://localhost:27017/app"),
			("MONGODB_DATABASE", "app"),
			("SMTP_USERNAME", "mailer@example.com"),
			("SMTP_PASSWORD", "hunter2"),
			("FROM_NAME", "Example App"),
		]);

		let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
		assert_eq!(config.store_uri, "mongodb://localhost:27017/app");
		assert_eq!(config.store_db.as_deref(), Some("app"));
		assert_eq!(config.smtp_username, "mailer@example.com");
		assert_eq!(config.from_name, "Example App");
	}

	#[test]
	fn test_optional_fields_default() {
		let vars = env(&[
			("MONGODB_URI", "mongodb://localhost:27017/app"),
			("SMTP_USERNAME", "mailer@example.com"),
			("SMTP_PASSWORD", "hunter2"),
		]);

		let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();
		assert!(config.store_db.is_none());
		assert_eq!(config.from_name, DEFAULT_FROM_NAME);
	}

	#[test]
	fn test_missing_uri_is_config_error() {
		let vars = env(&[("SMTP_USERNAME", "mailer@example.com"), ("SMTP_PASSWORD", "hunter2")]);

		let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
		assert!(matches!(err, Error::Config(msg) if msg.contains("MONGODB_URI")));
	}

	#[test]
	fn test_empty_value_treated_as_missing() {
		let vars = env(&[
			("MONGODB_URI", "mongodb://localhost:27017/app"),
			("SMTP_USERNAME", "mailer@example.com"),
			("SMTP_PASSWORD", ""),
		]);

		let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
		assert!(matches!(err, Error::Config(msg) if msg.contains("SMTP_PASSWORD")));
	}
}

// vim: ts=4
