//! Error kinds for the welcome-email job.
//!
//! The variants separate the conditions that are fatal at startup (missing
//! configuration, unreachable store, missing template, bad invocation) from the
//! ones a poll cycle recovers from (a failed send or a failed mark for a single
//! candidate). Callers decide which is which by call site: construction-time
//! errors abort the process, cycle-time errors are logged and the candidate is
//! retried on the next cycle.

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// Missing or invalid configuration value
	Config(String),
	/// Invalid command-line invocation
	Usage(String),
	/// Store connectivity or query/update failure
	Store(String),
	/// SMTP transport, authentication, or protocol failure
	Smtp(String),
	/// Template loading or rendering failure
	Template(String),

	Io(std::io::Error),
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::Config(msg) => write!(f, "configuration error: {}", msg),
			Error::Usage(msg) => write!(f, "usage error: {}", msg),
			Error::Store(msg) => write!(f, "store error: {}", msg),
			Error::Smtp(msg) => write!(f, "smtp error: {}", msg),
			Error::Template(msg) => write!(f, "template error: {}", msg),
			Error::Io(e) => write!(f, "io error: {}", e),
		}
	}
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Self {
		Error::Io(e)
	}
}

impl From<mongodb::error::Error> for Error {
	fn from(e: mongodb::error::Error) -> Self {
		Error::Store(e.to_string())
	}
}

// vim: ts=4
