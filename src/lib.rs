//! Welcomail is a batch welcome-email delivery job.
//!
//! It polls a MongoDB user collection for accounts that have not yet received
//! a welcome email, renders a Handlebars HTML template, delivers the message
//! over an authenticated TLS SMTP session, and marks each account as sent.
//!
//! Everything runs sequentially in a single thread of control: one store
//! connection, one SMTP session at a time, one candidate at a time. The only
//! suspension point is the interval sleep between poll cycles.

#![forbid(unsafe_code)]

pub mod config;
pub mod email;
pub mod error;
pub mod prelude;
pub mod processor;
pub mod runner;
pub mod store;

// vim: ts=4
