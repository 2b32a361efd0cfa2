//! User store gateway.
//!
//! The `UserStore` trait is the seam between the batch processor and MongoDB;
//! tests implement it with an in-memory fake. `MongoStore` is the production
//! implementation over the official driver.
//!
//! A user record only ever transitions from unsent to sent; there is no
//! reverse transition in this system.

use crate::prelude::*;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use mongodb::Client;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

/// Fixed collection holding user records
const USERS_COLLECTION: &str = "users";

/// Persisted user record. Created by an external registration process; this
/// job only reads it and conditionally sets the sent flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
	#[serde(rename = "_id")]
	pub id: ObjectId,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	#[serde(rename = "firstName", default, skip_serializing_if = "Option::is_none")]
	pub first_name: Option<String>,
	#[serde(rename = "welcomeEmailSent", default, skip_serializing_if = "Option::is_none")]
	pub welcome_email_sent: Option<bool>,
}

impl UserRecord {
	/// An absent flag counts as not sent.
	pub fn is_pending(&self) -> bool {
		!self.welcome_email_sent.unwrap_or(false)
	}
}

/// Records where `welcomeEmailSent` is false or absent
fn pending_filter() -> Document {
	doc! {
		"$or": [
			{ "welcomeEmailSent": { "$exists": false } },
			{ "welcomeEmailSent": false },
		]
	}
}

#[async_trait]
pub trait UserStore: Send + Sync {
	/// Count of records awaiting a welcome email.
	async fn count_pending(&self) -> Result<u64>;

	/// Lazy point-in-time cursor over the pending records. Finite, not
	/// restartable.
	async fn fetch_pending(&self) -> Result<BoxStream<'static, Result<UserRecord>>>;

	/// Set `welcomeEmailSent = true` on exactly one record. Idempotent.
	async fn mark_sent(&self, id: &ObjectId) -> Result<()>;
}

pub struct MongoStore {
	users: mongodb::Collection<UserRecord>,
}

impl MongoStore {
	/// Connect and ping once. Failure here is fatal at startup; failures on
	/// later operations are per-candidate and leave the user retried on the
	/// next cycle.
	pub async fn connect(uri: &str, db_name: Option<&str>) -> Result<Self> {
		let client = Client::with_uri_str(uri).await?;
		let db = match db_name {
			Some(name) => client.database(name),
			None => client.default_database().ok_or_else(|| {
				Error::Config(
					"MONGODB_DATABASE is not set and the connection URI names no default database"
						.to_string(),
				)
			})?,
		};

		db.run_command(doc! { "ping": 1 }).await?;
		info!("Connected to MongoDB database '{}'", db.name());

		Ok(Self { users: db.collection(USERS_COLLECTION) })
	}
}

#[async_trait]
impl UserStore for MongoStore {
	async fn count_pending(&self) -> Result<u64> {
		Ok(self.users.count_documents(pending_filter()).await?)
	}

	async fn fetch_pending(&self) -> Result<BoxStream<'static, Result<UserRecord>>> {
		let cursor = self.users.find(pending_filter()).await?;
		Ok(cursor.map(|res| res.map_err(Error::from)).boxed())
	}

	async fn mark_sent(&self, id: &ObjectId) -> Result<()> {
		self.users
			.update_one(doc! { "_id": *id }, doc! { "$set": { "welcomeEmailSent": true } })
			.await?;
		Ok(())
	}
}


// vim: ts=4
