use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_MESSAGE_LEN: usize = 140;

/// Number of messages shown on the home feed and on a profile.
pub const MESSAGE_PAGE_LIMIT: i64 = 100;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
	pub id: i64,
	pub text: String,
	pub timestamp: DateTime<Utc>,
	pub user_id: i64,
}

/// A message joined with the author columns every listing renders.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, sqlx::FromRow)]
pub struct MessageWithAuthor {
	pub id: i64,
	pub text: String,
	pub timestamp: DateTime<Utc>,
	pub user_id: i64,
	pub username: String,
	pub image_url: String,
}
