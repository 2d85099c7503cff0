pub mod entity;
pub mod password;

use std::ops::Deref;

use serde::Serialize;

pub use self::entity::{NewUser, ProfileChanges, User};
use crate::domain::message::MessageWithAuthor;

/// A user together with what their profile page shows.
#[derive(Debug, Serialize)]
pub struct UserProfile {
	pub(crate) user: User,
	pub messages: Vec<MessageWithAuthor>,
	pub message_count: i64,
	pub following_count: i64,
	pub followers_count: i64,
	pub likes_count: i64,
}

impl Deref for UserProfile {
	type Target = User;
	fn deref(&self) -> &Self::Target {
		&self.user
	}
}
