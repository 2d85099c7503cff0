use serde::{Deserialize, Serialize};

/// Directed edge: `follower_id` follows `followed_id`.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
	pub follower_id: i64,
	pub followed_id: i64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize, sqlx::FromRow)]
pub struct Like {
	pub user_id: i64,
	pub message_id: i64,
}

/// Outcome of toggling a like.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum LikeState {
	Liked,
	Unliked,
}

impl LikeState {
	pub fn is_liked(&self) -> bool {
		matches!(self, LikeState::Liked)
	}
}
