use chrono::Utc;

use crate::{
	domain::message::{Message, MessageWithAuthor},
	services::response::ServiceError,
};

use super::Repository;

const WITH_AUTHOR: &str = "SELECT messages.id, messages.text, messages.timestamp, messages.user_id, users.username, users.image_url \
	 FROM messages JOIN users ON users.id = messages.user_id";

impl Repository<Message> {
	pub async fn add(
		&self,
		user_id: i64,
		text: &str,
	) -> Result<Message, ServiceError> {
		let mut executor = self.executor.lock().await;
		let message = sqlx::query_as::<_, Message>("INSERT INTO messages (text, timestamp, user_id) VALUES (?, ?, ?) RETURNING id, text, timestamp, user_id")
			.bind(text)
			.bind(Utc::now())
			.bind(user_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(message)
	}

	pub async fn get(
		&self,
		id: i64,
	) -> Result<Option<Message>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let message = sqlx::query_as::<_, Message>("SELECT id, text, timestamp, user_id FROM messages WHERE id = ?")
			.bind(id)
			.fetch_optional(executor.transaction()?)
			.await?;
		Ok(message)
	}

	pub async fn get_with_author(
		&self,
		id: i64,
	) -> Result<Option<MessageWithAuthor>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let message = sqlx::query_as::<_, MessageWithAuthor>(&format!("{WITH_AUTHOR} WHERE messages.id = ?"))
			.bind(id)
			.fetch_optional(executor.transaction()?)
			.await?;
		Ok(message)
	}

	/// Likes on the message go with it through `ON DELETE CASCADE`.
	pub async fn delete(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("DELETE FROM messages WHERE id = ?").bind(id).execute(executor.transaction()?).await?;
		Ok(result.rows_affected() > 0)
	}

	/// Newest first; equal timestamps fall back to insertion order.
	pub async fn by_user(
		&self,
		user_id: i64,
		limit: i64,
	) -> Result<Vec<MessageWithAuthor>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let messages = sqlx::query_as::<_, MessageWithAuthor>(&format!(
			"{WITH_AUTHOR} WHERE messages.user_id = ? ORDER BY messages.timestamp DESC, messages.id DESC LIMIT ?"
		))
		.bind(user_id)
		.bind(limit)
		.fetch_all(executor.transaction()?)
		.await?;
		Ok(messages)
	}

	/// Messages by `user_id` and everyone they follow, newest first.
	pub async fn feed(
		&self,
		user_id: i64,
		limit: i64,
	) -> Result<Vec<MessageWithAuthor>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let messages = sqlx::query_as::<_, MessageWithAuthor>(&format!(
			"{WITH_AUTHOR} WHERE messages.user_id = ? \
			 OR messages.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?) \
			 ORDER BY messages.timestamp DESC, messages.id DESC LIMIT ?"
		))
		.bind(user_id)
		.bind(user_id)
		.bind(limit)
		.fetch_all(executor.transaction()?)
		.await?;
		Ok(messages)
	}

	pub async fn liked_by(
		&self,
		user_id: i64,
	) -> Result<Vec<MessageWithAuthor>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let messages = sqlx::query_as::<_, MessageWithAuthor>(&format!(
			"{WITH_AUTHOR} JOIN likes ON likes.message_id = messages.id WHERE likes.user_id = ? \
			 ORDER BY messages.timestamp DESC, messages.id DESC"
		))
		.bind(user_id)
		.fetch_all(executor.transaction()?)
		.await?;
		Ok(messages)
	}

	pub async fn count_by_user(
		&self,
		user_id: i64,
	) -> Result<i64, ServiceError> {
		let mut executor = self.executor.lock().await;
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM messages WHERE user_id = ?")
			.bind(user_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(count)
	}
}
