use crate::{domain::social::Like, services::response::ServiceError};

use super::Repository;

impl Repository<Like> {
	pub async fn add(
		&self,
		like: Like,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("INSERT INTO likes (user_id, message_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
			.bind(like.user_id)
			.bind(like.message_id)
			.execute(executor.transaction()?)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	pub async fn remove(
		&self,
		like: Like,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("DELETE FROM likes WHERE user_id = ? AND message_id = ?")
			.bind(like.user_id)
			.bind(like.message_id)
			.execute(executor.transaction()?)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	pub async fn exists(
		&self,
		like: Like,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM likes WHERE user_id = ? AND message_id = ?)")
			.bind(like.user_id)
			.bind(like.message_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(exists)
	}

	pub async fn message_ids_liked_by(
		&self,
		user_id: i64,
	) -> Result<Vec<i64>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let ids = sqlx::query_scalar::<_, i64>("SELECT message_id FROM likes WHERE user_id = ? ORDER BY message_id")
			.bind(user_id)
			.fetch_all(executor.transaction()?)
			.await?;
		Ok(ids)
	}

	pub async fn count_by_user(
		&self,
		user_id: i64,
	) -> Result<i64, ServiceError> {
		let mut executor = self.executor.lock().await;
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE user_id = ?")
			.bind(user_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(count)
	}

	pub async fn count_for_message(
		&self,
		message_id: i64,
	) -> Result<i64, ServiceError> {
		let mut executor = self.executor.lock().await;
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM likes WHERE message_id = ?")
			.bind(message_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(count)
	}
}
