use crate::{domain::social::Follow, services::response::ServiceError};

use super::Repository;

impl Repository<Follow> {
	/// Inserts the edge unless it already exists. Returns whether a row was added.
	pub async fn add(
		&self,
		edge: Follow,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("INSERT INTO follows (follower_id, followed_id) VALUES (?, ?) ON CONFLICT DO NOTHING")
			.bind(edge.follower_id)
			.bind(edge.followed_id)
			.execute(executor.transaction()?)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	pub async fn remove(
		&self,
		edge: Follow,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
			.bind(edge.follower_id)
			.bind(edge.followed_id)
			.execute(executor.transaction()?)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	pub async fn exists(
		&self,
		edge: Follow,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM follows WHERE follower_id = ? AND followed_id = ?)")
			.bind(edge.follower_id)
			.bind(edge.followed_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(exists)
	}

	/// Ids of the users `user_id` follows.
	pub async fn followed_ids(
		&self,
		user_id: i64,
	) -> Result<Vec<i64>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let ids = sqlx::query_scalar::<_, i64>("SELECT followed_id FROM follows WHERE follower_id = ? ORDER BY followed_id")
			.bind(user_id)
			.fetch_all(executor.transaction()?)
			.await?;
		Ok(ids)
	}

	pub async fn count_following(
		&self,
		user_id: i64,
	) -> Result<i64, ServiceError> {
		let mut executor = self.executor.lock().await;
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = ?")
			.bind(user_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(count)
	}

	pub async fn count_followers(
		&self,
		user_id: i64,
	) -> Result<i64, ServiceError> {
		let mut executor = self.executor.lock().await;
		let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE followed_id = ?")
			.bind(user_id)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(count)
	}
}
