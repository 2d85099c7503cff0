use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
	domain::{session::Session, user::User},
	services::response::ServiceError,
};

use super::Repository;

impl Repository<Session> {
	/// Opens a session valid for `ttl` and sweeps out every expired one.
	pub async fn open(
		&self,
		user_id: i64,
		ttl: Duration,
	) -> Result<Session, ServiceError> {
		let mut executor = self.executor.lock().await;
		let now = Utc::now();
		let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?").bind(now).execute(executor.transaction()?).await?;
		if purged.rows_affected() > 0 {
			tracing::debug!(purged = purged.rows_affected(), "Expired sessions removed");
		}

		let session = sqlx::query_as::<_, Session>(
			"INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?) RETURNING token, user_id, created_at, expires_at",
		)
		.bind(Uuid::new_v4().to_string())
		.bind(user_id)
		.bind(now)
		.bind(now + ttl)
		.fetch_one(executor.transaction()?)
		.await?;
		Ok(session)
	}

	pub async fn close(
		&self,
		token: &str,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("DELETE FROM sessions WHERE token = ?").bind(token).execute(executor.transaction()?).await?;
		Ok(result.rows_affected() > 0)
	}

	pub async fn user_for_token(
		&self,
		token: &str,
	) -> Result<Option<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let user = sqlx::query_as::<_, User>(
			"SELECT users.id, users.email, users.username, users.image_url, users.header_image_url, users.bio, users.location, users.password \
			 FROM sessions JOIN users ON users.id = sessions.user_id WHERE sessions.token = ? AND sessions.expires_at > ?",
		)
		.bind(token)
		.bind(Utc::now())
		.fetch_optional(executor.transaction()?)
		.await?;
		Ok(user)
	}
}
