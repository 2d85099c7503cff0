use crate::{
	domain::user::{NewUser, User},
	services::response::ServiceError,
};

use super::Repository;

const USER_COLUMNS: &str = "users.id, users.email, users.username, users.image_url, users.header_image_url, users.bio, users.location, users.password";

impl Repository<User> {
	pub async fn get(
		&self,
		id: i64,
	) -> Result<Option<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
			.bind(id)
			.fetch_optional(executor.transaction()?)
			.await?;
		Ok(user)
	}

	pub async fn get_or_404(
		&self,
		id: i64,
	) -> Result<User, ServiceError> {
		self.get(id).await?.ok_or(ServiceError::EntityNotFound)
	}

	pub async fn find_by_username(
		&self,
		username: &str,
	) -> Result<Option<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"))
			.bind(username)
			.fetch_optional(executor.transaction()?)
			.await?;
		Ok(user)
	}

	/// `true` when another user than `except` already uses the column value.
	async fn taken(
		&self,
		column: &'static str,
		value: &str,
		except: Option<i64>,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let taken = sqlx::query_scalar::<_, bool>(&format!("SELECT EXISTS (SELECT 1 FROM users WHERE {column} = ? AND id IS NOT ?)"))
			.bind(value)
			.bind(except)
			.fetch_one(executor.transaction()?)
			.await?;
		Ok(taken)
	}

	pub async fn username_taken(
		&self,
		username: &str,
		except: Option<i64>,
	) -> Result<bool, ServiceError> {
		self.taken("username", username, except).await
	}

	pub async fn email_taken(
		&self,
		email: &str,
		except: Option<i64>,
	) -> Result<bool, ServiceError> {
		self.taken("email", email, except).await
	}

	pub async fn add(
		&self,
		new_user: NewUser,
	) -> Result<User, ServiceError> {
		let mut executor = self.executor.lock().await;
		sqlx::query_as::<_, User>(&format!(
			"INSERT INTO users (username, email, password, image_url) VALUES (?, ?, ?, ?) RETURNING {}",
			USER_COLUMNS.replace("users.", "")
		))
		.bind(new_user.username)
		.bind(new_user.email)
		.bind(new_user.password)
		.bind(new_user.image_url)
		.fetch_one(executor.transaction()?)
		.await
		.map_err(ServiceError::from_user_write)
	}

	/// [`ServiceError::EntityNotFound`] once the row is gone.
	pub async fn update(
		&self,
		user: &User,
	) -> Result<(), ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query(
			"UPDATE users SET username = ?, email = ?, image_url = ?, header_image_url = ?, bio = ?, location = ? WHERE id = ?",
		)
		.bind(&user.username)
		.bind(&user.email)
		.bind(&user.image_url)
		.bind(&user.header_image_url)
		.bind(&user.bio)
		.bind(&user.location)
		.bind(user.id)
		.execute(executor.transaction()?)
		.await
		.map_err(ServiceError::from_user_write)?;
		if result.rows_affected() == 0 {
			return Err(ServiceError::EntityNotFound);
		}
		Ok(())
	}

	/// Messages, follow edges, likes and sessions go with the row through
	/// `ON DELETE CASCADE`.
	pub async fn delete(
		&self,
		id: i64,
	) -> Result<bool, ServiceError> {
		let mut executor = self.executor.lock().await;
		let result = sqlx::query("DELETE FROM users WHERE id = ?").bind(id).execute(executor.transaction()?).await?;
		Ok(result.rows_affected() > 0)
	}

	/// All users, or those whose username contains `q` literally.
	pub async fn search(
		&self,
		q: Option<&str>,
	) -> Result<Vec<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let users = match q {
			Some(q) => {
				sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE instr(username, ?) > 0 ORDER BY username"))
					.bind(q)
					.fetch_all(executor.transaction()?)
					.await?
			}
			None => {
				sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY username"))
					.fetch_all(executor.transaction()?)
					.await?
			}
		};
		Ok(users)
	}

	/// Users `user_id` follows.
	pub async fn following(
		&self,
		user_id: i64,
	) -> Result<Vec<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let users = sqlx::query_as::<_, User>(&format!(
			"SELECT {USER_COLUMNS} FROM users JOIN follows ON follows.followed_id = users.id WHERE follows.follower_id = ? ORDER BY users.username"
		))
		.bind(user_id)
		.fetch_all(executor.transaction()?)
		.await?;
		Ok(users)
	}

	/// Users following `user_id`.
	pub async fn followers(
		&self,
		user_id: i64,
	) -> Result<Vec<User>, ServiceError> {
		let mut executor = self.executor.lock().await;
		let users = sqlx::query_as::<_, User>(&format!(
			"SELECT {USER_COLUMNS} FROM users JOIN follows ON follows.follower_id = users.id WHERE follows.followed_id = ? ORDER BY users.username"
		))
		.bind(user_id)
		.fetch_all(executor.transaction()?)
		.await?;
		Ok(users)
	}
}
