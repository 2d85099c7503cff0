use sqlx::SqlitePool;

use crate::{
	adapters::repositories::Repository,
	config::AuthSettings,
	database::{DatabaseExecutor, SharedExecutor},
	domain::{
		commands::SignupForm,
		message::{Message, MessageWithAuthor, MESSAGE_PAGE_LIMIT},
		session::Session,
		social::{Follow, Like},
		user::{
			password::{dummy_hash, hash_password, verify_password},
			NewUser, ProfileChanges, User, UserProfile,
		},
	},
	services::response::{DuplicateField, ServiceError},
};

pub struct UserHandler;
impl UserHandler {
	/// Hashes the password and stores the user. Fails with
	/// [`ServiceError::Duplicate`] when the username or email is in use.
	pub async fn create_user(
		pool: &SqlitePool,
		bcrypt_cost: u32,
		form: &SignupForm,
	) -> Result<User, ServiceError> {
		let new_user = UserHandler::new_user(form, bcrypt_cost).await?;
		DatabaseExecutor::transactional(pool, |executor| UserHandler::register(executor, new_user)).await
	}

	/// [`UserHandler::create_user`] plus a session for the new account, atomically.
	pub async fn signup(
		pool: &SqlitePool,
		auth: AuthSettings,
		form: &SignupForm,
	) -> Result<(User, Session), ServiceError> {
		let new_user = UserHandler::new_user(form, auth.bcrypt_cost).await?;
		DatabaseExecutor::transactional(pool, |executor| async move {
			let user = UserHandler::register(executor.clone(), new_user).await?;
			let session = Repository::<Session>::new(executor).open(user.id, auth.session_ttl).await?;
			Ok((user, session))
		})
		.await
	}

	async fn new_user(
		form: &SignupForm,
		bcrypt_cost: u32,
	) -> Result<NewUser, ServiceError> {
		Ok(NewUser {
			username: form.username.trim().to_string(),
			email: form.email.trim().to_string(),
			password: hash_password(&form.password, bcrypt_cost).await?,
			image_url: form.image_url_or_default(),
		})
	}

	async fn register(
		executor: SharedExecutor,
		new_user: NewUser,
	) -> Result<User, ServiceError> {
		let users = Repository::<User>::new(executor);
		if users.username_taken(&new_user.username, None).await? {
			return Err(ServiceError::Duplicate(DuplicateField::Username));
		}
		if users.email_taken(&new_user.email, None).await? {
			return Err(ServiceError::Duplicate(DuplicateField::Email));
		}
		let user = users.add(new_user).await?;
		tracing::info!(user_id = user.id, username = %user.username, "User signed up");
		Ok(user)
	}

	/// `None` for an unknown username and for a wrong password alike. Both run
	/// one bcrypt verification at `bcrypt_cost`.
	pub async fn authenticate(
		pool: &SqlitePool,
		bcrypt_cost: u32,
		username: &str,
		password: &str,
	) -> Result<Option<User>, ServiceError> {
		let username = username.trim().to_string();
		let user = DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<User>::new(executor).find_by_username(&username).await
		})
		.await?;

		let hashed = match &user {
			Some(user) => user.password.clone(),
			None => dummy_hash(bcrypt_cost).await?,
		};
		let matched = verify_password(password, &hashed).await;
		let authenticated = user.filter(|_| matched);
		if authenticated.is_none() {
			tracing::info!("Authentication failed");
		}
		Ok(authenticated)
	}

	/// Authenticates and opens a session on success.
	pub async fn login(
		pool: &SqlitePool,
		auth: AuthSettings,
		username: &str,
		password: &str,
	) -> Result<Option<(User, Session)>, ServiceError> {
		let Some(user) = UserHandler::authenticate(pool, auth.bcrypt_cost, username, password).await? else {
			return Ok(None);
		};
		let user_id = user.id;
		let session = DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Session>::new(executor).open(user_id, auth.session_ttl).await
		})
		.await?;
		Ok(Some((user, session)))
	}

	/// Re-checks `current_password` before writing any of `changes`.
	pub async fn update_profile(
		pool: &SqlitePool,
		user_id: i64,
		current_password: &str,
		changes: ProfileChanges,
	) -> Result<User, ServiceError> {
		let mut user = DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<User>::new(executor).get_or_404(user_id).await
		})
		.await?;
		if !verify_password(current_password, &user.password).await {
			return Err(ServiceError::InvalidCredentials);
		}
		if changes.is_empty() {
			return Ok(user);
		}

		DatabaseExecutor::transactional(pool, |executor| async move {
			let users = Repository::<User>::new(executor);
			if let Some(username) = changes.username.as_deref() {
				if users.username_taken(username, Some(user_id)).await? {
					return Err(ServiceError::Duplicate(DuplicateField::Username));
				}
			}
			if let Some(email) = changes.email.as_deref() {
				if users.email_taken(email, Some(user_id)).await? {
					return Err(ServiceError::Duplicate(DuplicateField::Email));
				}
			}
			changes.apply(&mut user);
			users.update(&user).await?;
			Ok(user)
		})
		.await
	}

	/// Removes the user with their messages, follow edges in both directions,
	/// likes given and received, and sessions.
	pub async fn delete_user(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<(), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			if !Repository::<User>::new(executor).delete(user_id).await? {
				return Err(ServiceError::EntityNotFound);
			}
			tracing::info!(user_id, "User deleted");
			Ok(())
		})
		.await
	}

	pub async fn get(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<User, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<User>::new(executor).get_or_404(user_id).await
		})
		.await
	}

	pub async fn profile(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<UserProfile, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let user = Repository::<User>::new(executor.clone()).get_or_404(user_id).await?;
			let message_repo = Repository::<Message>::new(executor.clone());
			let follow_repo = Repository::<Follow>::new(executor.clone());
			Ok(UserProfile {
				messages: message_repo.by_user(user_id, MESSAGE_PAGE_LIMIT).await?,
				message_count: message_repo.count_by_user(user_id).await?,
				following_count: follow_repo.count_following(user_id).await?,
				followers_count: follow_repo.count_followers(user_id).await?,
				likes_count: Repository::<Like>::new(executor).count_by_user(user_id).await?,
				user,
			})
		})
		.await
	}

	pub async fn search(
		pool: &SqlitePool,
		q: Option<&str>,
	) -> Result<Vec<User>, ServiceError> {
		let q = q.map(str::trim).filter(|q| !q.is_empty()).map(str::to_string);
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<User>::new(executor).search(q.as_deref()).await
		})
		.await
	}

	/// The user and the users they follow.
	pub async fn following(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<(User, Vec<User>), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let users = Repository::<User>::new(executor);
			let user = users.get_or_404(user_id).await?;
			Ok((user, users.following(user_id).await?))
		})
		.await
	}

	/// The user and the users following them.
	pub async fn followers(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<(User, Vec<User>), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let users = Repository::<User>::new(executor);
			let user = users.get_or_404(user_id).await?;
			Ok((user, users.followers(user_id).await?))
		})
		.await
	}

	/// The user and the messages they liked.
	pub async fn likes(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<(User, Vec<MessageWithAuthor>), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let user = Repository::<User>::new(executor.clone()).get_or_404(user_id).await?;
			let messages = Repository::<Message>::new(executor).liked_by(user_id).await?;
			Ok((user, messages))
		})
		.await
	}
}
