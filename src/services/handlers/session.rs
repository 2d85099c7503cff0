use sqlx::SqlitePool;

use crate::{
	adapters::repositories::Repository,
	database::DatabaseExecutor,
	domain::{session::Session, user::User},
	services::response::ServiceError,
};

pub struct SessionHandler;
impl SessionHandler {
	/// Unknown or stale tokens resolve to `None`.
	pub async fn current_user(
		pool: &SqlitePool,
		token: &str,
	) -> Result<Option<User>, ServiceError> {
		let token = token.to_string();
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Session>::new(executor).user_for_token(&token).await
		})
		.await
	}

	pub async fn logout(
		pool: &SqlitePool,
		token: &str,
	) -> Result<(), ServiceError> {
		let token = token.to_string();
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Session>::new(executor).close(&token).await?;
			Ok(())
		})
		.await
	}
}

#[cfg(test)]
mod test {
	use chrono::Duration;

	use super::*;
	use crate::{
		config::AuthSettings,
		services::handlers::UserHandler,
		test_support::{count, signup_form, test_auth, test_pool},
	};

	#[tokio::test]
	async fn test_session_resolves_until_logout() {
		let pool = test_pool().await;
		let (user, session) = UserHandler::signup(&pool, test_auth(), &signup_form("testuser")).await.unwrap();

		assert_eq!(SessionHandler::current_user(&pool, &session.token).await.unwrap(), Some(user));
		assert_eq!(SessionHandler::current_user(&pool, "not-a-token").await.unwrap(), None);

		SessionHandler::logout(&pool, &session.token).await.unwrap();
		assert_eq!(SessionHandler::current_user(&pool, &session.token).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_sessions_die_with_their_user() {
		let pool = test_pool().await;
		let (user, session) = UserHandler::signup(&pool, test_auth(), &signup_form("testuser")).await.unwrap();
		UserHandler::delete_user(&pool, user.id).await.unwrap();

		assert_eq!(count(&pool, "sessions").await, 0);
		assert_eq!(SessionHandler::current_user(&pool, &session.token).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_expired_session_resolves_to_anonymous() {
		let pool = test_pool().await;
		UserHandler::signup(&pool, test_auth(), &signup_form("testuser")).await.unwrap();
		let already_expired = AuthSettings {
			session_ttl: Duration::zero(),
			..test_auth()
		};

		let (_, session) = UserHandler::login(&pool, already_expired, "testuser", "testuser").await.unwrap().unwrap();
		assert_eq!(session.expires_at, session.created_at);
		assert_eq!(SessionHandler::current_user(&pool, &session.token).await.unwrap(), None);
	}

	#[tokio::test]
	async fn test_opening_a_session_sweeps_expired_ones() {
		let pool = test_pool().await;
		let (user, live) = UserHandler::signup(&pool, test_auth(), &signup_form("testuser")).await.unwrap();
		let already_expired = AuthSettings {
			session_ttl: Duration::zero(),
			..test_auth()
		};

		'_given: {
			for _ in 0..5 {
				UserHandler::login(&pool, already_expired, "testuser", "testuser").await.unwrap().unwrap();
			}
			// each login swept the one before it
			assert_eq!(count(&pool, "sessions").await, 2);

			'_when: {
				let (_, fresh) = UserHandler::login(&pool, test_auth(), "testuser", "testuser").await.unwrap().unwrap();

				assert_eq!(count(&pool, "sessions").await, 2);
				assert_eq!(SessionHandler::current_user(&pool, &live.token).await.unwrap(), Some(user.clone()));
				assert_eq!(SessionHandler::current_user(&pool, &fresh.token).await.unwrap(), Some(user));
			}
		}
	}
}
