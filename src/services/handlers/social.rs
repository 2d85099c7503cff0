use sqlx::SqlitePool;

use crate::{
	adapters::repositories::Repository,
	database::DatabaseExecutor,
	domain::{
		message::Message,
		social::{Follow, Like, LikeState},
		user::User,
	},
	services::response::ServiceError,
};

pub struct SocialHandler;
impl SocialHandler {
	/// Idempotent: following someone twice keeps a single edge. Returns whether
	/// the edge is new.
	pub async fn follow(
		pool: &SqlitePool,
		follower_id: i64,
		followed_id: i64,
	) -> Result<bool, ServiceError> {
		if follower_id == followed_id {
			return Err(ServiceError::SelfFollow);
		}
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<User>::new(executor.clone()).get_or_404(followed_id).await?;
			Repository::<Follow>::new(executor).add(Follow { follower_id, followed_id }).await
		})
		.await
	}

	/// No-op when the edge does not exist. Returns whether an edge was removed.
	pub async fn unfollow(
		pool: &SqlitePool,
		follower_id: i64,
		followed_id: i64,
	) -> Result<bool, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Follow>::new(executor).remove(Follow { follower_id, followed_id }).await
		})
		.await
	}

	/// Does `user_id` follow `other_id`?
	pub async fn is_following(
		pool: &SqlitePool,
		user_id: i64,
		other_id: i64,
	) -> Result<bool, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Follow>::new(executor)
				.exists(Follow {
					follower_id: user_id,
					followed_id: other_id,
				})
				.await
		})
		.await
	}

	/// Is `user_id` followed by `other_id`?
	pub async fn is_followed_by(
		pool: &SqlitePool,
		user_id: i64,
		other_id: i64,
	) -> Result<bool, ServiceError> {
		SocialHandler::is_following(pool, other_id, user_id).await
	}

	/// Adds the like when absent and removes it when present.
	pub async fn toggle_like(
		pool: &SqlitePool,
		user_id: i64,
		message_id: i64,
	) -> Result<LikeState, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			if Repository::<Message>::new(executor.clone()).get(message_id).await?.is_none() {
				return Err(ServiceError::EntityNotFound);
			}
			let likes = Repository::<Like>::new(executor);
			let like = Like { user_id, message_id };
			let state = if likes.remove(like).await? {
				LikeState::Unliked
			} else {
				likes.add(like).await?;
				LikeState::Liked
			};
			tracing::debug!(user_id, message_id, ?state, "Like toggled");
			Ok(state)
		})
		.await
	}

	pub async fn following_ids(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<Vec<i64>, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Follow>::new(executor).followed_ids(user_id).await
		})
		.await
	}

	pub async fn liked_message_ids(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<Vec<i64>, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Like>::new(executor).message_ids_liked_by(user_id).await
		})
		.await
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		services::handlers::{MessageHandler, UserHandler},
		test_support::{count, signup_form, test_pool, TEST_BCRYPT_COST},
	};

	async fn two_users(pool: &SqlitePool) -> (User, User) {
		let a = UserHandler::create_user(pool, TEST_BCRYPT_COST, &signup_form("usera")).await.unwrap();
		let b = UserHandler::create_user(pool, TEST_BCRYPT_COST, &signup_form("userb")).await.unwrap();
		(a, b)
	}

	#[tokio::test]
	async fn test_follow_then_unfollow() {
		let pool = test_pool().await;
		let (a, b) = two_users(&pool).await;

		'_given: {
			assert!(SocialHandler::follow(&pool, a.id, b.id).await.unwrap());
			'_when: {
				assert!(SocialHandler::is_following(&pool, a.id, b.id).await.unwrap());
				assert!(SocialHandler::is_followed_by(&pool, b.id, a.id).await.unwrap());
				// Direction matters.
				assert!(!SocialHandler::is_following(&pool, b.id, a.id).await.unwrap());
				assert!(!SocialHandler::is_followed_by(&pool, a.id, b.id).await.unwrap());
			}
		}

		'_given: {
			assert!(SocialHandler::unfollow(&pool, a.id, b.id).await.unwrap());
			'_when: {
				assert!(!SocialHandler::is_followed_by(&pool, b.id, a.id).await.unwrap());
				assert!(!SocialHandler::unfollow(&pool, a.id, b.id).await.unwrap());
			}
		}
	}

	#[tokio::test]
	async fn test_follow_is_idempotent() {
		let pool = test_pool().await;
		let (a, b) = two_users(&pool).await;

		assert!(SocialHandler::follow(&pool, a.id, b.id).await.unwrap());
		assert!(!SocialHandler::follow(&pool, a.id, b.id).await.unwrap());
		assert_eq!(count(&pool, "follows").await, 1);
		assert_eq!(SocialHandler::following_ids(&pool, a.id).await.unwrap(), vec![b.id]);
	}

	#[tokio::test]
	async fn test_follow_rejects_self_and_missing_user() {
		let pool = test_pool().await;
		let (a, _) = two_users(&pool).await;

		assert!(matches!(SocialHandler::follow(&pool, a.id, a.id).await, Err(ServiceError::SelfFollow)));
		assert!(matches!(SocialHandler::follow(&pool, a.id, 9999).await, Err(ServiceError::EntityNotFound)));
		assert_eq!(count(&pool, "follows").await, 0);
	}

	#[tokio::test]
	async fn test_toggle_like_round_trip() {
		let pool = test_pool().await;
		let (a, b) = two_users(&pool).await;
		let message = MessageHandler::create_message(&pool, b.id, "like me").await.unwrap();

		assert_eq!(SocialHandler::toggle_like(&pool, a.id, message.id).await.unwrap(), LikeState::Liked);
		assert_eq!(SocialHandler::liked_message_ids(&pool, a.id).await.unwrap(), vec![message.id]);

		assert_eq!(SocialHandler::toggle_like(&pool, a.id, message.id).await.unwrap(), LikeState::Unliked);
		assert!(SocialHandler::liked_message_ids(&pool, a.id).await.unwrap().is_empty());
		assert_eq!(count(&pool, "likes").await, 0);
	}

	#[tokio::test]
	async fn test_message_liked_by_many_users() {
		let pool = test_pool().await;
		let (a, b) = two_users(&pool).await;
		let first = MessageHandler::create_message(&pool, a.id, "first").await.unwrap();
		let second = MessageHandler::create_message(&pool, a.id, "second").await.unwrap();

		for user_id in [a.id, b.id] {
			for message_id in [first.id, second.id] {
				assert!(SocialHandler::toggle_like(&pool, user_id, message_id).await.unwrap().is_liked());
			}
		}
		assert_eq!(count(&pool, "likes").await, 4);
		assert_eq!(MessageHandler::get_message(&pool, first.id).await.unwrap().1, 2);
	}

	#[tokio::test]
	async fn test_toggle_like_on_missing_message() {
		let pool = test_pool().await;
		let (a, _) = two_users(&pool).await;
		assert!(matches!(SocialHandler::toggle_like(&pool, a.id, 42).await, Err(ServiceError::EntityNotFound)));
	}
}
