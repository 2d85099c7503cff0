use sqlx::SqlitePool;

use crate::{
	adapters::repositories::Repository,
	database::DatabaseExecutor,
	domain::{
		commands::MessageForm,
		message::{Message, MessageWithAuthor, MESSAGE_PAGE_LIMIT},
		session::Flash,
		social::Like,
	},
	services::response::ServiceError,
};

pub struct MessageHandler;
impl MessageHandler {
	pub async fn create_message(
		pool: &SqlitePool,
		user_id: i64,
		text: &str,
	) -> Result<Message, ServiceError> {
		let form = MessageForm { text: text.trim().to_string() };
		form.validate().map_err(ServiceError::Validation)?;
		let text = form.text;
		DatabaseExecutor::transactional(pool, |executor| async move {
			let message = Repository::<Message>::new(executor).add(user_id, &text).await?;
			tracing::debug!(user_id, message_id = message.id, "Message created");
			Ok(message)
		})
		.await
	}

	/// The message with its author and how many users liked it.
	pub async fn get_message(
		pool: &SqlitePool,
		message_id: i64,
	) -> Result<(MessageWithAuthor, i64), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let message = Repository::<Message>::new(executor.clone())
				.get_with_author(message_id)
				.await?
				.ok_or(ServiceError::EntityNotFound)?;
			let likes = Repository::<Like>::new(executor).count_for_message(message_id).await?;
			Ok((message, likes))
		})
		.await
	}

	/// Only the author may delete a message; its likes go with it.
	pub async fn delete_message(
		pool: &SqlitePool,
		requested_by: i64,
		message_id: i64,
	) -> Result<(), ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			let messages = Repository::<Message>::new(executor);
			let message = messages.get(message_id).await?.ok_or(ServiceError::EntityNotFound)?;
			if message.user_id != requested_by {
				tracing::info!(message_id, requested_by, "Refused to delete someone else's message");
				return Err(ServiceError::Unauthorized(Flash::AccessUnauthorized));
			}
			messages.delete(message_id).await?;
			Ok(())
		})
		.await
	}

	/// Home timeline: own messages and those of followed users, newest first.
	pub async fn feed(
		pool: &SqlitePool,
		user_id: i64,
	) -> Result<Vec<MessageWithAuthor>, ServiceError> {
		DatabaseExecutor::transactional(pool, |executor| async move {
			Repository::<Message>::new(executor).feed(user_id, MESSAGE_PAGE_LIMIT).await
		})
		.await
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		services::handlers::{SocialHandler, UserHandler},
		test_support::{count, signup_form, test_pool, TEST_BCRYPT_COST},
	};

	#[tokio::test]
	async fn test_create_and_get_message() {
		let pool = test_pool().await;
		let user = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("testuser")).await.unwrap();

		let message = MessageHandler::create_message(&pool, user.id, "Hello").await.unwrap();
		assert_eq!(message.text, "Hello");
		assert_eq!(message.user_id, user.id);

		let (shown, likes) = MessageHandler::get_message(&pool, message.id).await.unwrap();
		assert_eq!(shown.username, "testuser");
		assert_eq!(shown.timestamp, message.timestamp);
		assert_eq!(likes, 0);
		assert!(matches!(MessageHandler::get_message(&pool, message.id + 1).await, Err(ServiceError::EntityNotFound)));
	}

	#[tokio::test]
	async fn test_create_message_rejects_blank_and_overlong_text() {
		let pool = test_pool().await;
		let user = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("testuser")).await.unwrap();

		let err = MessageHandler::create_message(&pool, user.id, "   ").await.unwrap_err();
		let ServiceError::Validation(errors) = err else { panic!("expected a validation error") };
		assert_eq!(errors.get("text"), ["This field is required."]);

		let overlong = "w".repeat(141);
		assert!(matches!(
			MessageHandler::create_message(&pool, user.id, &overlong).await,
			Err(ServiceError::Validation(_))
		));
		assert!(MessageHandler::create_message(&pool, user.id, &"w".repeat(140)).await.is_ok());
		assert_eq!(count(&pool, "messages").await, 1);
	}

	#[tokio::test]
	async fn test_delete_message_owner_only() {
		let pool = test_pool().await;
		let owner = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("owner")).await.unwrap();
		let other = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("other")).await.unwrap();
		let message = MessageHandler::create_message(&pool, owner.id, "mine").await.unwrap();
		SocialHandler::toggle_like(&pool, other.id, message.id).await.unwrap();

		let err = MessageHandler::delete_message(&pool, other.id, message.id).await.unwrap_err();
		assert!(matches!(err, ServiceError::Unauthorized(Flash::AccessUnauthorized)));
		assert_eq!(count(&pool, "messages").await, 1);

		MessageHandler::delete_message(&pool, owner.id, message.id).await.unwrap();
		assert_eq!(count(&pool, "messages").await, 0);
		assert_eq!(count(&pool, "likes").await, 0);
		assert!(matches!(
			MessageHandler::delete_message(&pool, owner.id, message.id).await,
			Err(ServiceError::EntityNotFound)
		));
	}

	#[tokio::test]
	async fn test_feed_shows_own_and_followed_messages() {
		let pool = test_pool().await;
		let me = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("me")).await.unwrap();
		let friend = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("friend")).await.unwrap();
		let stranger = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("stranger")).await.unwrap();
		SocialHandler::follow(&pool, me.id, friend.id).await.unwrap();

		MessageHandler::create_message(&pool, me.id, "mine").await.unwrap();
		MessageHandler::create_message(&pool, stranger.id, "not for me").await.unwrap();
		MessageHandler::create_message(&pool, friend.id, "from a friend").await.unwrap();

		let feed = MessageHandler::feed(&pool, me.id).await.unwrap();
		let texts: Vec<&str> = feed.iter().map(|m| m.text.as_str()).collect();
		assert_eq!(texts, ["from a friend", "mine"]);
	}

	#[tokio::test]
	async fn test_feed_is_capped() {
		let pool = test_pool().await;
		let me = UserHandler::create_user(&pool, TEST_BCRYPT_COST, &signup_form("me")).await.unwrap();
		for n in 0..(MESSAGE_PAGE_LIMIT + 5) {
			MessageHandler::create_message(&pool, me.id, &format!("warble {n}")).await.unwrap();
		}

		let feed = MessageHandler::feed(&pool, me.id).await.unwrap();
		assert_eq!(feed.len() as i64, MESSAGE_PAGE_LIMIT);
		assert_eq!(feed[0].text, format!("warble {}", MESSAGE_PAGE_LIMIT + 4));
	}
}
