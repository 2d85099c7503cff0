use chrono::Duration;
use sqlx::SqlitePool;

use crate::{config::AuthSettings, database, dependencies::AppState, domain::commands::SignupForm};

/// bcrypt's minimum work factor keeps the suite fast.
pub(crate) const TEST_BCRYPT_COST: u32 = 4;

pub(crate) fn test_auth() -> AuthSettings {
	AuthSettings {
		bcrypt_cost: TEST_BCRYPT_COST,
		session_ttl: Duration::days(1),
	}
}

pub(crate) async fn test_pool() -> SqlitePool {
	let pool = database::connect_in_memory().await.unwrap();
	database::migrate(&pool).await.unwrap();
	pool
}

pub(crate) async fn test_state() -> AppState {
	AppState::new(test_pool().await, test_auth())
}

/// A valid signup whose password equals the username.
pub(crate) fn signup_form(username: &str) -> SignupForm {
	SignupForm {
		username: username.to_string(),
		email: format!("{username}@test.com"),
		password: username.to_string(),
		image_url: String::new(),
	}
}

pub(crate) async fn count(
	pool: &SqlitePool,
	table: &str,
) -> i64 {
	sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}")).fetch_one(pool).await.unwrap()
}
