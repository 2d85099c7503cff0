use std::{
	collections::BTreeMap,
	sync::{Mutex, PoisonError},
};

use uuid::Uuid;

use crate::services::response::ServiceError;

static DUMMY_HASHES: Mutex<BTreeMap<u32, String>> = Mutex::new(BTreeMap::new());

/// Hashes `plain` with bcrypt on the blocking pool.
pub async fn hash_password(
	plain: &str,
	cost: u32,
) -> Result<String, ServiceError> {
	let plain = plain.to_owned();
	tokio::task::spawn_blocking(move || bcrypt::hash(plain, cost))
		.await
		.map_err(|err| ServiceError::PasswordHashError(err.to_string()))?
		.map_err(|err| ServiceError::PasswordHashError(err.to_string()))
}

/// `false` both for a mismatch and for a stored value that is not a bcrypt hash.
pub async fn verify_password(
	plain: &str,
	hashed: &str,
) -> bool {
	let (plain, hashed) = (plain.to_owned(), hashed.to_owned());
	match tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed)).await {
		Ok(Ok(matched)) => matched,
		Ok(Err(err)) => {
			tracing::warn!("Stored password hash could not be verified : {}", err);
			false
		}
		Err(err) => {
			tracing::error!("Password verification task failed : {}", err);
			false
		}
	}
}

/// Hash of a random throwaway password at `cost`, computed once per cost.
///
/// Checking a password against it takes as long as checking a real account
/// and never succeeds.
pub async fn dummy_hash(cost: u32) -> Result<String, ServiceError> {
	let cached = DUMMY_HASHES.lock().unwrap_or_else(PoisonError::into_inner).get(&cost).cloned();
	if let Some(hashed) = cached {
		return Ok(hashed);
	}
	let hashed = hash_password(&Uuid::new_v4().to_string(), cost).await?;
	let mut hashes = DUMMY_HASHES.lock().unwrap_or_else(PoisonError::into_inner);
	Ok(hashes.entry(cost).or_insert(hashed).clone())
}

#[cfg(test)]
mod test {
	use super::*;

	#[tokio::test]
	async fn test_hash_never_equals_plaintext() {
		let hashed = hash_password("hunter22", 4).await.unwrap();
		assert_ne!(hashed, "hunter22");
		assert!(hashed.starts_with("$2"));
		assert!(verify_password("hunter22", &hashed).await);
		assert!(!verify_password("hunter23", &hashed).await);
	}

	#[tokio::test]
	async fn test_verify_rejects_non_hash() {
		assert!(!verify_password("HASHED_PASSWORD", "HASHED_PASSWORD").await);
	}

	#[tokio::test]
	async fn test_dummy_hash_is_cached_per_cost() {
		let first = dummy_hash(5).await.unwrap();
		assert!(first.starts_with("$2b$05$"));
		assert_eq!(dummy_hash(5).await.unwrap(), first);

		let other_cost = dummy_hash(6).await.unwrap();
		assert!(other_cost.starts_with("$2b$06$"));
		assert!(!verify_password("", &first).await);
	}
}
