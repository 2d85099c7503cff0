use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};

use crate::{domain::user::User, services::response::ServiceError};

pub const SESSION_COOKIE: &str = "warbler_session";
pub const FLASH_COOKIE: &str = "warbler_flash";

/// Server-side half of a login: the opaque token in the cookie maps to a user.
#[derive(Clone, PartialEq, Eq, Debug, sqlx::FromRow)]
pub struct Session {
	pub token: String,
	pub user_id: i64,
	pub created_at: DateTime<Utc>,
	pub expires_at: DateTime<Utc>,
}

impl Session {
	pub fn cookie(&self) -> Cookie<'static> {
		Cookie::build((SESSION_COOKIE, self.token.clone()))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.build()
	}

	pub fn removal_cookie() -> Cookie<'static> {
		Cookie::build((SESSION_COOKIE, "")).path("/").build()
	}
}

/// One-shot notice shown on the next rendered page.
///
/// Only the code travels in the cookie, so the set of notices is closed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flash {
	AccessUnauthorized,
	LoginRequiredToLike,
	Greeting,
	SelfFollow,
	ProfileUpdateFailed,
}

impl Flash {
	pub fn code(&self) -> &'static str {
		match self {
			Flash::AccessUnauthorized => "access-unauthorized",
			Flash::LoginRequiredToLike => "login-required-to-like",
			Flash::Greeting => "greeting",
			Flash::SelfFollow => "self-follow",
			Flash::ProfileUpdateFailed => "profile-update-failed",
		}
	}

	pub fn from_code(code: &str) -> Option<Self> {
		[
			Flash::AccessUnauthorized,
			Flash::LoginRequiredToLike,
			Flash::Greeting,
			Flash::SelfFollow,
			Flash::ProfileUpdateFailed,
		]
		.into_iter()
		.find(|flash| flash.code() == code)
	}

	/// `success` or `danger`, used as the css modifier of the alert.
	pub fn category(&self) -> &'static str {
		match self {
			Flash::Greeting => "success",
			_ => "danger",
		}
	}

	pub fn message(
		&self,
		current_user: Option<&User>,
	) -> String {
		match self {
			Flash::AccessUnauthorized => "Access unauthorized.".to_string(),
			Flash::LoginRequiredToLike => "You must be logged in to like a message.".to_string(),
			Flash::Greeting => match current_user {
				Some(user) => format!("Hello, {}!", user.username),
				None => "Hello!".to_string(),
			},
			Flash::SelfFollow => "You cannot follow yourself.".to_string(),
			Flash::ProfileUpdateFailed => "Due to an error, your profile could not be updated.".to_string(),
		}
	}

	pub fn cookie(&self) -> Cookie<'static> {
		Cookie::build((FLASH_COOKIE, self.code()))
			.path("/")
			.http_only(true)
			.same_site(SameSite::Lax)
			.build()
	}

	pub fn removal_cookie() -> Cookie<'static> {
		let mut cookie = Cookie::build((FLASH_COOKIE, "")).path("/").build();
		cookie.make_removal();
		cookie
	}
}

/// Everything a handler knows about who is asking. Resolved once per request
/// by the session middleware and dropped with the response.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
	pub current_user: Option<User>,
	pub flash: Option<Flash>,
}

impl RequestContext {
	pub fn require_user(&self) -> Result<&User, ServiceError> {
		self.current_user.as_ref().ok_or(ServiceError::Unauthorized(Flash::AccessUnauthorized))
	}

	pub fn is_current_user(
		&self,
		user_id: i64,
	) -> bool {
		self.current_user.as_ref().is_some_and(|user| user.id == user_id)
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_flash_code_round_trips() {
		for flash in [Flash::AccessUnauthorized, Flash::LoginRequiredToLike, Flash::Greeting, Flash::SelfFollow, Flash::ProfileUpdateFailed] {
			assert_eq!(Flash::from_code(flash.code()), Some(flash));
		}
		assert_eq!(Flash::from_code("<script>"), None);
	}

	#[test]
	fn test_require_user_for_anonymous_request() {
		let ctx = RequestContext::default();
		assert!(matches!(ctx.require_user(), Err(ServiceError::Unauthorized(Flash::AccessUnauthorized))));
		assert!(!ctx.is_current_user(1));
	}
}
