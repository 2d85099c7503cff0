//! Form payloads posted by the browser and their validation rules.
//!
//! Every field defaults to an empty string so a missing input is reported as a
//! field error instead of an extractor rejection.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::domain::{
	message::MAX_MESSAGE_LEN,
	user::{entity::DEFAULT_IMAGE_URL, ProfileChanges},
};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Error messages keyed by form field name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
	pub fn add(
		&mut self,
		field: &'static str,
		message: impl Into<String>,
	) {
		self.0.entry(field).or_default().push(message.into());
	}

	pub fn get(
		&self,
		field: &str,
	) -> &[String] {
		self.0.get(field).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	fn into_result(self) -> Result<(), FieldErrors> {
		if self.is_empty() {
			Ok(())
		} else {
			Err(self)
		}
	}
}

fn require(
	errors: &mut FieldErrors,
	field: &'static str,
	value: &str,
) {
	if value.trim().is_empty() {
		errors.add(field, "This field is required.");
	}
}

fn require_password(
	errors: &mut FieldErrors,
	value: &str,
) {
	if value.chars().count() < MIN_PASSWORD_LEN {
		errors.add("password", format!("Field must be at least {MIN_PASSWORD_LEN} characters long."));
	}
}

fn check_email(
	errors: &mut FieldErrors,
	value: &str,
) {
	if !is_email(value) {
		errors.add("email", "Invalid email address.");
	}
}

pub(crate) fn is_email(value: &str) -> bool {
	let value = value.trim();
	let Some((local, domain)) = value.split_once('@') else {
		return false;
	};
	!local.is_empty()
		&& !domain.contains('@')
		&& !value.chars().any(char::is_whitespace)
		&& domain.split('.').count() >= 2
		&& domain.split('.').all(|label| !label.is_empty())
}

fn non_empty(value: &str) -> Option<String> {
	let value = value.trim();
	(!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct SignupForm {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub password: String,
	#[serde(default)]
	pub image_url: String,
}

impl SignupForm {
	pub fn validate(&self) -> Result<(), FieldErrors> {
		let mut errors = FieldErrors::default();
		require(&mut errors, "username", &self.username);
		require(&mut errors, "email", &self.email);
		if !self.email.trim().is_empty() {
			check_email(&mut errors, &self.email);
		}
		require_password(&mut errors, &self.password);
		errors.into_result()
	}

	/// The image to store: the submitted url, or the default avatar when blank.
	pub fn image_url_or_default(&self) -> String {
		non_empty(&self.image_url).unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string())
	}
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct LoginForm {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
}

impl LoginForm {
	pub fn validate(&self) -> Result<(), FieldErrors> {
		let mut errors = FieldErrors::default();
		require(&mut errors, "username", &self.username);
		require_password(&mut errors, &self.password);
		errors.into_result()
	}
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileForm {
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub email: String,
	#[serde(default)]
	pub image_url: String,
	#[serde(default)]
	pub header_image_url: String,
	#[serde(default)]
	pub bio: String,
	#[serde(default)]
	pub location: String,
	#[serde(default)]
	pub password: String,
}

impl ProfileForm {
	pub fn validate(&self) -> Result<(), FieldErrors> {
		let mut errors = FieldErrors::default();
		if !self.email.trim().is_empty() {
			check_email(&mut errors, &self.email);
		}
		require_password(&mut errors, &self.password);
		errors.into_result()
	}

	/// Blank inputs mean "keep the current value".
	pub fn changes(&self) -> ProfileChanges {
		ProfileChanges {
			username: non_empty(&self.username),
			email: non_empty(&self.email),
			image_url: non_empty(&self.image_url),
			header_image_url: non_empty(&self.header_image_url),
			bio: non_empty(&self.bio),
			location: non_empty(&self.location),
		}
	}
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct MessageForm {
	#[serde(default)]
	pub text: String,
}

impl MessageForm {
	pub fn validate(&self) -> Result<(), FieldErrors> {
		let mut errors = FieldErrors::default();
		require(&mut errors, "text", &self.text);
		if self.text.chars().count() > MAX_MESSAGE_LEN {
			errors.add("text", format!("Field cannot be longer than {MAX_MESSAGE_LEN} characters."));
		}
		errors.into_result()
	}
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct UserSearch {
	pub q: Option<String>,
}

#[cfg(test)]
mod test {
	use super::*;

	fn signup(
		username: &str,
		email: &str,
		password: &str,
	) -> SignupForm {
		SignupForm {
			username: username.into(),
			email: email.into(),
			password: password.into(),
			image_url: String::new(),
		}
	}

	#[test]
	fn test_signup_validation() {
		assert!(signup("testuser", "test@test.com", "testuser").validate().is_ok());

		let errors = signup("", "not-an-email", "short").validate().unwrap_err();
		assert_eq!(errors.get("username"), ["This field is required."]);
		assert_eq!(errors.get("email"), ["Invalid email address."]);
		assert_eq!(errors.get("password").len(), 1);
		assert!(errors.get("image_url").is_empty());
	}

	#[test]
	fn test_signup_image_default() {
		assert_eq!(signup("a", "a@b.co", "secret").image_url_or_default(), DEFAULT_IMAGE_URL);

		let mut form = signup("a", "a@b.co", "secret");
		form.image_url = " https://img.example/me.png ".into();
		assert_eq!(form.image_url_or_default(), "https://img.example/me.png");
	}

	#[test]
	fn test_is_email() {
		assert!(is_email("test@test.com"));
		assert!(is_email("first.last@sub.example.org"));
		assert!(!is_email("test@test"));
		assert!(!is_email("@test.com"));
		assert!(!is_email("te st@test.com"));
		assert!(!is_email("a@b@c.com"));
		assert!(!is_email("a@b..com"));
	}

	#[test]
	fn test_message_length_bound() {
		assert!(MessageForm { text: "Hello".into() }.validate().is_ok());
		assert!(MessageForm { text: "x".repeat(MAX_MESSAGE_LEN) }.validate().is_ok());
		assert!(MessageForm { text: "x".repeat(MAX_MESSAGE_LEN + 1) }.validate().is_err());
		assert!(MessageForm { text: "   ".into() }.validate().is_err());
	}

	#[test]
	fn test_profile_changes_skip_blank_fields() {
		let form = ProfileForm {
			bio: "Birdwatcher".into(),
			location: "  ".into(),
			password: "password".into(),
			..Default::default()
		};
		assert!(form.validate().is_ok());
		assert_eq!(
			form.changes(),
			ProfileChanges {
				bio: Some("Birdwatcher".into()),
				..Default::default()
			}
		);
	}
}
