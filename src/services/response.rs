use std::fmt::Display;

use axum::{
	extract::rejection::PathRejection,
	http::{header, HeaderValue, StatusCode},
	response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::{
	domain::{commands::FieldErrors, session::Flash},
	views,
};

/// The column a signup or profile update collided on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateField {
	Username,
	Email,
}

impl DuplicateField {
	pub fn field_name(&self) -> &'static str {
		match self {
			DuplicateField::Username => "username",
			DuplicateField::Email => "email",
		}
	}

	/// Maps sqlite's `UNIQUE constraint failed: users.<column>` onto a field.
	pub(crate) fn from_constraint_message(message: &str) -> Option<Self> {
		if message.contains("users.username") {
			Some(DuplicateField::Username)
		} else if message.contains("users.email") {
			Some(DuplicateField::Email)
		} else {
			None
		}
	}
}

impl Display for DuplicateField {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			DuplicateField::Username => write!(f, "Username already taken"),
			DuplicateField::Email => write!(f, "Email already taken"),
		}
	}
}

#[derive(Debug, Error)]
pub enum ServiceError {
	#[error("EntityNotFound")]
	EntityNotFound,

	#[error("{0}")]
	Duplicate(DuplicateField),

	#[error("You cannot follow yourself")]
	SelfFollow,

	#[error("Unauthorized")]
	Unauthorized(Flash),

	#[error("Invalid credentials")]
	InvalidCredentials,

	#[error("Validation failed")]
	Validation(FieldErrors),

	#[error("TransactionError")]
	TransactionError,

	#[error("Database error: {0}")]
	DatabaseError(#[from] sqlx::Error),

	#[error("Migration error: {0}")]
	MigrationError(#[from] sqlx::migrate::MigrateError),

	#[error("Password hashing failed: {0}")]
	PasswordHashError(String),

	#[error("Configuration error: {0}")]
	ConfigError(String),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl ServiceError {
	/// Turns a unique-constraint violation on `users` into [`ServiceError::Duplicate`].
	pub(crate) fn from_user_write(err: sqlx::Error) -> Self {
		if let Some(db_err) = err.as_database_error() {
			if db_err.is_unique_violation() {
				if let Some(field) = DuplicateField::from_constraint_message(db_err.message()) {
					return ServiceError::Duplicate(field);
				}
			}
		}
		ServiceError::DatabaseError(err)
	}
}

/// Ids in paths are integers, anything else names no entity.
impl From<PathRejection> for ServiceError {
	fn from(rejection: PathRejection) -> Self {
		tracing::debug!("Unusable path parameter : {}", rejection);
		ServiceError::EntityNotFound
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		match self {
			ServiceError::EntityNotFound => (StatusCode::NOT_FOUND, Html(views::not_found())).into_response(),
			ServiceError::Unauthorized(flash) => {
				let mut response = Redirect::to("/").into_response();
				if let Ok(value) = HeaderValue::from_str(&flash.cookie().to_string()) {
					response.headers_mut().append(header::SET_COOKIE, value);
				}
				response
			}
			ServiceError::Duplicate(_) | ServiceError::SelfFollow | ServiceError::InvalidCredentials | ServiceError::Validation(_) => {
				(StatusCode::BAD_REQUEST, Html(views::error_page(&self.to_string()))).into_response()
			}
			ServiceError::TransactionError
			| ServiceError::DatabaseError(_)
			| ServiceError::MigrationError(_)
			| ServiceError::PasswordHashError(_)
			| ServiceError::ConfigError(_)
			| ServiceError::Io(_) => {
				tracing::error!("Unexpected service error : {}", self);
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Html(views::error_page("Something went wrong. Please try again.")),
				)
					.into_response()
			}
		}
	}
}
