use axum::{
	extract::State,
	response::{Html, IntoResponse, Redirect, Response},
	Extension, Form,
};
use axum_extra::extract::CookieJar;

use crate::{
	dependencies::AppState,
	domain::{
		commands::{FieldErrors, LoginForm, SignupForm},
		session::{Flash, RequestContext, Session, SESSION_COOKIE},
	},
	services::{
		handlers::{SessionHandler, UserHandler},
		response::ServiceError,
	},
	views,
};

pub(super) async fn signup_form(Extension(ctx): Extension<RequestContext>) -> Html<String> {
	views::signup_page(&ctx, &SignupForm::default(), &FieldErrors::default())
}

pub(super) async fn signup(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	jar: CookieJar,
	Form(form): Form<SignupForm>,
) -> Result<Response, ServiceError> {
	if let Err(errors) = form.validate() {
		return Ok(views::signup_page(&ctx, &form, &errors).into_response());
	}

	match UserHandler::signup(&state.pool, state.auth, &form).await {
		Ok((_user, session)) => Ok((jar.add(session.cookie()), Redirect::to("/")).into_response()),
		Err(ServiceError::Duplicate(field)) => {
			let mut errors = FieldErrors::default();
			errors.add(field.field_name(), field.to_string());
			Ok(views::signup_page(&ctx, &form, &errors).into_response())
		}
		Err(err) => Err(err),
	}
}

pub(super) async fn login_form(Extension(ctx): Extension<RequestContext>) -> Html<String> {
	views::login_page(&ctx, &LoginForm::default(), &FieldErrors::default(), None)
}

pub(super) async fn login(
	State(state): State<AppState>,
	Extension(ctx): Extension<RequestContext>,
	jar: CookieJar,
	Form(form): Form<LoginForm>,
) -> Result<Response, ServiceError> {
	if let Err(errors) = form.validate() {
		return Ok(views::login_page(&ctx, &form, &errors, None).into_response());
	}

	match UserHandler::login(&state.pool, state.auth, &form.username, &form.password).await? {
		Some((_user, session)) => Ok((jar.add(session.cookie()).add(Flash::Greeting.cookie()), Redirect::to("/")).into_response()),
		None => Ok(views::login_page(&ctx, &form, &FieldErrors::default(), Some("Invalid credentials.")).into_response()),
	}
}

pub(super) async fn logout(
	State(state): State<AppState>,
	jar: CookieJar,
) -> Result<Response, ServiceError> {
	if let Some(cookie) = jar.get(SESSION_COOKIE) {
		SessionHandler::logout(&state.pool, cookie.value()).await?;
	}
	Ok((jar.remove(Session::removal_cookie()), Redirect::to("/")).into_response())
}

#[cfg(test)]
mod test {
	use axum::http::StatusCode;

	use crate::{
		routes::test::{body_text, cookie_pair, location, TestApp},
		test_support::count,
	};

	#[tokio::test]
	async fn test_signup_logs_in_and_redirects_home() {
		let app = TestApp::new().await;
		let cookie = app.signup("testuser").await;

		let home = body_text(app.get("/", Some(&cookie)).await).await;
		assert!(home.contains("@testuser"));
		assert!(home.contains("Log out"));
	}

	#[tokio::test]
	async fn test_signup_rerenders_with_field_errors() {
		let app = TestApp::new().await;

		let response = app.post("/signup", "username=&email=bad&password=123", None).await;
		assert_eq!(response.status(), StatusCode::OK);
		let page = body_text(response).await;
		assert!(page.contains("This field is required."));
		assert!(page.contains("Invalid email address."));
		assert_eq!(count(&app.state.pool, "users").await, 0);
	}

	#[tokio::test]
	async fn test_signup_duplicate_username() {
		let app = TestApp::new().await;
		app.signup("testuser").await;

		let response = app.post("/signup", "username=testuser&email=fresh%40test.com&password=testuser", None).await;
		assert_eq!(response.status(), StatusCode::OK);
		assert!(cookie_pair(&response, "warbler_session").is_none());
		assert!(body_text(response).await.contains("Username already taken"));
		assert_eq!(count(&app.state.pool, "users").await, 1);
	}

	#[tokio::test]
	async fn test_login_success_and_failure() {
		let app = TestApp::new().await;
		app.signup("testuser").await;

		let response = app.post("/login", "username=testuser&password=wrongpass", None).await;
		assert_eq!(response.status(), StatusCode::OK);
		assert!(body_text(response).await.contains("Invalid credentials."));

		let response = app.post("/login", "username=testuser&password=testuser", None).await;
		assert_eq!(response.status(), StatusCode::SEE_OTHER);
		assert_eq!(location(&response), "/");
		let session = cookie_pair(&response, "warbler_session").unwrap();
		let flash = cookie_pair(&response, "warbler_flash").unwrap();

		let home = app.get("/", Some(&format!("{session}; {flash}"))).await;
		// The greeting is shown once and then expired.
		assert_eq!(cookie_pair(&home, "warbler_flash").as_deref(), Some("warbler_flash="));
		assert!(body_text(home).await.contains("Hello, testuser!"));
	}

	#[tokio::test]
	async fn test_logout_ends_session() {
		let app = TestApp::new().await;
		let cookie = app.signup("testuser").await;

		let response = app.get("/logout", Some(&cookie)).await;
		assert_eq!(location(&response), "/");
		assert_eq!(count(&app.state.pool, "sessions").await, 0);

		// The old token no longer resolves to anyone.
		let home = body_text(app.get("/", Some(&cookie)).await).await;
		assert!(home.contains("Sign up now"));
	}
}
