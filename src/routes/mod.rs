mod auth;
mod home;
mod messages;
mod users;

use axum::{
	http::{header, HeaderMap, HeaderValue, StatusCode},
	middleware,
	response::{Html, IntoResponse},
	routing::{get, post},
	Router,
};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::{common::session::resolve_request_context, dependencies::AppState, views};

pub fn create_routes(state: AppState) -> Router {
	Router::new()
		.route("/", get(home::homepage))
		.route("/signup", get(auth::signup_form).post(auth::signup))
		.route("/login", get(auth::login_form).post(auth::login))
		.route("/logout", get(auth::logout))
		.route("/users", get(users::list_users))
		.route("/users/profile", get(users::edit_profile).post(users::update_profile))
		.route("/users/delete", post(users::delete_user))
		.route("/users/follow/:follow_id", post(users::add_follow))
		.route("/users/stop-following/:follow_id", post(users::stop_following))
		.route("/users/add_like/:message_id", post(users::add_like))
		.route("/users/:user_id", get(users::users_show))
		.route("/users/:user_id/following", get(users::show_following))
		.route("/users/:user_id/followers", get(users::show_followers))
		.route("/users/:user_id/likes", get(users::show_likes))
		.route("/messages/new", get(messages::new_message_form).post(messages::add_message))
		.route("/messages/:message_id", get(messages::show_message))
		.route("/messages/:message_id/delete", post(messages::delete_message))
		.fallback(not_found)
		.layer(middleware::from_fn_with_state(state.clone(), resolve_request_context))
		.layer(SetResponseHeaderLayer::overriding(
			header::CACHE_CONTROL,
			HeaderValue::from_static("no-cache, no-store, must-revalidate, public, max-age=0"),
		))
		.layer(SetResponseHeaderLayer::overriding(header::PRAGMA, HeaderValue::from_static("no-cache")))
		.layer(SetResponseHeaderLayer::overriding(header::EXPIRES, HeaderValue::from_static("0")))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

async fn not_found() -> impl IntoResponse {
	(StatusCode::NOT_FOUND, Html(views::not_found()))
}

/// Path of the page the request came from, if it is on this site.
fn local_referer(headers: &HeaderMap) -> Option<String> {
	let referer = headers.get(header::REFERER)?.to_str().ok()?;
	let path = match referer.split_once("://") {
		Some((_scheme, rest)) => &rest[rest.find('/')?..],
		None => referer,
	};
	(path.starts_with('/') && !path.starts_with("//")).then(|| path.to_string())
}
