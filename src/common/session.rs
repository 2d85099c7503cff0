use axum::{
	extract::{Request, State},
	http::{header, HeaderValue},
	middleware::Next,
	response::Response,
};
use axum_extra::extract::CookieJar;

use crate::{
	dependencies::AppState,
	domain::session::{Flash, RequestContext, FLASH_COOKIE, SESSION_COOKIE},
	services::handlers::SessionHandler,
};

/// Resolves the session cookie to the current user and the flash cookie to a
/// notice, and hands both to the handler as a [`RequestContext`] extension.
///
/// A consumed flash is expired on the way out unless the handler queued a new one.
pub async fn resolve_request_context(
	State(state): State<AppState>,
	jar: CookieJar,
	mut request: Request,
	next: Next,
) -> Response {
	let current_user = match jar.get(SESSION_COOKIE) {
		Some(cookie) => SessionHandler::current_user(&state.pool, cookie.value()).await.unwrap_or_else(|err| {
			tracing::error!("Failed to resolve session : {}", err);
			None
		}),
		None => None,
	};
	let flash = jar.get(FLASH_COOKIE).and_then(|cookie| Flash::from_code(cookie.value()));

	request.extensions_mut().insert(RequestContext { current_user, flash });
	let mut response = next.run(request).await;

	if flash.is_some() && !sets_cookie(&response, FLASH_COOKIE) {
		if let Ok(value) = HeaderValue::from_str(&Flash::removal_cookie().to_string()) {
			response.headers_mut().append(header::SET_COOKIE, value);
		}
	}
	response
}

fn sets_cookie(
	response: &Response,
	name: &str,
) -> bool {
	response
		.headers()
		.get_all(header::SET_COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.any(|value| value.split_once('=').is_some_and(|(cookie_name, _)| cookie_name.trim() == name))
}
