use axum::response::Html;

use super::{layout, message_list};
use crate::domain::{message::MessageWithAuthor, session::RequestContext, user::User};

pub fn home_anon(ctx: &RequestContext) -> Html<String> {
	layout(
		ctx,
		"Home",
		"<div class=\"home-hero\"><h1>What's Happening?</h1><h4>New to Warbler?</h4>\
		 <a href=\"/signup\" class=\"btn btn-primary\">Sign up now</a></div>",
	)
}

pub fn home(
	ctx: &RequestContext,
	user: &User,
	messages: &[MessageWithAuthor],
	liked_ids: &[i64],
) -> Html<String> {
	let body = format!(
		"<aside class=\"user-aside\"><a href=\"/users/{id}\">@{username}</a></aside>\
		 <section class=\"timeline\">{messages}</section>",
		id = user.id,
		username = super::escape(&user.username),
		messages = message_list(ctx, messages, liked_ids),
	);
	layout(ctx, "Home", &body)
}
